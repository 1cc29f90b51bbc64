use std::process::ExitCode;
use taskly::commands::{is_notified, Cli};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();

    match Cli::menu().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // API failures were already reported to the user
            if !is_notified(&err) {
                eprintln!("{:#}", err);
            }
            ExitCode::FAILURE
        }
    }
}
