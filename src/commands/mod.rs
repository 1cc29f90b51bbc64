//! Command-line interface of taskly.
//!
//! Every subcommand opens the client layer through [`App`], checks the
//! route guard for the surface it represents and then drives the session,
//! query engine, view state or mutations.
//!
//! ## Routes
//!
//! - `login`, `register` act on the public `/login` and `/register` routes
//! - every task command acts on the home route `/`, with the view's
//!   location as its query string
//!
//! A redirect from the guard ends the command with a hint instead of
//! running it.

pub mod auth;
pub mod browse;
pub mod init;
pub mod list;
pub mod status;
pub mod task;

use crate::api::ApiError;
use crate::libs::app::App;
use crate::libs::config::Config;
use crate::libs::guard::{Navigation, HOME_ROUTE, LOGIN_ROUTE};
use crate::libs::messages::Message;
use crate::libs::query_engine::QueryOutcome;
use crate::libs::view::View;
use crate::{msg_error, msg_info};
use anyhow::{anyhow, Result};
use clap::{ArgAction, Parser, Subcommand};
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configure the API URL and task view")]
    Init,
    #[command(about = "Create an account")]
    Register(auth::CredentialArgs),
    #[command(about = "Log in and store the session")]
    Login(auth::CredentialArgs),
    #[command(about = "Clear the stored session")]
    Logout,
    #[command(about = "Show the session status")]
    Status,
    #[command(about = "List tasks of the current view")]
    List(list::ListArgs),
    #[command(about = "Create a task")]
    Add(task::AddArgs),
    #[command(about = "Edit a task's title and description")]
    Edit(task::EditArgs),
    #[command(about = "Delete a task")]
    Delete(task::DeleteArgs),
    #[command(about = "Mark a task as completed")]
    Done(task::ToggleArgs),
    #[command(about = "Mark a task as not completed")]
    Undone(task::ToggleArgs),
    #[command(about = "Browse tasks interactively")]
    Browse,
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> Result<()> {
        let cli = Self::parse();
        init_tracing(cli.verbose)?;

        match cli.command {
            Commands::Init => init::cmd(),
            Commands::Register(args) => auth::register(args).await,
            Commands::Login(args) => auth::login(args).await,
            Commands::Logout => auth::logout(),
            Commands::Status => status::cmd(),
            Commands::List(args) => list::cmd(args).await,
            Commands::Add(args) => task::add(args).await,
            Commands::Edit(args) => task::edit(args).await,
            Commands::Delete(args) => task::delete(args).await,
            Commands::Done(args) => task::toggle(args, true).await,
            Commands::Undone(args) => task::toggle(args, false).await,
            Commands::Browse => browse::cmd().await,
        }
    }
}

/// Installs the `tracing` subscriber on stderr; `RUST_LOG` wins over `-v`.
pub fn init_tracing(verbose: u8) -> Result<()> {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG filter: {e}"))?;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    Ok(())
}

/// `true` when the error was already shown to the user by the API client.
pub fn is_notified(err: &anyhow::Error) -> bool {
    err.downcast_ref::<ApiError>().is_some()
}

/// Opens the app and applies the route guard for `route`.
///
/// Returns `None` after printing the redirect when the route is not open
/// under the current session.
pub(crate) fn open(route: &str) -> Result<Option<App>> {
    let app = App::open(&Config::read()?)?;
    match app.navigate(route) {
        Navigation::Proceed => Ok(Some(app)),
        Navigation::Redirect(target) => {
            if target == LOGIN_ROUTE {
                msg_error!(Message::NotLoggedIn);
            } else {
                msg_info!(Message::AlreadyLoggedIn);
            }
            msg_info!(Message::RedirectTo(target.to_string()));
            Ok(None)
        }
    }
}

/// Opens the task view: guarded on `/`, hydrated from the saved location.
pub(crate) fn open_view() -> Result<Option<App>> {
    let Some(app) = open(HOME_ROUTE)? else {
        return Ok(None);
    };
    app.view.hydrate();
    Ok(Some(app))
}

/// Prints the result of a query run. Failures were already reported by the API client.
pub(crate) fn show(app: &App, outcome: &QueryOutcome) {
    match outcome {
        QueryOutcome::Loaded(page) => View::page(page, &app.view.params()),
        QueryOutcome::Failed(_) | QueryOutcome::Superseded => {}
        QueryOutcome::Disabled => msg_error!(Message::NotLoggedIn),
    }
}
