//! Account commands: register, login and logout.

use super::open;
use crate::api::auth::LoginCredentials;
use crate::libs::guard::{HOME_ROUTE, LOGIN_ROUTE, REGISTER_ROUTE};
use crate::libs::messages::Message;
use crate::msg_info;
use anyhow::Result;
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Input, Password};

#[derive(Debug, Args)]
pub struct CredentialArgs {
    /// Account name; prompted for when omitted
    #[arg(short, long)]
    username: Option<String>,
}

impl CredentialArgs {
    fn prompt(self) -> Result<LoginCredentials> {
        let username = match self.username {
            Some(username) => username,
            None => Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptUsername.to_string())
                .interact_text()?,
        };
        let password = Password::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptPassword.to_string())
            .interact()?;
        Ok(LoginCredentials::new(username, password))
    }
}

pub async fn register(args: CredentialArgs) -> Result<()> {
    let Some(app) = open(REGISTER_ROUTE)? else {
        return Ok(());
    };

    app.auth.register(&args.prompt()?).await?;
    msg_info!(Message::RedirectTo(LOGIN_ROUTE.to_string()));
    Ok(())
}

pub async fn login(args: CredentialArgs) -> Result<()> {
    let Some(app) = open(LOGIN_ROUTE)? else {
        return Ok(());
    };

    app.auth.login(&args.prompt()?).await?;
    msg_info!(Message::RedirectTo(HOME_ROUTE.to_string()));
    Ok(())
}

pub fn logout() -> Result<()> {
    let Some(app) = open(HOME_ROUTE)? else {
        return Ok(());
    };

    app.auth.logout()?;
    msg_info!(Message::RedirectTo(LOGIN_ROUTE.to_string()));
    Ok(())
}
