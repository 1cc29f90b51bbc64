//! Session status command.

use crate::libs::app::App;
use crate::libs::config::Config;
use crate::libs::messages::Message;
use crate::libs::token::DecodedToken;
use crate::{msg_info, msg_print, msg_warning};
use anyhow::Result;

pub fn cmd() -> Result<()> {
    let app = App::open(&Config::read()?)?;

    let Some(token) = app.session.current_token() else {
        msg_print!(Message::SessionInactive);
        return Ok(());
    };

    msg_print!(Message::SessionActive);
    match DecodedToken::decode(&token).and_then(|decoded| decoded.expires_at()) {
        Some(at) => msg_info!(Message::TokenExpiresAt(at.format("%Y-%m-%d %H:%M:%S UTC").to_string())),
        None => msg_warning!(Message::TokenUndecodable),
    }
    msg_info!(Message::Location(app.view.hydrate().display_location()));
    Ok(())
}
