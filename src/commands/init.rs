//! Configuration initialization command.
//!
//! Runs the setup wizard for the API URL and task view settings and saves
//! the result to `config.json`.

use crate::{
    libs::{config::Config, messages::Message},
    msg_success,
};
use anyhow::Result;

pub fn cmd() -> Result<()> {
    Config::init()?.save()?;
    msg_success!(Message::ConfigSaved);
    Ok(())
}
