//! User-visible notification channel.
//!
//! The API client reports every terminal failure here exactly once. The
//! console implementation prints through the `msg_*` macros; the memory
//! implementation records notifications so callers can inspect them.

use super::messages::Message;
use crate::{msg_error, msg_success};
use parking_lot::Mutex;

pub trait Notifier: Send + Sync {
    fn success(&self, message: Message);
    fn error(&self, message: Message);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn success(&self, message: Message) {
        msg_success!(message);
    }

    fn error(&self, message: Message) {
        msg_error!(message);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Success(Message),
    Error(Message),
}

#[derive(Debug, Default)]
pub struct MemoryNotifier {
    log: Mutex<Vec<Notification>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<Notification> {
        self.log.lock().clone()
    }

    pub fn errors(&self) -> Vec<Message> {
        self.log
            .lock()
            .iter()
            .filter_map(|n| match n {
                Notification::Error(message) => Some(message.clone()),
                Notification::Success(_) => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.log.lock().clear();
    }
}

impl Notifier for MemoryNotifier {
    fn success(&self, message: Message) {
        self.log.lock().push(Notification::Success(message));
    }

    fn error(&self, message: Message) {
        tracing::debug!(%message, "notification recorded");
        self.log.lock().push(Notification::Error(message));
    }
}
