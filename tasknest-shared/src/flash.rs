//! One-shot flash messages carried across a redirect.
//!
//! Handlers accumulate messages in a [`FlashBag`] during a request; the API
//! layer stashes the bag in the session and drains it on the next page
//! render. Draining empties the stash, so each message is shown once.

use serde::{Deserialize, Serialize};

/// Severity of a flash message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashLevel {
    Success,
    Error,
}

/// A single human-readable notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub level: FlashLevel,
    pub message: String,
}

/// Messages queued during the current request.
#[derive(Debug, Clone, Default)]
pub struct FlashBag {
    messages: Vec<FlashMessage>,
}

impl FlashBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(FlashLevel::Success, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(FlashLevel::Error, message);
    }

    pub fn push(&mut self, level: FlashLevel, message: impl Into<String>) {
        self.messages.push(FlashMessage {
            level,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn messages(&self) -> &[FlashMessage] {
        &self.messages
    }

    /// Takes all queued messages, leaving the bag empty.
    pub fn drain(&mut self) -> Vec<FlashMessage> {
        std::mem::take(&mut self.messages)
    }
}
