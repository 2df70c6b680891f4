//! Ready-made receivers
//!
//! - [`ChannelReceiver`] queues messages for code that prefers polling
//! - [`LoggingReceiver`] logs messages, used when no native host is attached

use super::registry::MessageReceiver;
use crossbeam_channel::{Receiver, Sender, TrySendError};

/// Forwards messages into a crossbeam channel.
///
/// Never blocks the sending thread: when a bounded channel is full the
/// message is dropped and a warning is logged.
pub struct ChannelReceiver {
    sender: Sender<String>,
}

impl ChannelReceiver {
    pub fn unbounded() -> (Self, Receiver<String>) {
        let (sender, receiver) = crossbeam_channel::unbounded();
        (Self { sender }, receiver)
    }

    pub fn bounded(capacity: usize) -> (Self, Receiver<String>) {
        let (sender, receiver) = crossbeam_channel::bounded(capacity);
        (Self { sender }, receiver)
    }

    /// Wrap an existing sender
    pub fn from_sender(sender: Sender<String>) -> Self {
        Self { sender }
    }
}

impl MessageReceiver for ChannelReceiver {
    fn receive(&self, message: &str) {
        match self.sender.try_send(message.to_owned()) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                tracing::warn!(target: "bridge", "Channel receiver full, message dropped");
            }
            Err(TrySendError::Disconnected(_)) => {
                tracing::warn!(target: "bridge", "Channel receiver disconnected, message dropped");
            }
        }
    }
}

/// Logs every message at info level
#[derive(Debug, Clone)]
pub struct LoggingReceiver {
    label: String,
}

impl Default for LoggingReceiver {
    fn default() -> Self {
        Self::new("host")
    }
}

impl LoggingReceiver {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl MessageReceiver for LoggingReceiver {
    fn receive(&self, message: &str) {
        tracing::info!(target: "bridge::host", receiver = %self.label, "Sending message: {}", message);
    }
}
