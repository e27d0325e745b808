//! User-visible notifications ("toasts").

use std::sync::Mutex;

/// Sink for short messages shown to the user.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Drops every message.
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _: &str) {}
}

/// Forwards messages to the log at warn level.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str) {
        tracing::warn!("{message}");
    }
}

/// Keeps every message in memory, for inspection in tests.
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages received so far.
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str) {
        if let Ok(mut m) = self.messages.lock() {
            m.push(message.to_string());
        }
    }
}

/// Message shown when required resources fail to load.
pub const LOAD_FAILED_MESSAGE: &str = "Error loading data. Please refresh the page.";

/// Message shown when a quiz filter matches nothing.
pub const NO_QUESTIONS_MESSAGE: &str = "No questions match your criteria. Try different filters.";
