use std::sync::Mutex;

/// Synchronous, user-visible notification sink.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Writes notifications to stderr, for terminal front-ends.
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&self, message: &str) {
        eprintln!("{message}");
    }
}

/// Keeps every notification in memory.
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|messages| messages.clone())
            .unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message.to_string());
        }
    }
}
