use chrono::{DateTime, Local};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Assistant,
}

/// One transcript entry. `id` is unique within a session; `timestamp` is
/// fixed at creation.
#[derive(Debug, Clone)]
pub struct Message {
    pub id: u64,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Local>,
}

impl Message {
    pub fn new(id: u64, sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            sender,
            timestamp: Local::now(),
        }
    }

    /// Clock-style time shown under each chat bubble.
    pub fn clock_time(&self) -> String {
        self.timestamp.format("%H:%M").to_string()
    }
}
