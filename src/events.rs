use serde::Serialize;

/// How the narration line should be styled by a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    Info,
    Action,
    Block,
    Challenge,
    Influence,
    Elimination,
    Victory,
    Warning,
}

/// One line of game narration, stamped with the turn it happened on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub turn: u32,
    #[serde(rename = "type")]
    pub category: EventCategory,
    pub message: String,
}

/// Append-only narration history. Projections only ever ship the tail.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventLog {
    entries: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, turn: u32, category: EventCategory, message: impl Into<String>) {
        let message = message.into();
        log::debug!("turn {turn}: {message}");
        self.entries.push(Event { turn, category, message });
    }

    /// The most recent `n` entries, oldest first.
    pub fn tail(&self, n: usize) -> &[Event] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.entries.iter()
    }
}
