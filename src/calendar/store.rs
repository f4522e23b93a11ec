use chrono::NaiveDate;

use super::event::CalendarEvent;

/// In-memory, insertion-ordered event collection.
///
/// The interpretation completion handler is the only append path; the grid
/// builder reads it. Nothing here survives process exit.
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<CalendarEvent>,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a recognized batch, preserving its internal order.
    pub fn append(&mut self, batch: Vec<CalendarEvent>) {
        self.events.extend(batch);
    }

    pub fn all(&self) -> &[CalendarEvent] {
        &self.events
    }

    pub fn events_on(&self, date: NaiveDate) -> Vec<CalendarEvent> {
        self.events
            .iter()
            .filter(|e| e.date == date)
            .cloned()
            .collect()
    }

    /// Removes the event with the given id, if present.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.events.len();
        self.events.retain(|e| e.id != id);
        self.events.len() != before
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
