use chrono::NaiveDate;
use uuid::Uuid;

/// Event category as recognized by the interpretation model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventCategory {
    Work,
    Personal,
    Holiday,
    Other,
}

impl EventCategory {
    /// Maps a model-emitted name to a category; anything unrecognized
    /// (or absent) falls back to `Other`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "work" => EventCategory::Work,
            "personal" => EventCategory::Personal,
            "holiday" => EventCategory::Holiday,
            _ => EventCategory::Other,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EventCategory::Work => "work",
            EventCategory::Personal => "personal",
            EventCategory::Holiday => "holiday",
            EventCategory::Other => "other",
        }
    }
}

#[derive(Debug, Clone)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub date: NaiveDate,
    pub category: EventCategory,
}

impl CalendarEvent {
    /// Mints a fresh identifier; events are never mutated after creation.
    pub fn new(title: impl Into<String>, date: NaiveDate, category: EventCategory) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            date,
            category,
        }
    }
}
