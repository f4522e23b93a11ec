pub mod event;
pub mod grid;
pub mod store;

pub use event::{CalendarEvent, EventCategory};
pub use grid::{build_grid, days_in_month, month_name, DayCell};
pub use store::EventStore;
