use ratatui::style::{Color, Modifier, Style};

use crate::calendar::EventCategory;

pub const HEADER_STYLE: Style = Style::new()
    .fg(Color::White)
    .add_modifier(Modifier::BOLD);
pub const DIM_STYLE: Style = Style::new().fg(Color::DarkGray);
pub const BORDER_STYLE: Style = Style::new().fg(Color::Gray);
pub const STATUS_STYLE: Style = Style::new().fg(Color::White).bg(Color::DarkGray);
pub const TODAY_STYLE: Style = Style::new().fg(Color::Black).bg(Color::Yellow);
pub const INK_STYLE: Style = Style::new().fg(Color::Magenta).add_modifier(Modifier::BOLD);
pub const BANNER_STYLE: Style = Style::new()
    .fg(Color::Cyan)
    .add_modifier(Modifier::BOLD);

pub fn category_style(category: EventCategory) -> Style {
    match category {
        EventCategory::Work => Style::new().fg(Color::Blue),
        EventCategory::Personal => Style::new().fg(Color::Green),
        EventCategory::Holiday => Style::new().fg(Color::Magenta),
        EventCategory::Other => Style::new().fg(Color::Gray),
    }
}
