use chrono::{Datelike, NaiveDate};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::ThemeState;
use crate::calendar::month_name;
use crate::theme;

pub struct Banner;

impl Banner {
    /// Month title plus banner status. The generated JPEG itself cannot be
    /// drawn in a terminal; its data URI is kept in `ThemeState` and this
    /// line reports whether it is loading, ready, or unavailable.
    pub fn render(frame: &mut Frame, area: Rect, reference: NaiveDate, state: &ThemeState) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme::BORDER_STYLE);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let title = Line::from(Span::styled(
            format!(
                " {} {} ",
                month_name(reference.month()),
                reference.year()
            ),
            theme::BANNER_STYLE,
        ));

        let status = if state.is_loading {
            Line::from(Span::styled(
                " painting this month's banner…",
                theme::DIM_STYLE,
            ))
        } else if let Some(uri) = &state.image_url {
            Line::from(Span::styled(
                format!(" generated banner ready ({} KiB jpeg)", uri.len() / 1024),
                theme::DIM_STYLE,
            ))
        } else {
            Line::from(Span::styled(
                " no banner (set GEMINI_API_KEY for generated art)",
                theme::DIM_STYLE,
            ))
        };

        frame.render_widget(Paragraph::new(vec![title, status]), inner);
    }
}
