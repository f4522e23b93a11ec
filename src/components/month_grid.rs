use chrono::Datelike;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::calendar::{month_name, DayCell};
use crate::capture::StrokeCanvas;
use crate::theme;

const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

pub struct MonthGrid;

impl MonthGrid {
    /// Lays out the grid block and returns the inner area the stroke surface
    /// covers, so the caller can keep the canvas aligned with it.
    pub fn layout(area: Rect) -> Rect {
        Block::default().borders(Borders::ALL).inner(area)
    }

    pub fn render(frame: &mut Frame, area: Rect, cells: &[DayCell], canvas: &StrokeCanvas) {
        let Some(reference) = cells.iter().find(|c| c.is_current_month).map(|c| c.date) else {
            return;
        };

        let title = format!(" {} {} ", month_name(reference.month()), reference.year());
        let block = Block::default()
            .title(title)
            .title_style(theme::HEADER_STYLE)
            .borders(Borders::ALL)
            .border_style(if canvas.is_active() {
                theme::INK_STYLE
            } else {
                theme::BORDER_STYLE
            });

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let weeks = cells.len() / 7;
        let mut constraints = vec![Constraint::Length(1)];
        constraints.extend(std::iter::repeat(Constraint::Ratio(1, weeks as u32)).take(weeks));
        let rows = Layout::vertical(constraints).split(inner);

        let header_cells: Vec<Span> = DAY_NAMES
            .iter()
            .map(|d| Span::styled(format!("{:^9}", d), theme::HEADER_STYLE))
            .collect();
        frame.render_widget(Paragraph::new(Line::from(header_cells)), rows[0]);

        for week in 0..weeks {
            let cols = Layout::horizontal([Constraint::Ratio(1, 7); 7]).split(rows[week + 1]);
            for day in 0..7 {
                Self::render_cell(frame, cols[day], &cells[week * 7 + day]);
            }
        }

        Self::render_ink(frame, canvas);
    }

    fn render_cell(frame: &mut Frame, area: Rect, cell: &DayCell) {
        let day_style = if cell.is_today {
            theme::TODAY_STYLE
        } else if !cell.is_current_month {
            theme::DIM_STYLE
        } else {
            Style::default()
        };

        let mut lines = vec![Line::from(Span::styled(
            format!("{:>2}", cell.date.day()),
            day_style,
        ))];

        let width = area.width.saturating_sub(1) as usize;
        let visible = area.height.saturating_sub(1) as usize;
        // keep one line free for the overflow marker
        let shown = if cell.events.len() > visible {
            visible.saturating_sub(1)
        } else {
            cell.events.len()
        };
        for event in cell.events.iter().take(shown) {
            let mut title = event.title.clone();
            if title.chars().count() > width && width > 1 {
                title = title.chars().take(width - 1).collect();
                title.push('…');
            }
            lines.push(Line::from(Span::styled(
                title,
                theme::category_style(event.category),
            )));
        }
        if cell.events.len() > shown && visible > 0 {
            let hidden = cell.events.len() - shown;
            lines.push(Line::from(Span::styled(
                format!("+{hidden} more"),
                theme::DIM_STYLE,
            )));
        }

        frame.render_widget(Paragraph::new(lines), area);
    }

    /// Paints the stroke overlay on top of the grid, one marker per inked
    /// cell. Coordinates are surface-local, so they are offset back into
    /// screen space here.
    fn render_ink(frame: &mut Frame, canvas: &StrokeCanvas) {
        if !canvas.has_content() {
            return;
        }
        let surface = canvas.area();
        for (x, y) in canvas.inked_cells() {
            let cell = Rect::new(surface.x + x, surface.y + y, 1, 1);
            if cell.x < surface.x + surface.width && cell.y < surface.y + surface.height {
                frame.render_widget(
                    Paragraph::new(Span::styled("•", theme::INK_STYLE)),
                    cell,
                );
            }
        }
    }
}
