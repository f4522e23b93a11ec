use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::Mode;
use crate::theme;

pub struct StatusBar;

impl StatusBar {
    pub fn render(frame: &mut Frame, area: Rect, mode: Mode, message: Option<&str>) {
        let w = area.width as usize;

        let mode_str = match mode {
            Mode::Viewing => "[view]",
            Mode::Drawing => "[draw]",
            Mode::AwaitingInterpretation => "[analyzing…]",
        };

        // Transient message wins over the hint line
        let right = if let Some(msg) = message {
            format!(" {} ", msg)
        } else {
            match mode {
                Mode::Viewing if w >= 70 => {
                    " [/]:Month t:Today d:Draw ?:Help q:Quit".to_string()
                }
                Mode::Viewing => " d:Draw q:Quit".to_string(),
                Mode::Drawing if w >= 70 => {
                    " mouse:Draw Enter:Interpret e:Erase Esc:Cancel".to_string()
                }
                Mode::Drawing => " Enter:Go Esc:Cancel".to_string(),
                Mode::AwaitingInterpretation => " interpreting handwriting…".to_string(),
            }
        };

        let left = format!(" {} ", mode_str);
        let padding = " ".repeat(w.saturating_sub(left.chars().count() + right.chars().count()));

        let line = Line::from(vec![
            Span::styled(left, theme::STATUS_STYLE),
            Span::styled(padding, theme::STATUS_STYLE),
            Span::styled(right, theme::STATUS_STYLE),
        ]);

        frame.render_widget(Paragraph::new(line).style(theme::STATUS_STYLE), area);
    }
}
