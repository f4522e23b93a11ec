use std::sync::Arc;
use std::time::Duration;

use color_eyre::Result;
use crossterm::event::{KeyCode, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Constraint, Layout, Rect};

use inkcal::app::{App, Mode};
use inkcal::calendar::build_grid;
use inkcal::components::{Banner, MonthGrid, StatusBar};
use inkcal::config::Config;
use inkcal::event::{self, Input};
use inkcal::remote::GeminiClient;
use inkcal::{logging, theme, tui};

fn main() -> Result<()> {
    color_eyre::install()?;
    let _logger = logging::init()?;

    let config = Config::load();
    let client = match config.gemini_api_key {
        Some(key) => GeminiClient::new(key),
        None => {
            log::warn!("no Gemini API key configured; remote capabilities are disabled");
            GeminiClient::unavailable()
        }
    };

    let runtime = tokio::runtime::Runtime::new()?;
    let mut app = App::new(Arc::new(client), runtime.handle().clone());

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = tui::restore();
        original_hook(panic_info);
    }));

    let mut terminal = tui::init()?;
    let result = run(&mut terminal, &mut app);
    tui::restore()?;
    result
}

fn run(terminal: &mut tui::Tui, app: &mut App) -> Result<()> {
    while app.running {
        app.poll_remote();

        // Layout is computed outside the draw closure so the stroke surface
        // can be kept aligned with the grid interior.
        let size = terminal.size()?;
        let area = Rect::new(0, 0, size.width, size.height);
        let layout = Layout::vertical([
            Constraint::Length(4),
            Constraint::Min(10),
            Constraint::Length(1),
        ])
        .split(area);
        let (banner_area, grid_area, status_area) = (layout[0], layout[1], layout[2]);
        app.canvas.set_area(MonthGrid::layout(grid_area));

        let cells = build_grid(app.reference_date, app.today, app.store.all());

        terminal.draw(|frame| {
            Banner::render(frame, banner_area, app.reference_date, &app.theme);
            MonthGrid::render(frame, grid_area, &cells, &app.canvas);
            StatusBar::render(frame, status_area, app.mode, app.status_message.as_deref());

            if app.show_help {
                render_help(frame, area);
            }
        })?;

        match event::next_input(Duration::from_millis(100))? {
            Some(Input::Key(key)) => {
                // Clear transient message on any key
                app.status_message = None;

                if app.show_help {
                    if key.code == KeyCode::Esc || key.code == KeyCode::Char('?') {
                        app.show_help = false;
                    }
                    continue;
                }

                handle_key(app, key.code, key.modifiers);
            }
            Some(Input::Mouse(mouse)) => handle_mouse(app, mouse),
            None => {}
        }
    }

    Ok(())
}

fn handle_key(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    match (code, modifiers) {
        (KeyCode::Char('q'), _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
            app.running = false;
            return;
        }
        (KeyCode::Char('?'), _) => {
            app.show_help = true;
            return;
        }
        _ => {}
    }

    match app.mode {
        Mode::Drawing => match code {
            KeyCode::Esc | KeyCode::Char('d') => app.cancel_drawing(),
            KeyCode::Char('e') => app.clear_canvas(),
            KeyCode::Enter => app.submit_capture(),
            _ => {}
        },
        // Month navigation stays reachable while a call is in flight; the
        // generation guard discards whatever lands late.
        Mode::Viewing | Mode::AwaitingInterpretation => match code {
            KeyCode::Char('d') => app.start_drawing(),
            KeyCode::Char('t') => app.go_to_today(),
            KeyCode::Char('[') | KeyCode::Left | KeyCode::Char('h') => app.prev_month(),
            KeyCode::Char(']') | KeyCode::Right | KeyCode::Char('l') => app.next_month(),
            _ => {}
        },
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if app.mode != Mode::Drawing {
        return;
    }
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            app.canvas.begin_stroke(mouse.column, mouse.row)
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            app.canvas.extend_stroke(mouse.column, mouse.row)
        }
        MouseEventKind::Up(MouseButton::Left) => app.canvas.end_stroke(),
        _ => {}
    }
}

fn render_help(frame: &mut ratatui::Frame, area: Rect) {
    use ratatui::style::{Color, Modifier, Style};
    use ratatui::text::{Line, Span};
    use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

    let popup_w = area.width.min(52).max(30);
    let popup_h = area.height.min(18).max(10);
    let x = area.x + (area.width.saturating_sub(popup_w)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_h)) / 2;
    let popup_area = Rect::new(x, y, popup_w, popup_h);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Keybindings ")
        .title_style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let key_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let desc_style = Style::default();
    let section_style = Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED);

    let lines = vec![
        Line::from(Span::styled("Navigation", section_style)),
        Line::from(vec![
            Span::styled("  [/] ", key_style),
            Span::styled("or ", theme::DIM_STYLE),
            Span::styled("\u{2190}/\u{2192}  ", key_style),
            Span::styled("Previous/next month", desc_style),
        ]),
        Line::from(vec![
            Span::styled("  t         ", key_style),
            Span::styled("Jump to today", desc_style),
        ]),
        Line::from(""),
        Line::from(Span::styled("Handwriting", section_style)),
        Line::from(vec![
            Span::styled("  d         ", key_style),
            Span::styled("Toggle draw mode", desc_style),
        ]),
        Line::from(vec![
            Span::styled("  mouse     ", key_style),
            Span::styled("Draw on the calendar", desc_style),
        ]),
        Line::from(vec![
            Span::styled("  Enter     ", key_style),
            Span::styled("Interpret the handwriting", desc_style),
        ]),
        Line::from(vec![
            Span::styled("  e         ", key_style),
            Span::styled("Erase the canvas", desc_style),
        ]),
        Line::from(vec![
            Span::styled("  Esc       ", key_style),
            Span::styled("Cancel drawing", desc_style),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  q", key_style),
            Span::styled(" / ", theme::DIM_STYLE),
            Span::styled("Ctrl-C  ", key_style),
            Span::styled("Quit", desc_style),
        ]),
    ];

    let para = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(para, inner);
}
