use std::sync::Arc;

use chrono::NaiveDate;
use color_eyre::eyre::eyre;
use ratatui::layout::Rect;
use tokio::runtime::Handle;

use inkcal::app::{App, Mode, RemoteEvent};
use inkcal::calendar::{build_grid, CalendarEvent, EventCategory};
use inkcal::remote::{candidates_into_events, CandidateEvent, GeminiClient, Interpretation};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// App in drawing mode with one stroke already on the canvas.
fn drawn_app(client: GeminiClient) -> App {
    let mut app = App::new(Arc::new(client), Handle::current());
    app.canvas.set_area(Rect::new(0, 0, 60, 30));
    app.start_drawing();
    app.canvas.begin_stroke(10, 10);
    app.canvas.extend_stroke(20, 12);
    app.canvas.end_stroke();
    app
}

#[tokio::test]
async fn empty_submit_is_rejected_before_any_call() {
    let mut app = App::new(Arc::new(GeminiClient::unavailable()), Handle::current());
    app.canvas.set_area(Rect::new(0, 0, 60, 30));
    app.start_drawing();

    app.submit_capture();

    // rejected synchronously: still drawing, user told why
    assert_eq!(app.mode, Mode::Drawing);
    assert!(app.status_message.as_deref().unwrap().contains("empty"));
    assert!(app.store.is_empty());
}

#[tokio::test]
async fn missing_credential_short_circuits_to_viewing() {
    let mut app = drawn_app(GeminiClient::unavailable());

    app.submit_capture();

    assert_eq!(app.mode, Mode::Viewing);
    assert!(app.store.is_empty());
    // strokes survive so the user can reconfigure and resubmit
    assert!(app.canvas.has_content());
    assert!(app.status_message.as_deref().unwrap().contains("API key"));
}

#[tokio::test]
async fn successful_interpretation_appends_batch_and_clears_canvas() {
    let mut app = drawn_app(GeminiClient::new("test-key".into()));
    app.submit_capture();
    assert_eq!(app.mode, Mode::AwaitingInterpretation);

    let events = vec![
        CalendarEvent::new("Dinner", date(2024, 3, 15), EventCategory::Personal),
        CalendarEvent::new("Standup", date(2024, 3, 18), EventCategory::Work),
    ];
    app.handle_remote(RemoteEvent::Interpreted {
        generation: app.generation(),
        outcome: Ok(Interpretation::Recognized(events)),
    });

    assert_eq!(app.mode, Mode::Viewing);
    assert_eq!(app.store.len(), 2);
    assert!(!app.canvas.has_content());
    assert_eq!(app.status_message.as_deref(), Some("Added 2 events"));
}

#[tokio::test]
async fn zero_recognized_events_leaves_store_and_strokes_alone() {
    let mut app = drawn_app(GeminiClient::new("test-key".into()));
    app.submit_capture();

    app.handle_remote(RemoteEvent::Interpreted {
        generation: app.generation(),
        outcome: Ok(Interpretation::Recognized(Vec::new())),
    });

    assert_eq!(app.mode, Mode::Viewing);
    assert!(app.store.is_empty());
    assert!(app.canvas.has_content());
    assert!(app
        .status_message
        .as_deref()
        .unwrap()
        .contains("No events recognized"));
}

#[tokio::test]
async fn interpretation_error_leaves_store_and_strokes_alone() {
    let mut app = drawn_app(GeminiClient::new("test-key".into()));
    app.submit_capture();

    app.handle_remote(RemoteEvent::Interpreted {
        generation: app.generation(),
        outcome: Err(eyre!("connection reset by peer")),
    });

    assert_eq!(app.mode, Mode::Viewing);
    assert!(app.store.is_empty());
    assert!(app.canvas.has_content());
    assert!(app.status_message.as_deref().unwrap().contains("Failed"));
}

#[tokio::test]
async fn stale_interpretation_is_discarded_after_month_change() {
    let mut app = drawn_app(GeminiClient::new("test-key".into()));
    app.submit_capture();
    let stale_generation = app.generation();

    // user navigates away while the call is in flight
    app.next_month();
    assert_ne!(app.generation(), stale_generation);

    app.handle_remote(RemoteEvent::Interpreted {
        generation: stale_generation,
        outcome: Ok(Interpretation::Recognized(vec![CalendarEvent::new(
            "Late arrival",
            date(2024, 3, 15),
            EventCategory::Other,
        )])),
    });

    // result dropped, but the awaiting state still settles
    assert!(app.store.is_empty());
    assert_eq!(app.mode, Mode::Viewing);
}

#[tokio::test]
async fn dinner_on_the_fifteenth_lands_in_the_march_cell() {
    let mut app = drawn_app(GeminiClient::new("test-key".into()));
    app.reference_date = date(2024, 3, 1);
    app.today = date(2024, 3, 1);
    app.submit_capture();

    // model payload anchored to the context month, as the client would do
    let payload = r#"[{"title":"Dinner","day":15,"category":"personal"}]"#;
    let candidates: Vec<CandidateEvent> = serde_json::from_str(payload).unwrap();
    let events = candidates_into_events(candidates, app.reference_date);

    app.handle_remote(RemoteEvent::Interpreted {
        generation: app.generation(),
        outcome: Ok(Interpretation::Recognized(events)),
    });

    let grid = build_grid(app.reference_date, app.today, app.store.all());
    let cell = grid.iter().find(|c| c.date == date(2024, 3, 15)).unwrap();
    assert_eq!(cell.events.len(), 1);
    assert_eq!(cell.events[0].title, "Dinner");
    assert_eq!(cell.events[0].category, EventCategory::Personal);
}

#[tokio::test]
async fn banner_completion_updates_theme_and_stale_banner_is_dropped() {
    let mut app = App::new(Arc::new(GeminiClient::new("test-key".into())), Handle::current());

    app.handle_remote(RemoteEvent::Banner {
        generation: app.generation(),
        image_url: Some("data:image/jpeg;base64,abc".to_string()),
    });
    assert!(!app.theme.is_loading);
    assert_eq!(
        app.theme.image_url.as_deref(),
        Some("data:image/jpeg;base64,abc")
    );

    let before = app.theme.clone();
    app.handle_remote(RemoteEvent::Banner {
        generation: app.generation() + 7,
        image_url: None,
    });
    assert_eq!(app.theme.image_url, before.image_url);
}
