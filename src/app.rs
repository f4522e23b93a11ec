use std::sync::Arc;

use chrono::{Datelike, Local, NaiveDate};
use color_eyre::Result;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::calendar::{days_in_month, EventStore};
use crate::capture::StrokeCanvas;
use crate::remote::{GeminiClient, Interpretation};

/// Which of the three interaction states the UI is in. Owned by `App`;
/// transitions happen only through its methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Viewing,
    Drawing,
    AwaitingInterpretation,
}

/// Banner state, mutated only by the banner flow.
#[derive(Debug, Default, Clone)]
pub struct ThemeState {
    pub image_url: Option<String>,
    pub is_loading: bool,
}

/// Completion of a spawned remote call, delivered over the channel and
/// drained once per tick. The generation token advances on month change, so
/// completions that arrive after the user navigated away are discarded.
#[derive(Debug)]
pub enum RemoteEvent {
    Interpreted {
        generation: u64,
        outcome: Result<Interpretation>,
    },
    Banner {
        generation: u64,
        image_url: Option<String>,
    },
}

pub struct App {
    pub running: bool,
    pub mode: Mode,
    pub reference_date: NaiveDate,
    pub today: NaiveDate,
    pub store: EventStore,
    pub canvas: StrokeCanvas,
    pub theme: ThemeState,
    pub status_message: Option<String>,
    pub show_help: bool,
    generation: u64,
    client: Arc<GeminiClient>,
    runtime: Handle,
    tx: UnboundedSender<RemoteEvent>,
    rx: UnboundedReceiver<RemoteEvent>,
}

impl App {
    pub fn new(client: Arc<GeminiClient>, runtime: Handle) -> Self {
        let today = Local::now().date_naive();
        let (tx, rx) = mpsc::unbounded_channel();

        let mut app = Self {
            running: true,
            mode: Mode::Viewing,
            reference_date: today,
            today,
            store: EventStore::new(),
            canvas: StrokeCanvas::new(),
            theme: ThemeState::default(),
            status_message: None,
            show_help: false,
            generation: 0,
            client,
            runtime,
            tx,
            rx,
        };
        app.refresh_banner();
        app
    }

    /// Current month-session token, for pairing with `RemoteEvent`s.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    // --- month navigation ---

    pub fn next_month(&mut self) {
        let month = self.reference_date.month();
        let year = self.reference_date.year();
        let (new_year, new_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
        self.set_reference(new_year, new_month);
    }

    pub fn prev_month(&mut self) {
        let month = self.reference_date.month();
        let year = self.reference_date.year();
        let (new_year, new_month) = if month == 1 {
            (year - 1, 12)
        } else {
            (year, month - 1)
        };
        self.set_reference(new_year, new_month);
    }

    pub fn go_to_today(&mut self) {
        self.today = Local::now().date_naive();
        if self.reference_date.year() == self.today.year()
            && self.reference_date.month() == self.today.month()
        {
            self.reference_date = self.today;
            return;
        }
        self.set_reference(self.today.year(), self.today.month());
    }

    fn set_reference(&mut self, year: i32, month: u32) {
        let day = self.reference_date.day().min(days_in_month(year, month));
        self.reference_date = NaiveDate::from_ymd_opt(year, month, day).unwrap();
        // Outstanding completions now belong to the old month.
        self.generation += 1;
        self.refresh_banner();
    }

    // --- drawing mode ---

    /// Viewing -> Drawing, unconditionally.
    pub fn start_drawing(&mut self) {
        if self.mode != Mode::Viewing {
            return;
        }
        self.mode = Mode::Drawing;
        self.canvas.set_active(true);
    }

    /// Drawing -> Viewing. Cancel clears the surface.
    pub fn cancel_drawing(&mut self) {
        if self.mode != Mode::Drawing {
            return;
        }
        self.canvas.set_active(false);
        self.canvas.clear();
        self.mode = Mode::Viewing;
    }

    pub fn clear_canvas(&mut self) {
        if self.mode == Mode::Drawing {
            self.canvas.clear();
        }
    }

    /// Drawing -> AwaitingInterpretation, gated on the surface having
    /// content. An empty submit is rejected without any remote call; a
    /// missing credential short-circuits back to Viewing with the strokes
    /// intact.
    pub fn submit_capture(&mut self) {
        if self.mode != Mode::Drawing {
            return;
        }
        let Some(png) = self.canvas.snapshot() else {
            self.status_message = Some("Canvas is empty! Draw an event first".to_string());
            return;
        };

        if !self.client.is_available() {
            log::warn!("submit with no API key configured; interpretation disabled");
            self.status_message =
                Some("No Gemini API key configured; interpretation is disabled".to_string());
            self.canvas.set_active(false);
            self.mode = Mode::Viewing;
            return;
        }

        let generation = self.generation;
        self.mode = Mode::AwaitingInterpretation;
        self.canvas.set_active(false);

        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        let context = self.reference_date;
        self.runtime.spawn(async move {
            let outcome = client.interpret_handwriting(&png, context).await;
            let _ = tx.send(RemoteEvent::Interpreted { generation, outcome });
        });
    }

    // --- remote completions ---

    /// Drains completions delivered since the last tick.
    pub fn poll_remote(&mut self) {
        while let Ok(event) = self.rx.try_recv() {
            self.handle_remote(event);
        }
    }

    pub fn handle_remote(&mut self, event: RemoteEvent) {
        match event {
            RemoteEvent::Interpreted {
                generation,
                outcome,
            } => {
                if generation != self.generation {
                    log::debug!("discarding stale interpretation (generation {generation})");
                    // the call still settles the awaiting state
                    if self.mode == Mode::AwaitingInterpretation {
                        self.mode = Mode::Viewing;
                    }
                    return;
                }
                self.finish_interpretation(outcome);
            }
            RemoteEvent::Banner {
                generation,
                image_url,
            } => {
                if generation != self.generation {
                    log::debug!("discarding stale banner (generation {generation})");
                    return;
                }
                self.theme = ThemeState {
                    image_url,
                    is_loading: false,
                };
            }
        }
    }

    /// AwaitingInterpretation -> Viewing on every path. Success with one or
    /// more events appends the batch and clears the surface; zero events and
    /// hard failures leave both the store and the surface untouched.
    pub fn finish_interpretation(&mut self, outcome: Result<Interpretation>) {
        self.mode = Mode::Viewing;
        match outcome {
            Ok(Interpretation::Recognized(events)) if !events.is_empty() => {
                let count = events.len();
                self.store.append(events);
                self.canvas.clear();
                log::info!("merged {count} interpreted event(s) into the store");
                self.status_message = Some(if count == 1 {
                    "Added 1 event".to_string()
                } else {
                    format!("Added {count} events")
                });
            }
            Ok(Interpretation::Recognized(_)) => {
                log::info!("interpretation recognized zero events");
                self.status_message = Some(
                    "No events recognized. Try writing clearly, e.g. \"Dinner Fri\"".to_string(),
                );
            }
            Ok(Interpretation::Unavailable) => {
                log::warn!("interpretation unavailable: no API key configured");
                self.status_message =
                    Some("No Gemini API key configured; interpretation is disabled".to_string());
            }
            Err(err) => {
                log::warn!("handwriting interpretation failed: {err:#}");
                self.status_message =
                    Some("Failed to interpret handwriting. See the log file".to_string());
            }
        }
    }

    // --- banner ---

    /// Fire-and-forget banner refresh; triggered only on month change so
    /// remote-call volume stays bounded.
    fn refresh_banner(&mut self) {
        self.theme.is_loading = true;
        let generation = self.generation;
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        let context = self.reference_date;
        let titles: Vec<String> = self
            .store
            .all()
            .iter()
            .take(5)
            .map(|e| e.title.clone())
            .collect();
        self.runtime.spawn(async move {
            let image_url = client.generate_banner(context, &titles).await;
            let _ = tx.send(RemoteEvent::Banner {
                generation,
                image_url,
            });
        });
    }
}
