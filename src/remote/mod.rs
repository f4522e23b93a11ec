pub mod gemini;

pub use gemini::{candidates_into_events, CandidateEvent, GeminiClient, Interpretation};
