use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::{Datelike, NaiveDate};
use color_eyre::eyre::{eyre, Result};
use serde::{Deserialize, Serialize};

use crate::calendar::{days_in_month, month_name, CalendarEvent, EventCategory};

const INTERPRET_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent";
const BANNER_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/imagen-4.0-generate-001:predict";

/// Outcome of an interpretation request.
///
/// `Unavailable` means no credential is configured and no call was made;
/// `Recognized` means the call succeeded, possibly with zero events. Hard
/// failures (network, non-2xx, schema mismatch) travel on the `Err` path, so
/// the three cases never share a representation.
#[derive(Debug)]
pub enum Interpretation {
    Unavailable,
    Recognized(Vec<CalendarEvent>),
}

/// Client for the two remote capabilities: handwriting interpretation and
/// banner generation. Constructed once from configuration and injected;
/// a missing key yields the explicit unavailable variant.
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: Some(api_key),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    /// Sends the PNG snapshot plus an instruction naming the context month
    /// and parses the model's JSON array into concrete events.
    pub async fn interpret_handwriting(
        &self,
        png: &[u8],
        context: NaiveDate,
    ) -> Result<Interpretation> {
        let Some(key) = self.api_key.as_deref() else {
            log::info!("interpretation skipped: no API key configured");
            return Ok(Interpretation::Unavailable);
        };

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part {
                        inline_data: Some(InlineData {
                            mime_type: "image/png".into(),
                            data: BASE64.encode(png),
                        }),
                        text: None,
                    },
                    Part {
                        inline_data: None,
                        text: Some(interpretation_instruction(context)),
                    },
                ],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".into(),
                response_schema: event_schema(),
            },
        };

        let response = self
            .http
            .post(INTERPRET_URL)
            .header("x-goog-api-key", key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(eyre!("interpretation request failed with {status}: {body}"));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|err| eyre!("unexpected interpretation response shape: {err}"))?;
        let json_text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .and_then(|p| p.text)
            .ok_or_else(|| eyre!("interpretation response carried no text part"))?;

        let candidates: Vec<CandidateEvent> = serde_json::from_str(&json_text)
            .map_err(|err| eyre!("model output did not match the event schema: {err}"))?;

        log::info!("interpretation returned {} candidate(s)", candidates.len());
        Ok(Interpretation::Recognized(candidates_into_events(
            candidates, context,
        )))
    }

    /// Requests one 16:9 JPEG banner for the month. Decorative, so every
    /// failure is logged and swallowed.
    pub async fn generate_banner(
        &self,
        context: NaiveDate,
        recent_titles: &[String],
    ) -> Option<String> {
        let Some(key) = self.api_key.as_deref() else {
            log::info!("banner skipped: no API key configured");
            return None;
        };

        let request = PredictRequest {
            instances: vec![PredictInstance {
                prompt: banner_prompt(context, recent_titles),
            }],
            parameters: PredictParameters {
                sample_count: 1,
                aspect_ratio: "16:9".into(),
                output_mime_type: "image/jpeg".into(),
            },
        };

        let result: Result<String> = async {
            let response = self
                .http
                .post(BANNER_URL)
                .header("x-goog-api-key", key)
                .json(&request)
                .send()
                .await?;
            let status = response.status();
            let body = response.text().await?;
            if !status.is_success() {
                return Err(eyre!("banner request failed with {status}: {body}"));
            }
            let parsed: PredictResponse = serde_json::from_str(&body)
                .map_err(|err| eyre!("unexpected banner response shape: {err}"))?;
            let bytes = parsed
                .predictions
                .into_iter()
                .next()
                .map(|p| p.bytes_base64_encoded)
                .ok_or_else(|| eyre!("banner response carried no image"))?;
            Ok(format!("data:image/jpeg;base64,{bytes}"))
        }
        .await;

        match result {
            Ok(uri) => Some(uri),
            Err(err) => {
                log::warn!("banner generation failed: {err:#}");
                None
            }
        }
    }
}

/// Raw event as emitted by the model, before it is anchored to a date.
#[derive(Debug, Deserialize)]
pub struct CandidateEvent {
    pub title: String,
    pub day: u32,
    #[serde(default)]
    pub category: Option<String>,
}

/// Anchors candidates to the context month. A `day` outside the month's
/// actual length is dropped with a warning rather than clamped; the rest of
/// the batch survives.
pub fn candidates_into_events(
    candidates: Vec<CandidateEvent>,
    context: NaiveDate,
) -> Vec<CalendarEvent> {
    let year = context.year();
    let month = context.month();
    let last_day = days_in_month(year, month);

    candidates
        .into_iter()
        .filter_map(|c| {
            if c.day == 0 || c.day > last_day {
                log::warn!(
                    "dropping candidate \"{}\": day {} not in {} {}",
                    c.title,
                    c.day,
                    month_name(month),
                    year
                );
                return None;
            }
            let date = NaiveDate::from_ymd_opt(year, month, c.day)?;
            let category = EventCategory::from_name(c.category.as_deref().unwrap_or(""));
            Some(CalendarEvent::new(c.title, date, category))
        })
        .collect()
}

fn interpretation_instruction(context: NaiveDate) -> String {
    format!(
        "Extract calendar events from this handwritten note. \
         The context month is {} {}. \
         If a specific day number is written (e.g. \"Lunch on the 12th\"), assume it falls in the context month. \
         If only a day name is given (e.g. \"Meeting on Friday\"), use the next occurrence of that day within the context month. \
         Return a JSON array of events.",
        month_name(context.month()),
        context.year()
    )
}

fn banner_prompt(context: NaiveDate, recent_titles: &[String]) -> String {
    let month = month_name(context.month());
    let accents = if recent_titles.is_empty() {
        "Focus on seasonal elements appropriate for this month.".to_string()
    } else {
        format!(
            "Incorporate subtle visual elements related to: {}.",
            recent_titles.join(", ")
        )
    };
    format!(
        "A panoramic, artistic painting header image representing the month of {month}. \
         The style should be a mix of watercolor and digital art, soft, inviting, and highly detailed. \
         {accents} \
         High quality, wide aspect ratio, suitable for a calendar banner."
    )
}

fn event_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "title": { "type": "STRING" },
                "day": { "type": "INTEGER", "description": "The day of the month (1-31)" },
                "category": { "type": "STRING", "enum": ["work", "personal", "other"] }
            },
            "required": ["title", "day", "category"]
        }
    })
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    #[serde(rename = "inlineData", skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Serialize)]
struct InlineData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
    #[serde(rename = "responseSchema")]
    response_schema: serde_json::Value,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
}

#[derive(Deserialize)]
struct ResponseCandidate {
    content: ResponseContent,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Serialize)]
struct PredictRequest {
    instances: Vec<PredictInstance>,
    parameters: PredictParameters,
}

#[derive(Serialize)]
struct PredictInstance {
    prompt: String,
}

#[derive(Serialize)]
struct PredictParameters {
    #[serde(rename = "sampleCount")]
    sample_count: u32,
    #[serde(rename = "aspectRatio")]
    aspect_ratio: String,
    #[serde(rename = "outputMimeType")]
    output_mime_type: String,
}

#[derive(Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Deserialize)]
struct Prediction {
    #[serde(rename = "bytesBase64Encoded")]
    bytes_base64_encoded: String,
}
