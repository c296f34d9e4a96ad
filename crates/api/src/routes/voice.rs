//! Voice input routes: recognition and intent parsing.

use axum::{
    Router,
    extract::{DefaultBodyLimit, Multipart, Query, State, multipart::MultipartRejection},
    routing::{get, post},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    response::ApiResponse,
};
use tripwise_core::voice::{
    DEFAULT_LANGUAGE, ExpenseIntent, RecognizerStatus, TravelIntent, parse_expense_intent,
    parse_travel_intent,
};
use tripwise_shared::AppError;

/// Largest accepted audio upload: the longest clip one dictation session
/// carries, plus room for container headers and multipart framing.
pub const MAX_AUDIO_BYTES: usize = 2 * 1024 * 1024;

/// Creates the voice routes. They do not require authentication.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/voice/recognize", post(recognize_travel))
        .route("/voice/recognize-expense", post(recognize_expense))
        .route("/voice/parse-intent", post(parse_intent))
        .route("/voice/parse-expense", post(parse_expense))
        .route("/voice/status", get(status))
        .layer(DefaultBodyLimit::max(MAX_AUDIO_BYTES))
}

/// Query parameters for recognition.
#[derive(Debug, Deserialize)]
pub struct RecognizeQuery {
    /// Recognition language, `zh_cn` when omitted.
    pub language: Option<String>,
}

/// Query parameters for text-only intent parsing.
#[derive(Debug, Deserialize)]
pub struct TextQuery {
    /// Text to parse.
    pub text: String,
}

/// Recognized text and the intent extracted from it.
#[derive(Debug, Serialize)]
pub struct Recognition<I> {
    /// Transcript.
    pub text: String,
    /// Extracted intent; `null` when nothing was recognized.
    pub intent: Option<I>,
}

fn is_audio_content_type(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| ct.starts_with("audio") || ct == "application/octet-stream")
}

/// Pulls the `audio` field out of the upload.
async fn read_audio(multipart: Result<Multipart, MultipartRejection>) -> ApiResult<Vec<u8>> {
    let bad_upload = |message: String| ApiError(AppError::Validation(message));
    let mut multipart = multipart.map_err(|rejection| bad_upload(rejection.body_text()))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_upload(e.body_text()))?
    {
        if field.name() != Some("audio") {
            continue;
        }
        if !is_audio_content_type(field.content_type()) {
            return Err(bad_upload(
                "Please upload an audio file (audio/* or application/octet-stream)".into(),
            ));
        }
        let file_name = field.file_name().map(ToString::to_string);
        let bytes = field.bytes().await.map_err(|e| bad_upload(e.body_text()))?;
        if bytes.is_empty() {
            return Err(bad_upload("Audio file is empty".into()));
        }
        info!(file_name = ?file_name, size = bytes.len(), "Received audio upload");
        return Ok(bytes.to_vec());
    }

    Err(bad_upload("Missing multipart field `audio`".into()))
}

/// Runs recognition, mapping an empty transcript to `None`.
async fn transcribe(
    state: &AppState,
    query: RecognizeQuery,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Option<String>> {
    let audio = read_audio(multipart).await?;
    let language = query
        .language
        .filter(|l| !l.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());

    let text = state
        .speech
        .recognize(&audio, &language)
        .await
        .inspect_err(|e| warn!(error = %e, "Speech recognition failed"))?;

    let text = text.trim().to_string();
    info!(chars = text.chars().count(), "Speech recognized");
    Ok(Some(text).filter(|t| !t.is_empty()))
}

fn recognition<I>(text: Option<String>, parse: impl FnOnce(&str) -> I) -> ApiResponse<Recognition<I>>
where
    I: Serialize,
{
    match text {
        Some(text) => ApiResponse::new(
            "Recognition successful",
            Recognition {
                intent: Some(parse(&text)),
                text,
            },
        ),
        None => ApiResponse::new(
            "No speech content recognized",
            Recognition {
                text: String::new(),
                intent: None,
            },
        ),
    }
}

/// POST /api/voice/recognize - Transcribe and extract a travel intent.
async fn recognize_travel(
    State(state): State<AppState>,
    Query(query): Query<RecognizeQuery>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<ApiResponse<Recognition<TravelIntent>>> {
    let text = transcribe(&state, query, multipart).await?;
    Ok(recognition(text, parse_travel_intent))
}

/// POST /api/voice/recognize-expense - Transcribe and extract an expense.
async fn recognize_expense(
    State(state): State<AppState>,
    Query(query): Query<RecognizeQuery>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<ApiResponse<Recognition<ExpenseIntent>>> {
    let text = transcribe(&state, query, multipart).await?;
    Ok(recognition(text, |t| parse_expense_intent(t, Utc::now())))
}

/// POST /api/voice/parse-intent?text=
async fn parse_intent(Query(query): Query<TextQuery>) -> ApiResponse<TravelIntent> {
    ApiResponse::new("Parsed", parse_travel_intent(&query.text))
}

/// POST /api/voice/parse-expense?text=
async fn parse_expense(Query(query): Query<TextQuery>) -> ApiResponse<ExpenseIntent> {
    ApiResponse::new("Parsed", parse_expense_intent(&query.text, Utc::now()))
}

/// GET /api/voice/status
async fn status(State(state): State<AppState>) -> ApiResponse<RecognizerStatus> {
    ApiResponse::ok(state.speech.status())
}
