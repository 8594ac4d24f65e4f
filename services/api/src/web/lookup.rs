//! services/api/src/web/lookup.rs
//!
//! Stateless pass-through endpoints: video caption retrieval and machine
//! translation. Authenticated, but no account state is read or written.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::error;
use utoipa::ToSchema;
use vocab_core::domain::CaptionLine;

use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct TranscriptRequest {
    #[serde(rename = "videoId", default)]
    pub video_id: String,
}

#[derive(Serialize, ToSchema)]
pub struct CaptionLineResponse {
    pub text: String,
    pub duration: f64,
    pub offset: f64,
}

impl From<CaptionLine> for CaptionLineResponse {
    fn from(line: CaptionLine) -> Self {
        Self {
            text: line.text,
            duration: line.duration,
            offset: line.offset,
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct TranslateRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub source_lang: String,
    #[serde(default)]
    pub target_lang: String,
}

type HandlerError = (StatusCode, Json<Value>);

fn internal_error() -> HandlerError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Internal server error." })),
    )
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /transcript - Fetch and decode a video's caption track.
#[utoipa::path(
    post,
    path = "/transcript",
    request_body = TranscriptRequest,
    responses(
        (status = 200, description = "Transcript fetched successfully"),
        (status = 400, description = "Missing video id"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn transcript_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TranscriptRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    if req.video_id.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Video id required." })),
        ));
    }

    let lines = state
        .transcripts
        .fetch_transcript(&req.video_id)
        .await
        .map_err(|e| {
            error!("Failed to fetch transcript: {:?}", e);
            internal_error()
        })?;

    let data: Vec<CaptionLineResponse> = lines.into_iter().map(CaptionLineResponse::from).collect();
    Ok((
        StatusCode::OK,
        Json(json!({ "message": "Fetch trascript successful.", "data": data })),
    ))
}

/// POST /translate - Proxy a machine-translation lookup.
#[utoipa::path(
    post,
    path = "/translate",
    request_body = TranslateRequest,
    responses(
        (status = 200, description = "Translation successful"),
        (status = 400, description = "Missing text or language codes"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn translate_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TranslateRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    if req.text.is_empty() || req.source_lang.is_empty() || req.target_lang.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Text and language codes are required." })),
        ));
    }

    let translation = state
        .translator
        .translate(&req.text, &req.source_lang, &req.target_lang)
        .await
        .map_err(|e| {
            error!("Failed to translate: {:?}", e);
            internal_error()
        })?;

    Ok((
        StatusCode::OK,
        Json(json!({ "message": "Translation successful.", "text": translation.text })),
    ))
}
