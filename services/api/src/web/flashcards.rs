//! services/api/src/web/flashcards.rs
//!
//! Flashcard deck endpoints: listing, reading, creating, word upload, the
//! atomic deck update, and review-result recording. Every operation is scoped
//! to the identity the auth gate resolved.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::error;
use utoipa::ToSchema;
use uuid::Uuid;
use vocab_core::domain::{Deck, NewWord, Word};
use vocab_core::ports::PortError;

use crate::web::middleware::AuthUser;
use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct GetDeckRequest {
    pub card_id: Uuid,
}

#[derive(Deserialize, ToSchema)]
pub struct WordPair {
    pub en: String,
    pub ja: String,
}

#[derive(Deserialize, ToSchema)]
pub struct AddWordsRequest {
    pub card_id: Option<Uuid>,
    #[serde(rename = "wordsList", default)]
    pub words_list: Vec<WordPair>,
}

#[derive(Deserialize, ToSchema)]
pub struct CreateDeckRequest {
    #[serde(default)]
    pub title: String,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateDeckRequest {
    #[serde(default)]
    pub title: String,
    pub card_id: Option<Uuid>,
    /// Omitting the list and sending an empty one are the same full clear.
    #[serde(rename = "wordsList", default)]
    pub words_list: Vec<WordPair>,
}

#[derive(Deserialize, ToSchema)]
pub struct WordRef {
    pub id: Uuid,
}

#[derive(Deserialize, ToSchema)]
pub struct RecordResultsRequest {
    #[serde(default)]
    pub again: Vec<WordRef>,
    #[serde(default)]
    pub ok: Vec<WordRef>,
}

#[derive(Serialize, ToSchema)]
pub struct DeckResponse {
    pub id: Uuid,
    pub account_id: Uuid,
    pub title: String,
}

impl From<Deck> for DeckResponse {
    fn from(deck: Deck) -> Self {
        Self {
            id: deck.id,
            account_id: deck.account_id,
            title: deck.title,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct WordResponse {
    pub id: Uuid,
    pub flashcards_id: Uuid,
    pub en: String,
    pub ja: String,
    pub progress: Option<bool>,
}

impl From<Word> for WordResponse {
    fn from(word: Word) -> Self {
        Self {
            id: word.id,
            flashcards_id: word.flashcards_id,
            en: word.en,
            ja: word.ja,
            progress: word.progress,
        }
    }
}

type HandlerError = (StatusCode, Json<Value>);

fn internal_error() -> HandlerError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Internal server error." })),
    )
}

fn bad_request(message: &str) -> HandlerError {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
}

fn to_new_words(pairs: Vec<WordPair>) -> Vec<NewWord> {
    pairs
        .into_iter()
        .map(|w| NewWord { en: w.en, ja: w.ja })
        .collect()
}

//=========================================================================================
// Handlers
//=========================================================================================

/// GET /flashcards - All decks owned by the caller.
#[utoipa::path(
    get,
    path = "/flashcards",
    responses(
        (status = 200, description = "Decks retrieved successfully"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_decks_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, HandlerError> {
    let decks = state.db.list_decks(user.id).await.map_err(|e| {
        error!("Failed to list decks: {:?}", e);
        internal_error()
    })?;

    let data: Vec<DeckResponse> = decks.into_iter().map(DeckResponse::from).collect();
    Ok((
        StatusCode::OK,
        Json(json!({ "message": "Flashcards retrieved successfully.", "data": data })),
    ))
}

/// POST /flashcards - One deck and its words.
///
/// A deck that does not exist or belongs to another account comes back as an
/// empty result set with status 200, revealing nothing.
#[utoipa::path(
    post,
    path = "/flashcards",
    request_body = GetDeckRequest,
    responses(
        (status = 200, description = "Deck retrieved successfully"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_deck_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<GetDeckRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let (decks, words) = state.db.get_deck(user.id, req.card_id).await.map_err(|e| {
        error!("Failed to get deck: {:?}", e);
        internal_error()
    })?;

    let card_info: Vec<DeckResponse> = decks.into_iter().map(DeckResponse::from).collect();
    let cards: Vec<WordResponse> = words.into_iter().map(WordResponse::from).collect();
    Ok((
        StatusCode::OK,
        Json(json!({
            "message": "Flashcard retrieved successfully.",
            "card_info": card_info,
            "cards": cards,
        })),
    ))
}

/// POST /flashcards/add - Append words to a deck.
#[utoipa::path(
    post,
    path = "/flashcards/add",
    request_body = AddWordsRequest,
    responses(
        (status = 201, description = "Words uploaded successfully"),
        (status = 400, description = "Missing card id or empty word list"),
        (status = 404, description = "Deck missing or owned by another account"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn add_words_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<AddWordsRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let deck_id = req.card_id.ok_or_else(|| bad_request("Card id is required."))?;
    if req.words_list.is_empty() {
        return Err(bad_request("A list of words is required."));
    }

    state
        .db
        .add_words(user.id, deck_id, &to_new_words(req.words_list))
        .await
        .map_err(|e| match e {
            PortError::NotFound(_) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Card not found." })),
            ),
            e => {
                error!("Failed to add words: {:?}", e);
                internal_error()
            }
        })?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Words uploaded successfully." })),
    ))
}

/// POST /flashcards/create - Create an empty deck.
#[utoipa::path(
    post,
    path = "/flashcards/create",
    request_body = CreateDeckRequest,
    responses(
        (status = 201, description = "Deck created successfully"),
        (status = 400, description = "Missing title"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_deck_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<CreateDeckRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    if req.title.is_empty() {
        return Err(bad_request("Card title is required."));
    }

    let deck = state.db.create_deck(user.id, &req.title).await.map_err(|e| {
        error!("Failed to create deck: {:?}", e);
        internal_error()
    })?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Card created successfully.",
            "data": DeckResponse::from(deck),
        })),
    ))
}

/// POST /flashcards/update - Atomically retitle a deck and replace its word list.
///
/// Runs as one transaction: either the new title and the full new word list
/// land together, or the deck is left exactly as it was.
#[utoipa::path(
    post,
    path = "/flashcards/update",
    request_body = UpdateDeckRequest,
    responses(
        (status = 201, description = "Deck updated successfully"),
        (status = 400, description = "Missing title or card id"),
        (status = 404, description = "Deck missing or owned by another account"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn update_deck_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<UpdateDeckRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let deck_id = match req.card_id {
        Some(id) if !req.title.is_empty() => id,
        _ => return Err(bad_request("Card title and id are required.")),
    };

    state
        .db
        .replace_deck(user.id, deck_id, &req.title, &to_new_words(req.words_list))
        .await
        .map_err(|e| match e {
            PortError::NotFound(_) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Card not found." })),
            ),
            e => {
                error!("Failed to update deck: {:?}", e);
                internal_error()
            }
        })?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Cards editted successfully." })),
    ))
}

/// POST /flashcards/result - Record a batch of review outcomes.
///
/// Applying the same batch twice leaves the same progress values, so clients
/// may retry freely.
#[utoipa::path(
    post,
    path = "/flashcards/result",
    request_body = RecordResultsRequest,
    responses(
        (status = 201, description = "Progress recorded successfully"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn record_results_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<RecordResultsRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let again_ids: Vec<Uuid> = req.again.iter().map(|w| w.id).collect();
    let ok_ids: Vec<Uuid> = req.ok.iter().map(|w| w.id).collect();

    state
        .db
        .record_results(user.id, &again_ids, &ok_ids)
        .await
        .map_err(|e| {
            error!("Failed to record results: {:?}", e);
            internal_error()
        })?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Cards changed successfully." })),
    ))
}
