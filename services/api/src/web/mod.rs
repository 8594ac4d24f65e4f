pub mod accounts;
pub mod flashcards;
pub mod lookup;
pub mod middleware;
pub mod state;
pub mod tokens;

use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;

use crate::web::state::AppState;

pub use middleware::{require_auth, AuthUser};
pub use tokens::TokenService;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        accounts::session_handler,
        accounts::identity_handler,
        accounts::signup_handler,
        accounts::login_handler,
        accounts::update_handler,
        accounts::delete_handler,
        flashcards::list_decks_handler,
        flashcards::get_deck_handler,
        flashcards::add_words_handler,
        flashcards::create_deck_handler,
        flashcards::update_deck_handler,
        flashcards::record_results_handler,
        lookup::transcript_handler,
        lookup::translate_handler,
    ),
    components(
        schemas(
            accounts::SignupRequest,
            accounts::LoginRequest,
            accounts::UpdateAccountRequest,
            accounts::AccountResponse,
            accounts::SignupResponse,
            accounts::LoginResponse,
            flashcards::GetDeckRequest,
            flashcards::WordPair,
            flashcards::AddWordsRequest,
            flashcards::CreateDeckRequest,
            flashcards::UpdateDeckRequest,
            flashcards::WordRef,
            flashcards::RecordResultsRequest,
            flashcards::DeckResponse,
            flashcards::WordResponse,
            lookup::TranscriptRequest,
            lookup::CaptionLineResponse,
            lookup::TranslateRequest,
        )
    ),
    tags(
        (name = "Vocab API", description = "API endpoints for the vocabulary flashcards backend.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Router Construction
//=========================================================================================

/// Builds the application router. Shared by the server binary and the
/// integration tests, so both exercise the exact same middleware stack.
pub fn router(app_state: Arc<AppState>) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/accounts/signup", post(accounts::signup_handler))
        .route("/accounts/login", post(accounts::login_handler));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route("/accounts/session", get(accounts::session_handler))
        .route(
            "/accounts",
            get(accounts::identity_handler).delete(accounts::delete_handler),
        )
        .route("/accounts/update", post(accounts::update_handler))
        .route(
            "/flashcards",
            get(flashcards::list_decks_handler).post(flashcards::get_deck_handler),
        )
        .route("/flashcards/add", post(flashcards::add_words_handler))
        .route("/flashcards/create", post(flashcards::create_deck_handler))
        .route("/flashcards/update", post(flashcards::update_deck_handler))
        .route("/flashcards/result", post(flashcards::record_results_handler))
        .route("/transcript", post(lookup::transcript_handler))
        .route("/translate", post(lookup::translate_handler))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_auth,
        ));

    let cors = CorsLayer::new()
        .allow_origin(
            app_state
                .config
                .cors_origin
                .parse::<HeaderValue>()
                .unwrap_or_else(|_| HeaderValue::from_static("http://localhost:5173")),
        )
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024))
        .layer(cors)
        .with_state(app_state)
}
