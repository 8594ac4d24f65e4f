//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use crate::web::tokens::TokenService;
use std::sync::Arc;
use vocab_core::ports::{DatabaseService, TranscriptService, TranslationService};

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn DatabaseService>,
    pub tokens: TokenService,
    pub config: Arc<Config>,
    pub transcripts: Arc<dyn TranscriptService>,
    pub translator: Arc<dyn TranslationService>,
}
