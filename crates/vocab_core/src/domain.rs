//! crates/vocab_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// An account's public fields - never carries the password hash.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

// Only used internally for login - contains sensitive data
#[derive(Debug, Clone)]
pub struct AccountCredentials {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
}

/// A named flashcard deck owned by exactly one account.
#[derive(Debug, Clone)]
pub struct Deck {
    pub id: Uuid,
    pub account_id: Uuid,
    pub title: String,
}

/// A single front/back word pair inside a deck.
///
/// `progress` is the recall outcome of the most recent review;
/// `None` means the word has never been reviewed.
#[derive(Debug, Clone)]
pub struct Word {
    pub id: Uuid,
    pub flashcards_id: Uuid,
    pub en: String,
    pub ja: String,
    pub progress: Option<bool>,
}

/// A word pair as authored by the client, before it has an id.
#[derive(Debug, Clone)]
pub struct NewWord {
    pub en: String,
    pub ja: String,
}

/// One line of a fetched video caption track.
#[derive(Debug, Clone)]
pub struct CaptionLine {
    pub text: String,
    pub duration: f64,
    pub offset: f64,
}

/// The result of a machine-translation lookup.
#[derive(Debug, Clone)]
pub struct Translation {
    pub text: String,
}
