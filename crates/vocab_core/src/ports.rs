//! crates/vocab_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases or APIs.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Account, AccountCredentials, CaptionLine, Deck, NewWord, Translation, Word};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Already exists: {0}")]
    Conflict(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("Unauthorized")]
    Unauthorized,
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait DatabaseService: Send + Sync {
    // --- Accounts ---

    /// Persists a new account. The password must already be hashed.
    /// Fails with `PortError::Conflict` when the email is taken.
    async fn create_account(&self, email: &str, password_hash: &str) -> PortResult<Account>;

    /// Looks an account up by email for credential verification.
    /// Fails with `PortError::NotFound` for unknown emails; the caller is
    /// responsible for collapsing that into a uniform invalid-credentials error.
    async fn get_account_by_email(&self, email: &str) -> PortResult<AccountCredentials>;

    /// Replaces the account's email, and its password hash when one is supplied.
    async fn update_account(
        &self,
        account_id: Uuid,
        email: &str,
        password_hash: Option<&str>,
    ) -> PortResult<()>;

    /// Deletes the account. Decks and words owned by it are deleted with it.
    async fn delete_account(&self, account_id: Uuid) -> PortResult<()>;

    // --- Decks ---

    /// All decks owned by the account, in stable storage order.
    async fn list_decks(&self, account_id: Uuid) -> PortResult<Vec<Deck>>;

    /// A deck and its words, scoped to the owning account.
    ///
    /// Returns empty vectors (not an error) when the deck does not exist or
    /// belongs to someone else, so cross-tenant probes learn nothing.
    async fn get_deck(&self, account_id: Uuid, deck_id: Uuid) -> PortResult<(Vec<Deck>, Vec<Word>)>;

    async fn create_deck(&self, account_id: Uuid, title: &str) -> PortResult<Deck>;

    /// Bulk-inserts words into a deck, atomically as a set.
    ///
    /// Fails with `PortError::NotFound` when the deck is missing or owned by
    /// another account, so words can never land in someone else's deck.
    async fn add_words(&self, account_id: Uuid, deck_id: Uuid, words: &[NewWord]) -> PortResult<()>;

    /// Atomically retitles a deck and replaces its entire word list.
    ///
    /// Runs in one transaction: title update scoped to the owning account,
    /// delete of all existing words, insert of the new list. Fails with
    /// `PortError::NotFound` (and rolls back) when the deck is missing or
    /// owned by another account. An empty `words` slice is a valid full clear.
    async fn replace_deck(
        &self,
        account_id: Uuid,
        deck_id: Uuid,
        title: &str,
        words: &[NewWord],
    ) -> PortResult<()>;

    // --- Review progress ---

    /// Records a batch of review outcomes in one transaction: progress is set
    /// to `false` for every id in `again_ids` and `true` for every id in
    /// `ok_ids`. Updates are scoped to words in decks owned by the account;
    /// unknown or foreign ids affect zero rows and are not an error. The
    /// operation is idempotent.
    async fn record_results(
        &self,
        account_id: Uuid,
        again_ids: &[Uuid],
        ok_ids: &[Uuid],
    ) -> PortResult<()>;
}

#[async_trait]
pub trait TranscriptService: Send + Sync {
    /// Fetches the caption track for a video and returns its decoded lines.
    async fn fetch_transcript(&self, video_id: &str) -> PortResult<Vec<CaptionLine>>;
}

#[async_trait]
pub trait TranslationService: Send + Sync {
    /// Translates `text` between the given language codes.
    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> PortResult<Translation>;
}
