//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `DatabaseService` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use vocab_core::domain::{Account, AccountCredentials, Deck, NewWord, Word};
use vocab_core::ports::{DatabaseService, PortError, PortResult};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `DatabaseService` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

/// Maps a driver error to a port error, folding unique violations into `Conflict`.
fn store_err(e: sqlx::Error) -> PortError {
    if let sqlx::Error::Database(ref db_err) = e {
        if db_err.is_unique_violation() {
            return PortError::Conflict(db_err.to_string());
        }
    }
    PortError::Unexpected(e.to_string())
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct AccountRecord {
    id: Uuid,
    email: String,
    created_at: DateTime<Utc>,
}
impl AccountRecord {
    fn to_domain(self) -> Account {
        Account {
            id: self.id,
            email: self.email,
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct CredentialsRecord {
    id: Uuid,
    email: String,
    password: String,
}
impl CredentialsRecord {
    fn to_domain(self) -> AccountCredentials {
        AccountCredentials {
            id: self.id,
            email: self.email,
            password_hash: self.password,
        }
    }
}

#[derive(FromRow)]
struct DeckRecord {
    id: Uuid,
    account_id: Uuid,
    title: String,
}
impl DeckRecord {
    fn to_domain(self) -> Deck {
        Deck {
            id: self.id,
            account_id: self.account_id,
            title: self.title,
        }
    }
}

#[derive(FromRow)]
struct WordRecord {
    id: Uuid,
    flashcards_id: Uuid,
    en: String,
    ja: String,
    progress: Option<bool>,
}
impl WordRecord {
    fn to_domain(self) -> Word {
        Word {
            id: self.id,
            flashcards_id: self.flashcards_id,
            en: self.en,
            ja: self.ja,
            progress: self.progress,
        }
    }
}

//=========================================================================================
// `DatabaseService` Trait Implementation
//=========================================================================================

#[async_trait]
impl DatabaseService for DbAdapter {
    async fn create_account(&self, email: &str, password_hash: &str) -> PortResult<Account> {
        let record = sqlx::query_as::<_, AccountRecord>(
            "INSERT INTO accounts (email, password) VALUES ($1, $2) RETURNING id, email, created_at",
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(record.to_domain())
    }

    async fn get_account_by_email(&self, email: &str) -> PortResult<AccountCredentials> {
        let record = sqlx::query_as::<_, CredentialsRecord>(
            "SELECT id, email, password FROM accounts WHERE email = $1",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => PortError::NotFound(format!("Account {} not found", email)),
            _ => PortError::Unexpected(e.to_string()),
        })?;

        Ok(record.to_domain())
    }

    async fn update_account(
        &self,
        account_id: Uuid,
        email: &str,
        password_hash: Option<&str>,
    ) -> PortResult<()> {
        // The password column is only touched when a new hash was supplied.
        match password_hash {
            Some(hash) => {
                sqlx::query("UPDATE accounts SET email = $1, password = $2 WHERE id = $3")
                    .bind(email)
                    .bind(hash)
                    .bind(account_id)
                    .execute(&self.pool)
                    .await
                    .map_err(store_err)?;
            }
            None => {
                sqlx::query("UPDATE accounts SET email = $1 WHERE id = $2")
                    .bind(email)
                    .bind(account_id)
                    .execute(&self.pool)
                    .await
                    .map_err(store_err)?;
            }
        }
        Ok(())
    }

    async fn delete_account(&self, account_id: Uuid) -> PortResult<()> {
        // Decks and words go with the account via ON DELETE CASCADE.
        sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(account_id)
            .execute(&self.pool)
            .await
            .map_err(store_err)?;
        Ok(())
    }

    async fn list_decks(&self, account_id: Uuid) -> PortResult<Vec<Deck>> {
        let records = sqlx::query_as::<_, DeckRecord>(
            "SELECT id, account_id, title FROM flashcards WHERE account_id = $1",
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn get_deck(&self, account_id: Uuid, deck_id: Uuid) -> PortResult<(Vec<Deck>, Vec<Word>)> {
        let decks = sqlx::query_as::<_, DeckRecord>(
            "SELECT id, account_id, title FROM flashcards WHERE account_id = $1 AND id = $2",
        )
        .bind(account_id)
        .bind(deck_id)
        .fetch_all(&self.pool)
        .await
        .map_err(store_err)?;

        // A deck that is missing or foreign yields an empty result set, not an
        // error, and its words are never exposed.
        if decks.is_empty() {
            return Ok((Vec::new(), Vec::new()));
        }

        let words = sqlx::query_as::<_, WordRecord>(
            "SELECT id, flashcards_id, en, ja, progress FROM words WHERE flashcards_id = $1",
        )
        .bind(deck_id)
        .fetch_all(&self.pool)
        .await
        .map_err(store_err)?;

        Ok((
            decks.into_iter().map(|r| r.to_domain()).collect(),
            words.into_iter().map(|r| r.to_domain()).collect(),
        ))
    }

    async fn create_deck(&self, account_id: Uuid, title: &str) -> PortResult<Deck> {
        let record = sqlx::query_as::<_, DeckRecord>(
            "INSERT INTO flashcards (account_id, title) VALUES ($1, $2) RETURNING id, account_id, title",
        )
        .bind(account_id)
        .bind(title)
        .fetch_one(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(record.to_domain())
    }

    async fn add_words(&self, account_id: Uuid, deck_id: Uuid, words: &[NewWord]) -> PortResult<()> {
        let mut tx = self.pool.begin().await.map_err(store_err)?;

        // Words may only land in a deck the caller owns.
        let owned = sqlx::query("SELECT id FROM flashcards WHERE id = $1 AND account_id = $2")
            .bind(deck_id)
            .bind(account_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(store_err)?;

        if owned.is_none() {
            return Err(PortError::NotFound(format!("Deck {} not found", deck_id)));
        }

        for w in words {
            sqlx::query("INSERT INTO words (flashcards_id, en, ja) VALUES ($1, $2, $3)")
                .bind(deck_id)
                .bind(&w.en)
                .bind(&w.ja)
                .execute(&mut *tx)
                .await
                .map_err(store_err)?;
        }

        tx.commit().await.map_err(store_err)?;
        Ok(())
    }

    async fn replace_deck(
        &self,
        account_id: Uuid,
        deck_id: Uuid,
        title: &str,
        words: &[NewWord],
    ) -> PortResult<()> {
        // One transaction: retitle, clear, refill. An early return rolls the
        // whole thing back when the connection is released.
        let mut tx = self.pool.begin().await.map_err(store_err)?;

        let updated = sqlx::query(
            "UPDATE flashcards SET title = $1 WHERE id = $2 AND account_id = $3",
        )
        .bind(title)
        .bind(deck_id)
        .bind(account_id)
        .execute(&mut *tx)
        .await
        .map_err(store_err)?;

        if updated.rows_affected() == 0 {
            // Missing and foreign decks are indistinguishable here.
            return Err(PortError::NotFound(format!("Deck {} not found", deck_id)));
        }

        sqlx::query("DELETE FROM words WHERE flashcards_id = $1")
            .bind(deck_id)
            .execute(&mut *tx)
            .await
            .map_err(store_err)?;

        for w in words {
            sqlx::query("INSERT INTO words (flashcards_id, en, ja) VALUES ($1, $2, $3)")
                .bind(deck_id)
                .bind(&w.en)
                .bind(&w.ja)
                .execute(&mut *tx)
                .await
                .map_err(store_err)?;
        }

        tx.commit().await.map_err(store_err)?;
        Ok(())
    }

    async fn record_results(
        &self,
        account_id: Uuid,
        again_ids: &[Uuid],
        ok_ids: &[Uuid],
    ) -> PortResult<()> {
        let mut tx = self.pool.begin().await.map_err(store_err)?;

        // Each update is scoped to the caller's decks; unknown or foreign ids
        // affect zero rows, which keeps the batch idempotent and harmless.
        for (ids, outcome) in [(again_ids, false), (ok_ids, true)] {
            for id in ids {
                sqlx::query(
                    "UPDATE words SET progress = $1 WHERE id = $2 \
                     AND flashcards_id IN (SELECT id FROM flashcards WHERE account_id = $3)",
                )
                .bind(outcome)
                .bind(id)
                .bind(account_id)
                .execute(&mut *tx)
                .await
                .map_err(store_err)?;
            }
        }

        tx.commit().await.map_err(store_err)?;
        Ok(())
    }
}
