//! services/api/src/adapters/translate.rs
//!
//! This module contains the adapter for the third-party machine-translation
//! API. It implements the `TranslationService` port from the `core` crate.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use vocab_core::domain::Translation;
use vocab_core::ports::{PortError, PortResult, TranslationService};

//=========================================================================================
// Wire Types
//=========================================================================================

#[derive(Serialize)]
struct TranslateRequest<'a> {
    text: Vec<&'a str>,
    source_lang: &'a str,
    target_lang: &'a str,
}

#[derive(Deserialize)]
struct TranslateResponse {
    translations: Vec<TranslatedText>,
}

#[derive(Deserialize)]
struct TranslatedText {
    text: String,
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the `TranslationService` port against a
/// DeepL-style translation endpoint, keyed by an API credential.
#[derive(Clone)]
pub struct TranslateApiAdapter {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl TranslateApiAdapter {
    /// Creates a new `TranslateApiAdapter`.
    pub fn new(client: reqwest::Client, api_url: String, api_key: String) -> Self {
        Self {
            client,
            api_url,
            api_key,
        }
    }
}

//=========================================================================================
// `TranslationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl TranslationService for TranslateApiAdapter {
    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> PortResult<Translation> {
        let request = TranslateRequest {
            text: vec![text],
            source_lang,
            target_lang,
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("DeepL-Auth-Key {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PortError::Unexpected(format!(
                "Translation provider returned status {}",
                response.status()
            )));
        }

        let body: TranslateResponse = response
            .json()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let translated = body
            .translations
            .into_iter()
            .next()
            .ok_or_else(|| PortError::Unexpected("Empty translation response".to_string()))?;

        Ok(Translation {
            text: translated.text,
        })
    }
}
