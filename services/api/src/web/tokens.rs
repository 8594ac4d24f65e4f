//! services/api/src/web/tokens.rs
//!
//! Issues and verifies the signed, time-limited session tokens that bind a
//! bearer token to an account identity. Tokens are stateless: there is no
//! revocation list, so a token stays valid until its expiry.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How long an issued token stays valid.
const TOKEN_TTL_HOURS: i64 = 1;

/// The claims embedded in every session token: the account id, the email it
/// was issued for, and the expiry timestamp.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub exp: i64,
}

/// Why a token was rejected. `Missing` is handled at the extraction site;
/// the verifier only distinguishes expired from everything else.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token expired")]
    Expired,
    #[error("Invalid token")]
    Invalid,
}

/// Signs and verifies session tokens with a shared HS256 secret.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::default();
        // No leeway: past expiry means invalid, immediately.
        validation.leeway = 0;
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Produces a signed token for the given identity, expiring in one hour.
    pub fn issue(&self, account_id: Uuid, email: &str) -> Result<String, TokenError> {
        let claims = Claims {
            sub: account_id,
            email: email.to_string(),
            exp: (Utc::now() + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding_key).map_err(|_| TokenError::Invalid)
    }

    /// Checks signature and expiry and returns the embedded identity.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("test-secret")
    }

    #[test]
    fn issued_token_verifies_to_the_same_identity() {
        let tokens = service();
        let id = Uuid::new_v4();
        let token = tokens.issue(id, "a@x.com").unwrap();

        let claims = tokens.verify(&token).unwrap();
        assert_eq!(claims.sub, id);
        assert_eq!(claims.email, "a@x.com");
    }

    #[test]
    fn token_from_another_secret_is_rejected() {
        let token = TokenService::new("other-secret")
            .issue(Uuid::new_v4(), "a@x.com")
            .unwrap();

        assert_eq!(service().verify(&token), Err(TokenError::Invalid));
    }

    #[test]
    fn expired_token_is_rejected() {
        let tokens = service();
        let claims = Claims {
            sub: Uuid::new_v4(),
            email: "a@x.com".to_string(),
            exp: (Utc::now() - Duration::hours(2)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert_eq!(tokens.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert_eq!(service().verify("not-a-token"), Err(TokenError::Invalid));
    }

    #[test]
    fn tokens_for_different_accounts_do_not_collide() {
        let tokens = service();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let token_a = tokens.issue(a, "a@x.com").unwrap();

        let claims = tokens.verify(&token_a).unwrap();
        assert_eq!(claims.sub, a);
        assert_ne!(claims.sub, b);
    }
}
