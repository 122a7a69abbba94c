//! Stateless bearer tokens binding a user identity.
//!
//! Tokens are HS256-signed JWTs carrying the username and user id. They are
//! never persisted and carry no expiry: verification is purely cryptographic,
//! so any correctly signed token remains valid until the secret changes.

use std::collections::HashSet;
use std::fmt;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::user::{User, UserId};

/// Claims embedded in every issued token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    username: String,
    id: String,
}

/// Returned when a presented token is unusable for any reason.
///
/// Malformed input, a bad signature, a mismatched secret, and undecodable
/// claims all collapse into this one value so callers cannot distinguish the
/// cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidToken;

impl fmt::Display for InvalidToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "token missing or invalid")
    }
}

impl std::error::Error for InvalidToken {}

/// Error raised when signing fails; treated as fatal by callers.
#[derive(Debug, thiserror::Error)]
#[error("token signing failed: {message}")]
pub struct TokenSigningError {
    message: String,
}

/// Issues and verifies bearer tokens with a process-lifetime signing secret.
///
/// Constructed once at startup and injected into the HTTP state; cloning is
/// cheap and shares no mutable state.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenService {
    /// Build a service around the given signing secret.
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Tokens are time-unbounded: no expiry claim is issued or required.
        validation.validate_exp = false;
        validation.required_spec_claims = HashSet::new();

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Sign a token binding the given user's identity.
    pub fn issue(&self, user: &User) -> Result<String, TokenSigningError> {
        let claims = Claims {
            username: user.username().to_string(),
            id: user.id().to_string(),
        };
        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding).map_err(|error| {
            TokenSigningError {
                message: error.to_string(),
            }
        })
    }

    /// Check the signature and decode the bound user id.
    pub fn verify(&self, token: &str) -> Result<UserId, InvalidToken> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|_| InvalidToken)?;
        UserId::new(&data.claims.id).map_err(|_| InvalidToken)
    }
}
