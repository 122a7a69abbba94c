//! Authentication extractors and credential checks for HTTP handlers.
//!
//! The pipeline has two composable stages, realized as typed extractors
//! instead of ambient request mutation:
//!
//! 1. [`BearerToken`] pulls a candidate token off the `Authorization` header
//!    on any route and never rejects a request.
//! 2. [`AuthenticatedUser`] (protected routes only) verifies the candidate
//!    token and loads the matching user, rejecting everything else with one
//!    generic `401` so callers cannot tell which check failed.

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, web};
use futures_util::future::{LocalBoxFuture, Ready, ready};

use crate::domain::{Error, LoginCredentials, User};
use crate::inbound::http::state::HttpState;

/// Scheme prefix expected on the `Authorization` header.
const BEARER_PREFIX: &str = "Bearer ";

/// One message for every authentication failure: missing token, malformed
/// token, bad signature, and token for a user that no longer exists.
pub const UNAUTHENTICATED_MESSAGE: &str = "token missing or invalid";

fn unauthenticated() -> Error {
    Error::unauthorized(UNAUTHENTICATED_MESSAGE)
}

fn candidate_token(req: &HttpRequest) -> Option<String> {
    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())?;
    authorization
        .strip_prefix(BEARER_PREFIX)
        .map(str::to_owned)
}

/// Candidate bearer token extracted from the `Authorization` header.
///
/// Always succeeds: a missing header, a non-string value, or a scheme other
/// than `Bearer` all yield `None` and the request proceeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerToken(Option<String>);

impl BearerToken {
    /// The raw token, if one was presented.
    pub fn token(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// Consume the extractor, yielding the raw token.
    pub fn into_inner(self) -> Option<String> {
        self.0
    }
}

impl FromRequest for BearerToken {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(Self(candidate_token(req))))
    }
}

/// The user resolved from a valid bearer token.
///
/// Extraction fails with a single generic `401` unless the request carries a
/// token that verifies against the signing secret and maps to a stored user.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(User);

impl AuthenticatedUser {
    /// Borrow the resolved user.
    pub fn user(&self) -> &User {
        &self.0
    }

    /// Consume the extractor, yielding the resolved user.
    pub fn into_inner(self) -> User {
        self.0
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        let token = candidate_token(req);

        Box::pin(async move {
            let state =
                state.ok_or_else(|| Error::internal("http state is not configured"))?;
            let token = token.ok_or_else(unauthenticated)?;
            let user_id = state
                .tokens
                .verify(&token)
                .map_err(|_| unauthenticated())?;
            let user = state
                .users
                .find_by_id(&user_id)
                .await
                .map_err(|error| Error::internal(error.to_string()))?
                .ok_or_else(unauthenticated)?;
            Ok(Self(user))
        })
    }
}

/// Check login credentials against the stored password hash.
///
/// A missing user and a wrong password produce the same rejection so login
/// responses do not reveal which usernames exist.
pub async fn authenticate(state: &HttpState, credentials: &LoginCredentials) -> Result<User, Error> {
    let user = state
        .users
        .find_by_username(credentials.username())
        .await
        .map_err(|error| Error::internal(error.to_string()))?;

    match user {
        Some(user) if user.password_hash().verify(credentials.password()) => Ok(user),
        _ => Err(Error::unauthorized("invalid username or password")),
    }
}
