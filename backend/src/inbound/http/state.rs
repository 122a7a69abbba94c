//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O. The bundle is
//! built once at process start and injected, replacing any ambient global
//! store handle or signing secret.

use std::sync::Arc;

use crate::domain::TokenService;
use crate::domain::ports::{BlogRepository, UserRepository};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// User collection access.
    pub users: Arc<dyn UserRepository>,
    /// Blog collection access.
    pub blogs: Arc<dyn BlogRepository>,
    /// Bearer token issuance and verification.
    pub tokens: TokenService,
}

impl HttpState {
    /// Construct state from its collaborators.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use backend::domain::TokenService;
    /// use backend::inbound::http::state::HttpState;
    /// use backend::outbound::persistence::InMemoryStore;
    ///
    /// let store = Arc::new(InMemoryStore::default());
    /// let state = HttpState::new(
    ///     store.clone(),
    ///     store,
    ///     TokenService::new(b"sekrit"),
    /// );
    /// let _tokens = state.tokens.clone();
    /// ```
    pub fn new(
        users: Arc<dyn UserRepository>,
        blogs: Arc<dyn BlogRepository>,
        tokens: TokenService,
    ) -> Self {
        Self {
            users,
            blogs,
            tokens,
        }
    }
}
