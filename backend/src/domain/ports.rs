//! Domain ports defining the edges of the hexagon.
//!
//! Ports describe how the domain expects to interact with the document store
//! holding the two collections (users, blogs). Each trait exposes strongly
//! typed errors so adapters map their failures into predictable variants
//! instead of returning `anyhow::Result`.
//!
//! The store guarantees per-document atomicity only. Operations touching two
//! documents (blog delete plus owner update) issue two calls and accept the
//! documented window between them.

use async_trait::async_trait;
use thiserror::Error;

use super::blog::{Blog, BlogId};
use super::user::{User, UserId};

/// Persistence errors raised by [`UserRepository`] adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserPersistenceError {
    /// Repository connection could not be established.
    #[error("user repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("user repository query failed: {message}")]
    Query { message: String },
    /// Store-level uniqueness validation rejected the write.
    #[error("username `{username}` is already taken")]
    DuplicateUsername { username: String },
}

impl UserPersistenceError {
    /// Helper for connection oriented failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Helper for uniqueness violations.
    pub fn duplicate_username(username: impl Into<String>) -> Self {
        Self::DuplicateUsername {
            username: username.into(),
        }
    }
}

/// Persistence errors raised by [`BlogRepository`] adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlogPersistenceError {
    /// Repository connection could not be established.
    #[error("blog repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("blog repository query failed: {message}")]
    Query { message: String },
}

impl BlogPersistenceError {
    /// Helper for connection oriented failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Persistence port for user documents.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a freshly registered user.
    ///
    /// Fails with [`UserPersistenceError::DuplicateUsername`] when the
    /// username is already present.
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by exact username.
    async fn find_by_username(&self, username: &str)
    -> Result<Option<User>, UserPersistenceError>;

    /// All users in insertion order.
    async fn find_all(&self) -> Result<Vec<User>, UserPersistenceError>;

    /// Replace the stored document for an existing user.
    async fn update(&self, user: &User) -> Result<(), UserPersistenceError>;
}

/// Persistence port for blog documents.
#[async_trait]
pub trait BlogRepository: Send + Sync {
    /// Insert a new blog.
    async fn insert(&self, blog: &Blog) -> Result<(), BlogPersistenceError>;

    /// Fetch a blog by identifier.
    async fn find_by_id(&self, id: &BlogId) -> Result<Option<Blog>, BlogPersistenceError>;

    /// All blogs in insertion order.
    async fn find_all(&self) -> Result<Vec<Blog>, BlogPersistenceError>;

    /// Replace the stored document for an existing blog.
    ///
    /// Returns the updated blog, or `None` when the id is unknown.
    async fn update(&self, blog: &Blog) -> Result<Option<Blog>, BlogPersistenceError>;

    /// Delete a blog by identifier, reporting whether a document was removed.
    async fn delete_by_id(&self, id: &BlogId) -> Result<bool, BlogPersistenceError>;
}
