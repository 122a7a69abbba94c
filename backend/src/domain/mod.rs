//! Domain primitives and aggregates.
//!
//! Purpose: hold everything with actual invariants — validated entities, the
//! token service, the aggregation engine, and the ports the adapters plug
//! into. Keep types immutable and document invariants in each type's
//! Rustdoc; transport and storage details stay in the adapter layers.

pub mod auth;
pub mod blog;
pub mod error;
pub mod ports;
pub mod stats;
pub mod token;
pub mod user;

pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::blog::{Blog, BlogId, BlogValidationError};
pub use self::error::{Error, ErrorCode};
pub use self::token::{InvalidToken, TokenService};
pub use self::user::{PasswordHash, User, UserId, Username, UserValidationError};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
