//! User aggregate: identity, credentials, and owned blog references.
//!
//! The password hash is computed once at registration (Argon2id, PHC string)
//! and never leaves the domain; API responses are built from explicit DTOs in
//! the inbound layer.

use std::fmt;
use std::sync::OnceLock;

use argon2::Argon2;
use argon2::password_hash::{
    PasswordHash as PhcString, PasswordHasher, PasswordVerifier, SaltString, rand_core,
};
use regex::Regex;
use uuid::Uuid;

use super::blog::BlogId;

/// Validation errors returned by the user constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyId,
    InvalidId,
    EmptyUsername,
    UsernameTooShort { min: usize },
    UsernameTooLong { max: usize },
    UsernameInvalidCharacters,
    PasswordTooShort { min: usize },
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::UsernameTooShort { min } => {
                write!(f, "username must be at least {min} characters")
            }
            Self::UsernameTooLong { max } => {
                write!(f, "username must be at most {max} characters")
            }
            Self::UsernameInvalidCharacters => write!(
                f,
                "username may only contain letters, numbers, dots, dashes, or underscores",
            ),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(Uuid);

impl UserId {
    /// Validate and construct a [`UserId`] from string input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let raw = id.as_ref();
        if raw.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        let parsed = Uuid::parse_str(raw).map_err(|_| UserValidationError::InvalidId)?;
        Ok(Self(parsed))
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique login name chosen at registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

/// Minimum allowed length for a username.
pub const USERNAME_MIN: usize = 3;
/// Maximum allowed length for a username.
pub const USERNAME_MAX: usize = 32;

static USERNAME_RE: OnceLock<Regex> = OnceLock::new();

fn username_regex() -> &'static Regex {
    USERNAME_RE.get_or_init(|| {
        // Length is enforced separately; this regex constrains allowed characters.
        let pattern = "^[A-Za-z0-9_.-]+$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("username regex failed to compile: {error}"))
    })
}

impl Username {
    /// Validate and construct a [`Username`], trimming surrounding whitespace.
    pub fn new(username: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalized = username.as_ref().trim();
        if normalized.is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }

        let length = normalized.chars().count();
        if length < USERNAME_MIN {
            return Err(UserValidationError::UsernameTooShort { min: USERNAME_MIN });
        }
        if length > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        }

        if !username_regex().is_match(normalized) {
            return Err(UserValidationError::UsernameInvalidCharacters);
        }

        Ok(Self(normalized.to_owned()))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Minimum allowed length for a registration password.
pub const PASSWORD_MIN: usize = 3;

/// Salted one-way password hash in PHC string format.
///
/// ## Invariants
/// - Computed once at registration via [`PasswordHash::from_plaintext`];
///   never recomputed or serialized into API responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hash a plaintext password with Argon2id and a fresh random salt.
    pub fn from_plaintext(password: &str) -> Result<Self, UserValidationError> {
        if password.chars().count() < PASSWORD_MIN {
            return Err(UserValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }

        let salt = SaltString::generate(&mut rand_core::OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .unwrap_or_else(|error| panic!("password hashing failed: {error}"));
        Ok(Self(hash.to_string()))
    }

    /// Rehydrate a hash previously produced by [`PasswordHash::from_plaintext`].
    pub fn from_phc_string(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    /// Constant-style verification of a candidate password.
    ///
    /// An unparseable stored hash counts as a mismatch rather than an error so
    /// login failures stay indistinguishable to callers.
    pub fn verify(&self, candidate: &str) -> bool {
        let Ok(parsed) = PhcString::new(self.0.as_str()) else {
            tracing::warn!("stored password hash is not valid PHC format");
            return false;
        };
        Argon2::default()
            .verify_password(candidate.as_bytes(), &parsed)
            .is_ok()
    }

    /// Borrow the PHC-formatted hash string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Application user.
///
/// ## Invariants
/// - `username` satisfies [`Username`] validation and is unique per store.
/// - `blogs` holds the ids of every blog this user owns; creation and
///   deletion of owned blogs keep it in lockstep with the blog collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    username: Username,
    name: String,
    password_hash: PasswordHash,
    blogs: Vec<BlogId>,
}

impl User {
    /// Build a new [`User`] from validated components, owning no blogs yet.
    pub fn new(
        id: UserId,
        username: Username,
        name: impl Into<String>,
        password_hash: PasswordHash,
    ) -> Self {
        Self {
            id,
            username,
            name: name.into(),
            password_hash,
            blogs: Vec::new(),
        }
    }

    /// Stable user identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Unique login name.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Display name shown to other users.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Stored password hash.
    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// Ids of the blogs this user owns, in creation order.
    pub fn blogs(&self) -> &[BlogId] {
        &self.blogs
    }

    /// Whether this user owns the given blog.
    pub fn owns(&self, blog_id: &BlogId) -> bool {
        self.blogs.contains(blog_id)
    }

    /// Record ownership of a newly created blog.
    pub fn grant_blog(&mut self, blog_id: BlogId) {
        if !self.blogs.contains(&blog_id) {
            self.blogs.push(blog_id);
        }
    }

    /// Drop ownership of a deleted blog.
    pub fn revoke_blog(&mut self, blog_id: &BlogId) {
        self.blogs.retain(|owned| owned != blog_id);
    }
}
