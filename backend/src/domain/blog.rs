//! Blog entity shared by the HTTP adapter and the aggregation engine.
//!
//! `author` is a free-text label independent of any registered [`User`];
//! ownership is tracked separately through the optional `user` reference.
//!
//! [`User`]: super::user::User

use std::fmt;

use uuid::Uuid;

use super::user::UserId;

/// Validation errors returned by the blog constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlogValidationError {
    EmptyId,
    InvalidId,
    MissingTitle,
    MissingUrl,
}

impl fmt::Display for BlogValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "blog id must not be empty"),
            Self::InvalidId => write!(f, "blog id must be a valid UUID"),
            Self::MissingTitle => write!(f, "title is required"),
            Self::MissingUrl => write!(f, "url is required"),
        }
    }
}

impl std::error::Error for BlogValidationError {}

/// Stable blog identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlogId(Uuid);

impl BlogId {
    /// Validate and construct a [`BlogId`] from string input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, BlogValidationError> {
        let raw = id.as_ref();
        if raw.is_empty() {
            return Err(BlogValidationError::EmptyId);
        }
        let parsed = Uuid::parse_str(raw).map_err(|_| BlogValidationError::InvalidId)?;
        Ok(Self(parsed))
    }

    /// Generate a new random [`BlogId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for BlogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A shared blog entry.
///
/// ## Invariants
/// - `title` and `url` are non-blank.
/// - `user`, when present, references an existing [`UserId`] whose owned set
///   contains this blog's id (maintained by the create/delete handlers).
///
/// [`UserId`]: super::user::UserId
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blog {
    id: BlogId,
    title: String,
    author: String,
    url: String,
    likes: u64,
    user: Option<UserId>,
}

impl Blog {
    /// Build a blog, enforcing the required-field invariants.
    pub fn new(
        id: BlogId,
        title: impl Into<String>,
        author: impl Into<String>,
        url: impl Into<String>,
        likes: u64,
        user: Option<UserId>,
    ) -> Result<Self, BlogValidationError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(BlogValidationError::MissingTitle);
        }
        let url = url.into();
        if url.trim().is_empty() {
            return Err(BlogValidationError::MissingUrl);
        }

        Ok(Self {
            id,
            title,
            author: author.into(),
            url,
            likes,
            user,
        })
    }

    /// Stable blog identifier.
    pub fn id(&self) -> &BlogId {
        &self.id
    }

    /// Blog title.
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Free-text author label.
    pub fn author(&self) -> &str {
        self.author.as_str()
    }

    /// Link to the content.
    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Accumulated like count.
    pub fn likes(&self) -> u64 {
        self.likes
    }

    /// Owning user, when the blog was created by an authenticated identity.
    pub fn user(&self) -> Option<&UserId> {
        self.user.as_ref()
    }

    /// Replace the mutable fields, keeping id and owner fixed.
    ///
    /// Used by the update route, which deliberately cannot reassign
    /// ownership.
    pub fn with_fields(
        self,
        title: impl Into<String>,
        author: impl Into<String>,
        url: impl Into<String>,
        likes: u64,
    ) -> Result<Self, BlogValidationError> {
        Self::new(self.id, title, author, url, likes, self.user)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "https://example.com", BlogValidationError::MissingTitle)]
    #[case("   ", "https://example.com", BlogValidationError::MissingTitle)]
    #[case("Refactoring", "", BlogValidationError::MissingUrl)]
    #[case("Refactoring", "  ", BlogValidationError::MissingUrl)]
    fn blank_required_fields_are_rejected(
        #[case] title: &str,
        #[case] url: &str,
        #[case] expected: BlogValidationError,
    ) {
        let err = Blog::new(BlogId::random(), title, "Martin Fowler", url, 0, None)
            .expect_err("invalid blog must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn author_may_be_empty() {
        let blog = Blog::new(BlogId::random(), "Untitled author", "", "https://x", 3, None)
            .expect("author is optional free text");
        assert_eq!(blog.author(), "");
    }

    #[rstest]
    fn update_keeps_id_and_owner() {
        let owner = UserId::random();
        let blog = Blog::new(
            BlogId::random(),
            "Before",
            "A",
            "https://before",
            1,
            Some(owner),
        )
        .expect("valid blog");
        let id = *blog.id();

        let updated = blog
            .with_fields("After", "B", "https://after", 10)
            .expect("valid update");
        assert_eq!(updated.id(), &id);
        assert_eq!(updated.user(), Some(&owner));
        assert_eq!(updated.title(), "After");
        assert_eq!(updated.likes(), 10);
    }

    #[rstest]
    fn update_cannot_blank_the_title() {
        let blog = Blog::new(BlogId::random(), "Keep me", "A", "https://x", 0, None)
            .expect("valid blog");
        let err = blog
            .with_fields("", "A", "https://x", 0)
            .expect_err("blank title rejected");
        assert_eq!(err, BlogValidationError::MissingTitle);
    }

    #[rstest]
    fn blog_id_rejects_non_uuid_input() {
        let err = BlogId::new("12345").expect_err("must fail");
        assert_eq!(err, BlogValidationError::InvalidId);
    }
}
