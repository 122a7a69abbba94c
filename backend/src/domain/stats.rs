//! Aggregation over in-memory blog collections.
//!
//! Pure functions: no store access, no side effects, deterministic for a
//! given input slice. Callers materialize a snapshot first; these never
//! suspend or mutate their input.
//!
//! Tie-breaks are deliberate: the scan only replaces the current best on a
//! strictly greater value, so the earliest candidate wins. For the grouped
//! aggregations "earliest" means the author whose first blog appears first
//! in the input.

use super::blog::Blog;

/// Author ranked by number of blogs written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorBlogCount {
    /// Free-text author label, compared by exact string equality.
    pub author: String,
    /// Number of blogs carrying that label.
    pub blogs: u64,
}

/// Author ranked by accumulated likes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorLikes {
    /// Free-text author label, compared by exact string equality.
    pub author: String,
    /// Sum of likes across that author's blogs.
    pub likes: u64,
}

/// Sum of likes across all blogs; zero for an empty collection.
pub fn total_likes(blogs: &[Blog]) -> u64 {
    blogs.iter().map(Blog::likes).sum()
}

/// The blog with the most likes, or `None` for an empty collection.
///
/// Ties keep the leftmost blog: the scan replaces the current favorite only
/// when a strictly greater like count is found.
pub fn favorite_blog(blogs: &[Blog]) -> Option<&Blog> {
    blogs.iter().fold(None, |favorite: Option<&Blog>, blog| {
        match favorite {
            Some(current) if blog.likes() > current.likes() => Some(blog),
            Some(current) => Some(current),
            None => Some(blog),
        }
    })
}

/// Group blogs by author label, accumulating `value` per group.
///
/// Groups are kept in first-appearance order so the tie-break scans see
/// authors in the order their first blog occurred.
fn author_tallies(blogs: &[Blog], value: impl Fn(&Blog) -> u64) -> Vec<(&str, u64)> {
    let mut tallies: Vec<(&str, u64)> = Vec::new();
    for blog in blogs {
        match tallies.iter_mut().find(|(author, _)| *author == blog.author()) {
            Some((_, total)) => *total += value(blog),
            None => tallies.push((blog.author(), value(blog))),
        }
    }
    tallies
}

fn top_tally(tallies: Vec<(&str, u64)>) -> Option<(&str, u64)> {
    tallies.into_iter().fold(None, |best, candidate| match best {
        Some((_, top)) if candidate.1 > top => Some(candidate),
        Some(current) => Some(current),
        None => Some(candidate),
    })
}

/// The author with the most blogs, or `None` for an empty collection.
pub fn most_blogs(blogs: &[Blog]) -> Option<AuthorBlogCount> {
    top_tally(author_tallies(blogs, |_| 1)).map(|(author, blogs)| AuthorBlogCount {
        author: author.to_owned(),
        blogs,
    })
}

/// The author with the highest like total, or `None` for an empty collection.
pub fn most_likes(blogs: &[Blog]) -> Option<AuthorLikes> {
    top_tally(author_tallies(blogs, Blog::likes)).map(|(author, likes)| AuthorLikes {
        author: author.to_owned(),
        likes,
    })
}
