//! In-memory document store backing both collections.
//!
//! Implements the persistence contract with two insertion-ordered
//! collections behind mutexes: every operation touches a single collection
//! under its lock, giving the per-document atomicity the domain relies on.
//! Cross-document sequences (blog delete plus owner update) remain two
//! separate calls with the documented window between them.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::ports::{
    BlogPersistenceError, BlogRepository, UserPersistenceError, UserRepository,
};
use crate::domain::{Blog, BlogId, User, UserId};

/// Process-local store holding the user and blog collections.
#[derive(Default)]
pub struct InMemoryStore {
    users: Mutex<Vec<User>>,
    blogs: Mutex<Vec<Blog>>,
}

// Every mutation is a single push or in-place replacement, so a poisoned
// lock still guards consistent data and can be recovered.
fn recover<'a, T>(
    guard: Result<MutexGuard<'a, T>, PoisonError<MutexGuard<'a, T>>>,
) -> MutexGuard<'a, T> {
    guard.unwrap_or_else(PoisonError::into_inner)
}

impl InMemoryStore {
    /// Insert a user directly, bypassing uniqueness checks.
    ///
    /// Intended for test fixtures and development seeding.
    pub fn seed_user(&self, user: User) {
        recover(self.users.lock()).push(user);
    }

    /// Insert a blog directly.
    ///
    /// Intended for test fixtures and development seeding.
    pub fn seed_blog(&self, blog: Blog) {
        recover(self.blogs.lock()).push(blog);
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut users = recover(self.users.lock());
        if users
            .iter()
            .any(|existing| existing.username() == user.username())
        {
            return Err(UserPersistenceError::duplicate_username(
                user.username().as_ref(),
            ));
        }
        users.push(user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let users = recover(self.users.lock());
        Ok(users.iter().find(|user| user.id() == id).cloned())
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, UserPersistenceError> {
        let users = recover(self.users.lock());
        Ok(users
            .iter()
            .find(|user| user.username().as_ref() == username)
            .cloned())
    }

    async fn find_all(&self) -> Result<Vec<User>, UserPersistenceError> {
        Ok(recover(self.users.lock()).clone())
    }

    async fn update(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut users = recover(self.users.lock());
        match users.iter_mut().find(|stored| stored.id() == user.id()) {
            Some(stored) => {
                *stored = user.clone();
                Ok(())
            }
            None => Err(UserPersistenceError::query(format!(
                "no user with id {}",
                user.id()
            ))),
        }
    }
}

#[async_trait]
impl BlogRepository for InMemoryStore {
    async fn insert(&self, blog: &Blog) -> Result<(), BlogPersistenceError> {
        recover(self.blogs.lock()).push(blog.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &BlogId) -> Result<Option<Blog>, BlogPersistenceError> {
        let blogs = recover(self.blogs.lock());
        Ok(blogs.iter().find(|blog| blog.id() == id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Blog>, BlogPersistenceError> {
        Ok(recover(self.blogs.lock()).clone())
    }

    async fn update(&self, blog: &Blog) -> Result<Option<Blog>, BlogPersistenceError> {
        let mut blogs = recover(self.blogs.lock());
        match blogs.iter_mut().find(|stored| stored.id() == blog.id()) {
            Some(stored) => {
                *stored = blog.clone();
                Ok(Some(blog.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_by_id(&self, id: &BlogId) -> Result<bool, BlogPersistenceError> {
        let mut blogs = recover(self.blogs.lock());
        let before = blogs.len();
        blogs.retain(|blog| blog.id() != id);
        Ok(blogs.len() < before)
    }
}
