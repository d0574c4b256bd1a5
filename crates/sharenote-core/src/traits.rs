//! Core traits for sharenote abstractions.
//!
//! These traits define the interfaces that concrete stores must satisfy.
//! Handlers and services only ever see `Arc<dyn ...Repository>`, so the
//! PostgreSQL and in-memory backends are interchangeable.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// USER REPOSITORY TRAITS
// =============================================================================

/// Request for inserting a new user. The password must already be hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Repository for user records.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user.
    ///
    /// Fails with `Conflict` if the username is taken, then if the email is
    /// taken, in that order.
    async fn insert(&self, req: NewUser) -> Result<User>;

    /// Look up a user and their password hash by username.
    async fn find_by_username(&self, username: &str) -> Result<Option<UserCredentials>>;

    /// Look up a user by email. Fails with `NotFound` if absent.
    async fn find_by_email(&self, email: &str) -> Result<User>;
}

// =============================================================================
// NOTE REPOSITORY TRAITS
// =============================================================================

/// Request for creating a new note.
#[derive(Debug, Clone)]
pub struct CreateNoteRequest {
    pub owner_id: Uuid,
    pub title: String,
    pub kind: NoteKind,
    pub content: String,
    pub tags: Vec<String>,
}

/// Full replacement of a note's mutable fields.
#[derive(Debug, Clone)]
pub struct UpdateNoteRequest {
    pub title: String,
    pub kind: NoteKind,
    pub content: String,
    pub tags: Vec<String>,
}

/// Which notes a query runs over, relative to one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteScope {
    /// Notes the user owns.
    Owned(Uuid),
    /// Notes whose share list contains the user.
    SharedWith(Uuid),
}

impl NoteScope {
    pub fn user_id(&self) -> Uuid {
        match self {
            NoteScope::Owned(id) | NoteScope::SharedWith(id) => *id,
        }
    }

    /// True if `note` falls inside this scope.
    pub fn contains(&self, note: &Note) -> bool {
        match self {
            NoteScope::Owned(id) => note.owner_id == *id,
            NoteScope::SharedWith(id) => note.is_shared_with(*id),
        }
    }
}

/// Repository for note CRUD, sharing, and filtered queries.
///
/// All list operations return notes ordered by creation time, oldest first.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Insert a new note with `created_at == updated_at == now`.
    async fn insert(&self, req: CreateNoteRequest) -> Result<Note>;

    /// Fetch a note by ID.
    async fn fetch(&self, id: Uuid) -> Result<Note>;

    /// Replace title, kind, content and tags; refresh `updated_at`.
    async fn update(&self, id: Uuid, req: UpdateNoteRequest) -> Result<Note>;

    /// Permanently delete a note.
    async fn delete(&self, id: Uuid) -> Result<()>;

    /// Notes owned by `owner_id` with the given kind.
    async fn list_by_owner_and_kind(&self, owner_id: Uuid, kind: NoteKind) -> Result<Vec<Note>>;

    /// Notes whose share list contains `user_id`.
    async fn list_shared_with(&self, user_id: Uuid) -> Result<Vec<Note>>;

    /// Notes in scope carrying at least one of `tags`.
    async fn list_by_tags(&self, scope: NoteScope, tags: &[String]) -> Result<Vec<Note>>;

    /// Notes in scope whose title or content contains `pattern`,
    /// case-insensitively and literally.
    async fn search_text(&self, scope: NoteScope, pattern: &str) -> Result<Vec<Note>>;

    /// Append `user_id` to the share list unless it is already present or is
    /// the owner. Runs as a single atomic update. Does not touch `updated_at`.
    async fn add_share(&self, id: Uuid, user_id: Uuid) -> Result<Note>;

    /// Check if a note exists.
    async fn exists(&self, id: Uuid) -> Result<bool>;
}
