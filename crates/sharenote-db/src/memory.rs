//! In-memory repositories.
//!
//! Same contracts as the PostgreSQL repositories, held in process memory.
//! Used by the API test suite and by `STORE_BACKEND=memory` for local runs.
//! Each operation takes the lock once, so check-and-write sequences
//! (uniqueness on insert, append-if-absent on share) are atomic.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use sharenote_core::{
    new_v7, CreateNoteRequest, Error, NewUser, Note, NoteKind, NoteRepository, NoteScope, Result,
    UpdateNoteRequest, User, UserCredentials, UserRepository,
};

/// In-memory UserRepository.
#[derive(Clone, Default)]
pub struct MemoryUserRepository {
    users: Arc<RwLock<Vec<UserCredentials>>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn insert(&self, req: NewUser) -> Result<User> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.user.username == req.username) {
            return Err(Error::Conflict("Username already exists".to_string()));
        }
        if users.iter().any(|u| u.user.email == req.email) {
            return Err(Error::Conflict("Email already exists".to_string()));
        }

        let user = User {
            id: new_v7(),
            username: req.username,
            email: req.email,
        };
        users.push(UserCredentials {
            user: user.clone(),
            password_hash: req.password_hash,
        });
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<UserCredentials>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.user.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<User> {
        let users = self.users.read().await;
        users
            .iter()
            .find(|u| u.user.email == email)
            .map(|u| u.user.clone())
            .ok_or_else(|| Error::NotFound("User with this email does not exist".to_string()))
    }
}

/// In-memory NoteRepository. Notes are kept in creation order.
#[derive(Clone, Default)]
pub struct MemoryNoteRepository {
    notes: Arc<RwLock<Vec<Note>>>,
}

impl MemoryNoteRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn filter(&self, predicate: impl Fn(&Note) -> bool) -> Vec<Note> {
        let notes = self.notes.read().await;
        notes.iter().filter(|n| predicate(n)).cloned().collect()
    }
}

fn note_not_found() -> Error {
    Error::NotFound("Note not found".to_string())
}

#[async_trait]
impl NoteRepository for MemoryNoteRepository {
    async fn insert(&self, req: CreateNoteRequest) -> Result<Note> {
        let now = Utc::now();
        let note = Note {
            id: new_v7(),
            owner_id: req.owner_id,
            title: req.title,
            kind: req.kind,
            content: req.content,
            tags: req.tags,
            created_at: now,
            updated_at: now,
            shared_with: Vec::new(),
        };
        self.notes.write().await.push(note.clone());
        Ok(note)
    }

    async fn fetch(&self, id: Uuid) -> Result<Note> {
        let notes = self.notes.read().await;
        notes
            .iter()
            .find(|n| n.id == id)
            .cloned()
            .ok_or_else(note_not_found)
    }

    async fn update(&self, id: Uuid, req: UpdateNoteRequest) -> Result<Note> {
        let mut notes = self.notes.write().await;
        let note = notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(note_not_found)?;
        note.title = req.title;
        note.kind = req.kind;
        note.content = req.content;
        note.tags = req.tags;
        note.updated_at = Utc::now();
        Ok(note.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let mut notes = self.notes.write().await;
        let before = notes.len();
        notes.retain(|n| n.id != id);
        if notes.len() == before {
            return Err(note_not_found());
        }
        Ok(())
    }

    async fn list_by_owner_and_kind(&self, owner_id: Uuid, kind: NoteKind) -> Result<Vec<Note>> {
        Ok(self
            .filter(|n| n.owner_id == owner_id && n.kind == kind)
            .await)
    }

    async fn list_shared_with(&self, user_id: Uuid) -> Result<Vec<Note>> {
        Ok(self.filter(|n| n.is_shared_with(user_id)).await)
    }

    async fn list_by_tags(&self, scope: NoteScope, tags: &[String]) -> Result<Vec<Note>> {
        Ok(self
            .filter(|n| scope.contains(n) && n.has_any_tag(tags))
            .await)
    }

    async fn search_text(&self, scope: NoteScope, pattern: &str) -> Result<Vec<Note>> {
        Ok(self
            .filter(|n| scope.contains(n) && n.matches_text(pattern))
            .await)
    }

    async fn add_share(&self, id: Uuid, user_id: Uuid) -> Result<Note> {
        let mut notes = self.notes.write().await;
        let note = notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(note_not_found)?;
        if note.owner_id != user_id && !note.is_shared_with(user_id) {
            note.shared_with.push(user_id);
        }
        Ok(note.clone())
    }

    async fn exists(&self, id: Uuid) -> Result<bool> {
        Ok(self.notes.read().await.iter().any(|n| n.id == id))
    }
}
