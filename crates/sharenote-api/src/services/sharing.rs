//! Share a note with another user by email.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use sharenote_core::{Error, Note, NoteRepository, Result, UserRepository};

#[derive(Clone)]
pub struct SharingService {
    users: Arc<dyn UserRepository>,
    notes: Arc<dyn NoteRepository>,
}

impl SharingService {
    pub fn new(users: Arc<dyn UserRepository>, notes: Arc<dyn NoteRepository>) -> Self {
        Self { users, notes }
    }

    /// Grant the user registered under `email` access to `note_id`.
    ///
    /// The note is checked before the recipient. Repeating a share, or
    /// sharing with the owner, succeeds and leaves the share list unchanged.
    pub async fn share_note(&self, note_id: Uuid, email: &str) -> Result<Note> {
        if !self.notes.exists(note_id).await? {
            return Err(Error::NotFound("Note not found".to_string()));
        }
        let recipient = self.users.find_by_email(email.trim()).await?;
        let note = self.notes.add_share(note_id, recipient.id).await?;

        info!(
            subsystem = "api",
            component = "sharing",
            op = "share_note",
            note_id = %note_id,
            user_id = %recipient.id,
            share_count = note.shared_with.len(),
            "Note shared"
        );
        Ok(note)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sharenote_core::{CreateNoteRequest, NewUser, NoteKind, User};
    use sharenote_db::{MemoryNoteRepository, MemoryUserRepository};

    struct Fixture {
        svc: SharingService,
        users: MemoryUserRepository,
        notes: MemoryNoteRepository,
    }

    fn fixture() -> Fixture {
        let users = MemoryUserRepository::new();
        let notes = MemoryNoteRepository::new();
        let svc = SharingService::new(Arc::new(users.clone()), Arc::new(notes.clone()));
        Fixture { svc, users, notes }
    }

    async fn add_user(repo: &MemoryUserRepository, name: &str) -> User {
        repo.insert(NewUser {
            username: name.to_string(),
            email: format!("{}@example.com", name),
            password_hash: "$argon2id$x".to_string(),
        })
        .await
        .unwrap()
    }

    async fn add_note(repo: &MemoryNoteRepository, owner: &User) -> Note {
        repo.insert(CreateNoteRequest {
            owner_id: owner.id,
            title: "Plan".to_string(),
            kind: NoteKind::Project,
            content: "Q3".to_string(),
            tags: vec![],
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_share_twice_keeps_single_entry() {
        let f = fixture();
        let alice = add_user(&f.users, "alice").await;
        let bob = add_user(&f.users, "bob").await;
        let note = add_note(&f.notes, &alice).await;

        f.svc.share_note(note.id, "bob@example.com").await.unwrap();
        let shared = f.svc.share_note(note.id, "bob@example.com").await.unwrap();
        assert_eq!(shared.shared_with, vec![bob.id]);
    }

    #[tokio::test]
    async fn test_share_with_owner_is_noop() {
        let f = fixture();
        let alice = add_user(&f.users, "alice").await;
        let note = add_note(&f.notes, &alice).await;

        let shared = f.svc.share_note(note.id, "alice@example.com").await.unwrap();
        assert!(shared.shared_with.is_empty());
    }

    #[tokio::test]
    async fn test_missing_note_checked_before_email() {
        let f = fixture();
        let err = f
            .svc
            .share_note(sharenote_core::new_v7(), "nobody@example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(ref m) if m == "Note not found"));
    }

    #[tokio::test]
    async fn test_unknown_email() {
        let f = fixture();
        let alice = add_user(&f.users, "alice").await;
        let note = add_note(&f.notes, &alice).await;

        let err = f
            .svc
            .share_note(note.id, "nobody@example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(ref m) if m == "User with this email does not exist"));
    }

    #[tokio::test]
    async fn test_share_preserves_updated_at() {
        let f = fixture();
        let alice = add_user(&f.users, "alice").await;
        add_user(&f.users, "bob").await;
        let note = add_note(&f.notes, &alice).await;

        let shared = f.svc.share_note(note.id, "bob@example.com").await.unwrap();
        assert_eq!(shared.updated_at, note.updated_at);
    }
}
