//! Tag and text queries across owned and shared notes.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use tracing::debug;
use uuid::Uuid;

use sharenote_core::{Note, NoteRepository, NoteScope, Result};

#[derive(Clone)]
pub struct NoteQuery {
    notes: Arc<dyn NoteRepository>,
}

impl NoteQuery {
    pub fn new(notes: Arc<dyn NoteRepository>) -> Self {
        Self { notes }
    }

    /// Notes carrying any of `tags` that `user_id` owns, then those shared with them.
    pub async fn notes_by_tags(&self, user_id: Uuid, tags: &[String]) -> Result<Vec<Note>> {
        if tags.is_empty() {
            return Ok(Vec::new());
        }
        let start = Instant::now();
        let (owned, shared) = futures::try_join!(
            self.notes.list_by_tags(NoteScope::Owned(user_id), tags),
            self.notes.list_by_tags(NoteScope::SharedWith(user_id), tags),
        )?;
        let merged = merge_unique(owned, shared);

        debug!(
            subsystem = "api",
            component = "note_query",
            op = "notes_by_tags",
            user_id = %user_id,
            tag_count = tags.len(),
            result_count = merged.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Tag query complete"
        );
        Ok(merged)
    }

    /// Notes whose title or content contains `pattern`, case-insensitively.
    pub async fn search_notes(&self, user_id: Uuid, pattern: &str) -> Result<Vec<Note>> {
        let start = Instant::now();
        let (owned, shared) = futures::try_join!(
            self.notes.search_text(NoteScope::Owned(user_id), pattern),
            self.notes.search_text(NoteScope::SharedWith(user_id), pattern),
        )?;
        let merged = merge_unique(owned, shared);

        debug!(
            subsystem = "api",
            component = "note_query",
            op = "search_notes",
            user_id = %user_id,
            result_count = merged.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Text search complete"
        );
        Ok(merged)
    }
}

/// Concatenate, keeping the first occurrence of each note id.
fn merge_unique(owned: Vec<Note>, shared: Vec<Note>) -> Vec<Note> {
    let mut seen = HashSet::with_capacity(owned.len() + shared.len());
    owned
        .into_iter()
        .chain(shared)
        .filter(|n| seen.insert(n.id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sharenote_core::{new_v7, CreateNoteRequest, NoteKind};
    use sharenote_db::MemoryNoteRepository;

    async fn add(
        repo: &MemoryNoteRepository,
        owner: Uuid,
        title: &str,
        content: &str,
        tags: &[&str],
    ) -> Note {
        repo.insert(CreateNoteRequest {
            owner_id: owner,
            title: title.to_string(),
            kind: NoteKind::Personal,
            content: content.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        })
        .await
        .unwrap()
    }

    fn tags(list: &[&str]) -> Vec<String> {
        list.iter().map(|t| t.to_string()).collect()
    }

    #[tokio::test]
    async fn test_owned_before_shared() {
        let repo = MemoryNoteRepository::new();
        let alice = new_v7();
        let bob = new_v7();
        let theirs = add(&repo, bob, "bob's", "", &["x"]).await;
        let mine = add(&repo, alice, "mine", "", &["x"]).await;
        repo.add_share(theirs.id, alice).await.unwrap();

        let query = NoteQuery::new(Arc::new(repo));
        let ids: Vec<Uuid> = query
            .notes_by_tags(alice, &tags(&["x"]))
            .await
            .unwrap()
            .iter()
            .map(|n| n.id)
            .collect();
        assert_eq!(ids, vec![mine.id, theirs.id]);
    }

    #[tokio::test]
    async fn test_tags_exclude_untagged_and_unrelated() {
        let repo = MemoryNoteRepository::new();
        let alice = new_v7();
        let bob = new_v7();
        add(&repo, alice, "untagged", "", &["y"]).await;
        add(&repo, bob, "not shared", "", &["x"]).await;
        let hit = add(&repo, alice, "hit", "", &["y", "x"]).await;

        let query = NoteQuery::new(Arc::new(repo));
        let results = query.notes_by_tags(alice, &tags(&["x"])).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, hit.id);
    }

    #[tokio::test]
    async fn test_empty_tags_yield_nothing() {
        let repo = MemoryNoteRepository::new();
        let alice = new_v7();
        add(&repo, alice, "any", "", &["x"]).await;

        let query = NoteQuery::new(Arc::new(repo));
        assert!(query.notes_by_tags(alice, &[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_literal_and_case_insensitive() {
        let repo = MemoryNoteRepository::new();
        let alice = new_v7();
        add(&repo, alice, "Budget", "Spend 50% on tools", &[]).await;
        add(&repo, alice, "Other", "nothing here", &[]).await;

        let query = NoteQuery::new(Arc::new(repo));
        assert_eq!(query.search_notes(alice, "BUDGET").await.unwrap().len(), 1);
        assert_eq!(query.search_notes(alice, "50%").await.unwrap().len(), 1);
        assert!(query.search_notes(alice, "B.dget").await.unwrap().is_empty());
        assert!(query.search_notes(alice, "5_%").await.unwrap().is_empty());
    }

    #[test]
    fn test_merge_unique_keeps_first() {
        let now = chrono::Utc::now();
        let note = Note {
            id: new_v7(),
            owner_id: new_v7(),
            title: "t".to_string(),
            kind: NoteKind::Personal,
            content: String::new(),
            tags: vec![],
            created_at: now,
            updated_at: now,
            shared_with: vec![],
        };
        let mut dup = note.clone();
        dup.title = "dup".to_string();

        let merged = merge_unique(vec![note.clone()], vec![dup]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].title, "t");
    }
}
