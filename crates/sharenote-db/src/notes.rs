//! Note repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{postgres::PgRow, Pool, Postgres, Row};
use tracing::{debug, info};
use uuid::Uuid;

use sharenote_core::{
    new_v7, CreateNoteRequest, Error, Note, NoteKind, NoteRepository, NoteScope, Result,
    UpdateNoteRequest,
};

use crate::escape_like;

const NOTE_COLUMNS: &str =
    "id, owner_id, title, kind, content, tags, shared_with, created_at_utc, updated_at_utc";

/// PostgreSQL implementation of NoteRepository.
pub struct PgNoteRepository {
    pool: Pool<Postgres>,
}

impl PgNoteRepository {
    /// Create a new PgNoteRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    async fn fetch_where(
        &self,
        clause: &str,
        user_id: Uuid,
        extra: Option<QueryParam<'_>>,
    ) -> Result<Vec<Note>> {
        let sql = format!(
            "SELECT {} FROM notes WHERE {} ORDER BY created_at_utc ASC, id ASC",
            NOTE_COLUMNS, clause
        );
        let mut q = sqlx::query(&sql).bind(user_id);
        match extra {
            Some(QueryParam::Text(s)) => q = q.bind(s),
            Some(QueryParam::TextArray(a)) => q = q.bind(a),
            Some(QueryParam::Kind(k)) => q = q.bind(k.as_str()),
            None => {}
        }
        let rows = q.fetch_all(&self.pool).await.map_err(Error::Database)?;
        rows.iter().map(row_to_note).collect()
    }
}

/// Second bind parameter for filtered list queries.
enum QueryParam<'a> {
    Text(String),
    TextArray(&'a [String]),
    Kind(NoteKind),
}

/// SQL predicate selecting the notes in `scope`; the user id binds to `$1`.
fn scope_clause(scope: NoteScope) -> &'static str {
    match scope {
        NoteScope::Owned(_) => "owner_id = $1",
        NoteScope::SharedWith(_) => "$1 = ANY(shared_with)",
    }
}

fn row_to_note(row: &PgRow) -> Result<Note> {
    let kind: String = row.get("kind");
    Ok(Note {
        id: row.get("id"),
        owner_id: row.get("owner_id"),
        title: row.get("title"),
        kind: kind
            .parse()
            .map_err(|_| Error::Internal(format!("Unknown note kind in store: {}", kind)))?,
        content: row.get("content"),
        tags: row.get("tags"),
        shared_with: row.get("shared_with"),
        created_at: row.get("created_at_utc"),
        updated_at: row.get("updated_at_utc"),
    })
}

fn note_not_found() -> Error {
    Error::NotFound("Note not found".to_string())
}

#[async_trait]
impl NoteRepository for PgNoteRepository {
    async fn insert(&self, req: CreateNoteRequest) -> Result<Note> {
        let id = new_v7();
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO notes (id, owner_id, title, kind, content, tags, shared_with, created_at_utc, updated_at_utc)
             VALUES ($1, $2, $3, $4, $5, $6, '{{}}', $7, $7)
             RETURNING {}",
            NOTE_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(req.owner_id)
            .bind(&req.title)
            .bind(req.kind.as_str())
            .bind(&req.content)
            .bind(&req.tags)
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;

        info!(
            subsystem = "db",
            component = "notes",
            op = "insert",
            note_id = %id,
            user_id = %req.owner_id,
            kind = %req.kind,
            "Note created"
        );
        row_to_note(&row)
    }

    async fn fetch(&self, id: Uuid) -> Result<Note> {
        let sql = format!("SELECT {} FROM notes WHERE id = $1", NOTE_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?
            .ok_or_else(note_not_found)?;
        row_to_note(&row)
    }

    async fn update(&self, id: Uuid, req: UpdateNoteRequest) -> Result<Note> {
        let sql = format!(
            "UPDATE notes
             SET title = $2, kind = $3, content = $4, tags = $5, updated_at_utc = $6
             WHERE id = $1
             RETURNING {}",
            NOTE_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(&req.title)
            .bind(req.kind.as_str())
            .bind(&req.content)
            .bind(&req.tags)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?
            .ok_or_else(note_not_found)?;

        info!(
            subsystem = "db",
            component = "notes",
            op = "update",
            note_id = %id,
            "Note updated"
        );
        row_to_note(&row)
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(note_not_found());
        }
        info!(
            subsystem = "db",
            component = "notes",
            op = "delete",
            note_id = %id,
            "Note deleted"
        );
        Ok(())
    }

    async fn list_by_owner_and_kind(&self, owner_id: Uuid, kind: NoteKind) -> Result<Vec<Note>> {
        let notes = self
            .fetch_where(
                "owner_id = $1 AND kind = $2",
                owner_id,
                Some(QueryParam::Kind(kind)),
            )
            .await?;
        debug!(
            subsystem = "db",
            component = "notes",
            op = "list_by_owner_and_kind",
            user_id = %owner_id,
            kind = %kind,
            result_count = notes.len(),
            "Listed notes"
        );
        Ok(notes)
    }

    async fn list_shared_with(&self, user_id: Uuid) -> Result<Vec<Note>> {
        self.fetch_where(scope_clause(NoteScope::SharedWith(user_id)), user_id, None)
            .await
    }

    async fn list_by_tags(&self, scope: NoteScope, tags: &[String]) -> Result<Vec<Note>> {
        if tags.is_empty() {
            return Ok(Vec::new());
        }
        let clause = format!("{} AND tags && $2::text[]", scope_clause(scope));
        self.fetch_where(&clause, scope.user_id(), Some(QueryParam::TextArray(tags)))
            .await
    }

    async fn search_text(&self, scope: NoteScope, pattern: &str) -> Result<Vec<Note>> {
        let clause = format!(
            r"{} AND (title ILIKE $2 ESCAPE '\' OR content ILIKE $2 ESCAPE '\')",
            scope_clause(scope)
        );
        let like = format!("%{}%", escape_like(pattern));
        self.fetch_where(&clause, scope.user_id(), Some(QueryParam::Text(like)))
            .await
    }

    async fn add_share(&self, id: Uuid, user_id: Uuid) -> Result<Note> {
        let sql = format!(
            "UPDATE notes
             SET shared_with = array_append(shared_with, $2)
             WHERE id = $1 AND owner_id <> $2 AND NOT ($2 = ANY(shared_with))
             RETURNING {}",
            NOTE_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;

        match row {
            Some(row) => {
                info!(
                    subsystem = "db",
                    component = "notes",
                    op = "add_share",
                    note_id = %id,
                    user_id = %user_id,
                    "Note shared"
                );
                row_to_note(&row)
            }
            // Already shared, shared with the owner, or missing
            None => self.fetch(id).await,
        }
    }

    async fn exists(&self, id: Uuid) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM notes WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(exists)
    }
}
