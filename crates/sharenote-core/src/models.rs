//! Core data models for sharenote.
//!
//! Field names on the wire follow the established client contract (`_id`,
//! `userId`, `type_`, `shared_with`); Rust-side names follow the domain.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

// =============================================================================
// USER TYPES
// =============================================================================

/// A registered user as exposed to callers. Never carries credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

/// A user together with the stored password hash, for credential checks.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    /// Argon2id PHC string.
    pub password_hash: String,
}

// =============================================================================
// NOTE TYPES
// =============================================================================

/// Discriminator between personal and project notes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, utoipa::ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum NoteKind {
    #[default]
    Personal,
    Project,
}

impl NoteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoteKind::Personal => "personal",
            NoteKind::Project => "project",
        }
    }
}

impl fmt::Display for NoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NoteKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "personal" => Ok(NoteKind::Personal),
            "project" => Ok(NoteKind::Project),
            other => Err(Error::InvalidInput(format!("Unknown note kind: {}", other))),
        }
    }
}

/// A note owned by one user and optionally shared with others.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Note {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(rename = "userId")]
    pub owner_id: Uuid,
    pub title: String,
    #[serde(rename = "type_")]
    pub kind: NoteKind,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub shared_with: Vec<Uuid>,
}

impl Note {
    /// True if the note carries at least one of `tags`.
    pub fn has_any_tag(&self, tags: &[String]) -> bool {
        self.tags.iter().any(|t| tags.contains(t))
    }

    /// Case-insensitive literal substring match against title or content.
    pub fn matches_text(&self, pattern: &str) -> bool {
        let needle = pattern.to_lowercase();
        self.title.to_lowercase().contains(&needle)
            || self.content.to_lowercase().contains(&needle)
    }

    /// True if `user_id` appears in the share list.
    pub fn is_shared_with(&self, user_id: Uuid) -> bool {
        self.shared_with.contains(&user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_note() -> Note {
        let now = Utc::now();
        Note {
            id: Uuid::now_v7(),
            owner_id: Uuid::now_v7(),
            title: "Quarterly Plan".to_string(),
            kind: NoteKind::Project,
            content: "Ship the 50% milestone".to_string(),
            tags: vec!["work".to_string(), "q3".to_string()],
            created_at: now,
            updated_at: now,
            shared_with: vec![],
        }
    }

    #[test]
    fn test_note_kind_round_trips_through_str() {
        for kind in [NoteKind::Personal, NoteKind::Project] {
            assert_eq!(kind.as_str().parse::<NoteKind>().unwrap(), kind);
        }
        assert!("diary".parse::<NoteKind>().is_err());
    }

    #[test]
    fn test_note_serializes_with_client_field_names() {
        let note = sample_note();
        let json = serde_json::to_value(&note).unwrap();

        assert_eq!(json["_id"], note.id.to_string());
        assert_eq!(json["userId"], note.owner_id.to_string());
        assert_eq!(json["type_"], "project");
        assert_eq!(json["tags"], serde_json::json!(["work", "q3"]));
        assert_eq!(json["shared_with"], serde_json::json!([]));
        assert!(json.get("created_at").is_some());
        assert!(json.get("updated_at").is_some());
    }

    #[test]
    fn test_user_serializes_without_credentials() {
        let user = User {
            id: Uuid::now_v7(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["_id"], user.id.to_string());
        assert!(json.get("password").is_none());
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn test_has_any_tag_is_logical_or() {
        let note = sample_note();
        assert!(note.has_any_tag(&["home".to_string(), "work".to_string()]));
        assert!(!note.has_any_tag(&["home".to_string()]));
        assert!(!note.has_any_tag(&[]));
    }

    #[test]
    fn test_matches_text_is_case_insensitive_substring() {
        let note = sample_note();
        assert!(note.matches_text("quarterly"));
        assert!(note.matches_text("MILESTONE"));
        assert!(note.matches_text(""));
        assert!(!note.matches_text("roadmap"));
    }

    #[test]
    fn test_matches_text_treats_pattern_literally() {
        let note = sample_note();
        assert!(note.matches_text("50%"));
        assert!(!note.matches_text("Q.arterly"));
        assert!(!note.matches_text("Plan.*"));
    }
}
