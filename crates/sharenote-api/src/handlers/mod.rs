//! HTTP handlers for sharenote-api.
//!
//! Every success body carries a human-readable `message` alongside the
//! payload, matching what existing clients expect.

pub mod notes;
pub mod search;
pub mod sharing;
pub mod users;

use serde::Serialize;
use utoipa::ToSchema;

use sharenote_core::{Note, User};

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub message: String,
    pub user: User,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NoteResponse {
    pub message: String,
    pub note: Note,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NotesResponse {
    pub message: String,
    pub notes: Vec<Note>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl NoteResponse {
    fn new(message: &str, note: Note) -> Self {
        Self {
            message: message.to_string(),
            note,
        }
    }
}

impl NotesResponse {
    fn new(message: &str, notes: Vec<Note>) -> Self {
        Self {
            message: message.to_string(),
            notes,
        }
    }
}
