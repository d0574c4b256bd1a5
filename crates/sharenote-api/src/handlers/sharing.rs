//! Sharing handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;

use sharenote_core::{parse_note_id, parse_user_id};

use super::{NoteResponse, NotesResponse};
use crate::{error::ErrorResponse, ApiError, AppState};

#[derive(Debug, Deserialize, ToSchema)]
pub struct ShareNoteRequest {
    pub email: String,
}

/// Share a note with the user registered under `email`.
#[utoipa::path(
    post,
    path = "/share-note/{note_id}",
    tag = "Sharing",
    params(("note_id" = String, Path, description = "Note id")),
    request_body = ShareNoteRequest,
    responses(
        (status = 200, body = NoteResponse),
        (status = 400, description = "Invalid note id", body = ErrorResponse),
        (status = 404, description = "Note or recipient not found", body = ErrorResponse),
    )
)]
pub async fn share_note(
    State(state): State<AppState>,
    Path(note_id): Path<String>,
    Json(req): Json<ShareNoteRequest>,
) -> Result<Json<NoteResponse>, ApiError> {
    let note_id = parse_note_id(&note_id)?;
    let note = state.sharing.share_note(note_id, &req.email).await?;
    Ok(Json(NoteResponse::new("Note shared successfully", note)))
}

/// Notes other users have shared with `user_id`.
#[utoipa::path(
    get,
    path = "/shared-notes/{user_id}",
    tag = "Sharing",
    params(("user_id" = String, Path, description = "Recipient id")),
    responses(
        (status = 200, body = NotesResponse),
        (status = 400, description = "Invalid user id", body = ErrorResponse),
    )
)]
pub async fn list_shared(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<NotesResponse>, ApiError> {
    let user_id = parse_user_id(&user_id)?;
    let notes = state.notes.list_shared_with(user_id).await?;
    Ok(Json(NotesResponse::new(
        "Shared notes retrieved successfully",
        notes,
    )))
}
