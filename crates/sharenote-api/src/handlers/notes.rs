//! Note CRUD handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;

use sharenote_core::{
    parse_note_id, parse_user_id, CreateNoteRequest, NoteKind, UpdateNoteRequest,
};

use super::{MessageResponse, NoteResponse, NotesResponse};
use crate::{error::ErrorResponse, ApiError, AppState};

/// Note body for create.
///
/// `created_at`/`updated_at` sent by clients are ignored; the server owns
/// timestamps. `type_` defaults to `personal`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct NoteBody {
    #[serde(rename = "userId", default)]
    pub user_id: Option<String>,
    pub title: String,
    #[serde(rename = "type_", default)]
    pub kind: NoteKind,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Note body for update. Every replaced field is required, including
/// `type_`; a `userId` in the body is ignored since ownership never changes.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateNoteBody {
    pub title: String,
    #[serde(rename = "type_")]
    pub kind: NoteKind,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Create a note owned by `userId`.
#[utoipa::path(
    post,
    path = "/notes/personal",
    tag = "Notes",
    request_body = NoteBody,
    responses(
        (status = 201, description = "Note created", body = NoteResponse),
        (status = 400, description = "Invalid user id", body = ErrorResponse),
    )
)]
pub async fn create_note(
    State(state): State<AppState>,
    Json(body): Json<NoteBody>,
) -> Result<(StatusCode, Json<NoteResponse>), ApiError> {
    let owner_id = parse_user_id(body.user_id.as_deref().unwrap_or_default())?;
    let note = state
        .notes
        .insert(CreateNoteRequest {
            owner_id,
            title: body.title,
            kind: body.kind,
            content: body.content,
            tags: body.tags,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(NoteResponse::new("Personal note created successfully", note)),
    ))
}

/// List a user's personal notes.
#[utoipa::path(
    get,
    path = "/notes/personal/{user_id}",
    tag = "Notes",
    params(("user_id" = String, Path, description = "Owner id")),
    responses(
        (status = 200, body = NotesResponse),
        (status = 400, description = "Invalid user id", body = ErrorResponse),
    )
)]
pub async fn list_personal(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<NotesResponse>, ApiError> {
    let user_id = parse_user_id(&user_id)?;
    let notes = state
        .notes
        .list_by_owner_and_kind(user_id, NoteKind::Personal)
        .await?;
    Ok(Json(NotesResponse::new(
        "Personal notes retrieved successfully",
        notes,
    )))
}

/// List a user's project notes.
#[utoipa::path(
    get,
    path = "/notes/projects/{user_id}",
    tag = "Notes",
    params(("user_id" = String, Path, description = "Owner id")),
    responses(
        (status = 200, body = NotesResponse),
        (status = 400, description = "Invalid user id", body = ErrorResponse),
    )
)]
pub async fn list_projects(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<NotesResponse>, ApiError> {
    let user_id = parse_user_id(&user_id)?;
    let notes = state
        .notes
        .list_by_owner_and_kind(user_id, NoteKind::Project)
        .await?;
    Ok(Json(NotesResponse::new(
        "Project notes retrieved successfully",
        notes,
    )))
}

#[utoipa::path(
    get,
    path = "/note/{note_id}",
    tag = "Notes",
    params(("note_id" = String, Path, description = "Note id")),
    responses(
        (status = 200, body = NoteResponse),
        (status = 400, description = "Invalid note id", body = ErrorResponse),
        (status = 404, description = "Note not found", body = ErrorResponse),
    )
)]
pub async fn get_note(
    State(state): State<AppState>,
    Path(note_id): Path<String>,
) -> Result<Json<NoteResponse>, ApiError> {
    let note_id = parse_note_id(&note_id)?;
    let note = state.notes.fetch(note_id).await?;
    Ok(Json(NoteResponse::new("Note retrieved successfully", note)))
}

/// Replace a note's title, kind, content, and tags.
#[utoipa::path(
    put,
    path = "/note/{note_id}",
    tag = "Notes",
    params(("note_id" = String, Path, description = "Note id")),
    request_body = UpdateNoteBody,
    responses(
        (status = 200, body = NoteResponse),
        (status = 400, description = "Invalid note id", body = ErrorResponse),
        (status = 404, description = "Note not found", body = ErrorResponse),
    )
)]
pub async fn update_note(
    State(state): State<AppState>,
    Path(note_id): Path<String>,
    Json(body): Json<UpdateNoteBody>,
) -> Result<Json<NoteResponse>, ApiError> {
    let note_id = parse_note_id(&note_id)?;
    let note = state
        .notes
        .update(
            note_id,
            UpdateNoteRequest {
                title: body.title,
                kind: body.kind,
                content: body.content,
                tags: body.tags,
            },
        )
        .await?;
    Ok(Json(NoteResponse::new("Note updated successfully", note)))
}

#[utoipa::path(
    delete,
    path = "/note/{note_id}",
    tag = "Notes",
    params(("note_id" = String, Path, description = "Note id")),
    responses(
        (status = 200, body = MessageResponse),
        (status = 400, description = "Invalid note id", body = ErrorResponse),
        (status = 404, description = "Note not found", body = ErrorResponse),
    )
)]
pub async fn delete_note(
    State(state): State<AppState>,
    Path(note_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let note_id = parse_note_id(&note_id)?;
    state.notes.delete(note_id).await?;
    Ok(Json(MessageResponse {
        message: "Note deleted successfully".to_string(),
    }))
}
