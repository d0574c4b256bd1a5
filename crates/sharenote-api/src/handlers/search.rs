//! Tag and text search across owned and shared notes.

use axum::{
    async_trait,
    extract::{FromRequest, Path, Request, State},
    http::header,
    response::{IntoResponse, Response},
    Form, Json,
};
use serde::Deserialize;
use utoipa::ToSchema;

use sharenote_core::parse_user_id;

use super::NotesResponse;
use crate::{error::ErrorResponse, ApiError, AppState};

/// Tag filter body: a bare JSON array, or an object with a `tags` array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TagsBody {
    List(Vec<String>),
    Wrapped { tags: Vec<String> },
}

impl TagsBody {
    pub fn into_tags(self) -> Vec<String> {
        match self {
            TagsBody::List(tags) | TagsBody::Wrapped { tags } => tags,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SearchRequest {
    pub query: String,
}

/// Search text taken from a form field or a JSON body, by `Content-Type`.
#[derive(Debug)]
pub struct SearchQuery(pub String);

#[async_trait]
impl<S> FromRequest<S> for SearchQuery
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/json"));

        let body = if is_json {
            Json::<SearchRequest>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?
                .0
        } else {
            Form::<SearchRequest>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?
                .0
        };
        Ok(SearchQuery(body.query))
    }
}

/// Notes tagged with any of the given tags, owned first then shared.
#[utoipa::path(
    post,
    path = "/notes/tags/{user_id}",
    tag = "Search",
    params(("user_id" = String, Path, description = "User id")),
    request_body = Vec<String>,
    responses(
        (status = 200, body = NotesResponse),
        (status = 400, description = "Invalid user id", body = ErrorResponse),
    )
)]
pub async fn notes_by_tags(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(body): Json<TagsBody>,
) -> Result<Json<NotesResponse>, ApiError> {
    let user_id = parse_user_id(&user_id)?;
    let notes = state
        .query
        .notes_by_tags(user_id, &body.into_tags())
        .await?;
    Ok(Json(NotesResponse::new(
        "Notes by tags retrieved successfully",
        notes,
    )))
}

/// Case-insensitive substring search over title and content.
#[utoipa::path(
    post,
    path = "/notes/search/{user_id}",
    tag = "Search",
    params(("user_id" = String, Path, description = "User id")),
    request_body(content = SearchRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, body = NotesResponse),
        (status = 400, description = "Invalid user id", body = ErrorResponse),
    )
)]
pub async fn search_notes(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    SearchQuery(query): SearchQuery,
) -> Result<Json<NotesResponse>, ApiError> {
    let user_id = parse_user_id(&user_id)?;
    let notes = state.query.search_notes(user_id, &query).await?;
    Ok(Json(NotesResponse::new("Notes search results", notes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_body_accepts_bare_array() {
        let body: TagsBody = serde_json::from_str(r#"["work","home"]"#).unwrap();
        assert_eq!(body.into_tags(), vec!["work", "home"]);
    }

    #[test]
    fn test_tags_body_accepts_wrapped_object() {
        let body: TagsBody = serde_json::from_str(r#"{"tags":["work"]}"#).unwrap();
        assert_eq!(body.into_tags(), vec!["work"]);
    }

    #[test]
    fn test_tags_body_rejects_other_shapes() {
        assert!(serde_json::from_str::<TagsBody>(r#""work""#).is_err());
        assert!(serde_json::from_str::<TagsBody>(r#"{"labels":["work"]}"#).is_err());
    }
}
