//! sharenote-api - HTTP API server for sharenote
//!
//! Router, shared state, middleware, and error mapping. The binary in
//! `main.rs` wires these to a configured store and serves them.

pub mod config;
pub mod error;
pub mod handlers;
pub mod services;

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use governor::{Quota, RateLimiter};
use serde::Serialize;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

use sharenote_core::{Error, NoteRepository, Result, UserRepository};
use sharenote_crypto::KdfParams;

pub use config::{ServerConfig, StoreBackend};
pub use error::ApiError;
use handlers::{notes, search, sharing, users};
use services::{IdentityService, NoteQuery, SharingService};

// =============================================================================
// REQUEST ID (UUIDv7)
// =============================================================================

/// Generates time-ordered UUIDv7 request correlation IDs.
#[derive(Clone, Default)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

// =============================================================================
// STATE
// =============================================================================

/// Global rate limiter type (direct quota, no keyed bucketing).
pub type GlobalRateLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub notes: Arc<dyn NoteRepository>,
    pub identity: IdentityService,
    pub sharing: SharingService,
    pub query: NoteQuery,
    /// None if rate limiting is disabled.
    pub rate_limiter: Option<Arc<GlobalRateLimiter>>,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserRepository>,
        notes: Arc<dyn NoteRepository>,
        kdf: KdfParams,
    ) -> Self {
        Self {
            identity: IdentityService::new(users.clone(), kdf),
            sharing: SharingService::new(users, notes.clone()),
            query: NoteQuery::new(notes.clone()),
            notes,
            rate_limiter: None,
        }
    }

    pub fn with_rate_limiter(mut self, limiter: Option<Arc<GlobalRateLimiter>>) -> Self {
        self.rate_limiter = limiter;
        self
    }
}

/// Build the global rate limiter, or None when disabled.
pub fn build_rate_limiter(config: &ServerConfig) -> Result<Option<Arc<GlobalRateLimiter>>> {
    if !config.rate_limit_enabled {
        return Ok(None);
    }
    let burst = NonZeroU32::new(config.rate_limit_requests)
        .ok_or_else(|| Error::Config("RATE_LIMIT_REQUESTS must be non-zero".to_string()))?;
    let quota = Quota::with_period(Duration::from_secs(config.rate_limit_period_secs))
        .ok_or_else(|| Error::Config("RATE_LIMIT_PERIOD_SECS must be non-zero".to_string()))?
        .allow_burst(burst);
    Ok(Some(Arc::new(RateLimiter::direct(quota))))
}

// =============================================================================
// OPENAPI
// =============================================================================

#[derive(OpenApi)]
#[openapi(
    info(
        title = "sharenote API",
        description = "Notes with per-user sharing, tag filtering, and text search"
    ),
    paths(
        health_check,
        users::register,
        users::login,
        notes::create_note,
        notes::list_personal,
        notes::list_projects,
        notes::get_note,
        notes::update_note,
        notes::delete_note,
        sharing::share_note,
        sharing::list_shared,
        search::notes_by_tags,
        search::search_notes,
    ),
    components(schemas(
        sharenote_core::User,
        sharenote_core::Note,
        sharenote_core::NoteKind,
        users::RegisterRequest,
        users::LoginRequest,
        notes::NoteBody,
        notes::UpdateNoteBody,
        sharing::ShareNoteRequest,
        search::SearchRequest,
        handlers::UserResponse,
        handlers::NoteResponse,
        handlers::NotesResponse,
        handlers::MessageResponse,
        error::ErrorResponse,
        HealthResponse,
    )),
    tags(
        (name = "Users", description = "Registration and login"),
        (name = "Notes", description = "Note CRUD operations"),
        (name = "Sharing", description = "Share notes by email"),
        (name = "Search", description = "Tag and text search"),
        (name = "System", description = "Health checks and API docs")
    )
)]
pub struct ApiDoc;

async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

// =============================================================================
// ROUTER
// =============================================================================

/// Build the application router with middleware.
pub fn create_router(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/openapi.json", get(openapi_json))
        // Users (trailing slash kept for existing clients)
        .route("/users", post(users::register))
        .route("/users/", post(users::register))
        .route("/users/login", post(users::login))
        // Notes
        .route("/notes/personal", post(notes::create_note))
        .route("/notes/personal/", post(notes::create_note))
        .route("/notes/personal/:user_id", get(notes::list_personal))
        .route("/notes/projects/:user_id", get(notes::list_projects))
        .route(
            "/note/:note_id",
            get(notes::get_note)
                .put(notes::update_note)
                .delete(notes::delete_note),
        )
        // Sharing
        .route("/share-note/:note_id", post(sharing::share_note))
        .route("/shared-notes/:user_id", get(sharing::list_shared))
        // Search
        .route("/notes/tags/:user_id", post(search::notes_by_tags))
        .route("/notes/search/:user_id", post(search::search_notes))
        // Middleware
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(config.cors_origins()))
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
                .allow_credentials(true)
                .max_age(Duration::from_secs(3600)),
        )
        .layer(RequestBodyLimitLayer::new(config.request_body_limit_bytes))
        .with_state(state)
}

// =============================================================================
// RATE LIMITING MIDDLEWARE
// =============================================================================

async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: axum::extract::Request,
    next: axum::middleware::Next,
) -> std::result::Result<impl IntoResponse, (StatusCode, Json<serde_json::Value>)> {
    if let Some(limiter) = &state.rate_limiter {
        if limiter.check().is_err() {
            tracing::warn!(subsystem = "api", "Rate limit exceeded");
            return Err((
                StatusCode::TOO_MANY_REQUESTS,
                Json(serde_json::json!({
                    "error": "Too many requests. Please wait before retrying."
                })),
            ));
        }
    }
    Ok(next.run(request).await)
}

// =============================================================================
// HEALTH CHECK
// =============================================================================

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    responses((status = 200, body = HealthResponse))
)]
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
