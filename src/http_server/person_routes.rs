//! Person HTTP Routes
//!
//! CRUD endpoints under `/api`. Handlers decode the request, run the service
//! call on the blocking pool (it takes a lock and does file I/O) and map
//! [`StoreError`] onto status codes.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::person::{Person, PersonId};
use crate::store::{codec, PersonService, StoreError, StoreResult};

// ==================
// Shared State
// ==================

/// Person state shared across handlers
#[derive(Clone)]
pub struct PersonState {
    pub service: Arc<PersonService>,
}

impl PersonState {
    pub fn new(service: Arc<PersonService>) -> Self {
        Self { service }
    }
}

// ==================
// Request/Response Types
// ==================

/// Body of create and update requests
///
/// Any other fields, including a client-supplied `id`, are ignored. A missing
/// name decodes as empty and is then rejected by validation.
#[derive(Debug, Deserialize)]
pub struct NameRequest {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

// ==================
// Person Routes
// ==================

/// Create person routes
pub fn person_routes(state: PersonState) -> Router {
    Router::new()
        .route("/api", get(list_persons_handler).post(create_person_handler))
        .route(
            "/api/:id",
            get(get_person_handler)
                .put(update_person_handler)
                .patch(update_person_handler)
                .delete(delete_person_handler),
        )
        .route(
            "/api/",
            get(empty_id_handler)
                .put(empty_id_handler)
                .patch(empty_id_handler)
                .delete(empty_id_handler),
        )
        .with_state(state)
}

// ==================
// Helper Functions
// ==================

fn error_response(err: StoreError) -> ApiError {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
            code: status.as_u16(),
        }),
    )
}

fn parse_path_id(raw: &str) -> Result<PersonId, ApiError> {
    codec::parse_id(raw).ok_or_else(|| error_response(StoreError::InvalidId(raw.to_string())))
}

fn parse_name(body: &[u8]) -> Result<String, ApiError> {
    serde_json::from_slice::<NameRequest>(body)
        .map(|request| request.name)
        .map_err(|e| error_response(StoreError::InvalidJson(e.to_string())))
}

async fn run_blocking<T, F>(state: &PersonState, call: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&PersonService) -> StoreResult<T> + Send + 'static,
{
    let service = Arc::clone(&state.service);
    tokio::task::spawn_blocking(move || call(&service))
        .await
        .map_err(|e| error_response(StoreError::Internal(e.to_string())))?
        .map_err(error_response)
}

// ==================
// Handlers
// ==================

/// `/api/` names a person with an empty id
async fn empty_id_handler() -> ApiError {
    error_response(StoreError::InvalidId(String::new()))
}

async fn list_persons_handler(
    State(state): State<PersonState>,
) -> Result<Json<Vec<Person>>, ApiError> {
    run_blocking(&state, |service| service.list()).await.map(Json)
}

async fn get_person_handler(
    State(state): State<PersonState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Person>, ApiError> {
    let id = parse_path_id(&raw_id)?;
    run_blocking(&state, move |service| service.get(id))
        .await
        .map(Json)
}

async fn create_person_handler(
    State(state): State<PersonState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Person>), ApiError> {
    let name = parse_name(&body)?;
    let person = run_blocking(&state, move |service| service.create(&name)).await?;
    Ok((StatusCode::CREATED, Json(person)))
}

async fn update_person_handler(
    State(state): State<PersonState>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_path_id(&raw_id)?;
    let name = parse_name(&body)?;
    run_blocking(&state, move |service| service.update(id, &name)).await?;
    Ok(Json(MessageResponse {
        message: "Person updated successfully".to_string(),
    }))
}

async fn delete_person_handler(
    State(state): State<PersonState>,
    Path(raw_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_path_id(&raw_id)?;
    run_blocking(&state, move |service| service.delete(id)).await?;
    Ok(Json(MessageResponse {
        message: "Person deleted successfully".to_string(),
    }))
}
