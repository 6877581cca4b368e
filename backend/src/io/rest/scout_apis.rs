//! # REST API for Scout Management
//!
//! Endpoints for listing, creating, updating and deleting scouts. Reads
//! embed the owning person; writes only reference it.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use tracing::{error, info};

use shared::{DeleteResponse, ScoutDto};

use crate::domain::CrudService;
use crate::io::rest::auth_apis::require_session;
use crate::io::rest::mappers::ScoutMapper;
use crate::AppState;

/// List all scouts, most recently registered first
pub async fn list_scouts(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    info!("GET /api/scouts");

    let ctx = match require_session(&state, &headers).await {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };

    match state.scout_service.find_all(&ctx).await {
        Ok(scouts) => (StatusCode::OK, Json(ScoutMapper::to_list_dto(scouts))).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

/// Create a new scout for an already-persisted person
pub async fn create_scout(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(dto): Json<ScoutDto>,
) -> impl IntoResponse {
    info!("POST /api/scouts - person: {}", dto.person.id);

    let ctx = match require_session(&state, &headers).await {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };

    let scout = match ScoutMapper::to_domain(dto) {
        Ok(scout) => scout,
        Err(e) => {
            error!("Invalid scout payload: {:#}", e);
            return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
        }
    };

    match state.scout_service.create(&ctx, scout).await {
        Ok(created) => (
            StatusCode::CREATED,
            Json(ScoutMapper::to_scout_response(
                &created,
                "Escuteiro cadastrado com sucesso",
            )),
        )
            .into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

/// Update the scout identified by the path. The person reference is
/// immutable; only scout-owned fields change.
pub async fn update_scout(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(scout_id): Path<String>,
    Json(dto): Json<ScoutDto>,
) -> impl IntoResponse {
    info!("PUT /api/scouts/{}", scout_id);

    let ctx = match require_session(&state, &headers).await {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };

    let scout = match ScoutMapper::to_domain(dto) {
        Ok(scout) => scout,
        Err(e) => {
            error!("Invalid scout payload: {:#}", e);
            return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
        }
    };

    match state.scout_service.update(&ctx, scout, &scout_id).await {
        Ok(updated) => (
            StatusCode::OK,
            Json(ScoutMapper::to_scout_response(
                &updated,
                "Escuteiro atualizado com sucesso",
            )),
        )
            .into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

/// Delete a scout, leaving its person untouched
pub async fn delete_scout(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(scout_id): Path<String>,
    Json(dto): Json<ScoutDto>,
) -> impl IntoResponse {
    info!("DELETE /api/scouts/{}", scout_id);

    let ctx = match require_session(&state, &headers).await {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };

    let mut scout = match ScoutMapper::to_domain(dto) {
        Ok(scout) => scout,
        Err(e) => {
            error!("Invalid scout payload: {:#}", e);
            return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
        }
    };
    scout.id = scout_id;

    match state.scout_service.delete(&ctx, &scout).await {
        Ok(deleted) => (StatusCode::OK, Json(DeleteResponse { deleted })).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}
