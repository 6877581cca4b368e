//! # REST API for Person Management
//!
//! Endpoints for listing, creating, updating and deleting persons.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use tracing::{error, info};

use shared::{DeleteResponse, PersonDto};

use crate::domain::CrudService;
use crate::io::rest::auth_apis::require_session;
use crate::io::rest::mappers::PersonMapper;
use crate::AppState;

/// List all persons, ordered by name
pub async fn list_persons(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    info!("GET /api/persons");

    let ctx = match require_session(&state, &headers).await {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };

    match state.person_service.find_all(&ctx).await {
        Ok(persons) => (StatusCode::OK, Json(PersonMapper::to_list_dto(persons))).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

/// Create a new person
pub async fn create_person(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(dto): Json<PersonDto>,
) -> impl IntoResponse {
    info!("POST /api/persons - name: {}", dto.name);

    let ctx = match require_session(&state, &headers).await {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };

    let person = match PersonMapper::to_domain(dto) {
        Ok(person) => person,
        Err(e) => {
            error!("Invalid person payload: {:#}", e);
            return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
        }
    };

    match state.person_service.create(&ctx, person).await {
        Ok(created) => (
            StatusCode::CREATED,
            Json(PersonMapper::to_person_response(
                &created,
                "Pessoa cadastrada com sucesso",
            )),
        )
            .into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

/// Update the person identified by the path
pub async fn update_person(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(person_id): Path<String>,
    Json(dto): Json<PersonDto>,
) -> impl IntoResponse {
    info!("PUT /api/persons/{}", person_id);

    let ctx = match require_session(&state, &headers).await {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };

    let person = match PersonMapper::to_domain(dto) {
        Ok(person) => person,
        Err(e) => {
            error!("Invalid person payload: {:#}", e);
            return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
        }
    };

    match state.person_service.update(&ctx, person, &person_id).await {
        Ok(updated) => (
            StatusCode::OK,
            Json(PersonMapper::to_person_response(
                &updated,
                "Pessoa atualizada com sucesso",
            )),
        )
            .into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

/// Delete a person. The entity travels in the body, mirroring the row
/// action that passes the full record.
pub async fn delete_person(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(person_id): Path<String>,
    Json(dto): Json<PersonDto>,
) -> impl IntoResponse {
    info!("DELETE /api/persons/{}", person_id);

    let ctx = match require_session(&state, &headers).await {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };

    let mut person = match PersonMapper::to_domain(dto) {
        Ok(person) => person,
        Err(e) => {
            error!("Invalid person payload: {:#}", e);
            return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
        }
    };
    person.id = person_id;

    match state.person_service.delete(&ctx, &person).await {
        Ok(deleted) => (StatusCode::OK, Json(DeleteResponse { deleted })).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}
