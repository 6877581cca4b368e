//! # REST API for Member Tables and Age-Group Panels
//!
//! Serves the persons table (formatted rows plus column specs) and the
//! four age-group panels. Sorting and row selection stay on the client;
//! these endpoints only guarantee stable accessor keys and
//! display-ready cell values.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use tracing::info;

use shared::{MemberTableResponse, PanelResponse, Section};

use crate::domain::CrudService;
use crate::io::rest::auth_apis::require_session;
use crate::io::rest::mappers::{PersonMapper, ScoutMapper};
use crate::AppState;

/// Formatted persons table: column specs plus one row per person
pub async fn get_member_table(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    info!("GET /api/persons/table");

    let ctx = match require_session(&state, &headers).await {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };

    match state.person_service.find_all(&ctx).await {
        Ok(persons) => {
            let table = &state.member_table_service;
            let response = MemberTableResponse {
                columns: table.columns(),
                rows: persons
                    .iter()
                    .map(|p| PersonMapper::to_member_row(p, table))
                    .collect(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

/// One age-group panel: the scouts whose age falls in the section's range
pub async fn get_panel(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(section): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/panels/{}", section);

    let ctx = match require_session(&state, &headers).await {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };

    let Some(section) = Section::from_slug(&section) else {
        return (StatusCode::NOT_FOUND, "Secção desconhecida").into_response();
    };

    match state.scout_service.find_all(&ctx).await {
        Ok(scouts) => {
            let table = &state.member_table_service;
            let response = PanelResponse {
                section,
                title: section.label().to_string(),
                rows: table
                    .panel_scouts(section, &scouts)
                    .into_iter()
                    .map(|s| ScoutMapper::to_panel_row(s, table))
                    .collect(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}
