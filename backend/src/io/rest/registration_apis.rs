//! # REST API for the Intake Workflow
//!
//! Server-held registration dialogs: open, read, typed field
//! assignments, step transitions, cancel and submit. Every response
//! carries the dialog snapshot plus the rendering contract for the
//! current step, so the client never holds workflow state of its own.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use tracing::info;

use shared::{RegistrationFieldsRequest, RegistrationForm, RegistrationFormResponse, RegistrationSubmitResponse};

use crate::domain::{RegistrationError, RegistrationService};
use crate::io::rest::auth_apis::require_session;
use crate::io::rest::mappers::ScoutMapper;
use crate::AppState;

/// Open a fresh intake dialog
pub async fn open_registration(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    info!("POST /api/registrations");

    if let Err(response) = require_session(&state, &headers).await {
        return response;
    }

    let (id, form) = state.registration_service.open();
    (StatusCode::CREATED, Json(form_response(&id, form))).into_response()
}

/// Current state of an open dialog
pub async fn get_registration(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(registration_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/registrations/{}", registration_id);

    if let Err(response) = require_session(&state, &headers).await {
        return response;
    }

    match state.registration_service.form(&registration_id) {
        Ok(form) => (StatusCode::OK, Json(form_response(&registration_id, form))).into_response(),
        Err(e) => registration_error(e),
    }
}

/// Apply a batch of typed field assignments to the dialog
pub async fn set_registration_fields(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(registration_id): Path<String>,
    Json(request): Json<RegistrationFieldsRequest>,
) -> impl IntoResponse {
    info!(
        "PUT /api/registrations/{}/fields - {} assignment(s)",
        registration_id,
        request.fields.len()
    );

    if let Err(response) = require_session(&state, &headers).await {
        return response;
    }

    match state
        .registration_service
        .set_fields(&registration_id, &request.fields)
    {
        Ok(form) => (StatusCode::OK, Json(form_response(&registration_id, form))).into_response(),
        Err(e) => registration_error(e),
    }
}

/// Advance from the person step to the scout step. A silent no-op
/// while the person-step guard is unsatisfied.
pub async fn next_step(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(registration_id): Path<String>,
) -> impl IntoResponse {
    info!("POST /api/registrations/{}/next", registration_id);

    if let Err(response) = require_session(&state, &headers).await {
        return response;
    }

    match state.registration_service.next(&registration_id) {
        Ok(form) => (StatusCode::OK, Json(form_response(&registration_id, form))).into_response(),
        Err(e) => registration_error(e),
    }
}

/// Return to the person step, keeping everything entered so far
pub async fn previous_step(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(registration_id): Path<String>,
) -> impl IntoResponse {
    info!("POST /api/registrations/{}/back", registration_id);

    if let Err(response) = require_session(&state, &headers).await {
        return response;
    }

    match state.registration_service.back(&registration_id) {
        Ok(form) => (StatusCode::OK, Json(form_response(&registration_id, form))).into_response(),
        Err(e) => registration_error(e),
    }
}

/// Discard the dialog and everything entered in it
pub async fn cancel_registration(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(registration_id): Path<String>,
) -> impl IntoResponse {
    info!("POST /api/registrations/{}/cancel", registration_id);

    if let Err(response) = require_session(&state, &headers).await {
        return response;
    }

    match state.registration_service.cancel(&registration_id) {
        Ok(form) => (StatusCode::OK, Json(form_response(&registration_id, form))).into_response(),
        Err(e) => registration_error(e),
    }
}

/// Submit the dialog: create the person, then the scout referencing it
pub async fn submit_registration(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(registration_id): Path<String>,
) -> impl IntoResponse {
    info!("POST /api/registrations/{}/submit", registration_id);

    let ctx = match require_session(&state, &headers).await {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };

    match state.registration_service.submit(&ctx, &registration_id).await {
        Ok(outcome) => {
            let response = RegistrationSubmitResponse {
                completed: outcome.completed,
                notification: outcome.notification,
                scout: outcome.scout.as_ref().map(ScoutMapper::to_dto),
                form: outcome.form,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => registration_error(e),
    }
}

fn form_response(id: &str, form: RegistrationForm) -> RegistrationFormResponse {
    RegistrationFormResponse {
        registration_id: id.to_string(),
        step_title: RegistrationService::step_title(form.step).to_string(),
        step_description: RegistrationService::step_description(form.step).to_string(),
        fields: RegistrationService::step_fields(form.step),
        can_advance: RegistrationService::can_advance(&form),
        can_submit: RegistrationService::can_submit(&form),
        form,
    }
}

fn registration_error(e: RegistrationError) -> Response {
    let status = match e {
        RegistrationError::UnknownRegistration(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::BAD_REQUEST,
    };
    (status, e.to_string()).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{FieldKind, RegistrationStep};

    #[test]
    fn test_form_response_tracks_step() {
        let response = form_response("reg-1", RegistrationForm::default());

        assert_eq!(response.registration_id, "reg-1");
        assert_eq!(response.step_title, "Dados Pessoais");
        assert!(response.fields.iter().any(|f| f.id == "birthDate"));
        assert!(!response.can_advance);

        let mut form = RegistrationForm::default();
        form.step = RegistrationStep::Scout;
        form.scout.group_number = "104".to_string();
        form.scout.unit_name = "Unidade São Jorge".to_string();

        let response = form_response("reg-1", form);
        assert_eq!(response.step_title, "Dados do Escuteiro");
        assert!(response.can_submit);
    }

    #[test]
    fn test_registration_error_statuses() {
        let missing = registration_error(RegistrationError::UnknownRegistration("x".to_string()));
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let mismatch = registration_error(RegistrationError::WrongFieldKind {
            field: "hasContagiousDisease".to_string(),
            expected: FieldKind::Checkbox,
        });
        assert_eq!(mismatch.status(), StatusCode::BAD_REQUEST);
    }
}
