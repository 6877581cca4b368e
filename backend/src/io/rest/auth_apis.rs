//! # REST API for Authentication
//!
//! Sign-in issues a 1-day access token delivered both in the response
//! body and as the `auth_token` cookie carried on subsequent requests.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use tracing::{error, info};

use shared::{LoginRequest, LoginResponse, SessionUser};

use crate::domain::models::SessionContext;
use crate::domain::AuthError;
use crate::AppState;

const AUTH_COOKIE: &str = "auth_token";
const COOKIE_MAX_AGE_SECONDS: i64 = 24 * 60 * 60;

/// Sign in with email and password
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> impl IntoResponse {
    info!("POST /api/auth/login - email: {}", request.email);

    match state
        .auth_service
        .sign_in(&request.email, &request.password)
        .await
    {
        Ok(session) => {
            let cookie = session_cookie(&session.access_token, state.secure_cookies);
            let response = LoginResponse {
                access_token: session.access_token,
                expires_at: session.expires_at,
                user: SessionUser {
                    id: session.user.id,
                    email: session.user.email,
                },
            };
            (StatusCode::OK, [(header::SET_COOKIE, cookie)], Json(response)).into_response()
        }
        Err(AuthError::InvalidCredentials) => {
            (StatusCode::UNAUTHORIZED, AuthError::InvalidCredentials.to_string()).into_response()
        }
        Err(e) => {
            error!("Failed to sign in: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// Sign out and clear the session cookie
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    info!("POST /api/auth/logout");

    let Some(token) = bearer_token(&headers) else {
        return (StatusCode::UNAUTHORIZED, AuthError::InvalidSession.to_string()).into_response();
    };

    match state.auth_service.sign_out(&token).await {
        Ok(_) => {
            let cookie = expired_cookie(state.secure_cookies);
            (StatusCode::NO_CONTENT, [(header::SET_COOKIE, cookie)]).into_response()
        }
        Err(e) => {
            error!("Failed to sign out: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// Resolve the request's credential to a session context. Every
/// protected handler threads the result into its service calls.
pub(crate) async fn require_session(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<SessionContext, Response> {
    let Some(token) = bearer_token(headers) else {
        return Err(
            (StatusCode::UNAUTHORIZED, AuthError::InvalidSession.to_string()).into_response(),
        );
    };

    state.auth_service.authenticate(&token).await.map_err(|e| {
        let status = match e {
            AuthError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        };
        (status, e.to_string()).into_response()
    })
}

/// The access token from the `Authorization: Bearer` header or the
/// `auth_token` cookie, whichever is present.
fn bearer_token(headers: &HeaderMap) -> Option<String> {
    if let Some(value) = headers.get(header::AUTHORIZATION) {
        if let Ok(value) = value.to_str() {
            if let Some(token) = value.strip_prefix("Bearer ") {
                return Some(token.trim().to_string());
            }
        }
    }

    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == AUTH_COOKIE).then(|| value.to_string())
    })
}

fn session_cookie(token: &str, secure: bool) -> String {
    let mut cookie = format!(
        "{AUTH_COOKIE}={token}; Path=/; Max-Age={COOKIE_MAX_AGE_SECONDS}; SameSite=Lax; HttpOnly"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

fn expired_cookie(secure: bool) -> String {
    let mut cookie = format!("{AUTH_COOKIE}=; Path=/; Max-Age=0; SameSite=Lax; HttpOnly");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_from_authorization_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc-123"),
        );

        assert_eq!(bearer_token(&headers), Some("abc-123".to_string()));
    }

    #[test]
    fn test_bearer_token_from_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; auth_token=tok-9; lang=pt"),
        );

        assert_eq!(bearer_token(&headers), Some("tok-9".to_string()));
    }

    #[test]
    fn test_bearer_token_missing() {
        let headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn test_session_cookie_secure_flag() {
        let dev = session_cookie("tok", false);
        assert!(dev.starts_with("auth_token=tok; Path=/; Max-Age=86400"));
        assert!(!dev.contains("Secure"));

        let prod = session_cookie("tok", true);
        assert!(prod.ends_with("; Secure"));
    }
}
