use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Platform account able to sign in to the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// A stored sign-in session. The token doubles as the cookie value
/// carried on subsequent requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user_id: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// The authenticated context threaded into every CRUD call, in place of
/// ambient global auth state.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionContext {
    pub user_id: String,
    pub email: String,
    pub access_token: String,
}

impl SessionContext {
    /// Context for unit tests that exercise services directly.
    #[cfg(test)]
    pub fn test() -> Self {
        Self {
            user_id: "user-test".to_string(),
            email: "chefe@escutivel.ao".to_string(),
            access_token: "token-test".to_string(),
        }
    }
}
