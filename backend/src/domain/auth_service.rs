use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::models::{Session, SessionContext, User};
use crate::storage::UserRepository;

/// Sessions expire one day after sign-in, matching the cookie lifetime.
const SESSION_TTL_DAYS: i64 = 1;

/// Authentication failures. Storage causes are logged, never propagated,
/// and wrong email is indistinguishable from wrong password.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Credenciais inválidas")]
    InvalidCredentials,
    #[error("Sessão expirada ou inválida")]
    InvalidSession,
    #[error("Já existe um utilizador com este email")]
    EmailTaken,
    #[error("Não foi possível iniciar sessão")]
    Internal,
}

/// A successful sign-in: the issued token plus its expiry and user.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthSession {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
    pub user: User,
}

/// Sign-in, session resolution and account bootstrap.
#[derive(Clone)]
pub struct AuthService {
    repo: UserRepository,
}

impl AuthService {
    pub fn new(repo: UserRepository) -> Self {
        Self { repo }
    }

    /// Verify the credentials and issue a 1-day access token.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let user = self
            .repo
            .find_user_by_email(email)
            .await
            .map_err(|e| {
                error!("Erro ao buscar utilizador: {:#}", e);
                AuthError::Internal
            })?
            .ok_or(AuthError::InvalidCredentials)?;

        if user.password_hash != hash_password(password) {
            warn!("Rejected sign-in for {}", email);
            return Err(AuthError::InvalidCredentials);
        }

        let now = Utc::now();
        let session = Session {
            token: Uuid::new_v4().to_string(),
            user_id: user.id.clone(),
            expires_at: now + Duration::days(SESSION_TTL_DAYS),
            created_at: now,
        };

        self.repo.store_session(&session).await.map_err(|e| {
            error!("Erro ao criar sessão: {:#}", e);
            AuthError::Internal
        })?;

        info!("Signed in {}", user.email);

        Ok(AuthSession {
            access_token: session.token,
            expires_at: session.expires_at,
            user,
        })
    }

    /// Resolve an access token to the session context threaded into the
    /// CRUD services. Expired sessions are rejected.
    pub async fn authenticate(&self, token: &str) -> Result<SessionContext, AuthError> {
        let found = self.repo.fetch_session(token).await.map_err(|e| {
            error!("Erro ao buscar sessão: {:#}", e);
            AuthError::Internal
        })?;

        let (session, user) = found.ok_or(AuthError::InvalidSession)?;

        if session.is_expired(Utc::now()) {
            return Err(AuthError::InvalidSession);
        }

        Ok(SessionContext {
            user_id: user.id,
            email: user.email,
            access_token: session.token,
        })
    }

    /// Discard a session, reporting whether one existed.
    pub async fn sign_out(&self, token: &str) -> Result<bool, AuthError> {
        self.repo.delete_session(token).await.map_err(|e| {
            error!("Erro ao terminar sessão: {:#}", e);
            AuthError::Internal
        })
    }

    /// Register a new platform account.
    pub async fn create_user(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let existing = self.repo.find_user_by_email(email).await.map_err(|e| {
            error!("Erro ao buscar utilizador: {:#}", e);
            AuthError::Internal
        })?;
        if existing.is_some() {
            return Err(AuthError::EmailTaken);
        }

        self.repo
            .store_user(email, &hash_password(password))
            .await
            .map_err(|e| {
                error!("Erro ao criar utilizador: {:#}", e);
                AuthError::Internal
            })
    }

    /// Create the default administrator when no account exists yet, so a
    /// fresh deployment can be signed in to.
    pub async fn bootstrap_admin(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let count = self.repo.count_users().await.map_err(|e| {
            error!("Erro ao contar utilizadores: {:#}", e);
            AuthError::Internal
        })?;

        if count == 0 {
            warn!("No users found, creating default administrator {}", email);
            self.create_user(email, password).await?;
        }

        Ok(())
    }
}

/// SHA-256 hex digest of the password.
fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}
