use std::sync::Arc;

use chrono::{Duration, Utc};
use thiserror::Error;
use tracing::debug;

use shared_config::AppConfig;
use shared_models::auth::{JwtClaims, Role};
use shared_models::error::AppError;
use shared_store::ClinicStore;
use shared_utils::jwt::{decode_token, sign_token};

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Malformed or invalid token")]
    Malformed,

    #[error("Token subject no longer exists for role {0}")]
    IdentityNotFound(Role),

    #[error("Token signing failed: {0}")]
    Signing(String),

    #[error("Directory lookup failed: {0}")]
    Directory(String),
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Malformed => AppError::Auth("Invalid or expired token".to_string()),
            TokenError::IdentityNotFound(_) => {
                AppError::Auth("Invalid or expired token".to_string())
            }
            TokenError::Signing(msg) => AppError::Internal(msg),
            TokenError::Directory(msg) => AppError::Database(msg),
        }
    }
}

/// Issues and verifies the signed, time-limited identity tokens that gate
/// every mutating operation. Stateless: validity is re-derived on each call
/// from the signature, the expiry and a live existence check of the subject,
/// so deleting an account invalidates its outstanding tokens with no
/// revocation list.
pub struct TokenService {
    secret: String,
    ttl: Duration,
    store: Arc<dyn ClinicStore>,
}

impl TokenService {
    pub fn new(config: &AppConfig, store: Arc<dyn ClinicStore>) -> Self {
        Self {
            secret: config.jwt_secret.clone(),
            ttl: Duration::days(config.token_ttl_days),
            store,
        }
    }

    /// Produce a token whose subject claim is the string form of
    /// `subject_id`, expiring after the configured TTL. No storage side
    /// effects.
    pub fn issue(&self, subject_id: i64) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = JwtClaims {
            sub: subject_id.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        sign_token(&claims, &self.secret).map_err(TokenError::Signing)
    }

    /// Fails closed: malformed token, bad signature, expiry, a non-numeric
    /// subject, or a subject missing from the role's directory all yield
    /// false, never an error.
    pub async fn verify(&self, token: &str, role: Role) -> bool {
        let claims = match decode_token(token, &self.secret) {
            Ok(c) => c,
            Err(reason) => {
                debug!("Token rejected: {}", reason);
                return false;
            }
        };

        let subject_id: i64 = match claims.sub.parse() {
            Ok(id) => id,
            Err(_) => {
                debug!("Token rejected: non-numeric subject {:?}", claims.sub);
                return false;
            }
        };

        self.role_exists(role, subject_id).await.unwrap_or(false)
    }

    /// Recover the acting identity for ownership checks. Callers must use
    /// this instead of any client-supplied id.
    pub async fn subject_id_for(&self, token: &str, role: Role) -> Result<i64, TokenError> {
        let claims = decode_token(token, &self.secret).map_err(|_| TokenError::Malformed)?;
        let subject_id: i64 = claims.sub.parse().map_err(|_| TokenError::Malformed)?;

        if self
            .role_exists(role, subject_id)
            .await
            .map_err(TokenError::Directory)?
        {
            Ok(subject_id)
        } else {
            Err(TokenError::IdentityNotFound(role))
        }
    }

    async fn role_exists(&self, role: Role, id: i64) -> Result<bool, String> {
        let result = match role {
            Role::Admin => self.store.admin_exists(id).await,
            Role::Doctor => self.store.doctor_exists(id).await,
            Role::Patient => self.store.patient_exists(id).await,
        };
        result.map_err(|e| e.to_string())
    }
}
