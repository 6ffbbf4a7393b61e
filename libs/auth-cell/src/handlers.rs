use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use shared_models::auth::{AdminLoginRequest, Role, TokenResponse};
use shared_models::error::AppError;
use shared_store::ClinicStore;
use shared_utils::extractor::extract_bearer_token;

use crate::services::password::CredentialVerifier;
use crate::services::token::TokenService;

pub struct AuthState {
    pub tokens: Arc<TokenService>,
    pub store: Arc<dyn ClinicStore>,
    pub verifier: Arc<dyn CredentialVerifier>,
}

pub async fn admin_login(
    State(state): State<Arc<AuthState>>,
    Json(request): Json<AdminLoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    debug!("Admin login attempt for {}", request.username);

    if request.username.is_empty() || request.password.is_empty() {
        return Err(AppError::BadRequest("Invalid credentials".to_string()));
    }

    let admin = state
        .store
        .admin_by_username(&request.username)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?
        .ok_or_else(|| AppError::Auth("Admin not found".to_string()))?;

    if !state.verifier.verify(&request.password, &admin.password) {
        return Err(AppError::Auth("Incorrect password".to_string()));
    }

    let token = state.tokens.issue(admin.id)?;
    Ok(Json(TokenResponse { token }))
}

#[derive(Debug, Deserialize)]
pub struct ValidateQuery {
    pub role: String,
}

/// Role-scoped token check for the dashboards. Unknown role strings fail the
/// same way an invalid token does.
pub async fn validate_token(
    State(state): State<Arc<AuthState>>,
    Query(query): Query<ValidateQuery>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    let token = extract_bearer_token(&headers)?;

    let Ok(role) = query.role.parse::<Role>() else {
        return Err(AppError::Auth("Invalid or expired token".to_string()));
    };

    if state.tokens.verify(&token, role).await {
        Ok(Json(json!({ "valid": true })))
    } else {
        Err(AppError::Auth("Invalid or expired token".to_string()))
    }
}
