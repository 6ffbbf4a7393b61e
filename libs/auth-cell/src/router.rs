use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{self, AuthState};

pub fn auth_routes(state: Arc<AuthState>) -> Router {
    Router::new()
        .route("/admin/login", post(handlers::admin_login))
        .route("/validate", get(handlers::validate_token))
        .with_state(state)
}
