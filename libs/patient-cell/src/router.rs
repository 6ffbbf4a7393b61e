use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{self, PatientState};

pub fn patient_routes(state: Arc<PatientState>) -> Router {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::patient_login))
        .route("/details", get(handlers::get_details))
        .route("/{patient_id}/appointments", get(handlers::get_appointments))
        .with_state(state)
}
