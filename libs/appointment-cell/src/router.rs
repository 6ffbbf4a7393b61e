use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::handlers::{self, AppointmentState};

pub fn appointment_routes(state: Arc<AppointmentState>) -> Router {
    Router::new()
        .route(
            "/",
            post(handlers::book_appointment).put(handlers::update_appointment),
        )
        .route("/{id}", delete(handlers::cancel_appointment))
        .route("/doctor", get(handlers::get_doctor_appointments))
        .route("/{id}/status", put(handlers::change_status))
        .route("/{id}/prescription", put(handlers::mark_prescription))
        .with_state(state)
}
