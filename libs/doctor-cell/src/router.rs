use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::handlers::{self, DoctorState};

pub fn doctor_routes(state: Arc<DoctorState>) -> Router {
    Router::new()
        .route(
            "/",
            get(handlers::list_doctors)
                .post(handlers::create_doctor)
                .put(handlers::update_doctor),
        )
        .route("/{id}", delete(handlers::delete_doctor))
        .route("/login", post(handlers::doctor_login))
        .route("/filter", get(handlers::filter_doctors))
        .route(
            "/availability/{role}/{doctor_id}/{date}",
            get(handlers::get_availability),
        )
        .with_state(state)
}
