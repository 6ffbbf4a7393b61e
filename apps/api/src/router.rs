use std::sync::Arc;

use axum::{routing::get, Router};

use appointment_cell::handlers::AppointmentState;
use appointment_cell::router::appointment_routes;
use appointment_cell::services::booking::AppointmentBookingService;
use auth_cell::handlers::AuthState;
use auth_cell::router::auth_routes;
use auth_cell::services::password::Argon2Verifier;
use auth_cell::services::token::TokenService;
use doctor_cell::handlers::DoctorState;
use doctor_cell::router::doctor_routes;
use doctor_cell::services::availability::AvailabilityService;
use doctor_cell::services::doctor::DoctorService;
use patient_cell::handlers::PatientState;
use patient_cell::router::patient_routes;
use patient_cell::services::patient::PatientService;
use shared_config::AppConfig;
use shared_store::{ClinicStore, MemoryStore};
use shared_utils::locks::KeyedLocks;

/// Wires one store, one token authority and one per-doctor lock registry
/// behind every cell, then merges the cell routers.
pub fn create_router(config: &AppConfig) -> Router {
    let store: Arc<dyn ClinicStore> = Arc::new(MemoryStore::new());
    let tokens = Arc::new(TokenService::new(config, store.clone()));
    let verifier = Arc::new(Argon2Verifier);
    let locks = Arc::new(KeyedLocks::new());

    let auth_state = Arc::new(AuthState {
        tokens: tokens.clone(),
        store: store.clone(),
        verifier: verifier.clone(),
    });
    let doctor_state = Arc::new(DoctorState {
        doctors: Arc::new(DoctorService::new(
            store.clone(),
            tokens.clone(),
            verifier.clone(),
        )),
        availability: Arc::new(AvailabilityService::new(store.clone())),
        tokens: tokens.clone(),
    });
    let patient_state = Arc::new(PatientState {
        patients: Arc::new(PatientService::new(
            store.clone(),
            tokens.clone(),
            verifier.clone(),
        )),
    });
    let appointment_state = Arc::new(AppointmentState {
        bookings: Arc::new(AppointmentBookingService::new(
            store.clone(),
            tokens.clone(),
            locks,
        )),
        tokens,
    });

    Router::new()
        .route("/", get(|| async { "Clinic booking API is running!" }))
        .nest("/auth", auth_routes(auth_state))
        .nest("/doctors", doctor_routes(doctor_state))
        .nest("/patients", patient_routes(patient_state))
        .nest("/appointments", appointment_routes(appointment_state))
}
