use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    Json,
};
use chrono::NaiveDate;
use serde_json::{json, Value};
use tracing::debug;

use auth_cell::services::token::TokenService;
use shared_models::auth::{LoginRequest, Role, TokenResponse};
use shared_models::entities::NewDoctor;
use shared_models::error::AppError;
use shared_utils::extractor::extract_bearer_token;

use crate::models::{DoctorFilterQuery, TimePeriod, UpdateDoctorRequest};
use crate::services::availability::AvailabilityService;
use crate::services::doctor::DoctorService;

pub struct DoctorState {
    pub doctors: Arc<DoctorService>,
    pub availability: Arc<AvailabilityService>,
    pub tokens: Arc<TokenService>,
}

async fn require_role(
    state: &DoctorState,
    headers: &HeaderMap,
    role: Role,
) -> Result<(), AppError> {
    let token = extract_bearer_token(headers)?;
    if state.tokens.verify(&token, role).await {
        Ok(())
    } else {
        Err(AppError::Auth("Invalid or expired token".to_string()))
    }
}

/// Free slots for a doctor on a date. Any authenticated principal may look,
/// so the caller names the role its token was issued for.
pub async fn get_availability(
    State(state): State<Arc<DoctorState>>,
    Path((role, doctor_id, date)): Path<(String, i64, String)>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    let role: Role = role
        .parse()
        .map_err(|_| AppError::Auth("Invalid or expired token".to_string()))?;
    require_role(&state, &headers, role).await?;

    let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest("Invalid date, expected YYYY-MM-DD".to_string()))?;

    let slots = state.availability.availability(doctor_id, date).await?;
    let rendered: Vec<String> = slots.iter().map(|t| t.format("%H:%M").to_string()).collect();

    Ok(Json(json!({ "availability": rendered })))
}

pub async fn list_doctors(
    State(state): State<Arc<DoctorState>>,
) -> Result<Json<Value>, AppError> {
    let doctors = state.doctors.all_doctors().await?;
    Ok(Json(json!({ "doctors": doctors })))
}

pub async fn filter_doctors(
    State(state): State<Arc<DoctorState>>,
    Query(query): Query<DoctorFilterQuery>,
) -> Result<Json<Value>, AppError> {
    debug!("Filtering doctors: {:?}", query);

    let period = match query.period.as_deref() {
        Some(raw) => Some(
            raw.parse::<TimePeriod>()
                .map_err(|_| AppError::BadRequest("Time period must be AM or PM".to_string()))?,
        ),
        None => None,
    };

    let doctors = state
        .doctors
        .filter_doctors(query.name.as_deref(), query.specialty.as_deref(), period)
        .await;
    Ok(Json(json!({ "doctors": doctors })))
}

pub async fn create_doctor(
    State(state): State<Arc<DoctorState>>,
    headers: HeaderMap,
    Json(request): Json<NewDoctor>,
) -> Result<Json<Value>, AppError> {
    require_role(&state, &headers, Role::Admin).await?;
    let doctor = state.doctors.create_doctor(request).await?;
    Ok(Json(json!({ "doctor": doctor })))
}

pub async fn update_doctor(
    State(state): State<Arc<DoctorState>>,
    headers: HeaderMap,
    Json(request): Json<UpdateDoctorRequest>,
) -> Result<Json<Value>, AppError> {
    require_role(&state, &headers, Role::Admin).await?;
    let doctor = state.doctors.update_doctor(request).await?;
    Ok(Json(json!({ "doctor": doctor })))
}

pub async fn delete_doctor(
    State(state): State<Arc<DoctorState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    require_role(&state, &headers, Role::Admin).await?;
    let removed_appointments = state.doctors.delete_doctor(id).await?;
    Ok(Json(json!({
        "message": "Doctor deleted",
        "removed_appointments": removed_appointments
    })))
}

pub async fn doctor_login(
    State(state): State<Arc<DoctorState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let token = state
        .doctors
        .login(&request.email, &request.password)
        .await?;
    Ok(Json(TokenResponse { token }))
}
