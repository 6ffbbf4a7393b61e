use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    Json,
};
use serde_json::{json, Value};

use shared_models::auth::{LoginRequest, TokenResponse};
use shared_models::entities::NewPatient;
use shared_models::error::AppError;
use shared_utils::extractor::extract_bearer_token;

use crate::models::{AppointmentFilter, AppointmentFilterQuery};
use crate::services::patient::PatientService;

pub struct PatientState {
    pub patients: Arc<PatientService>,
}

pub async fn register(
    State(state): State<Arc<PatientState>>,
    Json(request): Json<NewPatient>,
) -> Result<Json<Value>, AppError> {
    let patient = state.patients.register(request).await?;
    Ok(Json(json!({ "patient": patient })))
}

pub async fn patient_login(
    State(state): State<Arc<PatientState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let token = state
        .patients
        .login(&request.email, &request.password)
        .await?;
    Ok(Json(TokenResponse { token }))
}

pub async fn get_details(
    State(state): State<Arc<PatientState>>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    let token = extract_bearer_token(&headers)?;
    let patient = state.patients.details(&token).await?;
    Ok(Json(json!({ "patient": patient })))
}

pub async fn get_appointments(
    State(state): State<Arc<PatientState>>,
    Path(patient_id): Path<i64>,
    Query(query): Query<AppointmentFilterQuery>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    let token = extract_bearer_token(&headers)?;
    let filter = AppointmentFilter::from_query(&query)?;
    let appointments = state
        .patients
        .appointments(&token, patient_id, filter)
        .await?;
    Ok(Json(json!({ "appointments": appointments })))
}
