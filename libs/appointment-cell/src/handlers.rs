use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    Json,
};
use chrono::NaiveDate;
use serde_json::{json, Value};

use auth_cell::services::token::TokenService;
use shared_models::auth::Role;
use shared_models::error::AppError;
use shared_utils::extractor::extract_bearer_token;

use crate::models::{
    AppointmentDraft, AppointmentQuery, BookAppointmentRequest, StatusChangeRequest,
    UpdateAppointmentRequest,
};
use crate::services::booking::AppointmentBookingService;

pub struct AppointmentState {
    pub bookings: Arc<AppointmentBookingService>,
    pub tokens: Arc<TokenService>,
}

async fn caller_for_role(
    state: &AppointmentState,
    headers: &HeaderMap,
    role: Role,
) -> Result<i64, AppError> {
    let token = extract_bearer_token(headers)?;
    state
        .tokens
        .subject_id_for(&token, role)
        .await
        .map_err(|_| AppError::Auth("Invalid or expired token".to_string()))
}

pub async fn book_appointment(
    State(state): State<Arc<AppointmentState>>,
    headers: HeaderMap,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let patient_id = caller_for_role(&state, &headers, Role::Patient).await?;

    let appointment = state
        .bookings
        .book(AppointmentDraft {
            id: None,
            doctor_id: request.doctor_id,
            patient_id,
            appointment_time: request.appointment_time,
        })
        .await?;
    Ok(Json(json!({ "appointment": appointment })))
}

pub async fn update_appointment(
    State(state): State<Arc<AppointmentState>>,
    headers: HeaderMap,
    Json(request): Json<UpdateAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let token = extract_bearer_token(&headers)?;
    let appointment = state
        .bookings
        .update(
            request.id,
            request.doctor_id,
            request.appointment_time,
            &token,
        )
        .await?;
    Ok(Json(json!({ "appointment": appointment })))
}

pub async fn cancel_appointment(
    State(state): State<Arc<AppointmentState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    let token = extract_bearer_token(&headers)?;
    state.bookings.cancel(id, &token).await?;
    Ok(Json(json!({ "message": "Appointment cancelled" })))
}

/// A doctor's own schedule for one day, narrowed by patient name if asked.
pub async fn get_doctor_appointments(
    State(state): State<Arc<AppointmentState>>,
    Query(query): Query<AppointmentQuery>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    let doctor_id = caller_for_role(&state, &headers, Role::Doctor).await?;

    let date = NaiveDate::parse_from_str(&query.date, "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest("Invalid date, expected YYYY-MM-DD".to_string()))?;

    let appointments = state
        .bookings
        .query(doctor_id, date, query.patient_name.as_deref())
        .await?;
    Ok(Json(json!({ "appointments": appointments })))
}

pub async fn change_status(
    State(state): State<Arc<AppointmentState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(request): Json<StatusChangeRequest>,
) -> Result<Json<Value>, AppError> {
    caller_for_role(&state, &headers, Role::Doctor).await?;

    let changed = state.bookings.set_status(id, request.status).await?;
    if !changed {
        return Err(AppError::NotFound("Appointment not found".to_string()));
    }
    Ok(Json(json!({ "message": "Status updated" })))
}

pub async fn mark_prescription(
    State(state): State<Arc<AppointmentState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    caller_for_role(&state, &headers, Role::Doctor).await?;

    let changed = state.bookings.mark_prescription_added(id).await?;
    if !changed {
        return Err(AppError::NotFound("Appointment not found".to_string()));
    }
    Ok(Json(json!({ "message": "Prescription recorded" })))
}
