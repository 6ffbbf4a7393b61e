use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use shared_models::error::AppError;

#[derive(Error, Debug)]
pub enum AppointmentError {
    #[error("Appointment not found")]
    NotFound,

    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("Patient not found")]
    PatientNotFound,

    #[error("Appointment time must be in the future")]
    InvalidTime,

    #[error("The doctor already has an appointment within 30 minutes of this time")]
    SlotConflict,

    #[error("Invalid or expired token")]
    Unauthorized,

    #[error("Appointment belongs to another patient")]
    Forbidden,

    #[error("Database error: {0}")]
    Database(String),
}

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        match err {
            AppointmentError::NotFound
            | AppointmentError::DoctorNotFound
            | AppointmentError::PatientNotFound => AppError::NotFound(err.to_string()),
            AppointmentError::InvalidTime => AppError::BadRequest(err.to_string()),
            AppointmentError::SlotConflict => AppError::Conflict(err.to_string()),
            AppointmentError::Unauthorized => AppError::Auth(err.to_string()),
            AppointmentError::Forbidden => AppError::Forbidden(err.to_string()),
            AppointmentError::Database(msg) => AppError::Database(msg),
        }
    }
}

/// What the arbiter judges: a booking that may or may not exist yet.
/// `id` is `None` for a fresh booking and set when revalidating an update,
/// so the row under change does not conflict with itself.
#[derive(Debug, Clone)]
pub struct AppointmentDraft {
    pub id: Option<i64>,
    pub doctor_id: i64,
    pub patient_id: i64,
    pub appointment_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookAppointmentRequest {
    pub doctor_id: i64,
    pub appointment_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAppointmentRequest {
    pub id: i64,
    pub doctor_id: i64,
    pub appointment_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppointmentQuery {
    /// Day to scan, YYYY-MM-DD.
    pub date: String,
    /// Optional case-insensitive substring on the patient's name.
    pub patient_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusChangeRequest {
    pub status: i32,
}
