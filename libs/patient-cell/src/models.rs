use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_models::entities::{Appointment, Doctor, Patient};
use shared_models::error::AppError;

#[derive(Error, Debug)]
pub enum PatientError {
    #[error("Patient not found")]
    NotFound,

    #[error("A patient with this email already exists")]
    DuplicateEmail,

    #[error("A patient with this phone number already exists")]
    DuplicatePhone,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid or expired token")]
    Unauthorized,

    #[error("Token does not belong to this patient")]
    Forbidden,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<PatientError> for AppError {
    fn from(err: PatientError) -> Self {
        match err {
            PatientError::NotFound => AppError::NotFound(err.to_string()),
            PatientError::DuplicateEmail | PatientError::DuplicatePhone => {
                AppError::Conflict(err.to_string())
            }
            PatientError::InvalidCredentials | PatientError::Unauthorized => {
                AppError::Auth(err.to_string())
            }
            PatientError::Forbidden => AppError::Forbidden(err.to_string()),
            PatientError::Validation(msg) => AppError::ValidationError(msg),
            PatientError::Database(msg) => AppError::Database(msg),
        }
    }
}

/// How a patient narrows their appointment history. Both dimensions
/// compose; the default filters nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppointmentFilter {
    /// Restrict to one status code: 1 for past visits, 0 for upcoming.
    pub status: Option<i32>,
    /// Case-insensitive substring match on the doctor's name.
    pub doctor_name: Option<String>,
}

impl AppointmentFilter {
    pub fn past() -> Self {
        Self {
            status: Some(shared_models::entities::STATUS_COMPLETED),
            ..Self::default()
        }
    }

    pub fn upcoming() -> Self {
        Self {
            status: Some(shared_models::entities::STATUS_SCHEDULED),
            ..Self::default()
        }
    }

    pub fn from_query(query: &AppointmentFilterQuery) -> Result<Self, PatientError> {
        let status = match query.condition.as_deref() {
            None => None,
            Some("past") => Some(shared_models::entities::STATUS_COMPLETED),
            Some("upcoming") => Some(shared_models::entities::STATUS_SCHEDULED),
            Some(other) => {
                return Err(PatientError::Validation(format!(
                    "Unknown condition '{other}', expected 'past' or 'upcoming'"
                )))
            }
        };
        Ok(Self {
            status,
            doctor_name: query.doctor_name.clone(),
        })
    }
}

/// Appointment as the patient sees it: the stored row joined with the
/// participant names, plus the derived end instant.
#[derive(Debug, Clone, Serialize)]
pub struct AppointmentView {
    pub id: i64,
    pub doctor_id: i64,
    pub doctor_name: String,
    pub patient_id: i64,
    pub patient_name: String,
    pub appointment_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: i32,
    pub prescription_added: bool,
}

impl AppointmentView {
    pub fn assemble(appointment: &Appointment, doctor: &Doctor, patient: &Patient) -> Self {
        Self {
            id: appointment.id,
            doctor_id: appointment.doctor_id,
            doctor_name: doctor.name.clone(),
            patient_id: appointment.patient_id,
            patient_name: patient.name.clone(),
            appointment_time: appointment.appointment_time,
            end_time: appointment.end_time(),
            status: appointment.status,
            prescription_added: appointment.prescription_added,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppointmentFilterQuery {
    /// "past" or "upcoming"; anything else is rejected.
    pub condition: Option<String>,
    pub doctor_name: Option<String>,
}
