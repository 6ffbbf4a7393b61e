use std::str::FromStr;

use chrono::NaiveTime;
use serde::Deserialize;
use thiserror::Error;

use shared_models::error::AppError;

#[derive(Error, Debug)]
pub enum DoctorError {
    #[error("Doctor not found")]
    NotFound,

    #[error("A doctor with this email already exists")]
    DuplicateEmail,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<DoctorError> for AppError {
    fn from(err: DoctorError) -> Self {
        match err {
            DoctorError::NotFound => AppError::NotFound(err.to_string()),
            DoctorError::DuplicateEmail => AppError::Conflict(err.to_string()),
            DoctorError::InvalidCredentials => AppError::Auth(err.to_string()),
            DoctorError::Validation(msg) => AppError::ValidationError(msg),
            DoctorError::Database(msg) => AppError::Database(msg),
        }
    }
}

/// AM/PM bucketing of a doctor's declared consulting times against local
/// noon. Noon itself falls in neither bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimePeriod {
    Am,
    Pm,
}

impl TimePeriod {
    pub fn contains(&self, time: NaiveTime) -> bool {
        let noon = NaiveTime::from_hms_opt(12, 0, 0).expect("noon is a valid time");
        match self {
            TimePeriod::Am => time < noon,
            TimePeriod::Pm => time > noon,
        }
    }
}

impl FromStr for TimePeriod {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "am" => Ok(TimePeriod::Am),
            "pm" => Ok(TimePeriod::Pm),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateDoctorRequest {
    pub id: i64,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub specialty: Option<String>,
    pub available_times: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DoctorFilterQuery {
    pub name: Option<String>,
    pub specialty: Option<String>,
    pub period: Option<String>,
}

/// Outcome of checking a concrete instant against a doctor's free slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotValidation {
    Valid,
    SlotTaken,
    UnknownDoctor,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noon_is_in_neither_period() {
        let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
        assert!(!TimePeriod::Am.contains(noon));
        assert!(!TimePeriod::Pm.contains(noon));
    }

    #[test]
    fn period_parse() {
        assert_eq!("AM".parse::<TimePeriod>(), Ok(TimePeriod::Am));
        assert_eq!("pm".parse::<TimePeriod>(), Ok(TimePeriod::Pm));
        assert!("noon".parse::<TimePeriod>().is_err());
    }
}
