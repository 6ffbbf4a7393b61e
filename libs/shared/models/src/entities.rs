use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Appointment status codes the system interprets. Other integers are stored
/// and returned untouched.
pub const STATUS_SCHEDULED: i32 = 0;
pub const STATUS_COMPLETED: i32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Admin {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub phone: String,
    pub specialty: String,
    /// Declared consulting times ("HH:MM"), used only for AM/PM filtering.
    pub available_times: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub phone: String,
    pub address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub doctor_id: i64,
    pub patient_id: i64,
    pub appointment_time: DateTime<Utc>,
    pub status: i32,
    pub prescription_added: bool,
}

impl Appointment {
    /// End instant is derived, never stored: every appointment occupies one hour.
    pub fn end_time(&self) -> DateTime<Utc> {
        self.appointment_time + Duration::hours(1)
    }

    pub fn date(&self) -> NaiveDate {
        self.appointment_time.date_naive()
    }

    pub fn time_of_day(&self) -> NaiveTime {
        self.appointment_time.time()
    }
}

/// Insert payloads. Ids are assigned by the store on creation and immutable
/// thereafter, so the New* shapes carry none.
#[derive(Debug, Clone, Deserialize)]
pub struct NewDoctor {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub specialty: String,
    #[serde(default)]
    pub available_times: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewPatient {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub address: String,
}

#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub doctor_id: i64,
    pub patient_id: i64,
    pub appointment_time: DateTime<Utc>,
    pub status: i32,
    pub prescription_added: bool,
}
