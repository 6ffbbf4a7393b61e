use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use shared_models::entities::{
    Admin, Appointment, Doctor, NewAppointment, NewDoctor, NewPatient, Patient,
};

pub mod memory;

pub use memory::MemoryStore;

/// Durable entity store as the core sees it: primary-key access plus simple
/// equality/range predicates. Nothing in the services assumes more than this.
///
/// Instant-range queries are inclusive at both bounds (the conflict window
/// needs exactly that); whole-day queries are half-open so the day's last
/// sub-second instants are never clipped.
#[async_trait]
pub trait ClinicStore: Send + Sync {
    // Admins
    async fn admin_exists(&self, id: i64) -> Result<bool>;
    async fn admin_by_username(&self, username: &str) -> Result<Option<Admin>>;
    async fn insert_admin(&self, username: &str, password: &str) -> Result<Admin>;

    // Doctors
    async fn doctor_exists(&self, id: i64) -> Result<bool>;
    async fn doctor_by_id(&self, id: i64) -> Result<Option<Doctor>>;
    async fn doctor_by_email(&self, email: &str) -> Result<Option<Doctor>>;
    async fn all_doctors(&self) -> Result<Vec<Doctor>>;
    /// Substring match on name (case-insensitive) and exact case-insensitive
    /// match on specialty; `None` leaves the dimension unfiltered.
    async fn doctors_filtered(
        &self,
        name_contains: Option<&str>,
        specialty: Option<&str>,
    ) -> Result<Vec<Doctor>>;
    async fn insert_doctor(&self, doctor: NewDoctor) -> Result<Doctor>;
    async fn update_doctor(&self, doctor: Doctor) -> Result<bool>;
    /// Removes the doctor and every appointment referencing it as one atomic
    /// unit. Returns the number of appointments removed, or `None` when the
    /// doctor does not exist (in which case nothing is touched).
    async fn delete_doctor_with_appointments(&self, id: i64) -> Result<Option<usize>>;

    // Patients
    async fn patient_exists(&self, id: i64) -> Result<bool>;
    async fn patient_by_id(&self, id: i64) -> Result<Option<Patient>>;
    async fn patient_by_email(&self, email: &str) -> Result<Option<Patient>>;
    async fn patient_by_phone(&self, phone: &str) -> Result<Option<Patient>>;
    async fn insert_patient(&self, patient: NewPatient) -> Result<Patient>;
    async fn delete_patient(&self, id: i64) -> Result<bool>;

    // Appointments
    async fn appointment_by_id(&self, id: i64) -> Result<Option<Appointment>>;
    /// Appointments for a doctor with `from <= appointment_time <= to`,
    /// ascending by start instant.
    async fn appointments_for_doctor_between(
        &self,
        doctor_id: i64,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Appointment>>;
    /// Appointments for a doctor on one calendar day, `[00:00, next day
    /// 00:00)`, ascending by start instant.
    async fn appointments_for_doctor_on_day(
        &self,
        doctor_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<Appointment>>;
    async fn appointments_for_patient(&self, patient_id: i64) -> Result<Vec<Appointment>>;
    async fn appointments_for_patient_with_status(
        &self,
        patient_id: i64,
        status: i32,
    ) -> Result<Vec<Appointment>>;
    async fn insert_appointment(&self, appointment: NewAppointment) -> Result<Appointment>;
    /// Replaces the stored row with the same id. Returns false when absent.
    async fn update_appointment(&self, appointment: Appointment) -> Result<bool>;
    async fn delete_appointment(&self, id: i64) -> Result<bool>;
    async fn set_appointment_status(&self, id: i64, status: i32) -> Result<bool>;
    async fn set_prescription_added(&self, id: i64) -> Result<bool>;
}
