use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{debug, info, warn};

use auth_cell::services::token::{TokenError, TokenService};
use shared_models::auth::Role;
use shared_models::entities::{Appointment, NewAppointment, STATUS_SCHEDULED};
use shared_store::ClinicStore;
use shared_utils::locks::KeyedLocks;

use crate::models::{AppointmentDraft, AppointmentError};
use crate::services::conflict::{conflict_window, has_conflict};

/// Decides which bookings exist. All writes that could collide go through
/// the per-doctor lock so a conflict scan and the insert it guards cannot
/// interleave with another request for the same doctor.
pub struct AppointmentBookingService {
    store: Arc<dyn ClinicStore>,
    tokens: Arc<TokenService>,
    locks: Arc<KeyedLocks<i64>>,
}

impl AppointmentBookingService {
    pub fn new(
        store: Arc<dyn ClinicStore>,
        tokens: Arc<TokenService>,
        locks: Arc<KeyedLocks<i64>>,
    ) -> Self {
        Self {
            store,
            tokens,
            locks,
        }
    }

    /// Pure admissibility check: the start instant is in the future and no
    /// other appointment for the doctor starts within the ±30-minute window.
    /// Callers that intend to write must hold the doctor's lock across this
    /// check and the write.
    pub async fn validate(&self, draft: &AppointmentDraft) -> Result<(), AppointmentError> {
        if draft.appointment_time <= Utc::now() {
            return Err(AppointmentError::InvalidTime);
        }

        let (from, to) = conflict_window(draft.appointment_time);
        let neighbors = self
            .store
            .appointments_for_doctor_between(draft.doctor_id, from, to)
            .await
            .map_err(|e| AppointmentError::Database(e.to_string()))?;

        if has_conflict(&neighbors, draft.id) {
            debug!(
                "Draft for doctor {} at {} collides with {} neighbor(s)",
                draft.doctor_id,
                draft.appointment_time,
                neighbors.len()
            );
            return Err(AppointmentError::SlotConflict);
        }
        Ok(())
    }

    pub async fn book(&self, draft: AppointmentDraft) -> Result<Appointment, AppointmentError> {
        self.check_entities(&draft).await?;

        let _guard = self.locks.acquire(draft.doctor_id).await;
        self.validate(&draft).await?;

        let created = self
            .store
            .insert_appointment(NewAppointment {
                doctor_id: draft.doctor_id,
                patient_id: draft.patient_id,
                appointment_time: draft.appointment_time,
                status: STATUS_SCHEDULED,
                prescription_added: false,
            })
            .await
            .map_err(|e| AppointmentError::Database(e.to_string()))?;
        info!(
            "Appointment {} booked: doctor {} at {}",
            created.id, created.doctor_id, created.appointment_time
        );
        Ok(created)
    }

    /// Reschedule or move an appointment. Ownership is judged against the
    /// stored row, not the request. The conflict scan is skipped when the
    /// start instant did not change.
    pub async fn update(
        &self,
        id: i64,
        doctor_id: i64,
        appointment_time: chrono::DateTime<Utc>,
        token: &str,
    ) -> Result<Appointment, AppointmentError> {
        let existing = self
            .store
            .appointment_by_id(id)
            .await
            .map_err(|e| AppointmentError::Database(e.to_string()))?
            .ok_or(AppointmentError::NotFound)?;

        let caller = self.caller_patient_id(token).await?;
        if caller != existing.patient_id {
            warn!(
                "Patient {} tried to update appointment {} owned by patient {}",
                caller, id, existing.patient_id
            );
            return Err(AppointmentError::Forbidden);
        }

        let draft = AppointmentDraft {
            id: Some(id),
            doctor_id,
            patient_id: existing.patient_id,
            appointment_time,
        };
        self.check_entities(&draft).await?;

        let time_changed =
            appointment_time != existing.appointment_time || doctor_id != existing.doctor_id;

        let mut updated = existing.clone();
        updated.doctor_id = doctor_id;
        updated.appointment_time = appointment_time;

        if time_changed {
            let _guard = self.locks.acquire(doctor_id).await;
            self.validate(&draft).await?;
            self.write_row(updated.clone()).await?;
        } else {
            self.write_row(updated.clone()).await?;
        }

        info!("Appointment {} updated", id);
        Ok(updated)
    }

    /// The caller is whoever the token resolves to; only the owning patient
    /// may cancel.
    pub async fn cancel(&self, id: i64, token: &str) -> Result<(), AppointmentError> {
        let existing = self
            .store
            .appointment_by_id(id)
            .await
            .map_err(|e| AppointmentError::Database(e.to_string()))?
            .ok_or(AppointmentError::NotFound)?;

        let caller = self.caller_patient_id(token).await?;
        if caller != existing.patient_id {
            warn!(
                "Patient {} tried to cancel appointment {} owned by patient {}",
                caller, id, existing.patient_id
            );
            return Err(AppointmentError::Forbidden);
        }

        let deleted = self
            .store
            .delete_appointment(id)
            .await
            .map_err(|e| AppointmentError::Database(e.to_string()))?;
        if !deleted {
            return Err(AppointmentError::NotFound);
        }
        info!("Appointment {} cancelled by patient {}", id, caller);
        Ok(())
    }

    /// A doctor's schedule for one day, optionally narrowed to patients whose
    /// name contains `patient_name` (case-insensitive). Ascending by start.
    pub async fn query(
        &self,
        doctor_id: i64,
        date: NaiveDate,
        patient_name: Option<&str>,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let appointments = self
            .store
            .appointments_for_doctor_on_day(doctor_id, date)
            .await
            .map_err(|e| AppointmentError::Database(e.to_string()))?;

        let Some(needle) = patient_name else {
            return Ok(appointments);
        };
        let needle = needle.to_lowercase();

        let mut matching = Vec::with_capacity(appointments.len());
        for appointment in appointments {
            let patient = self
                .store
                .patient_by_id(appointment.patient_id)
                .await
                .map_err(|e| AppointmentError::Database(e.to_string()))?;
            if let Some(patient) = patient {
                if patient.name.to_lowercase().contains(&needle) {
                    matching.push(appointment);
                }
            }
        }
        Ok(matching)
    }

    /// Unconditional status overwrite. Status codes beyond 0 and 1 are
    /// stored untouched; there is no transition table.
    pub async fn set_status(&self, id: i64, status: i32) -> Result<bool, AppointmentError> {
        self.store
            .set_appointment_status(id, status)
            .await
            .map_err(|e| AppointmentError::Database(e.to_string()))
    }

    pub async fn mark_prescription_added(&self, id: i64) -> Result<bool, AppointmentError> {
        self.store
            .set_prescription_added(id)
            .await
            .map_err(|e| AppointmentError::Database(e.to_string()))
    }

    async fn check_entities(&self, draft: &AppointmentDraft) -> Result<(), AppointmentError> {
        let doctor_ok = self
            .store
            .doctor_exists(draft.doctor_id)
            .await
            .map_err(|e| AppointmentError::Database(e.to_string()))?;
        if !doctor_ok {
            return Err(AppointmentError::DoctorNotFound);
        }

        let patient_ok = self
            .store
            .patient_exists(draft.patient_id)
            .await
            .map_err(|e| AppointmentError::Database(e.to_string()))?;
        if !patient_ok {
            return Err(AppointmentError::PatientNotFound);
        }
        Ok(())
    }

    async fn write_row(&self, row: Appointment) -> Result<(), AppointmentError> {
        let written = self
            .store
            .update_appointment(row)
            .await
            .map_err(|e| AppointmentError::Database(e.to_string()))?;
        if !written {
            // Row vanished between the read and the write.
            return Err(AppointmentError::NotFound);
        }
        Ok(())
    }

    async fn caller_patient_id(&self, token: &str) -> Result<i64, AppointmentError> {
        self.tokens
            .subject_id_for(token, Role::Patient)
            .await
            .map_err(|err| match err {
                TokenError::Malformed | TokenError::IdentityNotFound(_) => {
                    AppointmentError::Unauthorized
                }
                other => AppointmentError::Database(other.to_string()),
            })
    }
}
