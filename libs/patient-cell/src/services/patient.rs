use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use auth_cell::services::password::CredentialVerifier;
use auth_cell::services::token::{TokenError, TokenService};
use shared_models::auth::Role;
use shared_models::entities::{Doctor, NewPatient, Patient};
use shared_store::ClinicStore;

use crate::models::{AppointmentFilter, AppointmentView, PatientError};

/// Registration, login and the patient's own view of their records.
pub struct PatientService {
    store: Arc<dyn ClinicStore>,
    tokens: Arc<TokenService>,
    verifier: Arc<dyn CredentialVerifier>,
}

impl PatientService {
    pub fn new(
        store: Arc<dyn ClinicStore>,
        tokens: Arc<TokenService>,
        verifier: Arc<dyn CredentialVerifier>,
    ) -> Self {
        Self {
            store,
            tokens,
            verifier,
        }
    }

    /// Email and phone must both be unused. Whichever collides first wins
    /// the error message.
    pub async fn register(&self, patient: NewPatient) -> Result<Patient, PatientError> {
        if patient.email.trim().is_empty() {
            return Err(PatientError::Validation("Email is required".to_string()));
        }

        if self
            .store
            .patient_by_email(&patient.email)
            .await
            .map_err(|e| PatientError::Database(e.to_string()))?
            .is_some()
        {
            return Err(PatientError::DuplicateEmail);
        }
        if self
            .store
            .patient_by_phone(&patient.phone)
            .await
            .map_err(|e| PatientError::Database(e.to_string()))?
            .is_some()
        {
            return Err(PatientError::DuplicatePhone);
        }

        let created = self
            .store
            .insert_patient(patient)
            .await
            .map_err(|e| PatientError::Database(e.to_string()))?;
        info!("Patient {} registered", created.id);
        Ok(created)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<String, PatientError> {
        let patient = self
            .store
            .patient_by_email(email)
            .await
            .map_err(|e| PatientError::Database(e.to_string()))?
            .ok_or(PatientError::InvalidCredentials)?;

        if !self.verifier.verify(password, &patient.password) {
            return Err(PatientError::InvalidCredentials);
        }

        self.tokens
            .issue(patient.id)
            .map_err(|e| PatientError::Database(e.to_string()))
    }

    /// The caller is whoever the token says; no patient id crosses the wire.
    pub async fn details(&self, token: &str) -> Result<Patient, PatientError> {
        let patient_id = self.caller_id(token).await?;
        self.store
            .patient_by_id(patient_id)
            .await
            .map_err(|e| PatientError::Database(e.to_string()))?
            .ok_or(PatientError::NotFound)
    }

    /// Appointment history for `patient_id`, readable only with that
    /// patient's own token. Rows are joined with participant names and
    /// ordered by start instant.
    pub async fn appointments(
        &self,
        token: &str,
        patient_id: i64,
        filter: AppointmentFilter,
    ) -> Result<Vec<AppointmentView>, PatientError> {
        let caller = self.caller_id(token).await?;
        if caller != patient_id {
            warn!(
                "Patient {} asked for patient {}'s appointments",
                caller, patient_id
            );
            return Err(PatientError::Forbidden);
        }

        let patient = self
            .store
            .patient_by_id(patient_id)
            .await
            .map_err(|e| PatientError::Database(e.to_string()))?
            .ok_or(PatientError::NotFound)?;

        let mut appointments = match filter.status {
            Some(status) => self
                .store
                .appointments_for_patient_with_status(patient_id, status)
                .await,
            None => self.store.appointments_for_patient(patient_id).await,
        }
        .map_err(|e| PatientError::Database(e.to_string()))?;
        appointments.sort_by_key(|a| a.appointment_time);

        debug!(
            "Patient {} has {} appointments before doctor filtering",
            patient_id,
            appointments.len()
        );

        // One lookup per distinct doctor, then join in memory.
        let mut doctors: HashMap<i64, Doctor> = HashMap::new();
        let mut views = Vec::with_capacity(appointments.len());
        for appointment in &appointments {
            if !doctors.contains_key(&appointment.doctor_id) {
                let doctor = self
                    .store
                    .doctor_by_id(appointment.doctor_id)
                    .await
                    .map_err(|e| PatientError::Database(e.to_string()))?;
                match doctor {
                    Some(doctor) => {
                        doctors.insert(appointment.doctor_id, doctor);
                    }
                    // Doctor vanished between the range scan and the join;
                    // its rows are being cascaded away, skip them.
                    None => continue,
                }
            }
            let doctor = &doctors[&appointment.doctor_id];
            views.push(AppointmentView::assemble(appointment, doctor, &patient));
        }

        if let Some(name) = &filter.doctor_name {
            let needle = name.to_lowercase();
            views.retain(|v| v.doctor_name.to_lowercase().contains(&needle));
        }

        Ok(views)
    }

    async fn caller_id(&self, token: &str) -> Result<i64, PatientError> {
        self.tokens
            .subject_id_for(token, Role::Patient)
            .await
            .map_err(|err| match err {
                TokenError::Malformed | TokenError::IdentityNotFound(_) => {
                    PatientError::Unauthorized
                }
                other => PatientError::Database(other.to_string()),
            })
    }
}
