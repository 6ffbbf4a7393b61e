use std::sync::Arc;

use chrono::NaiveTime;
use tracing::{debug, info, warn};

use auth_cell::services::password::CredentialVerifier;
use auth_cell::services::token::TokenService;
use shared_models::entities::{Doctor, NewDoctor};
use shared_store::ClinicStore;

use crate::models::{DoctorError, TimePeriod, UpdateDoctorRequest};

/// Directory lookup and admin-side management of doctor records.
pub struct DoctorService {
    store: Arc<dyn ClinicStore>,
    tokens: Arc<TokenService>,
    verifier: Arc<dyn CredentialVerifier>,
}

impl DoctorService {
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

    pub async fn create_doctor(&self, doctor: NewDoctor) -> Result<Doctor, DoctorError> {
        if doctor.email.trim().is_empty() {
            return Err(DoctorError::Validation("Email is required".to_string()));
        }

        let existing = self
            .store
            .doctor_by_email(&doctor.email)
            .await
            .map_err(|e| DoctorError::Database(e.to_string()))?;
        if existing.is_some() {
            return Err(DoctorError::DuplicateEmail);
        }

        let created = self
            .store
            .insert_doctor(doctor)
            .await
            .map_err(|e| DoctorError::Database(e.to_string()))?;
        info!("Doctor {} created", created.id);
        Ok(created)
    }

    pub async fn update_doctor(&self, request: UpdateDoctorRequest) -> Result<Doctor, DoctorError> {
        let mut doctor = self
            .store
            .doctor_by_id(request.id)
            .await
            .map_err(|e| DoctorError::Database(e.to_string()))?
            .ok_or(DoctorError::NotFound)?;

        if let Some(email) = &request.email {
            // Email may move only to an address no other doctor holds.
            let by_email = self
                .store
                .doctor_by_email(email)
                .await
                .map_err(|e| DoctorError::Database(e.to_string()))?;
            if let Some(other) = by_email {
                if other.id != doctor.id {
                    return Err(DoctorError::DuplicateEmail);
                }
            }
            doctor.email = email.clone();
        }
        if let Some(name) = request.name {
            doctor.name = name;
        }
        if let Some(phone) = request.phone {
            doctor.phone = phone;
        }
        if let Some(specialty) = request.specialty {
            doctor.specialty = specialty;
        }
        if let Some(available_times) = request.available_times {
            doctor.available_times = available_times;
        }

        let updated = self
            .store
            .update_doctor(doctor.clone())
            .await
            .map_err(|e| DoctorError::Database(e.to_string()))?;
        if !updated {
            return Err(DoctorError::NotFound);
        }
        Ok(doctor)
    }

    /// Removes the doctor and every appointment referencing it, atomically in
    /// the store. Returns the number of appointments cascaded away.
    pub async fn delete_doctor(&self, id: i64) -> Result<usize, DoctorError> {
        let removed = self
            .store
            .delete_doctor_with_appointments(id)
            .await
            .map_err(|e| DoctorError::Database(e.to_string()))?
            .ok_or(DoctorError::NotFound)?;
        info!("Doctor {} deleted along with {} appointments", id, removed);
        Ok(removed)
    }

    /// Credential check followed by token issuance. The token's subject is
    /// the doctor's numeric id.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, DoctorError> {
        let doctor = self
            .store
            .doctor_by_email(email)
            .await
            .map_err(|e| DoctorError::Database(e.to_string()))?
            .ok_or(DoctorError::InvalidCredentials)?;

        if !self.verifier.verify(password, &doctor.password) {
            return Err(DoctorError::InvalidCredentials);
        }

        self.tokens
            .issue(doctor.id)
            .map_err(|e| DoctorError::Database(e.to_string()))
    }

    pub async fn all_doctors(&self) -> Result<Vec<Doctor>, DoctorError> {
        self.store
            .all_doctors()
            .await
            .map_err(|e| DoctorError::Database(e.to_string()))
    }

    pub async fn get_by_specialty(&self, specialty: &str) -> Result<Vec<Doctor>, DoctorError> {
        self.store
            .doctors_filtered(None, Some(specialty))
            .await
            .map_err(|e| DoctorError::Database(e.to_string()))
    }

    /// Filter doctors by name substring, exact specialty and AM/PM bucket of
    /// their declared times. The store narrows name and specialty; the time
    /// period is applied in memory. Lookup failures degrade to an empty list.
    pub async fn filter_doctors(
        &self,
        name: Option<&str>,
        specialty: Option<&str>,
        period: Option<TimePeriod>,
    ) -> Vec<Doctor> {
        let doctors = match self.store.doctors_filtered(name, specialty).await {
            Ok(doctors) => doctors,
            Err(e) => {
                warn!("Doctor filter query failed, returning empty result: {}", e);
                return Vec::new();
            }
        };

        let Some(period) = period else {
            return doctors;
        };

        debug!("Applying {:?} time-period filter to {} doctors", period, doctors.len());
        doctors
            .into_iter()
            .filter(|doctor| {
                doctor.available_times.iter().any(|raw| {
                    NaiveTime::parse_from_str(raw, "%H:%M")
                        .map(|t| period.contains(t))
                        .unwrap_or(false)
                })
            })
            .collect()
    }
}
