use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use shared_models::entities::{
    Admin, Appointment, Doctor, NewAppointment, NewDoctor, NewPatient, Patient,
};

use crate::ClinicStore;

/// In-memory store. BTreeMaps keep iteration deterministic; the write lock
/// makes multi-entity operations (cascade delete) a single atomic unit.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Tables>,
    next_id: AtomicI64,
}

#[derive(Default)]
struct Tables {
    admins: BTreeMap<i64, Admin>,
    doctors: BTreeMap<i64, Doctor>,
    patients: BTreeMap<i64, Patient>,
    appointments: BTreeMap<i64, Appointment>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Tables::default()),
            next_id: AtomicI64::new(1),
        }
    }

    fn allocate_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }
}

#[async_trait]
impl ClinicStore for MemoryStore {
    async fn admin_exists(&self, id: i64) -> Result<bool> {
        Ok(self.inner.read().await.admins.contains_key(&id))
    }

    async fn admin_by_username(&self, username: &str) -> Result<Option<Admin>> {
        let tables = self.inner.read().await;
        Ok(tables
            .admins
            .values()
            .find(|a| a.username == username)
            .cloned())
    }

    async fn insert_admin(&self, username: &str, password: &str) -> Result<Admin> {
        let admin = Admin {
            id: self.allocate_id(),
            username: username.to_string(),
            password: password.to_string(),
        };
        self.inner
            .write()
            .await
            .admins
            .insert(admin.id, admin.clone());
        Ok(admin)
    }

    async fn doctor_exists(&self, id: i64) -> Result<bool> {
        Ok(self.inner.read().await.doctors.contains_key(&id))
    }

    async fn doctor_by_id(&self, id: i64) -> Result<Option<Doctor>> {
        Ok(self.inner.read().await.doctors.get(&id).cloned())
    }

    async fn doctor_by_email(&self, email: &str) -> Result<Option<Doctor>> {
        let tables = self.inner.read().await;
        Ok(tables.doctors.values().find(|d| d.email == email).cloned())
    }

    async fn all_doctors(&self) -> Result<Vec<Doctor>> {
        Ok(self.inner.read().await.doctors.values().cloned().collect())
    }

    async fn doctors_filtered(
        &self,
        name_contains: Option<&str>,
        specialty: Option<&str>,
    ) -> Result<Vec<Doctor>> {
        let name_needle = name_contains.map(|n| n.to_lowercase());
        let specialty_needle = specialty.map(|s| s.to_lowercase());

        let tables = self.inner.read().await;
        Ok(tables
            .doctors
            .values()
            .filter(|d| match &name_needle {
                Some(needle) => d.name.to_lowercase().contains(needle),
                None => true,
            })
            .filter(|d| match &specialty_needle {
                Some(needle) => d.specialty.to_lowercase() == *needle,
                None => true,
            })
            .cloned()
            .collect())
    }

    async fn insert_doctor(&self, doctor: NewDoctor) -> Result<Doctor> {
        let doctor = Doctor {
            id: self.allocate_id(),
            name: doctor.name,
            email: doctor.email,
            password: doctor.password,
            phone: doctor.phone,
            specialty: doctor.specialty,
            available_times: doctor.available_times,
        };
        self.inner
            .write()
            .await
            .doctors
            .insert(doctor.id, doctor.clone());
        Ok(doctor)
    }

    async fn update_doctor(&self, doctor: Doctor) -> Result<bool> {
        let mut tables = self.inner.write().await;
        if !tables.doctors.contains_key(&doctor.id) {
            return Ok(false);
        }
        tables.doctors.insert(doctor.id, doctor);
        Ok(true)
    }

    async fn delete_doctor_with_appointments(&self, id: i64) -> Result<Option<usize>> {
        let mut tables = self.inner.write().await;
        if tables.doctors.remove(&id).is_none() {
            return Ok(None);
        }
        let before = tables.appointments.len();
        tables.appointments.retain(|_, a| a.doctor_id != id);
        let removed = before - tables.appointments.len();
        debug!("Removed doctor {} and {} appointments", id, removed);
        Ok(Some(removed))
    }

    async fn patient_exists(&self, id: i64) -> Result<bool> {
        Ok(self.inner.read().await.patients.contains_key(&id))
    }

    async fn patient_by_id(&self, id: i64) -> Result<Option<Patient>> {
        Ok(self.inner.read().await.patients.get(&id).cloned())
    }

    async fn patient_by_email(&self, email: &str) -> Result<Option<Patient>> {
        let tables = self.inner.read().await;
        Ok(tables.patients.values().find(|p| p.email == email).cloned())
    }

    async fn patient_by_phone(&self, phone: &str) -> Result<Option<Patient>> {
        let tables = self.inner.read().await;
        Ok(tables.patients.values().find(|p| p.phone == phone).cloned())
    }

    async fn insert_patient(&self, patient: NewPatient) -> Result<Patient> {
        let patient = Patient {
            id: self.allocate_id(),
            name: patient.name,
            email: patient.email,
            password: patient.password,
            phone: patient.phone,
            address: patient.address,
        };
        self.inner
            .write()
            .await
            .patients
            .insert(patient.id, patient.clone());
        Ok(patient)
    }

    async fn delete_patient(&self, id: i64) -> Result<bool> {
        Ok(self.inner.write().await.patients.remove(&id).is_some())
    }

    async fn appointment_by_id(&self, id: i64) -> Result<Option<Appointment>> {
        Ok(self.inner.read().await.appointments.get(&id).cloned())
    }

    async fn appointments_for_doctor_between(
        &self,
        doctor_id: i64,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Appointment>> {
        let tables = self.inner.read().await;
        let mut matches: Vec<Appointment> = tables
            .appointments
            .values()
            .filter(|a| {
                a.doctor_id == doctor_id && a.appointment_time >= from && a.appointment_time <= to
            })
            .cloned()
            .collect();
        matches.sort_by_key(|a| a.appointment_time);
        Ok(matches)
    }

    async fn appointments_for_doctor_on_day(
        &self,
        doctor_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<Appointment>> {
        let start = date.and_time(NaiveTime::MIN).and_utc();
        let end = start + Duration::days(1);

        let tables = self.inner.read().await;
        let mut matches: Vec<Appointment> = tables
            .appointments
            .values()
            .filter(|a| {
                a.doctor_id == doctor_id && a.appointment_time >= start && a.appointment_time < end
            })
            .cloned()
            .collect();
        matches.sort_by_key(|a| a.appointment_time);
        Ok(matches)
    }

    async fn appointments_for_patient(&self, patient_id: i64) -> Result<Vec<Appointment>> {
        let tables = self.inner.read().await;
        let mut matches: Vec<Appointment> = tables
            .appointments
            .values()
            .filter(|a| a.patient_id == patient_id)
            .cloned()
            .collect();
        matches.sort_by_key(|a| a.appointment_time);
        Ok(matches)
    }

    async fn appointments_for_patient_with_status(
        &self,
        patient_id: i64,
        status: i32,
    ) -> Result<Vec<Appointment>> {
        let tables = self.inner.read().await;
        let mut matches: Vec<Appointment> = tables
            .appointments
            .values()
            .filter(|a| a.patient_id == patient_id && a.status == status)
            .cloned()
            .collect();
        matches.sort_by_key(|a| a.appointment_time);
        Ok(matches)
    }

    async fn insert_appointment(&self, appointment: NewAppointment) -> Result<Appointment> {
        let appointment = Appointment {
            id: self.allocate_id(),
            doctor_id: appointment.doctor_id,
            patient_id: appointment.patient_id,
            appointment_time: appointment.appointment_time,
            status: appointment.status,
            prescription_added: appointment.prescription_added,
        };
        self.inner
            .write()
            .await
            .appointments
            .insert(appointment.id, appointment.clone());
        Ok(appointment)
    }

    async fn update_appointment(&self, appointment: Appointment) -> Result<bool> {
        let mut tables = self.inner.write().await;
        if !tables.appointments.contains_key(&appointment.id) {
            return Ok(false);
        }
        tables.appointments.insert(appointment.id, appointment);
        Ok(true)
    }

    async fn delete_appointment(&self, id: i64) -> Result<bool> {
        Ok(self.inner.write().await.appointments.remove(&id).is_some())
    }

    async fn set_appointment_status(&self, id: i64, status: i32) -> Result<bool> {
        let mut tables = self.inner.write().await;
        match tables.appointments.get_mut(&id) {
            Some(appointment) => {
                appointment.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_prescription_added(&self, id: i64) -> Result<bool> {
        let mut tables = self.inner.write().await;
        match tables.appointments.get_mut(&id) {
            Some(appointment) => {
                appointment.prescription_added = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
