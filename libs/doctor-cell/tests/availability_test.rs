use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};

use doctor_cell::models::SlotValidation;
use doctor_cell::services::availability::{daily_slot_grid, AvailabilityService};
use shared_models::entities::{NewAppointment, NewDoctor, STATUS_SCHEDULED};
use shared_store::{ClinicStore, MemoryStore};

fn doctor_payload(email: &str) -> NewDoctor {
    NewDoctor {
        name: "Asha Verma".to_string(),
        email: email.to_string(),
        password: "pw".to_string(),
        phone: "5550003333".to_string(),
        specialty: "Cardiology".to_string(),
        available_times: vec![],
    }
}

#[tokio::test]
async fn empty_schedule_yields_the_full_grid() {
    let store = Arc::new(MemoryStore::new());
    let service = AvailabilityService::new(store.clone());
    let doctor = store.insert_doctor(doctor_payload("a@x.com")).await.unwrap();

    let date = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
    let slots = service.availability(doctor.id, date).await.unwrap();

    assert_eq!(slots, daily_slot_grid());
}

#[tokio::test]
async fn booked_times_disappear_from_the_grid() {
    let store = Arc::new(MemoryStore::new());
    let service = AvailabilityService::new(store.clone());
    let doctor = store.insert_doctor(doctor_payload("b@x.com")).await.unwrap();

    store
        .insert_appointment(NewAppointment {
            doctor_id: doctor.id,
            patient_id: 1,
            appointment_time: Utc.with_ymd_and_hms(2025, 6, 10, 10, 0, 0).unwrap(),
            status: STATUS_SCHEDULED,
            prescription_added: false,
        })
        .await
        .unwrap();
    store
        .insert_appointment(NewAppointment {
            doctor_id: doctor.id,
            patient_id: 2,
            appointment_time: Utc.with_ymd_and_hms(2025, 6, 10, 17, 0, 0).unwrap(),
            status: STATUS_SCHEDULED,
            prescription_added: false,
        })
        .await
        .unwrap();

    let date = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
    let slots = service.availability(doctor.id, date).await.unwrap();

    assert_eq!(slots.len(), 15);
    assert!(!slots.contains(&NaiveTime::from_hms_opt(10, 0, 0).unwrap()));
    assert!(!slots.contains(&NaiveTime::from_hms_opt(17, 0, 0).unwrap()));
    assert!(slots.contains(&NaiveTime::from_hms_opt(10, 30, 0).unwrap()));
}

#[tokio::test]
async fn bookings_on_another_day_do_not_leak_in() {
    let store = Arc::new(MemoryStore::new());
    let service = AvailabilityService::new(store.clone());
    let doctor = store.insert_doctor(doctor_payload("c@x.com")).await.unwrap();

    store
        .insert_appointment(NewAppointment {
            doctor_id: doctor.id,
            patient_id: 1,
            appointment_time: Utc.with_ymd_and_hms(2025, 6, 11, 9, 0, 0).unwrap(),
            status: STATUS_SCHEDULED,
            prescription_added: false,
        })
        .await
        .unwrap();

    let date = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
    let slots = service.availability(doctor.id, date).await.unwrap();
    assert_eq!(slots.len(), 17);
}

#[tokio::test]
async fn unknown_doctor_has_no_availability() {
    let store = Arc::new(MemoryStore::new());
    let service = AvailabilityService::new(store);

    let date = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
    let slots = service.availability(999, date).await.unwrap();
    assert!(slots.is_empty());
}

#[tokio::test]
async fn validate_slot_tells_taken_from_unknown() {
    let store = Arc::new(MemoryStore::new());
    let service = AvailabilityService::new(store.clone());
    let doctor = store.insert_doctor(doctor_payload("d@x.com")).await.unwrap();

    let at = Utc.with_ymd_and_hms(2025, 6, 10, 10, 0, 0).unwrap();
    assert_eq!(
        service.validate_slot(doctor.id, at).await.unwrap(),
        SlotValidation::Valid
    );

    store
        .insert_appointment(NewAppointment {
            doctor_id: doctor.id,
            patient_id: 1,
            appointment_time: at,
            status: STATUS_SCHEDULED,
            prescription_added: false,
        })
        .await
        .unwrap();
    assert_eq!(
        service.validate_slot(doctor.id, at).await.unwrap(),
        SlotValidation::SlotTaken
    );

    assert_eq!(
        service.validate_slot(999, at).await.unwrap(),
        SlotValidation::UnknownDoctor
    );
}
