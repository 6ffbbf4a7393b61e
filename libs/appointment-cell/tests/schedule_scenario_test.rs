//! One doctor's day as the patients see it: booking through the arbiter,
//! then watching the free slots react.

use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Utc};

use appointment_cell::models::{AppointmentDraft, AppointmentError};
use appointment_cell::services::booking::AppointmentBookingService;
use auth_cell::services::token::TokenService;
use doctor_cell::services::availability::AvailabilityService;
use shared_config::AppConfig;
use shared_models::entities::{NewDoctor, NewPatient};
use shared_store::{ClinicStore, MemoryStore};
use shared_utils::locks::KeyedLocks;
use shared_utils::test_utils::TEST_JWT_SECRET;

fn test_config() -> AppConfig {
    AppConfig {
        jwt_secret: TEST_JWT_SECRET.to_string(),
        token_ttl_days: 7,
        bind_addr: "127.0.0.1:0".to_string(),
    }
}

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

#[tokio::test]
async fn a_day_of_bookings_drives_the_free_slots() {
    let store = Arc::new(MemoryStore::new());
    let tokens = Arc::new(TokenService::new(&test_config(), store.clone()));
    let bookings = AppointmentBookingService::new(
        store.clone(),
        tokens,
        Arc::new(KeyedLocks::new()),
    );
    let availability = AvailabilityService::new(store.clone());

    let doctor = store
        .insert_doctor(NewDoctor {
            name: "Asha Verma".to_string(),
            email: "av@x.com".to_string(),
            password: "pw".to_string(),
            phone: "5550003333".to_string(),
            specialty: "Cardiology".to_string(),
            available_times: vec![],
        })
        .await
        .unwrap();
    let patient = store
        .insert_patient(NewPatient {
            name: "Mina Park".to_string(),
            email: "mp@x.com".to_string(),
            password: "pw".to_string(),
            phone: "111".to_string(),
            address: "3 Oak Ave".to_string(),
        })
        .await
        .unwrap();

    // A day far enough out that every grid time is in the future.
    let future = Utc::now() + Duration::days(30);
    let day = NaiveDate::from_ymd_opt(future.year(), future.month(), future.day()).unwrap();
    let at = |h: u32, m: u32| day.and_time(time(h, m)).and_utc();
    let draft = |h: u32, m: u32| AppointmentDraft {
        id: None,
        doctor_id: doctor.id,
        patient_id: patient.id,
        appointment_time: at(h, m),
    };

    // Empty day: the whole grid is free.
    let free = availability.availability(doctor.id, day).await.unwrap();
    assert_eq!(free.len(), 17);

    // Book 10:00. Its slot disappears; the neighbors stay free even though
    // they sit inside the booking's conflict window.
    bookings.book(draft(10, 0)).await.unwrap();
    let free = availability.availability(doctor.id, day).await.unwrap();
    assert_eq!(free.len(), 16);
    assert!(!free.contains(&time(10, 0)));
    assert!(free.contains(&time(9, 0)));
    assert!(free.contains(&time(10, 30)));

    // 10:15 is off-grid and within 30 minutes of the booking.
    assert_matches!(
        bookings.book(draft(10, 15)).await,
        Err(AppointmentError::SlotConflict)
    );

    // 11:00 is clear of the window.
    bookings.book(draft(11, 0)).await.unwrap();
    let free = availability.availability(doctor.id, day).await.unwrap();
    assert_eq!(free.len(), 15);
    assert!(!free.contains(&time(11, 0)));
}
