use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::{TimeZone, Utc};

use auth_cell::services::password::PlainTextVerifier;
use auth_cell::services::token::TokenService;
use patient_cell::models::{AppointmentFilter, PatientError};
use patient_cell::services::patient::PatientService;
use shared_config::AppConfig;
use shared_models::entities::{
    NewAppointment, NewDoctor, NewPatient, STATUS_COMPLETED, STATUS_SCHEDULED,
};
use shared_store::{ClinicStore, MemoryStore};
use shared_utils::test_utils::{JwtTestUtils, TEST_JWT_SECRET};

fn test_config() -> AppConfig {
    AppConfig {
        jwt_secret: TEST_JWT_SECRET.to_string(),
        token_ttl_days: 7,
        bind_addr: "127.0.0.1:0".to_string(),
    }
}

fn service(store: Arc<MemoryStore>) -> (PatientService, Arc<TokenService>) {
    let tokens = Arc::new(TokenService::new(&test_config(), store.clone()));
    let service = PatientService::new(store, tokens.clone(), Arc::new(PlainTextVerifier));
    (service, tokens)
}

fn patient_payload(email: &str, phone: &str) -> NewPatient {
    NewPatient {
        name: "Mina Park".to_string(),
        email: email.to_string(),
        password: "pw".to_string(),
        phone: phone.to_string(),
        address: "3 Oak Ave".to_string(),
    }
}

fn doctor_payload(name: &str, email: &str) -> NewDoctor {
    NewDoctor {
        name: name.to_string(),
        email: email.to_string(),
        password: "pw".to_string(),
        phone: "5550003333".to_string(),
        specialty: "Cardiology".to_string(),
        available_times: vec![],
    }
}

#[tokio::test]
async fn registration_enforces_email_and_phone_uniqueness() {
    let store = Arc::new(MemoryStore::new());
    let (service, _) = service(store);

    service
        .register(patient_payload("a@x.com", "111"))
        .await
        .unwrap();

    assert_matches!(
        service.register(patient_payload("a@x.com", "222")).await,
        Err(PatientError::DuplicateEmail)
    );
    assert_matches!(
        service.register(patient_payload("b@x.com", "111")).await,
        Err(PatientError::DuplicatePhone)
    );
}

#[tokio::test]
async fn details_follow_the_token_subject() {
    let store = Arc::new(MemoryStore::new());
    let (service, _) = service(store);

    let patient = service
        .register(patient_payload("a@x.com", "111"))
        .await
        .unwrap();
    let token = service.login("a@x.com", "pw").await.unwrap();

    let details = service.details(&token).await.unwrap();
    assert_eq!(details.id, patient.id);
    assert_eq!(details.email, "a@x.com");

    assert_matches!(
        service.details(&JwtTestUtils::malformed_token()).await,
        Err(PatientError::Unauthorized)
    );
}

#[tokio::test]
async fn appointment_views_are_owner_only() {
    let store = Arc::new(MemoryStore::new());
    let (service, _) = service(store);

    let owner = service
        .register(patient_payload("a@x.com", "111"))
        .await
        .unwrap();
    let other = service
        .register(patient_payload("b@x.com", "222"))
        .await
        .unwrap();
    let other_token = service.login("b@x.com", "pw").await.unwrap();

    assert_matches!(
        service
            .appointments(&other_token, owner.id, AppointmentFilter::default())
            .await,
        Err(PatientError::Forbidden)
    );
    assert_matches!(
        service
            .appointments(&JwtTestUtils::expired_token(other.id, TEST_JWT_SECRET), other.id, AppointmentFilter::default())
            .await,
        Err(PatientError::Unauthorized)
    );
}

#[tokio::test]
async fn views_join_names_and_honor_filters() {
    let store = Arc::new(MemoryStore::new());
    let (service, _) = service(store.clone());

    let patient = service
        .register(patient_payload("a@x.com", "111"))
        .await
        .unwrap();
    let token = service.login("a@x.com", "pw").await.unwrap();

    let cardio = store
        .insert_doctor(doctor_payload("Asha Verma", "av@x.com"))
        .await
        .unwrap();
    let derm = store
        .insert_doctor(doctor_payload("Liu Chen", "lc@x.com"))
        .await
        .unwrap();

    // One completed visit with each doctor, one still scheduled.
    store
        .insert_appointment(NewAppointment {
            doctor_id: cardio.id,
            patient_id: patient.id,
            appointment_time: Utc.with_ymd_and_hms(2025, 5, 1, 10, 0, 0).unwrap(),
            status: STATUS_COMPLETED,
            prescription_added: true,
        })
        .await
        .unwrap();
    store
        .insert_appointment(NewAppointment {
            doctor_id: derm.id,
            patient_id: patient.id,
            appointment_time: Utc.with_ymd_and_hms(2025, 5, 2, 11, 0, 0).unwrap(),
            status: STATUS_COMPLETED,
            prescription_added: false,
        })
        .await
        .unwrap();
    store
        .insert_appointment(NewAppointment {
            doctor_id: cardio.id,
            patient_id: patient.id,
            appointment_time: Utc.with_ymd_and_hms(2025, 7, 1, 9, 0, 0).unwrap(),
            status: STATUS_SCHEDULED,
            prescription_added: false,
        })
        .await
        .unwrap();

    let all = service
        .appointments(&token, patient.id, AppointmentFilter::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 3);
    // Ascending by start instant, names joined in.
    assert_eq!(all[0].doctor_name, "Asha Verma");
    assert_eq!(all[0].patient_name, "Mina Park");
    assert!(all.windows(2).all(|w| w[0].appointment_time <= w[1].appointment_time));
    assert_eq!(
        all[0].end_time,
        Utc.with_ymd_and_hms(2025, 5, 1, 11, 0, 0).unwrap()
    );

    let past = service
        .appointments(&token, patient.id, AppointmentFilter::past())
        .await
        .unwrap();
    assert_eq!(past.len(), 2);

    let upcoming = service
        .appointments(&token, patient.id, AppointmentFilter::upcoming())
        .await
        .unwrap();
    assert_eq!(upcoming.len(), 1);
    assert_eq!(upcoming[0].doctor_id, cardio.id);

    let by_doctor = service
        .appointments(
            &token,
            patient.id,
            AppointmentFilter {
                status: None,
                doctor_name: Some("verma".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(by_doctor.len(), 2);

    let past_with_doctor = service
        .appointments(
            &token,
            patient.id,
            AppointmentFilter {
                status: Some(STATUS_COMPLETED),
                doctor_name: Some("Liu".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(past_with_doctor.len(), 1);
    assert_eq!(past_with_doctor[0].doctor_name, "Liu Chen");
}
