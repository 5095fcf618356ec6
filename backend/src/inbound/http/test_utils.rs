//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, web};
use chrono::{TimeZone, Utc};

use crate::domain::ports::{
    MockAppointmentScheduler, MockAuthenticationGate, MockDoctorDirectory, MockUserDirectory,
};
use crate::domain::{
    AppointmentDetails, AppointmentId, AppointmentStatus, Caller, ContactDetails, Doctor,
    DoctorId, EmailAddress, PersonName, Role, SpecialtyId, User, UserDraft, UserId,
};
use crate::inbound::http::configure_api;
use crate::inbound::http::state::HttpState;

/// Token accepted by [`MockPorts::authenticate_as`].
pub const TEST_TOKEN: &str = "test-token";

/// Mocks for every driving port, turned into [`HttpState`] once primed.
#[derive(Default)]
pub struct MockPorts {
    pub accounts: MockUserDirectory,
    pub auth: MockAuthenticationGate,
    pub doctors: MockDoctorDirectory,
    pub appointments: MockAppointmentScheduler,
}

impl MockPorts {
    /// Make [`TEST_TOKEN`] resolve to `caller`.
    pub fn authenticate_as(&mut self, caller: Caller) {
        self.auth
            .expect_authenticate()
            .withf(|token| token == TEST_TOKEN)
            .returning(move |_| Ok(caller));
    }

    pub fn into_state(self) -> HttpState {
        HttpState::new(
            Arc::new(self.accounts),
            Arc::new(self.auth),
            Arc::new(self.doctors),
            Arc::new(self.appointments),
        )
    }
}

/// `Authorization` header carrying [`TEST_TOKEN`].
pub fn bearer() -> (actix_web::http::header::HeaderName, String) {
    (AUTHORIZATION, format!("Bearer {TEST_TOKEN}"))
}

pub fn caller_with_role(id: i32, role: Role) -> Caller {
    Caller {
        user_id: UserId::new(id).expect("positive id"),
        role,
    }
}

/// Application with the `/api` routes mounted over `state`.
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .service(web::scope("/api").configure(configure_api))
}

pub fn sample_user(id: i32, role: Role) -> User {
    let at = Utc
        .with_ymd_and_hms(2024, 5, 1, 9, 0, 0)
        .single()
        .expect("timestamp");
    User::from(UserDraft {
        id: UserId::new(id).expect("positive id"),
        email: EmailAddress::new("ada@example.com").expect("email"),
        name: PersonName::new("Ada Lovelace").expect("name"),
        role,
        contact: ContactDetails {
            phone: Some("+44 20 7946 0000".to_owned()),
            ..ContactDetails::default()
        },
        created_at: at,
        updated_at: at,
    })
}

pub fn sample_doctor(id: i32) -> Doctor {
    let at = Utc
        .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .expect("timestamp");
    Doctor {
        id: DoctorId::new(id).expect("positive id"),
        name: "Dr. Ivanova".to_owned(),
        email: Some("ivanova@clinic.test".to_owned()),
        phone: None,
        specialty_id: Some(SpecialtyId::new(1).expect("positive id")),
        specialty_name: Some("Cardiology".to_owned()),
        experience_years: 12,
        education: None,
        description: None,
        consultation_price: 3000,
        rating: 4.8,
        reviews_count: 120,
        photo: None,
        created_at: at,
        updated_at: at,
    }
}

pub fn sample_appointment(id: i32, status: AppointmentStatus) -> AppointmentDetails {
    let at = Utc
        .with_ymd_and_hms(2024, 5, 20, 8, 0, 0)
        .single()
        .expect("timestamp");
    AppointmentDetails {
        id: AppointmentId::new(id).expect("positive id"),
        patient_id: UserId::new(11).expect("positive id"),
        doctor_id: DoctorId::new(5).expect("positive id"),
        date: "2024-06-01".parse().expect("date"),
        time: "10:00".parse().expect("time"),
        status,
        complaints: Some("headache".to_owned()),
        chronic_diseases: None,
        height_cm: Some(180),
        weight_kg: None,
        notes: None,
        doctor_name: "Dr. Ivanova".to_owned(),
        specialty_name: Some("Cardiology".to_owned()),
        consultation_price: 3000,
        doctor_photo: None,
        patient_name: "Ada Lovelace".to_owned(),
        patient_email: "ada@example.com".to_owned(),
        created_at: at,
        updated_at: at,
    }
}
