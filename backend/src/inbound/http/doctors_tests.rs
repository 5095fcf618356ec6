//! Tests for the doctor directory handlers.

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::Role;
use crate::inbound::http::test_utils::{
    MockPorts, bearer, caller_with_role, sample_doctor, test_app,
};

async fn send(ports: MockPorts, request: actix_test::TestRequest) -> (StatusCode, Value) {
    let app = actix_test::init_service(test_app(ports.into_state())).await;
    let response = actix_test::call_service(&app, request.to_request()).await;
    let status = response.status();
    let body = actix_test::read_body_json(response).await;
    (status, body)
}

fn as_admin() -> MockPorts {
    let mut ports = MockPorts::default();
    ports.authenticate_as(caller_with_role(1, Role::Admin));
    ports
}

#[actix_web::test]
async fn list_forwards_filters() {
    let mut ports = MockPorts::default();
    ports
        .doctors
        .expect_list_doctors()
        .withf(|filter| {
            filter.specialty_id().map(SpecialtyId::get) == Some(1)
                && filter.name_contains() == Some("iva")
        })
        .return_once(|_| Ok(vec![sample_doctor(3), sample_doctor(4)]));

    let (status, body) = send(
        ports,
        actix_test::TestRequest::get().uri("/api/doctors?specialty=1&search=iva"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let rows = body["data"].as_array().expect("array");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["specialtyName"], "Cardiology");
    assert_eq!(rows[0]["consultationPrice"], 3000);
}

#[rstest]
#[case::zero("/api/doctors?specialty=0")]
#[case::text("/api/doctors?specialty=cardio")]
#[case::path_text("/api/doctors/abc")]
#[case::path_negative("/api/doctors/-3")]
#[actix_web::test]
async fn malformed_ids_are_bad_requests(#[case] uri: &str) {
    let mut ports = MockPorts::default();
    ports.doctors.expect_list_doctors().times(0);
    ports.doctors.expect_get_doctor().times(0);

    let (status, body) = send(ports, actix_test::TestRequest::get().uri(uri)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "invalid_request");
}

#[actix_web::test]
async fn missing_doctor_is_not_found() {
    let mut ports = MockPorts::default();
    ports
        .doctors
        .expect_get_doctor()
        .return_once(|id| Err(Error::not_found(format!("doctor {id} not found"))));

    let (status, body) = send(ports, actix_test::TestRequest::get().uri("/api/doctors/99")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "doctor 99 not found");
}

#[actix_web::test]
async fn create_requires_admin() {
    let mut ports = MockPorts::default();
    ports.authenticate_as(caller_with_role(11, Role::Patient));
    ports.doctors.expect_create_doctor().times(0);

    let (status, body) = send(
        ports,
        actix_test::TestRequest::post()
            .uri("/api/doctors")
            .insert_header(bearer())
            .set_json(json!({"name": "Dr. Who", "specialtyId": 1})),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "forbidden");
}

#[rstest]
#[case::no_name(json!({"specialtyId": 1}), "name")]
#[case::no_specialty(json!({"name": "Dr. Who"}), "specialtyId")]
#[case::bad_specialty(json!({"name": "Dr. Who", "specialtyId": -1}), "specialtyId")]
#[actix_web::test]
async fn create_requires_name_and_specialty(#[case] payload: Value, #[case] field: &str) {
    let mut ports = as_admin();
    ports.doctors.expect_create_doctor().times(0);

    let (status, body) = send(
        ports,
        actix_test::TestRequest::post()
            .uri("/api/doctors")
            .insert_header(bearer())
            .set_json(payload),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["details"]["field"], field);
}

#[actix_web::test]
async fn create_returns_created_doctor() {
    let mut ports = as_admin();
    ports
        .doctors
        .expect_create_doctor()
        .withf(|_, draft| {
            draft.name.as_str() == "Dr. Ivanova"
                && draft.specialty_id.get() == 1
                && draft.metrics.consultation_price == Some(3000)
        })
        .return_once(|_, _| Ok(sample_doctor(5)));

    let (status, body) = send(
        ports,
        actix_test::TestRequest::post()
            .uri("/api/doctors")
            .insert_header(bearer())
            .set_json(json!({
                "name": "Dr. Ivanova",
                "specialtyId": 1,
                "consultationPrice": 3000
            })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Doctor created");
    assert_eq!(body["data"]["id"], 5);
}

#[actix_web::test]
async fn update_passes_only_supplied_fields() {
    let mut ports = as_admin();
    ports
        .doctors
        .expect_update_doctor()
        .withf(|_, id, update| {
            id.get() == 5
                && update.name.is_none()
                && update.metrics.rating == Some(4.9)
                && update.text.photo.as_deref() == Some("/img/ivanova.png")
        })
        .return_once(|_, _, _| Ok(sample_doctor(5)));

    let (status, _) = send(
        ports,
        actix_test::TestRequest::put()
            .uri("/api/doctors/5")
            .insert_header(bearer())
            .set_json(json!({"rating": 4.9, "photo": "/img/ivanova.png"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn delete_reports_the_removed_id() {
    let mut ports = as_admin();
    ports
        .doctors
        .expect_delete_doctor()
        .return_once(|_, id| Ok(id));

    let (status, body) = send(
        ports,
        actix_test::TestRequest::delete()
            .uri("/api/doctors/8")
            .insert_header(bearer()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!({"id": 8}));
}
