//! Specialty reference data.
//!
//! ```text
//! GET /api/specialties
//! ```

use actix_web::{HttpResponse, get, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::Specialty;
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::Envelope;
use crate::inbound::http::schemas::ErrorEnvelopeSchema;
use crate::inbound::http::state::HttpState;

/// A medical specialty.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SpecialtyResponse {
    pub id: i32,
    #[schema(example = "Cardiology")]
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub created_at: String,
}

impl From<Specialty> for SpecialtyResponse {
    fn from(specialty: Specialty) -> Self {
        Self {
            id: specialty.id.get(),
            name: specialty.name,
            description: specialty.description,
            icon: specialty.icon,
            created_at: specialty.created_at.to_rfc3339(),
        }
    }
}

/// Every specialty ordered by name.
#[utoipa::path(
    get,
    path = "/api/specialties",
    responses(
        (status = 200, description = "Specialties", body = Envelope<Vec<SpecialtyResponse>>),
        (status = 503, description = "Database unavailable", body = ErrorEnvelopeSchema)
    ),
    tags = ["doctors"],
    operation_id = "listSpecialties",
    security([])
)]
#[get("/specialties")]
pub async fn list_specialties(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let specialties = state.doctors.list_specialties().await?;
    let data: Vec<SpecialtyResponse> = specialties.into_iter().map(Into::into).collect();
    Ok(Envelope::data(data).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Error, SpecialtyId};
    use crate::inbound::http::test_utils::{MockPorts, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use chrono::{TimeZone, Utc};
    use serde_json::Value;

    fn specialty(id: i32, name: &str) -> Specialty {
        Specialty {
            id: SpecialtyId::new(id).expect("positive id"),
            name: name.to_owned(),
            description: None,
            icon: Some("heart".to_owned()),
            created_at: Utc
                .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
                .single()
                .expect("timestamp"),
        }
    }

    #[actix_web::test]
    async fn lists_specialties_in_port_order() {
        let mut ports = MockPorts::default();
        ports.doctors.expect_list_specialties().return_once(|| {
            Ok(vec![specialty(1, "Cardiology"), specialty(5, "Dermatology")])
        });
        let app = actix_test::init_service(test_app(ports.into_state())).await;

        let response =
            actix_test::call_service(&app, actix_test::TestRequest::get().uri("/api/specialties").to_request())
                .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["data"][1]["name"], "Dermatology");
        assert_eq!(body["data"][0]["icon"], "heart");
    }

    #[actix_web::test]
    async fn outage_is_service_unavailable() {
        let mut ports = MockPorts::default();
        ports
            .doctors
            .expect_list_specialties()
            .return_once(|| Err(Error::service_unavailable("specialty repository unavailable")));
        let app = actix_test::init_service(test_app(ports.into_state())).await;

        let response =
            actix_test::call_service(&app, actix_test::TestRequest::get().uri("/api/specialties").to_request())
                .await;

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
