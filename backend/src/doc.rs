//! OpenAPI document for the Care+ REST API.
//!
//! [`ApiDoc`] registers every handler under `/api` plus the health probes,
//! the error envelope schemas, and the `BearerAuth` security scheme used by
//! authenticated routes. Swagger UI serves it in debug builds and
//! `openapi-dump` prints it for external tooling.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorEnvelopeSchema, ErrorSchema};

/// Name of the bearer token scheme referenced by handler annotations.
pub const BEARER_SCHEME: &str = "BearerAuth";

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);
        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Token returned by /api/auth/login or /api/auth/register."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Care+ API",
        description = "Clinic directory, patient accounts, and appointment booking."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::accounts::register,
        crate::inbound::http::accounts::login,
        crate::inbound::http::accounts::current_user,
        crate::inbound::http::accounts::update_current_user,
        crate::inbound::http::doctors::list_doctors,
        crate::inbound::http::doctors::get_doctor,
        crate::inbound::http::doctors::create_doctor,
        crate::inbound::http::doctors::update_doctor,
        crate::inbound::http::doctors::delete_doctor,
        crate::inbound::http::specialties::list_specialties,
        crate::inbound::http::appointments::available_slots,
        crate::inbound::http::appointments::book,
        crate::inbound::http::appointments::my_appointments,
        crate::inbound::http::appointments::cancel,
        crate::inbound::http::appointments::list_appointments,
        crate::inbound::http::health::health,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(ErrorSchema, ErrorCodeSchema, ErrorEnvelopeSchema)),
    tags(
        (name = "auth", description = "Registration, login, and the caller's profile"),
        (name = "doctors", description = "Doctor directory and specialties"),
        (name = "appointments", description = "Slot availability and bookings"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;
