//! Success envelope wrapped around every JSON payload.
//!
//! ```json
//! {"success": true, "message": "Doctor created", "data": {"id": 7}}
//! ```

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::Serialize;
use utoipa::ToSchema;

/// Successful response body.
#[derive(Debug, Serialize, ToSchema)]
pub struct Envelope<T> {
    /// Always `true`; failures use the error envelope instead.
    pub success: bool,
    /// Optional human-readable summary of what happened.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Endpoint payload.
    pub data: T,
}

impl<T: Serialize> Envelope<T> {
    /// Wrap a payload without a message.
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data,
        }
    }

    /// Wrap a payload together with a summary message.
    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data,
        }
    }

    /// `200 OK` response.
    pub fn ok(self) -> HttpResponse {
        self.respond(StatusCode::OK)
    }

    /// `201 Created` response.
    pub fn created(self) -> HttpResponse {
        self.respond(StatusCode::CREATED)
    }

    fn respond(self, status: StatusCode) -> HttpResponse {
        HttpResponse::build(status).json(self)
    }
}
