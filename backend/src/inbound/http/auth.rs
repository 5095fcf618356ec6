//! Bearer token extractor.
//!
//! Handlers that need an identity take [`AuthenticatedCaller`] as an
//! argument. The extractor reads `Authorization: Bearer <token>` and asks the
//! [`AuthenticationGate`](crate::domain::ports::AuthenticationGate) to resolve
//! it, so a missing or rejected token short-circuits with `401`.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Caller, Error};
use crate::inbound::http::state::HttpState;

const BEARER_SCHEME: &str = "bearer";

/// Identity of the caller behind a verified bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedCaller(pub Caller);

impl AuthenticatedCaller {
    /// The resolved caller.
    #[must_use]
    pub fn caller(&self) -> Caller {
        self.0
    }
}

fn authorization_required() -> Error {
    Error::unauthorized("authorization required")
}

/// Pull the token out of an `Authorization` header value.
///
/// The scheme is matched case-insensitively.
pub(crate) fn bearer_token(header: Option<&str>) -> Result<String, Error> {
    let (scheme, token) = header
        .and_then(|value| value.trim().split_once(' '))
        .ok_or_else(authorization_required)?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) || token.is_empty() {
        return Err(authorization_required());
    }
    Ok(token.to_owned())
}

impl FromRequest for AuthenticatedCaller {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let header = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());
        let token = bearer_token(header);
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        Box::pin(async move {
            let state = state.ok_or_else(|| Error::internal("HTTP state is not configured"))?;
            let caller = state.auth.authenticate(&token?).await?;
            Ok(Self(caller))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorCode, Role};
    use crate::inbound::http::test_utils::{MockPorts, caller_with_role, test_app};
    use actix_web::http::StatusCode;
    use actix_web::{HttpResponse, test as actix_test};
    use rstest::rstest;

    #[rstest]
    #[case::canonical(Some("Bearer abc"), "abc")]
    #[case::lower_case(Some("bearer abc"), "abc")]
    #[case::shouting(Some("BEARER  abc "), "abc")]
    fn accepts_bearer_headers(#[case] header: Option<&str>, #[case] expected: &str) {
        assert_eq!(bearer_token(header).expect("token"), expected);
    }

    #[rstest]
    #[case::missing(None)]
    #[case::basic(Some("Basic dXNlcjpwdw=="))]
    #[case::no_token(Some("Bearer"))]
    #[case::blank_token(Some("Bearer   "))]
    fn rejects_other_headers(#[case] header: Option<&str>) {
        let err = bearer_token(header).expect_err("rejected");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.message(), "authorization required");
    }

    async fn whoami(caller: AuthenticatedCaller) -> HttpResponse {
        HttpResponse::Ok().body(caller.caller().user_id.to_string())
    }

    #[actix_web::test]
    async fn resolves_caller_through_the_gate() {
        let mut ports = MockPorts::default();
        ports
            .auth
            .expect_authenticate()
            .withf(|token| token == "good")
            .returning(|_| Ok(caller_with_role(42, Role::Patient)));
        let app = actix_test::init_service(
            test_app(ports.into_state()).route("/whoami", web::get().to(whoami)),
        )
        .await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/whoami")
                .insert_header((AUTHORIZATION, "Bearer good"))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(actix_test::read_body(response).await, "42");
    }

    #[actix_web::test]
    async fn gate_rejection_is_unauthorised() {
        let mut ports = MockPorts::default();
        ports
            .auth
            .expect_authenticate()
            .returning(|_| Err(Error::unauthorized("token expired")));
        let app = actix_test::init_service(
            test_app(ports.into_state()).route("/whoami", web::get().to(whoami)),
        )
        .await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/whoami")
                .insert_header((AUTHORIZATION, "Bearer stale"))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = actix_test::read_body_json(response).await;
        assert_eq!(body["message"], "token expired");
    }

    #[actix_web::test]
    async fn missing_header_never_reaches_the_gate() {
        let mut ports = MockPorts::default();
        ports.auth.expect_authenticate().times(0);
        let app = actix_test::init_service(
            test_app(ports.into_state()).route("/whoami", web::get().to(whoami)),
        )
        .await;

        let response =
            actix_test::call_service(&app, actix_test::TestRequest::get().uri("/whoami").to_request()).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
