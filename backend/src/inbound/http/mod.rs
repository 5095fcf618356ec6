//! HTTP inbound adapter exposing the REST API.
//!
//! [`configure_api`] registers every `/api` endpoint together with extractor
//! configuration that turns malformed JSON, query strings, and path segments
//! into `400 invalid_request` responses.

pub mod accounts;
pub mod appointments;
pub mod auth;
pub mod doctors;
pub mod envelope;
pub mod error;
pub mod health;
pub mod schemas;
pub mod specialties;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;
use error::{json_error_handler, path_error_handler, query_error_handler};

/// Mount the API routes onto a scope (normally `/api`).
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .service(accounts::register)
        .service(accounts::login)
        .service(accounts::current_user)
        .service(accounts::update_current_user)
        .service(doctors::list_doctors)
        .service(doctors::get_doctor)
        .service(doctors::create_doctor)
        .service(doctors::update_doctor)
        .service(doctors::delete_doctor)
        .service(specialties::list_specialties)
        .service(appointments::available_slots)
        .service(appointments::book)
        .service(appointments::my_appointments)
        .service(appointments::cancel)
        .service(appointments::list_appointments);
}
