//! Doctor directory HTTP handlers.
//!
//! ```text
//! GET /api/doctors?specialty=1&search=iva
//! GET /api/doctors/{id}
//! POST /api/doctors {"name":"Dr. Ivanova","specialtyId":1}
//! PUT /api/doctors/{id} {"consultationPrice":3500}
//! DELETE /api/doctors/{id}
//! ```
//!
//! Reads are public; mutations require an administrator token.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    Doctor, DoctorDraft, DoctorFilter, DoctorId, DoctorMetrics, DoctorProfileText, DoctorUpdate,
    Error, PersonName, SpecialtyId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedCaller;
use crate::inbound::http::envelope::Envelope;
use crate::inbound::http::schemas::ErrorEnvelopeSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, invalid_field_error, parse_id, require};

const DOCTOR_ID: FieldName = FieldName::new("id");
const SPECIALTY_ID: FieldName = FieldName::new("specialtyId");

/// Query string of `GET /api/doctors`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DoctorListQuery {
    /// Restrict to one specialty id.
    pub specialty: Option<i64>,
    /// Case-insensitive substring of the doctor's name.
    pub search: Option<String>,
}

/// Create or update body. `name` and `specialtyId` are required on create.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DoctorRequest {
    pub name: Option<String>,
    pub specialty_id: Option<i64>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub experience_years: Option<i32>,
    pub education: Option<String>,
    pub description: Option<String>,
    /// Whole currency units.
    pub consultation_price: Option<i32>,
    /// Between 0 and 5.
    pub rating: Option<f64>,
    pub reviews_count: Option<i32>,
    pub photo: Option<String>,
}

/// Directory entry joined with its specialty name.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DoctorResponse {
    pub id: i32,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub specialty_id: Option<i32>,
    #[schema(example = "Cardiology")]
    pub specialty_name: Option<String>,
    pub experience_years: i32,
    pub education: Option<String>,
    pub description: Option<String>,
    pub consultation_price: i32,
    #[schema(example = 4.8)]
    pub rating: f64,
    pub reviews_count: i32,
    pub photo: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Doctor> for DoctorResponse {
    fn from(doctor: Doctor) -> Self {
        Self {
            id: doctor.id.get(),
            name: doctor.name,
            email: doctor.email,
            phone: doctor.phone,
            specialty_id: doctor.specialty_id.map(SpecialtyId::get),
            specialty_name: doctor.specialty_name,
            experience_years: doctor.experience_years,
            education: doctor.education,
            description: doctor.description,
            consultation_price: doctor.consultation_price,
            rating: doctor.rating,
            reviews_count: doctor.reviews_count,
            photo: doctor.photo,
            created_at: doctor.created_at.to_rfc3339(),
            updated_at: doctor.updated_at.to_rfc3339(),
        }
    }
}

/// Identifier of a removed doctor.
#[derive(Debug, Serialize, ToSchema)]
pub struct DeletedDoctor {
    pub id: i32,
}

fn parse_name(raw: String) -> Result<PersonName, Error> {
    PersonName::new(raw).map_err(|err| invalid_field_error(FieldName::new("name"), err))
}

fn split_payload(payload: DoctorRequest) -> (Option<String>, Option<i64>, DoctorProfileText, DoctorMetrics) {
    let DoctorRequest {
        name,
        specialty_id,
        email,
        phone,
        experience_years,
        education,
        description,
        consultation_price,
        rating,
        reviews_count,
        photo,
    } = payload;
    let text = DoctorProfileText {
        email,
        phone,
        education,
        description,
        photo,
    };
    let metrics = DoctorMetrics {
        experience_years,
        consultation_price,
        rating,
        reviews_count,
    };
    (name, specialty_id, text, metrics)
}

fn parse_draft(payload: DoctorRequest) -> Result<DoctorDraft, Error> {
    let (name, specialty_id, text, metrics) = split_payload(payload);
    let name = parse_name(require(name, FieldName::new("name"))?)?;
    let specialty_id = parse_id(require(specialty_id, SPECIALTY_ID)?, SPECIALTY_ID)?;
    Ok(DoctorDraft {
        name,
        specialty_id,
        text,
        metrics,
    })
}

fn parse_update(payload: DoctorRequest) -> Result<DoctorUpdate, Error> {
    let (name, specialty_id, text, metrics) = split_payload(payload);
    Ok(DoctorUpdate {
        name: name.map(parse_name).transpose()?,
        specialty_id: specialty_id
            .map(|raw| parse_id(raw, SPECIALTY_ID))
            .transpose()?,
        text,
        metrics,
    })
}

fn into_responses(doctors: Vec<Doctor>) -> Vec<DoctorResponse> {
    doctors.into_iter().map(DoctorResponse::from).collect()
}

/// List doctors ordered by rating (highest first), then name.
#[utoipa::path(
    get,
    path = "/api/doctors",
    params(DoctorListQuery),
    responses(
        (status = 200, description = "Doctors", body = Envelope<Vec<DoctorResponse>>),
        (status = 400, description = "Invalid filter", body = ErrorEnvelopeSchema),
        (status = 500, description = "Internal server error", body = ErrorEnvelopeSchema)
    ),
    tags = ["doctors"],
    operation_id = "listDoctors",
    security([])
)]
#[get("/doctors")]
pub async fn list_doctors(
    state: web::Data<HttpState>,
    query: web::Query<DoctorListQuery>,
) -> ApiResult<HttpResponse> {
    let DoctorListQuery { specialty, search } = query.into_inner();
    let specialty_id: Option<SpecialtyId> = specialty
        .map(|raw| parse_id(raw, FieldName::new("specialty")))
        .transpose()?;
    let doctors = state
        .doctors
        .list_doctors(DoctorFilter::new(specialty_id, search))
        .await?;
    Ok(Envelope::data(into_responses(doctors)).ok())
}

/// Fetch one doctor.
#[utoipa::path(
    get,
    path = "/api/doctors/{id}",
    params(("id" = i64, Path, description = "Doctor id")),
    responses(
        (status = 200, description = "Doctor", body = Envelope<DoctorResponse>),
        (status = 400, description = "Invalid id", body = ErrorEnvelopeSchema),
        (status = 404, description = "Unknown doctor", body = ErrorEnvelopeSchema)
    ),
    tags = ["doctors"],
    operation_id = "getDoctor",
    security([])
)]
#[get("/doctors/{id}")]
pub async fn get_doctor(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let id: DoctorId = parse_id(path.into_inner(), DOCTOR_ID)?;
    let doctor = state.doctors.get_doctor(id).await?;
    Ok(Envelope::data(DoctorResponse::from(doctor)).ok())
}

/// Add a doctor to the directory.
#[utoipa::path(
    post,
    path = "/api/doctors",
    request_body = DoctorRequest,
    responses(
        (status = 201, description = "Doctor created", body = Envelope<DoctorResponse>),
        (status = 400, description = "Invalid doctor", body = ErrorEnvelopeSchema),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 403, description = "Administrators only", body = ErrorEnvelopeSchema)
    ),
    tags = ["doctors"],
    operation_id = "createDoctor",
    security(("BearerAuth" = []))
)]
#[post("/doctors")]
pub async fn create_doctor(
    state: web::Data<HttpState>,
    caller: AuthenticatedCaller,
    payload: web::Json<DoctorRequest>,
) -> ApiResult<HttpResponse> {
    let caller = caller.caller();
    caller.require_admin()?;
    let draft = parse_draft(payload.into_inner())?;
    let doctor = state.doctors.create_doctor(caller, draft).await?;
    Ok(Envelope::with_message("Doctor created", DoctorResponse::from(doctor)).created())
}

/// Coalesce supplied fields into an existing doctor.
#[utoipa::path(
    put,
    path = "/api/doctors/{id}",
    params(("id" = i64, Path, description = "Doctor id")),
    request_body = DoctorRequest,
    responses(
        (status = 200, description = "Doctor updated", body = Envelope<DoctorResponse>),
        (status = 400, description = "Invalid update", body = ErrorEnvelopeSchema),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 403, description = "Administrators only", body = ErrorEnvelopeSchema),
        (status = 404, description = "Unknown doctor", body = ErrorEnvelopeSchema)
    ),
    tags = ["doctors"],
    operation_id = "updateDoctor",
    security(("BearerAuth" = []))
)]
#[put("/doctors/{id}")]
pub async fn update_doctor(
    state: web::Data<HttpState>,
    caller: AuthenticatedCaller,
    path: web::Path<i64>,
    payload: web::Json<DoctorRequest>,
) -> ApiResult<HttpResponse> {
    let caller = caller.caller();
    caller.require_admin()?;
    let id: DoctorId = parse_id(path.into_inner(), DOCTOR_ID)?;
    let update = parse_update(payload.into_inner())?;
    let doctor = state.doctors.update_doctor(caller, id, update).await?;
    Ok(Envelope::with_message("Doctor updated", DoctorResponse::from(doctor)).ok())
}

/// Remove a doctor; their appointments go with them.
#[utoipa::path(
    delete,
    path = "/api/doctors/{id}",
    params(("id" = i64, Path, description = "Doctor id")),
    responses(
        (status = 200, description = "Doctor deleted", body = Envelope<DeletedDoctor>),
        (status = 400, description = "Invalid id", body = ErrorEnvelopeSchema),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 403, description = "Administrators only", body = ErrorEnvelopeSchema),
        (status = 404, description = "Unknown doctor", body = ErrorEnvelopeSchema)
    ),
    tags = ["doctors"],
    operation_id = "deleteDoctor",
    security(("BearerAuth" = []))
)]
#[delete("/doctors/{id}")]
pub async fn delete_doctor(
    state: web::Data<HttpState>,
    caller: AuthenticatedCaller,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let id: DoctorId = parse_id(path.into_inner(), DOCTOR_ID)?;
    let removed = state.doctors.delete_doctor(caller.caller(), id).await?;
    Ok(Envelope::with_message("Doctor deleted", DeletedDoctor { id: removed.get() }).ok())
}

#[cfg(test)]
#[path = "doctors_tests.rs"]
mod tests;
