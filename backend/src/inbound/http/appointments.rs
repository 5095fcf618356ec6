//! Appointment HTTP handlers.
//!
//! ```text
//! GET /api/appointments/available-slots/{doctorId}?date=2024-06-01
//! POST /api/appointments/book {"doctorId":5,"appointmentDate":"2024-06-01","appointmentTime":"10:00","complaints":"headache"}
//! GET /api/appointments/my-appointments
//! PATCH /api/appointments/{id}/cancel
//! GET /api/appointments
//! ```

use actix_web::{HttpResponse, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    AppointmentDetails, AppointmentId, AppointmentValidationError, BookingRequest, DoctorId,
    Error, IntakeForm, SlotAvailability, SlotTime,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedCaller;
use crate::inbound::http::envelope::Envelope;
use crate::inbound::http::schemas::ErrorEnvelopeSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, invalid_field_error, parse_date, parse_id, parse_slot_time, require,
};

const DOCTOR_ID: FieldName = FieldName::new("doctorId");
const APPOINTMENT_DATE: FieldName = FieldName::new("appointmentDate");

/// Query string of the availability endpoint.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SlotsQuery {
    /// Calendar day as `YYYY-MM-DD`.
    #[param(example = "2024-06-01")]
    pub date: Option<String>,
}

/// Free and taken slots of one doctor on one day.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SlotsResponse {
    #[schema(example = "2024-06-01")]
    pub date: String,
    /// Ascending `HH:MM:SS` slot starts still open.
    pub available_slots: Vec<String>,
    /// Ascending `HH:MM:SS` slot starts already held.
    pub booked_slots: Vec<String>,
    #[schema(example = 25)]
    pub total_slots: usize,
}

fn render_times(times: Vec<SlotTime>) -> Vec<String> {
    times.iter().map(ToString::to_string).collect()
}

impl From<SlotAvailability> for SlotsResponse {
    fn from(value: SlotAvailability) -> Self {
        Self {
            date: value.date.to_string(),
            available_slots: render_times(value.available),
            booked_slots: render_times(value.booked),
            total_slots: value.total,
        }
    }
}

/// Booking body for `POST /api/appointments/book`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingPayload {
    pub doctor_id: Option<i64>,
    #[schema(example = "2024-06-01")]
    pub appointment_date: Option<String>,
    /// `HH:MM` or `HH:MM:SS` on the half-hour grid between 08:00 and 20:00.
    #[schema(example = "10:30")]
    pub appointment_time: Option<String>,
    pub complaints: Option<String>,
    pub chronic_diseases: Option<String>,
    /// Centimetres.
    pub height: Option<i32>,
    /// Kilograms.
    pub weight: Option<i32>,
    pub notes: Option<String>,
}

/// An appointment joined with doctor and patient display fields.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentResponse {
    pub id: i32,
    pub user_id: i32,
    pub doctor_id: i32,
    #[schema(example = "2024-06-01")]
    pub appointment_date: String,
    #[schema(example = "10:30:00")]
    pub appointment_time: String,
    /// `pending`, `scheduled`, `completed`, or `cancelled`.
    #[schema(example = "pending")]
    pub status: String,
    pub complaints: Option<String>,
    pub chronic_diseases: Option<String>,
    pub height: Option<i32>,
    pub weight: Option<i32>,
    pub notes: Option<String>,
    pub doctor_name: String,
    pub specialty_name: Option<String>,
    pub consultation_price: i32,
    pub doctor_photo: Option<String>,
    pub patient_name: String,
    pub patient_email: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<AppointmentDetails> for AppointmentResponse {
    fn from(value: AppointmentDetails) -> Self {
        Self {
            id: value.id.get(),
            user_id: value.patient_id.get(),
            doctor_id: value.doctor_id.get(),
            appointment_date: value.date.to_string(),
            appointment_time: value.time.to_string(),
            status: value.status.to_string(),
            complaints: value.complaints,
            chronic_diseases: value.chronic_diseases,
            height: value.height_cm,
            weight: value.weight_kg,
            notes: value.notes,
            doctor_name: value.doctor_name,
            specialty_name: value.specialty_name,
            consultation_price: value.consultation_price,
            doctor_photo: value.doctor_photo,
            patient_name: value.patient_name,
            patient_email: value.patient_email,
            created_at: value.created_at.to_rfc3339(),
            updated_at: value.updated_at.to_rfc3339(),
        }
    }
}

fn into_responses(rows: Vec<AppointmentDetails>) -> Vec<AppointmentResponse> {
    rows.into_iter().map(AppointmentResponse::from).collect()
}

fn intake_field(err: &AppointmentValidationError) -> FieldName {
    match err {
        AppointmentValidationError::HeightOutOfRange { .. } => FieldName::new("height"),
        AppointmentValidationError::WeightOutOfRange { .. } => FieldName::new("weight"),
        _ => FieldName::new("complaints"),
    }
}

fn parse_booking(payload: BookingPayload) -> Result<BookingRequest, Error> {
    let time_field = FieldName::new("appointmentTime");
    let doctor_id = parse_id(require(payload.doctor_id, DOCTOR_ID)?, DOCTOR_ID)?;
    let date = parse_date(
        &require(payload.appointment_date, APPOINTMENT_DATE)?,
        APPOINTMENT_DATE,
    )?;
    let time = parse_slot_time(&require(payload.appointment_time, time_field)?, time_field)?;
    let complaints = require(payload.complaints, FieldName::new("complaints"))?;
    let intake = IntakeForm::new(
        &complaints,
        payload.chronic_diseases,
        payload.height,
        payload.weight,
        payload.notes,
    )
    .map_err(|err| invalid_field_error(intake_field(&err), err))?;
    Ok(BookingRequest {
        doctor_id,
        date,
        time,
        intake,
    })
}

/// Open and booked slots of a doctor on a date.
#[utoipa::path(
    get,
    path = "/api/appointments/available-slots/{doctorId}",
    params(("doctorId" = i64, Path, description = "Doctor id"), SlotsQuery),
    responses(
        (status = 200, description = "Slot availability", body = Envelope<SlotsResponse>),
        (status = 400, description = "Invalid doctor id or date", body = ErrorEnvelopeSchema),
        (status = 404, description = "Unknown doctor", body = ErrorEnvelopeSchema)
    ),
    tags = ["appointments"],
    operation_id = "availableSlots",
    security([])
)]
#[get("/appointments/available-slots/{doctor_id}")]
pub async fn available_slots(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    query: web::Query<SlotsQuery>,
) -> ApiResult<HttpResponse> {
    let doctor_id: DoctorId = parse_id(path.into_inner(), DOCTOR_ID)?;
    let date_field = FieldName::new("date");
    let date = parse_date(&require(query.into_inner().date, date_field)?, date_field)?;
    let availability = state.appointments.available_slots(doctor_id, date).await?;
    Ok(Envelope::data(SlotsResponse::from(availability)).ok())
}

/// Reserve a slot for the calling patient.
#[utoipa::path(
    post,
    path = "/api/appointments/book",
    request_body = BookingPayload,
    responses(
        (status = 201, description = "Appointment booked", body = Envelope<AppointmentResponse>),
        (status = 400, description = "Invalid booking", body = ErrorEnvelopeSchema),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 403, description = "Patients only", body = ErrorEnvelopeSchema),
        (status = 404, description = "Unknown doctor", body = ErrorEnvelopeSchema),
        (status = 409, description = "Slot already taken", body = ErrorEnvelopeSchema)
    ),
    tags = ["appointments"],
    operation_id = "bookAppointment",
    security(("BearerAuth" = []))
)]
#[post("/appointments/book")]
pub async fn book(
    state: web::Data<HttpState>,
    caller: AuthenticatedCaller,
    payload: web::Json<BookingPayload>,
) -> ApiResult<HttpResponse> {
    let caller = caller.caller();
    caller.require_patient()?;
    let request = parse_booking(payload.into_inner())?;
    let details = state.appointments.book(caller, request).await?;
    Ok(Envelope::with_message("Appointment booked", AppointmentResponse::from(details)).created())
}

/// The caller's appointments, newest first.
#[utoipa::path(
    get,
    path = "/api/appointments/my-appointments",
    responses(
        (status = 200, description = "Own appointments", body = Envelope<Vec<AppointmentResponse>>),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema)
    ),
    tags = ["appointments"],
    operation_id = "myAppointments",
    security(("BearerAuth" = []))
)]
#[get("/appointments/my-appointments")]
pub async fn my_appointments(
    state: web::Data<HttpState>,
    caller: AuthenticatedCaller,
) -> ApiResult<HttpResponse> {
    let rows = state.appointments.my_appointments(caller.caller()).await?;
    Ok(Envelope::data(into_responses(rows)).ok())
}

/// Cancel one of the caller's appointments, freeing its slot.
#[utoipa::path(
    patch,
    path = "/api/appointments/{id}/cancel",
    params(("id" = i64, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "Appointment cancelled", body = Envelope<AppointmentResponse>),
        (status = 400, description = "Invalid id", body = ErrorEnvelopeSchema),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 404, description = "Not found or not owned", body = ErrorEnvelopeSchema),
        (status = 409, description = "Already cancelled", body = ErrorEnvelopeSchema)
    ),
    tags = ["appointments"],
    operation_id = "cancelAppointment",
    security(("BearerAuth" = []))
)]
#[patch("/appointments/{id}/cancel")]
pub async fn cancel(
    state: web::Data<HttpState>,
    caller: AuthenticatedCaller,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let id: AppointmentId = parse_id(path.into_inner(), FieldName::new("id"))?;
    let details = state.appointments.cancel(caller.caller(), id).await?;
    Ok(Envelope::with_message("Appointment cancelled", AppointmentResponse::from(details)).ok())
}

/// Every appointment in the clinic; administrators only.
#[utoipa::path(
    get,
    path = "/api/appointments",
    responses(
        (status = 200, description = "All appointments", body = Envelope<Vec<AppointmentResponse>>),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 403, description = "Administrators only", body = ErrorEnvelopeSchema)
    ),
    tags = ["appointments"],
    operation_id = "listAppointments",
    security(("BearerAuth" = []))
)]
#[get("/appointments")]
pub async fn list_appointments(
    state: web::Data<HttpState>,
    caller: AuthenticatedCaller,
) -> ApiResult<HttpResponse> {
    let rows = state.appointments.all_appointments(caller.caller()).await?;
    Ok(Envelope::data(into_responses(rows)).ok())
}

#[cfg(test)]
#[path = "appointments_tests.rs"]
mod tests;
