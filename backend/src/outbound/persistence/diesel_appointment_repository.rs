//! PostgreSQL-backed `AppointmentRepository` implementation using Diesel ORM.
//!
//! Double booking is prevented twice over: a booking runs in a SERIALIZABLE
//! transaction that checks the slot before inserting, and the partial unique
//! index `appointments_active_slot_idx` rejects a second active row for the
//! same doctor, date, and time. Serialisation failures are retried a bounded
//! number of times; the retry then observes the winning row and reports the
//! slot as taken.

use async_trait::async_trait;
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use tracing::warn;

use crate::domain::ports::{AppointmentRepository, AppointmentRepositoryError};
use crate::domain::{
    AppointmentDate, AppointmentDetails, AppointmentId, AppointmentStatus, CancelOutcome,
    DoctorId, NewBooking, SlotTime, UserId,
};

use super::diesel_basic_error_mapping::{
    is_serialization_failure, map_basic_diesel_error, map_basic_pool_error, violated_constraint,
};
use super::models::{AppointmentRow, NewAppointmentRow};
use super::pool::{DbPool, PoolError};
use super::schema::{appointments, doctors, specialties, users};

const ACTIVE_SLOT_INDEX: &str = "appointments_active_slot_idx";
const DOCTOR_FOREIGN_KEY: &str = "appointments_doctor_id_fkey";
const BOOKING_ATTEMPTS: u32 = 3;

const CANCELLED: &str = AppointmentStatus::Cancelled.as_str();

type DetailsRow = (
    AppointmentRow,
    String,
    Option<String>,
    i32,
    Option<String>,
    String,
    String,
);

/// Appointment joined with doctor, specialty, and patient display columns.
macro_rules! details_query {
    () => {
        appointments::table
            .inner_join(doctors::table.left_join(specialties::table))
            .inner_join(users::table)
            .select((
                AppointmentRow::as_select(),
                doctors::name,
                specialties::name.nullable(),
                doctors::consultation_price,
                doctors::photo,
                users::name,
                users::email,
            ))
    };
}

/// Diesel-backed implementation of the appointment repository port.
#[derive(Clone)]
pub struct DieselAppointmentRepository {
    pool: DbPool,
}

impl DieselAppointmentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Failures raised inside the booking transaction.
#[derive(Debug)]
enum BookingFailure {
    Database(diesel::result::Error),
    SlotTaken,
    DoctorMissing,
}

impl From<diesel::result::Error> for BookingFailure {
    fn from(error: diesel::result::Error) -> Self {
        match violated_constraint(&error) {
            Some((DatabaseErrorKind::UniqueViolation, ACTIVE_SLOT_INDEX)) => Self::SlotTaken,
            Some((DatabaseErrorKind::ForeignKeyViolation, DOCTOR_FOREIGN_KEY)) => {
                Self::DoctorMissing
            }
            _ => Self::Database(error),
        }
    }
}

fn map_pool_error(error: PoolError) -> AppointmentRepositoryError {
    map_basic_pool_error(error, AppointmentRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> AppointmentRepositoryError {
    map_basic_diesel_error(
        error,
        AppointmentRepositoryError::query,
        AppointmentRepositoryError::connection,
    )
}

fn map_booking_failure(failure: BookingFailure) -> AppointmentRepositoryError {
    match failure {
        BookingFailure::Database(error) => map_diesel_error(error),
        BookingFailure::SlotTaken => AppointmentRepositoryError::slot_taken(),
        BookingFailure::DoctorMissing => AppointmentRepositoryError::doctor_missing(),
    }
}

fn invalid_row(err: impl std::fmt::Display) -> AppointmentRepositoryError {
    AppointmentRepositoryError::query(format!("invalid appointment row: {err}"))
}

fn row_to_details(row: DetailsRow) -> Result<AppointmentDetails, AppointmentRepositoryError> {
    let (
        appointment,
        doctor_name,
        specialty_name,
        consultation_price,
        doctor_photo,
        patient_name,
        patient_email,
    ) = row;

    Ok(AppointmentDetails {
        id: AppointmentId::new(appointment.id).map_err(invalid_row)?,
        patient_id: UserId::new(appointment.user_id).map_err(invalid_row)?,
        doctor_id: DoctorId::new(appointment.doctor_id).map_err(invalid_row)?,
        date: AppointmentDate::from_naive(appointment.appointment_date),
        time: SlotTime::from_naive(appointment.appointment_time),
        status: appointment
            .status
            .parse::<AppointmentStatus>()
            .map_err(invalid_row)?,
        complaints: appointment.complaints,
        chronic_diseases: appointment.chronic_diseases,
        height_cm: appointment.height_cm,
        weight_kg: appointment.weight_kg,
        notes: appointment.notes,
        doctor_name,
        specialty_name,
        consultation_price,
        doctor_photo,
        patient_name,
        patient_email,
        created_at: appointment.created_at,
        updated_at: appointment.updated_at,
    })
}

async fn fetch_details(
    conn: &mut AsyncPgConnection,
    id: i32,
) -> QueryResult<Option<DetailsRow>> {
    details_query!()
        .filter(appointments::id.eq(id))
        .first(conn)
        .await
        .optional()
}

/// Check the slot and insert the appointment inside one transaction.
async fn book_once(
    conn: &mut AsyncPgConnection,
    booking: &NewBooking,
) -> Result<DetailsRow, BookingFailure> {
    let request = &booking.request;
    let doctor_id = request.doctor_id.get();
    let date = request.date.as_naive();
    let time = request.time.as_naive();
    let new_row = NewAppointmentRow {
        user_id: booking.patient_id.get(),
        doctor_id,
        appointment_date: date,
        appointment_time: time,
        status: AppointmentStatus::Pending.as_str(),
        complaints: Some(request.intake.complaints()),
        chronic_diseases: request.intake.chronic_diseases(),
        height_cm: request.intake.height_cm(),
        weight_kg: request.intake.weight_kg(),
        notes: request.intake.notes(),
    };

    conn.build_transaction()
        .serializable()
        .run(|conn| {
            async move {
                let doctor_exists: bool =
                    diesel::select(exists(doctors::table.filter(doctors::id.eq(doctor_id))))
                        .get_result(conn)
                        .await?;
                if !doctor_exists {
                    return Err(BookingFailure::DoctorMissing);
                }

                let slot_held: bool = diesel::select(exists(
                    appointments::table
                        .filter(appointments::doctor_id.eq(doctor_id))
                        .filter(appointments::appointment_date.eq(date))
                        .filter(appointments::appointment_time.eq(time))
                        .filter(appointments::status.ne(CANCELLED)),
                ))
                .get_result(conn)
                .await?;
                if slot_held {
                    return Err(BookingFailure::SlotTaken);
                }

                let id: i32 = diesel::insert_into(appointments::table)
                    .values(&new_row)
                    .returning(appointments::id)
                    .get_result(conn)
                    .await?;
                let row: DetailsRow = details_query!()
                    .filter(appointments::id.eq(id))
                    .first(conn)
                    .await?;
                Ok(row)
            }
            .scope_boxed()
        })
        .await
}

#[async_trait]
impl AppointmentRepository for DieselAppointmentRepository {
    async fn booked_times(
        &self,
        doctor_id: DoctorId,
        date: AppointmentDate,
    ) -> Result<Vec<SlotTime>, AppointmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let times: Vec<chrono::NaiveTime> = appointments::table
            .filter(appointments::doctor_id.eq(doctor_id.get()))
            .filter(appointments::appointment_date.eq(date.as_naive()))
            .filter(appointments::status.ne(CANCELLED))
            .select(appointments::appointment_time)
            .order(appointments::appointment_time.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(times.into_iter().map(SlotTime::from_naive).collect())
    }

    async fn book(
        &self,
        booking: &NewBooking,
    ) -> Result<AppointmentDetails, AppointmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut attempt = 1;
        loop {
            match book_once(&mut conn, booking).await {
                Ok(row) => return row_to_details(row),
                Err(BookingFailure::Database(error))
                    if is_serialization_failure(&error) && attempt < BOOKING_ATTEMPTS =>
                {
                    warn!(attempt, "booking transaction hit a serialisation failure; retrying");
                    attempt += 1;
                }
                Err(failure) => return Err(map_booking_failure(failure)),
            }
        }
    }

    async fn cancel(
        &self,
        id: AppointmentId,
        patient_id: UserId,
    ) -> Result<CancelOutcome, AppointmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let owned = appointments::table
            .filter(appointments::id.eq(id.get()))
            .filter(appointments::user_id.eq(patient_id.get()));

        let cancelled: Option<i32> =
            diesel::update(owned.clone().filter(appointments::status.ne(CANCELLED)))
                .set(appointments::status.eq(CANCELLED))
                .returning(appointments::id)
                .get_result(&mut conn)
                .await
                .optional()
                .map_err(map_diesel_error)?;

        if let Some(cancelled) = cancelled {
            let row = fetch_details(&mut conn, cancelled)
                .await
                .map_err(map_diesel_error)?
                .ok_or_else(|| AppointmentRepositoryError::query("cancelled appointment vanished"))?;
            return Ok(CancelOutcome::Cancelled(Box::new(row_to_details(row)?)));
        }

        let still_owned: bool = diesel::select(exists(owned))
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(if still_owned {
            CancelOutcome::AlreadyCancelled
        } else {
            CancelOutcome::NotFound
        })
    }

    async fn list_for_patient(
        &self,
        patient_id: UserId,
    ) -> Result<Vec<AppointmentDetails>, AppointmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<DetailsRow> = details_query!()
            .filter(appointments::user_id.eq(patient_id.get()))
            .order((
                appointments::appointment_date.desc(),
                appointments::appointment_time.desc(),
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_details).collect()
    }

    async fn list_all(&self) -> Result<Vec<AppointmentDetails>, AppointmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<DetailsRow> = details_query!()
            .order((
                appointments::appointment_date.desc(),
                appointments::appointment_time.desc(),
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_details).collect()
    }
}
