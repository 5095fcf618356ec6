//! Appointment scheduler domain service.
//!
//! Availability is derived on every request from the doctor's active
//! bookings. Reservation atomicity is delegated to the repository, which
//! reports a lost race as [`AppointmentRepositoryError::SlotTaken`].

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::ports::{
    AppointmentRepository, AppointmentRepositoryError, AppointmentScheduler, DoctorRepository,
    DoctorRepositoryError,
};
use crate::domain::{
    AppointmentDate, AppointmentDetails, AppointmentId, BookingRequest, Caller, CancelOutcome,
    DoctorId, Error, NewBooking, SlotAvailability,
};

fn map_appointment_error(error: AppointmentRepositoryError) -> Error {
    match error {
        AppointmentRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("appointment repository unavailable: {message}"))
        }
        AppointmentRepositoryError::Query { message } => {
            Error::internal(format!("appointment repository error: {message}"))
        }
        AppointmentRepositoryError::SlotTaken => Error::conflict("slot already taken"),
        AppointmentRepositoryError::DoctorMissing => Error::not_found("doctor not found"),
    }
}

fn map_doctor_error(error: DoctorRepositoryError) -> Error {
    match error {
        DoctorRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("doctor repository unavailable: {message}"))
        }
        DoctorRepositoryError::Query { message } => {
            Error::internal(format!("doctor repository error: {message}"))
        }
        other @ DoctorRepositoryError::UnknownSpecialty { .. } => Error::internal(other.to_string()),
    }
}

/// Service implementing [`AppointmentScheduler`].
#[derive(Clone)]
pub struct AppointmentSchedulerService<A, D> {
    appointments: Arc<A>,
    doctors: Arc<D>,
}

impl<A, D> AppointmentSchedulerService<A, D> {
    /// Create a new scheduler.
    pub fn new(appointments: Arc<A>, doctors: Arc<D>) -> Self {
        Self {
            appointments,
            doctors,
        }
    }
}

impl<A, D> AppointmentSchedulerService<A, D>
where
    A: AppointmentRepository,
    D: DoctorRepository,
{
    async fn require_doctor(&self, doctor_id: DoctorId) -> Result<(), Error> {
        self.doctors
            .find_by_id(doctor_id)
            .await
            .map_err(map_doctor_error)?
            .map(|_| ())
            .ok_or_else(|| Error::not_found(format!("doctor {doctor_id} not found")))
    }
}

#[async_trait]
impl<A, D> AppointmentScheduler for AppointmentSchedulerService<A, D>
where
    A: AppointmentRepository,
    D: DoctorRepository,
{
    async fn available_slots(
        &self,
        doctor_id: DoctorId,
        date: AppointmentDate,
    ) -> Result<SlotAvailability, Error> {
        self.require_doctor(doctor_id).await?;
        let booked = self
            .appointments
            .booked_times(doctor_id, date)
            .await
            .map_err(map_appointment_error)?;
        let availability = SlotAvailability::compute(date, booked);
        debug!(
            %doctor_id,
            %date,
            booked = availability.booked.len(),
            available = availability.available.len(),
            "computed slot availability"
        );
        Ok(availability)
    }

    async fn book(
        &self,
        caller: Caller,
        request: BookingRequest,
    ) -> Result<AppointmentDetails, Error> {
        caller.require_patient()?;
        self.require_doctor(request.doctor_id).await?;
        let booking = NewBooking {
            patient_id: caller.user_id,
            request,
        };
        let details = self
            .appointments
            .book(&booking)
            .await
            .map_err(map_appointment_error)?;
        info!(
            appointment_id = %details.id,
            doctor_id = %details.doctor_id,
            date = %details.date,
            time = %details.time,
            patient_id = %caller.user_id,
            "appointment booked"
        );
        Ok(details)
    }

    async fn cancel(&self, caller: Caller, id: AppointmentId) -> Result<AppointmentDetails, Error> {
        match self
            .appointments
            .cancel(id, caller.user_id)
            .await
            .map_err(map_appointment_error)?
        {
            CancelOutcome::Cancelled(details) => {
                info!(appointment_id = %id, patient_id = %caller.user_id, "appointment cancelled");
                Ok(*details)
            }
            CancelOutcome::NotFound => Err(Error::not_found(format!("appointment {id} not found"))),
            CancelOutcome::AlreadyCancelled => {
                Err(Error::conflict("appointment already cancelled"))
            }
        }
    }

    async fn my_appointments(&self, caller: Caller) -> Result<Vec<AppointmentDetails>, Error> {
        self.appointments
            .list_for_patient(caller.user_id)
            .await
            .map_err(map_appointment_error)
    }

    async fn all_appointments(&self, caller: Caller) -> Result<Vec<AppointmentDetails>, Error> {
        caller.require_admin()?;
        self.appointments
            .list_all()
            .await
            .map_err(map_appointment_error)
    }
}

#[cfg(test)]
#[path = "appointment_scheduler_service_tests.rs"]
mod tests;
