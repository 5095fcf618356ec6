//! Port for appointment persistence.

use async_trait::async_trait;

use crate::domain::{
    AppointmentDate, AppointmentDetails, AppointmentId, CancelOutcome, DoctorId, NewBooking,
    SlotTime, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by appointment repository adapters.
    pub enum AppointmentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "appointment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "appointment repository query failed: {message}",
        /// An active appointment already holds the slot.
        SlotTaken => "slot already taken",
        /// The doctor vanished before the booking was written.
        DoctorMissing => "doctor does not exist",
    }
}

/// Port for booking, cancelling, and listing appointments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// Start times of the doctor's active appointments on a date.
    async fn booked_times(
        &self,
        doctor_id: DoctorId,
        date: AppointmentDate,
    ) -> Result<Vec<SlotTime>, AppointmentRepositoryError>;

    /// Atomically reserve a slot. Fails with
    /// [`AppointmentRepositoryError::SlotTaken`] when an active appointment
    /// already holds the same doctor, date, and time.
    async fn book(
        &self,
        booking: &NewBooking,
    ) -> Result<AppointmentDetails, AppointmentRepositoryError>;

    /// Cancel an appointment owned by `patient_id`.
    async fn cancel(
        &self,
        id: AppointmentId,
        patient_id: UserId,
    ) -> Result<CancelOutcome, AppointmentRepositoryError>;

    /// A patient's appointments, newest date and time first.
    async fn list_for_patient(
        &self,
        patient_id: UserId,
    ) -> Result<Vec<AppointmentDetails>, AppointmentRepositoryError>;

    /// Every appointment, newest date and time first.
    async fn list_all(&self) -> Result<Vec<AppointmentDetails>, AppointmentRepositoryError>;
}
