//! Driving port for slot availability and booking use-cases.

use async_trait::async_trait;

use crate::domain::{
    AppointmentDate, AppointmentDetails, AppointmentId, BookingRequest, Caller, DoctorId, Error,
    SlotAvailability,
};

/// Scheduling use-cases invoked by inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppointmentScheduler: Send + Sync {
    /// Free and booked slots of a doctor on a date.
    async fn available_slots(
        &self,
        doctor_id: DoctorId,
        date: AppointmentDate,
    ) -> Result<SlotAvailability, Error>;

    /// Reserve a slot for a patient caller.
    async fn book(
        &self,
        caller: Caller,
        request: BookingRequest,
    ) -> Result<AppointmentDetails, Error>;

    /// Cancel one of the caller's appointments.
    async fn cancel(&self, caller: Caller, id: AppointmentId) -> Result<AppointmentDetails, Error>;

    /// The caller's own appointments.
    async fn my_appointments(&self, caller: Caller) -> Result<Vec<AppointmentDetails>, Error>;

    /// Every appointment; administrators only.
    async fn all_appointments(&self, caller: Caller) -> Result<Vec<AppointmentDetails>, Error>;
}
