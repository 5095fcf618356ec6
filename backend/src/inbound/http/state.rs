//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only see driving ports, so
//! every endpoint can be exercised against mocks without a database.

use std::sync::Arc;

use crate::domain::ports::{
    AppointmentScheduler, AuthenticationGate, DoctorDirectory, UserDirectory,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Registration, login, and profile use-cases.
    pub accounts: Arc<dyn UserDirectory>,
    /// Bearer token verification.
    pub auth: Arc<dyn AuthenticationGate>,
    /// Doctor and specialty directory.
    pub doctors: Arc<dyn DoctorDirectory>,
    /// Slot availability and bookings.
    pub appointments: Arc<dyn AppointmentScheduler>,
}

impl HttpState {
    /// Bundle the driving ports.
    pub fn new(
        accounts: Arc<dyn UserDirectory>,
        auth: Arc<dyn AuthenticationGate>,
        doctors: Arc<dyn DoctorDirectory>,
        appointments: Arc<dyn AppointmentScheduler>,
    ) -> Self {
        Self {
            accounts,
            auth,
            doctors,
            appointments,
        }
    }
}
