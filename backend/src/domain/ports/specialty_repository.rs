//! Port for specialty reference data.

use async_trait::async_trait;

use crate::domain::Specialty;

use super::define_port_error;

define_port_error! {
    /// Errors raised by specialty repository adapters.
    pub enum SpecialtyRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "specialty repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "specialty repository query failed: {message}",
    }
}

/// Read access to specialties.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpecialtyRepository: Send + Sync {
    /// Every specialty ordered by name.
    async fn list(&self) -> Result<Vec<Specialty>, SpecialtyRepositoryError>;
}
