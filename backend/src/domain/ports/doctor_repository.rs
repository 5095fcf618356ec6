//! Port for doctor directory persistence.

use async_trait::async_trait;

use crate::domain::{Doctor, DoctorDraft, DoctorFilter, DoctorId, DoctorUpdate};

use super::define_port_error;

define_port_error! {
    /// Errors raised by doctor repository adapters.
    pub enum DoctorRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "doctor repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "doctor repository query failed: {message}",
        /// The referenced specialty does not exist.
        UnknownSpecialty { specialty_id: i32 } => "specialty {specialty_id} does not exist",
    }
}

/// Port for reading and mutating doctors.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DoctorRepository: Send + Sync {
    /// List doctors matching the filter, best rated first, then by name.
    async fn list(&self, filter: &DoctorFilter) -> Result<Vec<Doctor>, DoctorRepositoryError>;

    /// Fetch one doctor.
    async fn find_by_id(&self, id: DoctorId) -> Result<Option<Doctor>, DoctorRepositoryError>;

    /// Insert a doctor.
    async fn create(&self, draft: &DoctorDraft) -> Result<Doctor, DoctorRepositoryError>;

    /// Coalesce a partial update, returning `None` when the doctor is gone.
    async fn update(
        &self,
        id: DoctorId,
        update: &DoctorUpdate,
    ) -> Result<Option<Doctor>, DoctorRepositoryError>;

    /// Delete a doctor, returning whether a row was removed.
    async fn delete(&self, id: DoctorId) -> Result<bool, DoctorRepositoryError>;
}
