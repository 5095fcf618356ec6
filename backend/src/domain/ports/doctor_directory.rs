//! Driving port for the doctor directory and specialty listing.

use async_trait::async_trait;

use crate::domain::{
    Caller, Doctor, DoctorDraft, DoctorFilter, DoctorId, DoctorUpdate, Error, Specialty,
};

/// Directory use-cases. Mutations require an administrator caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DoctorDirectory: Send + Sync {
    /// Doctors matching the filter.
    async fn list_doctors(&self, filter: DoctorFilter) -> Result<Vec<Doctor>, Error>;

    /// One doctor, or `not_found`.
    async fn get_doctor(&self, id: DoctorId) -> Result<Doctor, Error>;

    /// Add a doctor.
    async fn create_doctor(&self, caller: Caller, draft: DoctorDraft) -> Result<Doctor, Error>;

    /// Coalesce a partial update into a doctor.
    async fn update_doctor(
        &self,
        caller: Caller,
        id: DoctorId,
        update: DoctorUpdate,
    ) -> Result<Doctor, Error>;

    /// Remove a doctor and return its id.
    async fn delete_doctor(&self, caller: Caller, id: DoctorId) -> Result<DoctorId, Error>;

    /// All specialties ordered by name.
    async fn list_specialties(&self) -> Result<Vec<Specialty>, Error>;
}
