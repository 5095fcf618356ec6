//! Doctor directory domain service.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{
    DoctorDirectory, DoctorRepository, DoctorRepositoryError, SpecialtyRepository,
    SpecialtyRepositoryError,
};
use crate::domain::{
    Caller, Doctor, DoctorDraft, DoctorFilter, DoctorId, DoctorUpdate, Error, Specialty,
};

fn map_doctor_error(error: DoctorRepositoryError) -> Error {
    match error {
        DoctorRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("doctor repository unavailable: {message}"))
        }
        DoctorRepositoryError::Query { message } => {
            Error::internal(format!("doctor repository error: {message}"))
        }
        DoctorRepositoryError::UnknownSpecialty { specialty_id } => {
            Error::invalid_request(format!("specialty {specialty_id} does not exist"))
        }
    }
}

fn map_specialty_error(error: SpecialtyRepositoryError) -> Error {
    match error {
        SpecialtyRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("specialty repository unavailable: {message}"))
        }
        SpecialtyRepositoryError::Query { message } => {
            Error::internal(format!("specialty repository error: {message}"))
        }
    }
}

fn doctor_not_found(id: DoctorId) -> Error {
    Error::not_found(format!("doctor {id} not found"))
}

/// Service implementing [`DoctorDirectory`].
#[derive(Clone)]
pub struct DoctorDirectoryService<D, S> {
    doctors: Arc<D>,
    specialties: Arc<S>,
}

impl<D, S> DoctorDirectoryService<D, S> {
    /// Create a new service.
    pub fn new(doctors: Arc<D>, specialties: Arc<S>) -> Self {
        Self {
            doctors,
            specialties,
        }
    }
}

#[async_trait]
impl<D, S> DoctorDirectory for DoctorDirectoryService<D, S>
where
    D: DoctorRepository,
    S: SpecialtyRepository,
{
    async fn list_doctors(&self, filter: DoctorFilter) -> Result<Vec<Doctor>, Error> {
        self.doctors.list(&filter).await.map_err(map_doctor_error)
    }

    async fn get_doctor(&self, id: DoctorId) -> Result<Doctor, Error> {
        self.doctors
            .find_by_id(id)
            .await
            .map_err(map_doctor_error)?
            .ok_or_else(|| doctor_not_found(id))
    }

    async fn create_doctor(&self, caller: Caller, draft: DoctorDraft) -> Result<Doctor, Error> {
        caller.require_admin()?;
        draft
            .validate()
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let doctor = self.doctors.create(&draft).await.map_err(map_doctor_error)?;
        info!(doctor_id = %doctor.id, admin_id = %caller.user_id, "doctor created");
        Ok(doctor)
    }

    async fn update_doctor(
        &self,
        caller: Caller,
        id: DoctorId,
        update: DoctorUpdate,
    ) -> Result<Doctor, Error> {
        caller.require_admin()?;
        update
            .validate()
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        self.doctors
            .update(id, &update)
            .await
            .map_err(map_doctor_error)?
            .ok_or_else(|| doctor_not_found(id))
    }

    async fn delete_doctor(&self, caller: Caller, id: DoctorId) -> Result<DoctorId, Error> {
        caller.require_admin()?;
        let removed = self.doctors.delete(id).await.map_err(map_doctor_error)?;
        if !removed {
            return Err(doctor_not_found(id));
        }
        info!(doctor_id = %id, admin_id = %caller.user_id, "doctor deleted");
        Ok(id)
    }

    async fn list_specialties(&self) -> Result<Vec<Specialty>, Error> {
        self.specialties.list().await.map_err(map_specialty_error)
    }
}

#[cfg(test)]
#[path = "doctor_directory_service_tests.rs"]
mod tests;
