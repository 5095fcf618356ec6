//! PostgreSQL-backed `DoctorRepository` implementation using Diesel ORM.
//!
//! Every read joins `specialties` so the specialty name travels with the
//! doctor. Deleting a doctor cascades to their appointments at the schema
//! level.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{DoctorRepository, DoctorRepositoryError};
use crate::domain::{
    Doctor, DoctorDraft, DoctorFilter, DoctorId, DoctorUpdate, DoctorValidationError, PersonName,
    SpecialtyId,
};

use super::diesel_basic_error_mapping::{
    map_basic_diesel_error, map_basic_pool_error, violated_constraint,
};
use super::models::{DoctorChangeset, DoctorRow, NewDoctorRow};
use super::pool::{DbPool, PoolError};
use super::schema::{doctors, specialties};

const SPECIALTY_FOREIGN_KEY: &str = "doctors_specialty_id_fkey";

type DoctorWithSpecialty = (DoctorRow, Option<String>);

/// Diesel-backed implementation of the doctor repository port.
#[derive(Clone)]
pub struct DieselDoctorRepository {
    pool: DbPool,
}

impl DieselDoctorRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> DoctorRepositoryError {
    map_basic_pool_error(error, DoctorRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> DoctorRepositoryError {
    map_basic_diesel_error(
        error,
        DoctorRepositoryError::query,
        DoctorRepositoryError::connection,
    )
}

/// Map write errors, recognising a dangling specialty reference.
fn map_write_error(
    error: diesel::result::Error,
    specialty_id: Option<SpecialtyId>,
) -> DoctorRepositoryError {
    match (violated_constraint(&error), specialty_id) {
        (Some((DatabaseErrorKind::ForeignKeyViolation, SPECIALTY_FOREIGN_KEY)), Some(id)) => {
            DoctorRepositoryError::unknown_specialty(id.get())
        }
        _ => map_diesel_error(error),
    }
}

/// Escape `LIKE` metacharacters so user input matches literally.
fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn row_to_doctor((row, specialty_name): DoctorWithSpecialty) -> Result<Doctor, DoctorRepositoryError> {
    let id = DoctorId::new(row.id)
        .map_err(|err| DoctorRepositoryError::query(format!("invalid doctor row: {err}")))?;
    let specialty_id = row
        .specialty_id
        .map(SpecialtyId::new)
        .transpose()
        .map_err(|err| DoctorRepositoryError::query(format!("invalid doctor row: {err}")))?;

    Ok(Doctor {
        id,
        name: row.name,
        email: row.email,
        phone: row.phone,
        specialty_id,
        specialty_name,
        experience_years: row.experience_years,
        education: row.education,
        description: row.description,
        consultation_price: row.consultation_price,
        rating: row.rating,
        reviews_count: row.reviews_count,
        photo: row.photo,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

async fn fetch_doctor(
    conn: &mut AsyncPgConnection,
    id: i32,
) -> QueryResult<Option<DoctorWithSpecialty>> {
    doctors::table
        .left_join(specialties::table)
        .filter(doctors::id.eq(id))
        .select((DoctorRow::as_select(), specialties::name.nullable()))
        .first(conn)
        .await
        .optional()
}

#[async_trait]
impl DoctorRepository for DieselDoctorRepository {
    async fn list(&self, filter: &DoctorFilter) -> Result<Vec<Doctor>, DoctorRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = doctors::table
            .left_join(specialties::table)
            .select((DoctorRow::as_select(), specialties::name.nullable()))
            .into_boxed();
        if let Some(specialty_id) = filter.specialty_id() {
            query = query.filter(doctors::specialty_id.eq(specialty_id.get()));
        }
        if let Some(term) = filter.name_contains() {
            query = query.filter(doctors::name.ilike(contains_pattern(term)));
        }

        let rows: Vec<DoctorWithSpecialty> = query
            .order((doctors::rating.desc(), doctors::name.asc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_doctor).collect()
    }

    async fn find_by_id(&self, id: DoctorId) -> Result<Option<Doctor>, DoctorRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        fetch_doctor(&mut conn, id.get())
            .await
            .map_err(map_diesel_error)?
            .map(row_to_doctor)
            .transpose()
    }

    async fn create(&self, draft: &DoctorDraft) -> Result<Doctor, DoctorRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewDoctorRow {
            name: draft.name.as_str(),
            email: draft.text.email.as_deref(),
            phone: draft.text.phone.as_deref(),
            specialty_id: Some(draft.specialty_id.get()),
            experience_years: draft.metrics.experience_years,
            education: draft.text.education.as_deref(),
            description: draft.text.description.as_deref(),
            consultation_price: draft.metrics.consultation_price,
            rating: draft.metrics.rating,
            reviews_count: draft.metrics.reviews_count,
            photo: draft.text.photo.as_deref(),
        };
        let id: i32 = diesel::insert_into(doctors::table)
            .values(&new_row)
            .returning(doctors::id)
            .get_result(&mut conn)
            .await
            .map_err(|err| map_write_error(err, Some(draft.specialty_id)))?;

        fetch_doctor(&mut conn, id)
            .await
            .map_err(map_diesel_error)?
            .map(row_to_doctor)
            .transpose()?
            .ok_or_else(|| DoctorRepositoryError::query("inserted doctor not readable"))
    }

    async fn update(
        &self,
        id: DoctorId,
        update: &DoctorUpdate,
    ) -> Result<Option<Doctor>, DoctorRepositoryError> {
        if matches!(update.validate(), Err(DoctorValidationError::EmptyUpdate)) {
            return self.find_by_id(id).await;
        }

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changeset = DoctorChangeset {
            name: update.name.as_ref().map(PersonName::as_str),
            email: update.text.email.as_deref(),
            phone: update.text.phone.as_deref(),
            specialty_id: update.specialty_id.map(SpecialtyId::get),
            experience_years: update.metrics.experience_years,
            education: update.text.education.as_deref(),
            description: update.text.description.as_deref(),
            consultation_price: update.metrics.consultation_price,
            rating: update.metrics.rating,
            reviews_count: update.metrics.reviews_count,
            photo: update.text.photo.as_deref(),
        };
        let updated: Option<i32> = diesel::update(doctors::table.find(id.get()))
            .set(&changeset)
            .returning(doctors::id)
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|err| map_write_error(err, update.specialty_id))?;

        let Some(updated) = updated else {
            return Ok(None);
        };
        fetch_doctor(&mut conn, updated)
            .await
            .map_err(map_diesel_error)?
            .map(row_to_doctor)
            .transpose()
    }

    async fn delete(&self, id: DoctorId) -> Result<bool, DoctorRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(doctors::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }
}
