//! PostgreSQL-backed `SpecialtyRepository` implementation.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{SpecialtyRepository, SpecialtyRepositoryError};
use crate::domain::{Specialty, SpecialtyId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::SpecialtyRow;
use super::pool::{DbPool, PoolError};
use super::schema::specialties;

/// Diesel-backed implementation of the specialty repository port.
#[derive(Clone)]
pub struct DieselSpecialtyRepository {
    pool: DbPool,
}

impl DieselSpecialtyRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> SpecialtyRepositoryError {
    map_basic_pool_error(error, SpecialtyRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> SpecialtyRepositoryError {
    map_basic_diesel_error(
        error,
        SpecialtyRepositoryError::query,
        SpecialtyRepositoryError::connection,
    )
}

fn row_to_specialty(row: SpecialtyRow) -> Result<Specialty, SpecialtyRepositoryError> {
    let id = SpecialtyId::new(row.id)
        .map_err(|err| SpecialtyRepositoryError::query(format!("invalid specialty row: {err}")))?;
    Ok(Specialty {
        id,
        name: row.name,
        description: row.description,
        icon: row.icon,
        created_at: row.created_at,
    })
}

#[async_trait]
impl SpecialtyRepository for DieselSpecialtyRepository {
    async fn list(&self) -> Result<Vec<Specialty>, SpecialtyRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<SpecialtyRow> = specialties::table
            .select(SpecialtyRow::as_select())
            .order(specialties::name.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_specialty).collect()
    }
}
