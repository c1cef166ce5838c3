//! PostgreSQL-backed `MealServiceRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{MealServiceRepository, MealServiceRepositoryError};
use crate::domain::{MealService, ServiceId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::MealServiceRow;
use super::pool::{DbPool, PoolError};
use super::schema::servicios;

/// Diesel-backed meal service lookups.
#[derive(Clone)]
pub struct DieselMealServiceRepository {
    pool: DbPool,
}

impl DieselMealServiceRepository {
    /// Create a repository over a shared pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> MealServiceRepositoryError {
    map_basic_pool_error(error, MealServiceRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> MealServiceRepositoryError {
    map_basic_diesel_error(
        error,
        MealServiceRepositoryError::query,
        MealServiceRepositoryError::connection,
    )
}

#[async_trait]
impl MealServiceRepository for DieselMealServiceRepository {
    async fn find(&self, id: ServiceId) -> Result<Option<MealService>, MealServiceRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = servicios::table
            .find(id.get())
            .select(MealServiceRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(|row| MealService {
            id,
            name: row.nombre,
            description: row.descripcion,
        }))
    }
}
