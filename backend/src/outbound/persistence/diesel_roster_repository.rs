//! PostgreSQL-backed `RosterRepository`: `alumno_grado` joined to `personas`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{RosterRepository, RosterRepositoryError};
use crate::domain::{EnrollmentId, GradeName, PersonId, RosterStudent};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::RosterRow;
use super::pool::{DbPool, PoolError};
use super::schema::{alumno_grado, personas};

/// Diesel-backed roster lookups.
#[derive(Clone)]
pub struct DieselRosterRepository {
    pool: DbPool,
}

impl DieselRosterRepository {
    /// Create a repository over a shared pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> RosterRepositoryError {
    map_basic_pool_error(error, RosterRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> RosterRepositoryError {
    map_basic_diesel_error(
        error,
        RosterRepositoryError::query,
        RosterRepositoryError::connection,
    )
}

fn row_to_student(row: RosterRow) -> Result<RosterStudent, RosterRepositoryError> {
    let corrupt = |err: crate::domain::AttendanceIdError| {
        RosterRepositoryError::query(format!(
            "enrollment {} is corrupt: {err}",
            row.id_alumno_grado
        ))
    };
    Ok(RosterStudent {
        enrollment_id: EnrollmentId::new(i64::from(row.id_alumno_grado)).map_err(corrupt)?,
        person_id: PersonId::new(i64::from(row.id_persona)).map_err(corrupt)?,
        grade_name: GradeName::new(&row.nombre_grado).map_err(corrupt)?,
        school_year: row.ciclo_lectivo,
        first_name: row.nombre,
        last_name: row.apellido,
        dni: row.dni,
    })
}

#[async_trait]
impl RosterRepository for DieselRosterRepository {
    async fn list_enrolled(
        &self,
        grade: &GradeName,
        school_year: i32,
    ) -> Result<Vec<RosterStudent>, RosterRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<RosterRow> = alumno_grado::table
            .inner_join(personas::table)
            .filter(alumno_grado::nombre_grado.eq(grade.as_str()))
            .filter(alumno_grado::ciclo_lectivo.eq(school_year))
            .order((personas::apellido.asc(), personas::nombre.asc()))
            .select((
                alumno_grado::id_alumno_grado,
                alumno_grado::nombre_grado,
                alumno_grado::ciclo_lectivo,
                personas::id_persona,
                personas::nombre,
                personas::apellido,
                personas::dni,
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_student).collect()
    }
}
