//! PostgreSQL-backed `AttendanceRecordRepository`.
//!
//! A batch is written inside one transaction. Each mark becomes an
//! `INSERT ... ON CONFLICT (id_servicio, id_alumno_grado, fecha) DO UPDATE`,
//! executed in submission order, so a repeated enrollment ends with the last
//! submitted state and concurrent submissions cannot create duplicates.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{AttendanceRecordRepository, AttendanceRecordRepositoryError};
use crate::domain::{
    AttendanceMark, AttendanceRecord, AttendanceSheetKey, AttendanceState, EnrollmentId,
    ServiceId,
};

use super::diesel_basic_error_mapping::{
    foreign_key_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{AttendanceRow, NewAttendanceRow};
use super::pool::{DbPool, PoolError};
use super::schema::asistencias;

/// Diesel-backed attendance store.
#[derive(Clone)]
pub struct DieselAttendanceRecordRepository {
    pool: DbPool,
}

impl DieselAttendanceRecordRepository {
    /// Create a repository over a shared pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AttendanceRecordRepositoryError {
    map_basic_pool_error(error, AttendanceRecordRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> AttendanceRecordRepositoryError {
    if let Some(constraint) = foreign_key_violation(&error) {
        return AttendanceRecordRepositoryError::unknown_reference(constraint);
    }
    map_basic_diesel_error(
        error,
        AttendanceRecordRepositoryError::query,
        AttendanceRecordRepositoryError::connection,
    )
}

fn row_to_record(row: AttendanceRow) -> Result<AttendanceRecord, AttendanceRecordRepositoryError> {
    let id = row.id_asistencia;
    let corrupt =
        |err: String| AttendanceRecordRepositoryError::query(format!("asistencia {id}: {err}"));
    Ok(AttendanceRecord {
        id,
        service_id: ServiceId::new(i64::from(row.id_servicio))
            .map_err(|err| corrupt(err.to_string()))?,
        enrollment_id: EnrollmentId::new(i64::from(row.id_alumno_grado))
            .map_err(|err| corrupt(err.to_string()))?,
        date: row.fecha,
        state: row
            .estado
            .parse::<AttendanceState>()
            .map_err(|err| corrupt(err.to_string()))?,
    })
}

fn new_rows(
    sheet: AttendanceSheetKey,
    marks: &[AttendanceMark],
    recorded_at: DateTime<Utc>,
) -> Vec<NewAttendanceRow<'static>> {
    marks
        .iter()
        .map(|mark| NewAttendanceRow {
            id_servicio: sheet.service_id.get(),
            id_alumno_grado: mark.enrollment_id.get(),
            fecha: sheet.date,
            estado: mark.state.as_str(),
            updated_at: recorded_at,
        })
        .collect()
}

#[async_trait]
impl AttendanceRecordRepository for DieselAttendanceRecordRepository {
    async fn upsert_batch(
        &self,
        sheet: AttendanceSheetKey,
        marks: &[AttendanceMark],
        recorded_at: DateTime<Utc>,
    ) -> Result<Vec<AttendanceRecord>, AttendanceRecordRepositoryError> {
        let rows = new_rows(sheet, marks, recorded_at);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let stored = conn
            .transaction(|conn| {
                async move {
                    let mut stored = Vec::with_capacity(rows.len());
                    for row in &rows {
                        let written = diesel::insert_into(asistencias::table)
                            .values(row)
                            .on_conflict((
                                asistencias::id_servicio,
                                asistencias::id_alumno_grado,
                                asistencias::fecha,
                            ))
                            .do_update()
                            .set((
                                asistencias::estado.eq(excluded(asistencias::estado)),
                                asistencias::updated_at.eq(excluded(asistencias::updated_at)),
                            ))
                            .returning(AttendanceRow::as_returning())
                            .get_result::<AttendanceRow>(conn)
                            .await?;
                        stored.push(written);
                    }
                    Ok(stored)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        stored.into_iter().map(row_to_record).collect()
    }

    async fn list_for_sheet(
        &self,
        sheet: AttendanceSheetKey,
    ) -> Result<Vec<AttendanceRecord>, AttendanceRecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<AttendanceRow> = asistencias::table
            .filter(asistencias::id_servicio.eq(sheet.service_id.get()))
            .filter(asistencias::fecha.eq(sheet.date))
            .order(asistencias::id_alumno_grado.asc())
            .select(AttendanceRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_record).collect()
    }
}
