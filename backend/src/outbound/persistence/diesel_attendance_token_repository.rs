//! PostgreSQL-backed `AttendanceTokenRepository` using Diesel.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{AttendanceTokenRepository, AttendanceTokenRepositoryError};
use crate::domain::{
    AttendanceToken, GradeName, PersonId, ServiceId, TokenScope, TokenValue,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{AttendanceTokenRow, NewAttendanceTokenRow};
use super::pool::{DbPool, PoolError};
use super::schema::tokens_asistencia;

/// Diesel-backed token store.
#[derive(Clone)]
pub struct DieselAttendanceTokenRepository {
    pool: DbPool,
}

impl DieselAttendanceTokenRepository {
    /// Create a repository over a shared pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AttendanceTokenRepositoryError {
    map_basic_pool_error(error, AttendanceTokenRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> AttendanceTokenRepositoryError {
    map_basic_diesel_error(
        error,
        AttendanceTokenRepositoryError::query,
        AttendanceTokenRepositoryError::connection,
    )
}

fn row_to_token(row: AttendanceTokenRow) -> Result<AttendanceToken, AttendanceTokenRepositoryError> {
    let corrupt = |err: crate::domain::AttendanceIdError| {
        AttendanceTokenRepositoryError::query(format!("stored token {} is corrupt: {err}", row.token))
    };
    let scope = TokenScope {
        teacher_id: PersonId::new(i64::from(row.id_persona_docente)).map_err(corrupt)?,
        grade_name: GradeName::new(&row.nombre_grado).map_err(corrupt)?,
        date: row.fecha,
        service_id: ServiceId::new(i64::from(row.id_servicio)).map_err(corrupt)?,
    };
    Ok(AttendanceToken::from_parts(
        TokenValue::from_uuid(row.token),
        scope,
        row.issued_at,
        row.expires_at,
    ))
}

#[async_trait]
impl AttendanceTokenRepository for DieselAttendanceTokenRepository {
    async fn insert(&self, token: &AttendanceToken) -> Result<(), AttendanceTokenRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let scope = token.scope();
        let row = NewAttendanceTokenRow {
            token: *token.value().as_uuid(),
            id_persona_docente: scope.teacher_id.get(),
            nombre_grado: scope.grade_name.as_str(),
            id_servicio: scope.service_id.get(),
            fecha: scope.date,
            issued_at: token.issued_at(),
            expires_at: token.expires_at(),
        };

        diesel::insert_into(tokens_asistencia::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find(
        &self,
        value: &TokenValue,
    ) -> Result<Option<AttendanceToken>, AttendanceTokenRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = tokens_asistencia::table
            .find(*value.as_uuid())
            .select(AttendanceTokenRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_token).transpose()
    }

    async fn delete_expired_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, AttendanceTokenRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed =
            diesel::delete(tokens_asistencia::table.filter(tokens_asistencia::expires_at.lt(cutoff)))
                .execute(&mut conn)
                .await
                .map_err(map_diesel_error)?;
        Ok(removed as u64)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rstest::rstest;
    use uuid::Uuid;

    use super::*;

    fn row(teacher: i32) -> AttendanceTokenRow {
        let issued_at = DateTime::parse_from_rfc3339("2025-06-10T08:00:00Z")
            .expect("timestamp")
            .with_timezone(&Utc);
        AttendanceTokenRow {
            token: Uuid::new_v4(),
            id_persona_docente: teacher,
            nombre_grado: "3ro A".to_owned(),
            id_servicio: 1,
            fecha: NaiveDate::from_ymd_opt(2025, 6, 10).expect("date"),
            issued_at,
            expires_at: issued_at + chrono::TimeDelta::hours(24),
        }
    }

    #[rstest]
    fn stored_rows_rehydrate_into_tokens() {
        let source = row(7);
        let token = row_to_token(source.clone()).expect("valid row");
        assert_eq!(token.value().as_uuid(), &source.token);
        assert_eq!(token.scope().teacher_id.get(), 7);
        assert_eq!(token.expires_at(), source.expires_at);
    }

    #[rstest]
    fn corrupt_rows_surface_as_query_errors() {
        let err = row_to_token(row(0)).expect_err("teacher id must be positive");
        assert!(matches!(err, AttendanceTokenRepositoryError::Query { .. }));
    }

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let err = map_pool_error(PoolError::checkout("connection refused"));
        assert!(matches!(err, AttendanceTokenRepositoryError::Connection { .. }));
    }
}
