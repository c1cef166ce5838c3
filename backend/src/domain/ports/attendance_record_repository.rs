//! Port for attendance record persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{AttendanceMark, AttendanceRecord, AttendanceSheetKey};

use super::define_port_error;

define_port_error! {
    /// Errors raised by attendance record repository adapters.
    pub enum AttendanceRecordRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "attendance record repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "attendance record repository query failed: {message}",
        /// A mark referenced an enrollment or service that does not exist.
        UnknownReference { message: String } =>
            "attendance references an unknown row: {message}",
    }
}

/// Store of `asistencias`, keyed by (service, enrollment, date).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttendanceRecordRepository: Send + Sync {
    /// Create-or-replace every mark on the sheet, in order, all or nothing.
    ///
    /// A repeated enrollment later in `marks` overwrites the earlier one.
    /// Returns one record per mark, in submission order.
    async fn upsert_batch(
        &self,
        sheet: AttendanceSheetKey,
        marks: &[AttendanceMark],
        recorded_at: DateTime<Utc>,
    ) -> Result<Vec<AttendanceRecord>, AttendanceRecordRepositoryError>;

    /// Records already stored for a sheet, ordered by enrollment id.
    async fn list_for_sheet(
        &self,
        sheet: AttendanceSheetKey,
    ) -> Result<Vec<AttendanceRecord>, AttendanceRecordRepositoryError>;
}

/// Fixture implementation that echoes marks back without storing them.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAttendanceRecordRepository;

#[async_trait]
impl AttendanceRecordRepository for FixtureAttendanceRecordRepository {
    async fn upsert_batch(
        &self,
        sheet: AttendanceSheetKey,
        marks: &[AttendanceMark],
        _recorded_at: DateTime<Utc>,
    ) -> Result<Vec<AttendanceRecord>, AttendanceRecordRepositoryError> {
        Ok(marks
            .iter()
            .zip(1..)
            .map(|(mark, id)| AttendanceRecord {
                id,
                service_id: sheet.service_id,
                enrollment_id: mark.enrollment_id,
                date: sheet.date,
                state: mark.state,
            })
            .collect())
    }

    async fn list_for_sheet(
        &self,
        _sheet: AttendanceSheetKey,
    ) -> Result<Vec<AttendanceRecord>, AttendanceRecordRepositoryError> {
        Ok(Vec::new())
    }
}
