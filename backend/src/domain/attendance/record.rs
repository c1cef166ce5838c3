//! Attendance marks submitted by teachers and the records they produce.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{AttendanceState, EnrollmentId, ServiceId};

/// A single decision in a submitted batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceMark {
    /// Student being marked.
    pub enrollment_id: EnrollmentId,
    /// Decision for this student.
    pub state: AttendanceState,
}

/// The (service, date) pair a token scopes a sheet to.
///
/// Together with an [`EnrollmentId`] it forms the natural key of an
/// attendance record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceSheetKey {
    /// Meal service.
    pub service_id: ServiceId,
    /// Service date.
    pub date: NaiveDate,
}

/// A persisted attendance row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    /// Surrogate row id.
    pub id: i32,
    /// Meal service.
    pub service_id: ServiceId,
    /// Marked student.
    pub enrollment_id: EnrollmentId,
    /// Service date.
    pub date: NaiveDate,
    /// Current decision; later writes replace it.
    pub state: AttendanceState,
}

impl AttendanceRecord {
    /// Natural key of this record.
    pub fn sheet_key(&self) -> AttendanceSheetKey {
        AttendanceSheetKey {
            service_id: self.service_id,
            date: self.date,
        }
    }
}

/// Collapse a batch of written rows to one per student.
///
/// A student listed twice in one batch is written twice; only the last write
/// survives in storage, so only that row is kept. Students stay in the order
/// they first appeared.
pub fn latest_per_enrollment(records: Vec<AttendanceRecord>) -> Vec<AttendanceRecord> {
    let mut positions: HashMap<EnrollmentId, usize> = HashMap::new();
    let mut latest: Vec<AttendanceRecord> = Vec::with_capacity(records.len());
    for record in records {
        match positions.get(&record.enrollment_id).copied() {
            Some(position) => {
                if let Some(slot) = latest.get_mut(position) {
                    *slot = record;
                }
            }
            None => {
                positions.insert(record.enrollment_id, latest.len());
                latest.push(record);
            }
        }
    }
    latest
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn record(id: i32, enrollment: i64, state: AttendanceState) -> AttendanceRecord {
        AttendanceRecord {
            id,
            service_id: ServiceId::new(1).expect("service id"),
            enrollment_id: EnrollmentId::new(enrollment).expect("enrollment id"),
            date: NaiveDate::from_ymd_opt(2025, 6, 10).expect("date"),
            state,
        }
    }

    #[rstest]
    fn repeated_student_keeps_last_write_in_first_position() {
        let collapsed = latest_per_enrollment(vec![
            record(1, 101, AttendanceState::Si),
            record(2, 102, AttendanceState::Ausente),
            record(1, 101, AttendanceState::No),
        ]);

        let view: Vec<_> = collapsed
            .iter()
            .map(|row| (row.enrollment_id.get(), row.state))
            .collect();
        assert_eq!(
            view,
            vec![(101, AttendanceState::No), (102, AttendanceState::Ausente)]
        );
    }

    #[rstest]
    fn distinct_students_pass_through_unchanged() {
        let rows = vec![
            record(1, 101, AttendanceState::Si),
            record(2, 102, AttendanceState::No),
        ];
        assert_eq!(latest_per_enrollment(rows.clone()), rows);
    }
}
