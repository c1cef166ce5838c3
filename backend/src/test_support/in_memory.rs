//! In-memory driven adapters for service and HTTP tests.
//!
//! These mirror the Diesel adapters closely enough to exercise the full
//! token -> roster -> upsert flow without PostgreSQL.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::ports::{
    AttendanceRecordRepository, AttendanceRecordRepositoryError, AttendanceTokenRepository,
    AttendanceTokenRepositoryError, MealServiceRepository, MealServiceRepositoryError,
    RosterRepository, RosterRepositoryError,
};
use crate::domain::{
    AttendanceMark, AttendanceRecord, AttendanceSheetKey, AttendanceToken, EnrollmentId,
    GradeName, MealService, RosterStudent, ServiceId, TokenValue,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(_) => panic!("in-memory store mutex"),
    }
}

/// Token store backed by a hash map.
#[derive(Default)]
pub struct InMemoryAttendanceTokenRepository {
    tokens: Mutex<HashMap<Uuid, AttendanceToken>>,
}

impl InMemoryAttendanceTokenRepository {
    /// Number of stored tokens, expired ones included.
    pub fn len(&self) -> usize {
        lock(&self.tokens).len()
    }

    /// Whether no token is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl AttendanceTokenRepository for InMemoryAttendanceTokenRepository {
    async fn insert(&self, token: &AttendanceToken) -> Result<(), AttendanceTokenRepositoryError> {
        lock(&self.tokens).insert(*token.value().as_uuid(), token.clone());
        Ok(())
    }

    async fn find(
        &self,
        value: &TokenValue,
    ) -> Result<Option<AttendanceToken>, AttendanceTokenRepositoryError> {
        Ok(lock(&self.tokens).get(value.as_uuid()).cloned())
    }

    async fn delete_expired_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, AttendanceTokenRepositoryError> {
        let mut tokens = lock(&self.tokens);
        let before = tokens.len();
        tokens.retain(|_, token| token.expires_at() >= cutoff);
        Ok((before - tokens.len()) as u64)
    }
}

/// Roster built from a fixed list of enrollments.
#[derive(Default)]
pub struct InMemoryRosterRepository {
    students: Vec<RosterStudent>,
}

impl InMemoryRosterRepository {
    /// Serve `students` as the whole roster.
    pub fn new(students: Vec<RosterStudent>) -> Self {
        Self { students }
    }

    /// Enrollment ids known to this roster, across all grades and years.
    pub fn enrollment_ids(&self) -> HashSet<EnrollmentId> {
        self.students
            .iter()
            .map(|student| student.enrollment_id)
            .collect()
    }
}

#[async_trait]
impl RosterRepository for InMemoryRosterRepository {
    async fn list_enrolled(
        &self,
        grade: &GradeName,
        school_year: i32,
    ) -> Result<Vec<RosterStudent>, RosterRepositoryError> {
        let mut students: Vec<_> = self
            .students
            .iter()
            .filter(|student| &student.grade_name == grade && student.school_year == school_year)
            .cloned()
            .collect();
        students.sort_by(|left, right| {
            (&left.last_name, &left.first_name).cmp(&(&right.last_name, &right.first_name))
        });
        Ok(students)
    }
}

/// Meal service catalogue from a fixed list.
#[derive(Default)]
pub struct InMemoryMealServiceRepository {
    services: Vec<MealService>,
}

impl InMemoryMealServiceRepository {
    /// Serve `services` as the whole catalogue.
    pub fn new(services: Vec<MealService>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl MealServiceRepository for InMemoryMealServiceRepository {
    async fn find(&self, id: ServiceId) -> Result<Option<MealService>, MealServiceRepositoryError> {
        Ok(self.services.iter().find(|service| service.id == id).cloned())
    }
}

#[derive(Default)]
struct RecordTable {
    rows: Vec<AttendanceRecord>,
    next_id: i32,
}

/// Attendance table with the same uniqueness and reference rules as the
/// database adapter.
#[derive(Default)]
pub struct InMemoryAttendanceRecordRepository {
    known_enrollments: Option<HashSet<EnrollmentId>>,
    table: Mutex<RecordTable>,
}

impl InMemoryAttendanceRecordRepository {
    /// Reject marks for enrollments outside `known` as unknown references.
    pub fn with_known_enrollments(known: HashSet<EnrollmentId>) -> Self {
        Self {
            known_enrollments: Some(known),
            table: Mutex::default(),
        }
    }

    /// Snapshot of every stored row, in insertion order.
    pub fn rows(&self) -> Vec<AttendanceRecord> {
        lock(&self.table).rows.clone()
    }
}

#[async_trait]
impl AttendanceRecordRepository for InMemoryAttendanceRecordRepository {
    async fn upsert_batch(
        &self,
        sheet: AttendanceSheetKey,
        marks: &[AttendanceMark],
        _recorded_at: DateTime<Utc>,
    ) -> Result<Vec<AttendanceRecord>, AttendanceRecordRepositoryError> {
        let missing = self.known_enrollments.as_ref().and_then(|known| {
            marks
                .iter()
                .find(|mark| !known.contains(&mark.enrollment_id))
        });
        if let Some(missing) = missing {
            return Err(AttendanceRecordRepositoryError::unknown_reference(format!(
                "alumno_grado {}",
                missing.enrollment_id
            )));
        }

        let mut guard = lock(&self.table);
        let table = &mut *guard;
        let mut written = Vec::with_capacity(marks.len());
        for mark in marks {
            let existing = table.rows.iter_mut().find(|row| {
                row.sheet_key() == sheet && row.enrollment_id == mark.enrollment_id
            });
            let record = match existing {
                Some(row) => {
                    row.state = mark.state;
                    row.clone()
                }
                None => {
                    table.next_id += 1;
                    let record = AttendanceRecord {
                        id: table.next_id,
                        service_id: sheet.service_id,
                        enrollment_id: mark.enrollment_id,
                        date: sheet.date,
                        state: mark.state,
                    };
                    table.rows.push(record.clone());
                    record
                }
            };
            written.push(record);
        }
        Ok(written)
    }

    async fn list_for_sheet(
        &self,
        sheet: AttendanceSheetKey,
    ) -> Result<Vec<AttendanceRecord>, AttendanceRecordRepositoryError> {
        let mut records: Vec<_> = lock(&self.table)
            .rows
            .iter()
            .filter(|row| row.sheet_key() == sheet)
            .cloned()
            .collect();
        records.sort_by_key(|record| record.enrollment_id);
        Ok(records)
    }
}
