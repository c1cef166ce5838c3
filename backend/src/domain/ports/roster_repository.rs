//! Port for reading grade rosters.

use async_trait::async_trait;

use crate::domain::{GradeName, RosterStudent};

use super::define_port_error;

define_port_error! {
    /// Errors raised by roster repository adapters.
    pub enum RosterRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "roster repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } =>
            "roster repository query failed: {message}",
    }
}

/// Read-only access to `alumno_grado` joined with `personas`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RosterRepository: Send + Sync {
    /// Students enrolled in `grade` for `school_year`, ordered by last name
    /// then first name. An empty grade yields an empty list.
    async fn list_enrolled(
        &self,
        grade: &GradeName,
        school_year: i32,
    ) -> Result<Vec<RosterStudent>, RosterRepositoryError>;
}

/// Fixture implementation returning an empty roster.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRosterRepository;

#[async_trait]
impl RosterRepository for FixtureRosterRepository {
    async fn list_enrolled(
        &self,
        _grade: &GradeName,
        _school_year: i32,
    ) -> Result<Vec<RosterStudent>, RosterRepositoryError> {
        Ok(Vec::new())
    }
}
