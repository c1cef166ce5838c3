//! Driving port for submitting attendance through a token.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{AttendanceMark, AttendanceRecord, AttendanceSummary, Error, TokenRejection};

/// A batch of marks submitted against the sheet a token scopes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterAttendanceRequest {
    /// Raw token from the URL.
    pub token: String,
    /// Marks in submission order.
    pub marks: Vec<AttendanceMark>,
}

/// Outcome of a batch registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterAttendanceResponse {
    /// Number of distinct students whose row was written.
    pub registered: usize,
    /// Stored rows, one per student, in first-submitted order.
    pub records: Vec<AttendanceRecord>,
    /// Per-state counts of `records`.
    pub summary: AttendanceSummary,
}

/// Driving port for token-scoped writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttendanceRegistrationCommand: Send + Sync {
    /// Validate the token, then upsert every mark in one transaction.
    async fn register(
        &self,
        request: RegisterAttendanceRequest,
    ) -> Result<RegisterAttendanceResponse, Error>;
}

/// Fixture command that recognises no tokens.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAttendanceRegistrationCommand;

#[async_trait]
impl AttendanceRegistrationCommand for FixtureAttendanceRegistrationCommand {
    async fn register(
        &self,
        _request: RegisterAttendanceRequest,
    ) -> Result<RegisterAttendanceResponse, Error> {
        Err(TokenRejection::Invalid.into())
    }
}
