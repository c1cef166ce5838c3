//! Driving port for opening an attendance sheet through a token.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    AttendanceRecord, Error, MealService, RosterStudent, TokenRejection, TokenScope,
};

/// Request carrying the raw token taken from the URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenSheetRequest {
    /// Raw token from the URL.
    pub token: String,
}

/// Everything the form needs to render a sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenSheetResponse {
    /// Sheet the token grants.
    pub scope: TokenScope,
    /// Last instant the token is accepted.
    pub expires_at: DateTime<Utc>,
    /// Grade roster for the service date.
    pub students: Vec<RosterStudent>,
    /// Meal service, or its placeholder.
    pub service: MealService,
    /// Marks already stored for rostered students on this sheet.
    pub records: Vec<AttendanceRecord>,
}

/// Driving port for token-scoped reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttendanceRegistrationQuery: Send + Sync {
    /// Validate the token and resolve its roster, service and prior marks.
    ///
    /// Fails with `unauthorized` when the token is unknown or expired.
    async fn open_sheet(&self, request: OpenSheetRequest) -> Result<OpenSheetResponse, Error>;
}

/// Fixture query that recognises no tokens.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAttendanceRegistrationQuery;

#[async_trait]
impl AttendanceRegistrationQuery for FixtureAttendanceRegistrationQuery {
    async fn open_sheet(&self, _request: OpenSheetRequest) -> Result<OpenSheetResponse, Error> {
        Err(TokenRejection::Invalid.into())
    }
}
