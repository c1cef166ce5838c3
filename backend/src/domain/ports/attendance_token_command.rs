//! Driving port for issuing attendance tokens.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Error, TokenScope, TokenValue};

/// Request to mint a token for one teacher/grade/service/date sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateTokenRequest {
    /// Sheet to grant access to.
    pub scope: TokenScope,
}

/// A freshly issued token and the link that opens its form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateTokenResponse {
    /// Stored token value.
    pub token: TokenValue,
    /// Frontend URL embedding the token.
    pub link: String,
    /// Last instant the token is accepted.
    pub expires_at: DateTime<Utc>,
}

/// Driving port for token issuance.
///
/// # Examples
///
/// ```rust,no_run
/// # use chrono::NaiveDate;
/// # use comedor_backend::domain::{GradeName, PersonId, ServiceId, TokenScope};
/// # use comedor_backend::domain::ports::{
/// #     AttendanceTokenCommand, FixtureAttendanceTokenCommand, GenerateTokenRequest,
/// # };
/// # async fn example() -> Result<(), comedor_backend::domain::Error> {
/// let scope = TokenScope {
///     teacher_id: PersonId::new(7).expect("teacher"),
///     grade_name: GradeName::new("3ro A").expect("grade"),
///     date: NaiveDate::from_ymd_opt(2025, 6, 10).expect("date"),
///     service_id: ServiceId::new(1).expect("service"),
/// };
/// let result = FixtureAttendanceTokenCommand
///     .generate_token(GenerateTokenRequest { scope })
///     .await;
/// assert!(result.is_err(), "nothing can be issued without a token store");
/// # Ok(())
/// # }
/// ```
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttendanceTokenCommand: Send + Sync {
    /// Persist a new token for the scope and return it with its link.
    async fn generate_token(
        &self,
        request: GenerateTokenRequest,
    ) -> Result<GenerateTokenResponse, Error>;
}

/// Fixture command for deployments without a token store.
///
/// Issuing is refused with `service_unavailable`: a token that is never
/// stored could not be validated afterwards.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAttendanceTokenCommand;

#[async_trait]
impl AttendanceTokenCommand for FixtureAttendanceTokenCommand {
    async fn generate_token(
        &self,
        _request: GenerateTokenRequest,
    ) -> Result<GenerateTokenResponse, Error> {
        Err(Error::service_unavailable(
            "attendance token store is not configured",
        ))
    }
}
