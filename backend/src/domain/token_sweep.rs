//! Purging of long-expired attendance tokens.
//!
//! Expired tokens are harmless (validation rejects them) so the sweep only
//! bounds table growth. It is disabled unless a retention window is set.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use tracing::info;

use crate::domain::Error;
use crate::domain::ports::{AttendanceTokenRepository, AttendanceTokenRepositoryError};

/// Outcome of one sweep pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenSweepReport {
    /// Tokens that expired before this instant were deleted.
    pub cutoff: DateTime<Utc>,
    /// Tokens deleted by this pass.
    pub removed: u64,
}

/// Deletes tokens that expired more than `retention` ago.
pub struct TokenSweeper<T> {
    tokens: Arc<T>,
    clock: Arc<dyn Clock>,
    retention: TimeDelta,
}

impl<T> TokenSweeper<T> {
    /// Sweep `tokens`, keeping anything that expired less than `retention`
    /// before the clock's current time.
    pub fn new(tokens: Arc<T>, clock: Arc<dyn Clock>, retention: TimeDelta) -> Self {
        Self {
            tokens,
            clock,
            retention,
        }
    }
}

impl<T> TokenSweeper<T>
where
    T: AttendanceTokenRepository,
{
    /// Run one pass.
    ///
    /// # Examples
    /// ```rust,no_run
    /// # use std::sync::Arc;
    /// # use chrono::TimeDelta;
    /// # use mockable::DefaultClock;
    /// # use comedor_backend::domain::TokenSweeper;
    /// # use comedor_backend::domain::ports::FixtureAttendanceTokenRepository;
    /// # async fn example() -> Result<(), comedor_backend::domain::Error> {
    /// let sweeper = TokenSweeper::new(
    ///     Arc::new(FixtureAttendanceTokenRepository),
    ///     Arc::new(DefaultClock),
    ///     TimeDelta::days(7),
    /// );
    /// let report = sweeper.purge_expired().await?;
    /// assert_eq!(report.removed, 0);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn purge_expired(&self) -> Result<TokenSweepReport, Error> {
        let now = self.clock.utc();
        let cutoff = now.checked_sub_signed(self.retention).ok_or_else(|| {
            Error::internal(format!(
                "token sweep cutoff out of range: {now} minus {}",
                self.retention
            ))
        })?;
        let removed = self
            .tokens
            .delete_expired_before(cutoff)
            .await
            .map_err(|error| match error {
                AttendanceTokenRepositoryError::Connection { message } => {
                    Error::service_unavailable(format!("token store unavailable: {message}"))
                }
                AttendanceTokenRepositoryError::Query { message } => {
                    Error::internal(format!("token sweep failed: {message}"))
                }
            })?;
        info!(removed, %cutoff, "purged expired attendance tokens");
        Ok(TokenSweepReport { cutoff, removed })
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rstest::rstest;

    use super::*;
    use crate::domain::ports::{AttendanceTokenRepository, MockAttendanceTokenRepository};
    use crate::domain::{
        AttendanceToken, ErrorCode, GradeName, PersonId, ServiceId, TokenPolicy, TokenScope,
    };
    use crate::test_support::{InMemoryAttendanceTokenRepository, MutableClock};

    fn at(raw: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(raw)
            .expect("RFC3339 fixture timestamp")
            .with_timezone(&Utc)
    }

    fn scope() -> TokenScope {
        TokenScope {
            teacher_id: PersonId::new(7).expect("teacher"),
            grade_name: GradeName::new("3ro A").expect("grade"),
            date: NaiveDate::from_ymd_opt(2025, 6, 10).expect("date"),
            service_id: ServiceId::new(1).expect("service"),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn removes_only_tokens_past_retention() {
        let repo = Arc::new(InMemoryAttendanceTokenRepository::default());
        let policy = TokenPolicy::default();
        let old = AttendanceToken::issue(scope(), at("2025-06-01T08:00:00Z"), policy);
        let recent = AttendanceToken::issue(scope(), at("2025-06-09T08:00:00Z"), policy);
        repo.insert(&old).await.expect("insert old");
        repo.insert(&recent).await.expect("insert recent");

        let sweeper = TokenSweeper::new(
            Arc::clone(&repo),
            Arc::new(MutableClock::new(at("2025-06-10T08:00:00Z"))),
            TimeDelta::days(3),
        );
        let report = sweeper.purge_expired().await.expect("sweep succeeds");

        assert_eq!(report.removed, 1);
        assert_eq!(report.cutoff, at("2025-06-07T08:00:00Z"));
        assert!(repo.find(&recent.value()).await.expect("lookup").is_some());
        assert!(repo.find(&old.value()).await.expect("lookup").is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn maps_connection_failures() {
        let mut repo = MockAttendanceTokenRepository::new();
        repo.expect_delete_expired_before()
            .return_once(|_| Err(AttendanceTokenRepositoryError::connection("refused")));
        let sweeper = TokenSweeper::new(
            Arc::new(repo),
            Arc::new(MutableClock::new(at("2025-06-10T08:00:00Z"))),
            TimeDelta::days(1),
        );

        let err = sweeper.purge_expired().await.expect_err("store down");
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }

    #[rstest]
    #[tokio::test]
    async fn out_of_range_cutoff_fails_without_deleting() {
        let mut repo = MockAttendanceTokenRepository::new();
        repo.expect_delete_expired_before().never();
        let sweeper = TokenSweeper::new(
            Arc::new(repo),
            Arc::new(MutableClock::new(DateTime::<Utc>::MIN_UTC)),
            TimeDelta::days(1),
        );

        let err = sweeper.purge_expired().await.expect_err("cutoff underflows");
        assert_eq!(err.code(), ErrorCode::InternalError);
    }
}
