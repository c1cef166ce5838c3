//! Time-bounded attendance tokens.
//!
//! A token is an opaque UUID v4 stored server-side together with the sheet it
//! scopes (teacher, grade, service, date). Tokens are reusable until they
//! expire; there is no consumed state.
//!
//! ```text
//! Issued --(now <= expires_at)--> Valid (repeatable)
//! Issued --(now >  expires_at)--> Expired (terminal)
//! ```

use std::fmt;

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AttendanceSheetKey, GradeName, PersonId, ServiceId};

/// Default validity window for freshly issued tokens.
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

/// Longest validity window a policy accepts: one year.
pub const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365;

/// Opaque token value shared in the registration link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenValue(Uuid);

impl TokenValue {
    /// Mint a fresh random token.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap a stored UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse the textual form received in a URL.
    ///
    /// Anything that is not a UUID is treated as an unknown token.
    pub fn parse(raw: &str) -> Result<Self, TokenRejection> {
        Uuid::parse_str(raw.trim())
            .map(Self)
            .map_err(|_| TokenRejection::Invalid)
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for TokenValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The teacher/grade/service/date combination a token grants access to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenScope {
    /// Teacher the link was issued to.
    pub teacher_id: PersonId,
    /// Grade whose roster the sheet lists.
    pub grade_name: GradeName,
    /// Service date.
    pub date: NaiveDate,
    /// Meal service.
    pub service_id: ServiceId,
}

impl TokenScope {
    /// The attendance sheet this scope writes to.
    pub fn sheet_key(&self) -> AttendanceSheetKey {
        AttendanceSheetKey {
            service_id: self.service_id,
            date: self.date,
        }
    }
}

/// Reasons a presented token is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenRejection {
    /// The token is malformed or unknown.
    #[error("attendance token is invalid")]
    Invalid,
    /// The token exists but its validity window has passed.
    #[error("attendance token has expired")]
    Expired,
}

impl TokenRejection {
    /// Stable detail code exposed to clients.
    pub fn code(self) -> &'static str {
        match self {
            Self::Invalid => "token_invalid",
            Self::Expired => "token_expired",
        }
    }
}

impl From<TokenRejection> for super::Error {
    fn from(value: TokenRejection) -> Self {
        Self::unauthorized(value.to_string())
            .with_details(serde_json::json!({ "code": value.code() }))
    }
}

/// Issuing policy for new tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenPolicy {
    ttl: TimeDelta,
}

impl TokenPolicy {
    /// Build a policy with a custom validity window.
    ///
    /// Returns `None` when `ttl` is zero, negative, or longer than
    /// [`MAX_TOKEN_TTL_HOURS`].
    pub fn new(ttl: TimeDelta) -> Option<Self> {
        (ttl > TimeDelta::zero() && ttl <= TimeDelta::hours(MAX_TOKEN_TTL_HOURS))
            .then_some(Self { ttl })
    }

    /// Validity window applied to new tokens.
    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }
}

impl Default for TokenPolicy {
    fn default() -> Self {
        Self {
            ttl: TimeDelta::hours(DEFAULT_TOKEN_TTL_HOURS),
        }
    }
}

/// A stored attendance token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceToken {
    value: TokenValue,
    scope: TokenScope,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl AttendanceToken {
    /// Issue a new token for `scope` at `now`.
    ///
    /// The expiry saturates at the latest representable instant instead of
    /// overflowing.
    ///
    /// # Examples
    /// ```
    /// use chrono::{NaiveDate, TimeDelta, Utc};
    /// use comedor_backend::domain::{
    ///     AttendanceToken, GradeName, PersonId, ServiceId, TokenPolicy, TokenScope,
    /// };
    ///
    /// let scope = TokenScope {
    ///     teacher_id: PersonId::new(7).unwrap(),
    ///     grade_name: GradeName::new("3ro A").unwrap(),
    ///     date: NaiveDate::from_ymd_opt(2025, 6, 10).unwrap(),
    ///     service_id: ServiceId::new(1).unwrap(),
    /// };
    /// let now = Utc::now();
    /// let token = AttendanceToken::issue(scope, now, TokenPolicy::default());
    /// assert_eq!(token.expires_at() - token.issued_at(), TimeDelta::hours(24));
    /// assert!(token.validate_at(now).is_ok());
    /// ```
    pub fn issue(scope: TokenScope, now: DateTime<Utc>, policy: TokenPolicy) -> Self {
        Self {
            value: TokenValue::generate(),
            scope,
            issued_at: now,
            expires_at: now
                .checked_add_signed(policy.ttl())
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    /// Rehydrate a token loaded from storage.
    pub fn from_parts(
        value: TokenValue,
        scope: TokenScope,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            value,
            scope,
            issued_at,
            expires_at,
        }
    }

    /// Opaque value shared in the registration link.
    pub fn value(&self) -> TokenValue {
        self.value
    }

    /// The sheet this token opens.
    pub fn scope(&self) -> &TokenScope {
        &self.scope
    }

    /// Instant the token was minted.
    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    /// Last instant at which the token is still accepted.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Whether the token may still be used at `now`.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now <= self.expires_at
    }

    /// Return the scope when the token is still valid at `now`.
    pub fn validate_at(&self, now: DateTime<Utc>) -> Result<&TokenScope, TokenRejection> {
        if self.is_valid_at(now) {
            Ok(&self.scope)
        } else {
            Err(TokenRejection::Expired)
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn scope() -> TokenScope {
        TokenScope {
            teacher_id: PersonId::new(7).expect("teacher id"),
            grade_name: GradeName::new("3ro A").expect("grade"),
            date: NaiveDate::from_ymd_opt(2025, 6, 10).expect("date"),
            service_id: ServiceId::new(1).expect("service id"),
        }
    }

    #[fixture]
    fn issued_at() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-06-10T08:00:00Z")
            .expect("timestamp")
            .with_timezone(&Utc)
    }

    #[rstest]
    #[case(TimeDelta::zero(), true)]
    #[case(TimeDelta::hours(24), true)]
    #[case(TimeDelta::hours(24) + TimeDelta::seconds(1), false)]
    fn validity_is_inclusive_of_expiry(
        scope: TokenScope,
        issued_at: DateTime<Utc>,
        #[case] elapsed: TimeDelta,
        #[case] valid: bool,
    ) {
        let token = AttendanceToken::issue(scope, issued_at, TokenPolicy::default());
        assert_eq!(token.is_valid_at(issued_at + elapsed), valid);
    }

    #[rstest]
    fn expired_token_is_rejected_as_expired(scope: TokenScope, issued_at: DateTime<Utc>) {
        let token = AttendanceToken::issue(scope, issued_at, TokenPolicy::default());
        let later = issued_at + TimeDelta::hours(24) + TimeDelta::seconds(1);

        assert_eq!(token.validate_at(later), Err(TokenRejection::Expired));
    }

    #[rstest]
    fn each_issue_mints_a_distinct_value(scope: TokenScope, issued_at: DateTime<Utc>) {
        let first = AttendanceToken::issue(scope.clone(), issued_at, TokenPolicy::default());
        let second = AttendanceToken::issue(scope, issued_at, TokenPolicy::default());
        assert_ne!(first.value(), second.value());
    }

    #[rstest]
    #[case("")]
    #[case("abc")]
    #[case("00000000-0000-0000-0000")]
    fn malformed_values_are_invalid(#[case] raw: &str) {
        assert_eq!(TokenValue::parse(raw), Err(TokenRejection::Invalid));
    }

    #[rstest]
    fn policy_rejects_non_positive_ttl() {
        assert!(TokenPolicy::new(TimeDelta::zero()).is_none());
        assert!(TokenPolicy::new(TimeDelta::hours(-1)).is_none());
        assert_eq!(
            TokenPolicy::new(TimeDelta::hours(2)).map(|policy| policy.ttl()),
            Some(TimeDelta::hours(2))
        );
    }

    #[rstest]
    #[case(TimeDelta::hours(MAX_TOKEN_TTL_HOURS), true)]
    #[case(TimeDelta::hours(MAX_TOKEN_TTL_HOURS + 1), false)]
    #[case(TimeDelta::hours(1_000_000_000_000), false)]
    fn policy_caps_ttl(#[case] ttl: TimeDelta, #[case] accepted: bool) {
        assert_eq!(TokenPolicy::new(ttl).is_some(), accepted);
    }

    #[rstest]
    fn expiry_saturates_near_the_end_of_time(scope: TokenScope) {
        let now = DateTime::<Utc>::MAX_UTC - TimeDelta::hours(1);
        let token = AttendanceToken::issue(scope, now, TokenPolicy::default());

        assert_eq!(token.expires_at(), DateTime::<Utc>::MAX_UTC);
        assert!(token.validate_at(now).is_ok());
    }

    #[rstest]
    #[case(TokenRejection::Invalid, "token_invalid")]
    #[case(TokenRejection::Expired, "token_expired")]
    fn rejection_maps_to_unauthorized_with_code(
        #[case] rejection: TokenRejection,
        #[case] code: &str,
    ) {
        let err = super::super::Error::from(rejection);
        assert_eq!(err.code(), super::super::ErrorCode::Unauthorized);
        assert_eq!(
            err.details().and_then(|details| details.get("code")),
            Some(&serde_json::json!(code))
        );
    }
}
