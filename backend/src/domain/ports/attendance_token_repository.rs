//! Port for storing and looking up attendance tokens.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{AttendanceToken, TokenValue};

use super::define_port_error;

define_port_error! {
    /// Errors raised by attendance token repository adapters.
    pub enum AttendanceTokenRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "attendance token repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "attendance token repository query failed: {message}",
    }
}

/// Server-side token store keyed by the opaque token value.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttendanceTokenRepository: Send + Sync {
    /// Persist a freshly issued token.
    async fn insert(&self, token: &AttendanceToken) -> Result<(), AttendanceTokenRepositoryError>;

    /// Look up a token regardless of its expiry.
    async fn find(
        &self,
        value: &TokenValue,
    ) -> Result<Option<AttendanceToken>, AttendanceTokenRepositoryError>;

    /// Delete tokens whose expiry is strictly before `cutoff`, returning how
    /// many rows were removed.
    async fn delete_expired_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, AttendanceTokenRepositoryError>;
}

/// Fixture implementation for tests that do not exercise token storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAttendanceTokenRepository;

#[async_trait]
impl AttendanceTokenRepository for FixtureAttendanceTokenRepository {
    async fn insert(&self, _token: &AttendanceToken) -> Result<(), AttendanceTokenRepositoryError> {
        Ok(())
    }

    async fn find(
        &self,
        _value: &TokenValue,
    ) -> Result<Option<AttendanceToken>, AttendanceTokenRepositoryError> {
        Ok(None)
    }

    async fn delete_expired_before(
        &self,
        _cutoff: DateTime<Utc>,
    ) -> Result<u64, AttendanceTokenRepositoryError> {
        Ok(0)
    }
}
