//! Shared HTTP adapter state.
//!
//! Handlers receive this via `actix_web::web::Data` so they depend only on
//! driving ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AttendanceRegistrationCommand, AttendanceRegistrationQuery, AttendanceTokenCommand,
    FixtureAttendanceRegistrationCommand, FixtureAttendanceRegistrationQuery,
    FixtureAttendanceTokenCommand,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Token issuance.
    pub tokens: Arc<dyn AttendanceTokenCommand>,
    /// Token-scoped reads.
    pub sheets: Arc<dyn AttendanceRegistrationQuery>,
    /// Token-scoped writes.
    pub registrations: Arc<dyn AttendanceRegistrationCommand>,
}

impl HttpState {
    /// Build state from individual ports.
    pub fn new(
        tokens: Arc<dyn AttendanceTokenCommand>,
        sheets: Arc<dyn AttendanceRegistrationQuery>,
        registrations: Arc<dyn AttendanceRegistrationCommand>,
    ) -> Self {
        Self {
            tokens,
            sheets,
            registrations,
        }
    }

    /// Wire one service that implements every attendance port.
    pub fn from_service<S>(service: Arc<S>) -> Self
    where
        S: AttendanceTokenCommand
            + AttendanceRegistrationQuery
            + AttendanceRegistrationCommand
            + 'static,
    {
        Self {
            tokens: service.clone(),
            sheets: service.clone(),
            registrations: service,
        }
    }

    /// State used when no database is configured: no token can be issued or
    /// resolved.
    pub fn fixtures() -> Self {
        Self::new(
            Arc::new(FixtureAttendanceTokenCommand),
            Arc::new(FixtureAttendanceRegistrationQuery),
            Arc::new(FixtureAttendanceRegistrationCommand),
        )
    }
}
