//! Domain primitives, services and ports for the cafeteria attendance flow.
//!
//! Public surface:
//! - Error / ErrorCode: API error payload and stable identifiers.
//! - AttendanceToken and friends: time-bounded, reusable sheet tokens.
//! - AttendanceState, AttendanceRecord, AttendanceSummary: the marks and
//!   their aggregation.
//! - AttendanceRegistrationService: implements the driving ports over the
//!   driven repositories.

pub mod attendance;
pub mod attendance_registration_service;
pub mod attendance_token;
pub mod error;
pub mod meal_service;
pub mod ports;
pub mod registration_link;
pub mod roster;
pub mod token_sweep;
pub mod trace_id;

pub use self::attendance::{
    AttendanceIdError, AttendanceMark, AttendanceRecord, AttendanceSheetKey, AttendanceState,
    AttendanceSummary, EnrollmentId, GradeName, InvalidAttendanceState, PersonId, ServiceId,
    latest_per_enrollment, summarize,
};
pub use self::attendance_registration_service::{
    AttendanceRegistrationService, AttendanceRepositories,
};
pub use self::attendance_token::{
    AttendanceToken, DEFAULT_TOKEN_TTL_HOURS, MAX_TOKEN_TTL_HOURS, TokenPolicy, TokenRejection,
    TokenScope, TokenValue,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::meal_service::MealService;
pub use self::registration_link::RegistrationLinkBase;
pub use self::roster::{RosterStudent, school_year_for};
pub use self::token_sweep::{TokenSweeper, TokenSweepReport};
pub use self::trace_id::TraceId;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use comedor_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::unauthorized("attendance token is invalid"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
