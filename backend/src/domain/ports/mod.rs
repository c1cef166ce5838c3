//! Domain ports for the attendance hexagon.
//!
//! Driven ports (`*Repository`) describe what the domain needs from storage.
//! Driving ports (`*Command`, `*Query`) are what inbound adapters call.

mod macros;
pub(crate) use macros::define_port_error;

mod attendance_record_repository;
mod attendance_registration_command;
mod attendance_registration_query;
mod attendance_token_command;
mod attendance_token_repository;
mod meal_service_repository;
mod roster_repository;

#[cfg(test)]
pub use attendance_record_repository::MockAttendanceRecordRepository;
pub use attendance_record_repository::{
    AttendanceRecordRepository, AttendanceRecordRepositoryError,
    FixtureAttendanceRecordRepository,
};
#[cfg(test)]
pub use attendance_registration_command::MockAttendanceRegistrationCommand;
pub use attendance_registration_command::{
    AttendanceRegistrationCommand, FixtureAttendanceRegistrationCommand,
    RegisterAttendanceRequest, RegisterAttendanceResponse,
};
#[cfg(test)]
pub use attendance_registration_query::MockAttendanceRegistrationQuery;
pub use attendance_registration_query::{
    AttendanceRegistrationQuery, FixtureAttendanceRegistrationQuery, OpenSheetRequest,
    OpenSheetResponse,
};
#[cfg(test)]
pub use attendance_token_command::MockAttendanceTokenCommand;
pub use attendance_token_command::{
    AttendanceTokenCommand, FixtureAttendanceTokenCommand, GenerateTokenRequest,
    GenerateTokenResponse,
};
#[cfg(test)]
pub use attendance_token_repository::MockAttendanceTokenRepository;
pub use attendance_token_repository::{
    AttendanceTokenRepository, AttendanceTokenRepositoryError, FixtureAttendanceTokenRepository,
};
#[cfg(test)]
pub use meal_service_repository::MockMealServiceRepository;
pub use meal_service_repository::{
    FixtureMealServiceRepository, MealServiceRepository, MealServiceRepositoryError,
};
#[cfg(test)]
pub use roster_repository::MockRosterRepository;
pub use roster_repository::{FixtureRosterRepository, RosterRepository, RosterRepositoryError};
