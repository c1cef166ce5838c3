//! Attendance value types.
//!
//! Identifiers, the three-valued attendance decision, submitted marks,
//! persisted records, and the aggregate summary computed from a batch.

mod ids;
mod record;
mod state;
mod summary;

pub use ids::{AttendanceIdError, EnrollmentId, GradeName, PersonId, ServiceId};
pub use record::{AttendanceMark, AttendanceRecord, AttendanceSheetKey, latest_per_enrollment};
pub use state::{AttendanceState, InvalidAttendanceState};
pub use summary::{AttendanceSummary, summarize};
