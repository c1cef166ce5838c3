//! Students eligible for an attendance sheet.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{EnrollmentId, GradeName, PersonId};

/// A student's enrollment in a grade, enriched with display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterStudent {
    /// Row in `alumno_grado`.
    pub enrollment_id: EnrollmentId,
    /// Row in `personas`.
    pub person_id: PersonId,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// National id, when recorded.
    pub dni: Option<String>,
    /// Grade of this enrollment.
    pub grade_name: GradeName,
    /// Calendar year the enrollment covers.
    pub school_year: i32,
}

/// School year an attendance date belongs to.
///
/// The cafeteria runs on calendar school years (March to December), so the
/// year is the calendar year of the date.
pub fn school_year_for(date: NaiveDate) -> i32 {
    date.year()
}
