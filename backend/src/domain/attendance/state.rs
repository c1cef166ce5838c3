//! Attendance decisions recorded per student.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One attendance decision for a student at a meal service.
///
/// The wire and database spelling is Spanish: `Si` (present and eating), `No`
/// (present, not eating) and `Ausente` (absent).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttendanceState {
    /// Present and eating.
    Si,
    /// Present, not eating.
    No,
    /// Absent.
    Ausente,
}

impl AttendanceState {
    /// All states in display order.
    pub const ALL: [Self; 3] = [Self::Si, Self::No, Self::Ausente];

    /// Stored and serialised spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Si => "Si",
            Self::No => "No",
            Self::Ausente => "Ausente",
        }
    }
}

impl fmt::Display for AttendanceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a raw value is not one of the three known states.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid attendance state: {value}")]
pub struct InvalidAttendanceState {
    /// The rejected input.
    pub value: String,
}

impl FromStr for AttendanceState {
    type Err = InvalidAttendanceState;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Si" => Ok(Self::Si),
            "No" => Ok(Self::No),
            "Ausente" => Ok(Self::Ausente),
            other => Err(InvalidAttendanceState {
                value: other.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("Si", AttendanceState::Si)]
    #[case("No", AttendanceState::No)]
    #[case("Ausente", AttendanceState::Ausente)]
    fn parses_known_states(#[case] raw: &str, #[case] expected: AttendanceState) {
        assert_eq!(raw.parse::<AttendanceState>(), Ok(expected));
        assert_eq!(expected.as_str(), raw);
    }

    #[rstest]
    #[case("Maybe")]
    #[case("si")]
    #[case("")]
    fn rejects_unknown_states_naming_the_value(#[case] raw: &str) {
        let err = raw.parse::<AttendanceState>().expect_err("unknown state");
        assert_eq!(err.to_string(), format!("invalid attendance state: {raw}"));
    }
}
