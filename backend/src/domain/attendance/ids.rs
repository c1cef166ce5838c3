//! Identifier newtypes for the attendance tables.
//!
//! The cafeteria schema uses `SERIAL` keys, so every identifier is a positive
//! `i32`. Construction from wider integers rejects zero, negatives, and
//! overflow.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Validation errors raised by identifier and grade constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttendanceIdError {
    /// The identifier was zero, negative, or larger than `i32::MAX`.
    #[error("{kind} must be a positive integer (got {value})")]
    NotPositive {
        /// Name of the identifier kind being validated.
        kind: &'static str,
        /// The rejected value.
        value: i64,
    },
    /// The grade name was blank after trimming.
    #[error("grade name must not be empty")]
    EmptyGradeName,
}

macro_rules! positive_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "i64", into = "i32")]
        pub struct $name(i32);

        impl $name {
            /// Validate and wrap a raw identifier.
            pub fn new(value: i64) -> Result<Self, AttendanceIdError> {
                i32::try_from(value)
                    .ok()
                    .filter(|id| *id > 0)
                    .map(Self)
                    .ok_or(AttendanceIdError::NotPositive { kind: $kind, value })
            }

            /// Raw database value.
            pub fn get(self) -> i32 {
                self.0
            }
        }

        impl TryFrom<i64> for $name {
            type Error = AttendanceIdError;

            fn try_from(value: i64) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

positive_id!(
    /// Identifier of a row in `personas` (teachers and students alike).
    PersonId,
    "person id"
);
positive_id!(
    /// Identifier of a meal service in `servicios`.
    ServiceId,
    "service id"
);
positive_id!(
    /// Identifier of a student's grade enrollment in `alumno_grado`.
    EnrollmentId,
    "enrollment id"
);

/// Grade label such as `"3ro A"`, stored trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GradeName(String);

impl GradeName {
    /// Validate and wrap a grade label.
    pub fn new(value: impl AsRef<str>) -> Result<Self, AttendanceIdError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(AttendanceIdError::EmptyGradeName);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the label.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for GradeName {
    type Error = AttendanceIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<GradeName> for String {
    fn from(value: GradeName) -> Self {
        value.0
    }
}

impl AsRef<str> for GradeName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for GradeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
