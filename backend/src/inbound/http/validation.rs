//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every failure is an `invalid_request` error whose details carry the
//! offending `field`, a stable `code`, and where relevant the `value` and the
//! array `index`.

use chrono::NaiveDate;
use serde_json::json;

use crate::domain::{AttendanceIdError, AttendanceState, Error, GradeName};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidId,
    InvalidDate,
    InvalidGrade,
    InvalidState,
    EmptyBatch,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidId => "invalid_id",
            ErrorCode::InvalidDate => "invalid_date",
            ErrorCode::InvalidGrade => "invalid_grade",
            ErrorCode::InvalidState => "invalid_state",
            ErrorCode::EmptyBatch => "empty_batch",
        }
    }
}

/// Wire name of a request field, e.g. `idPersonaDocente`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<serde_json::Value>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }

    fn with_index(
        self,
        code: ErrorCode,
        index: usize,
        value: impl Into<serde_json::Value>,
    ) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "index": index,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("missing required field: {field}"))
        .with_code(ErrorCode::MissingField)
}

pub(crate) fn missing_field_index_error(field: FieldName, index: usize, key: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field}[{index}] is missing {key}")).with_index(
        ErrorCode::MissingField,
        index,
        key,
    )
}

/// Unwrap a required field.
pub(crate) fn require<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

/// Validate a positive database id using one of the domain id constructors.
pub(crate) fn parse_id<T>(
    value: i64,
    field: FieldName,
    build: impl FnOnce(i64) -> Result<T, AttendanceIdError>,
) -> Result<T, Error> {
    build(value).map_err(|_| {
        let name = field.as_str();
        ValidationError::new(name, format!("{name} must be a positive integer"))
            .with_value(ErrorCode::InvalidId, value)
    })
}

pub(crate) fn invalid_id_index_error(field: FieldName, index: usize, value: i64) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field}[{index}] has a non-positive id"))
        .with_index(ErrorCode::InvalidId, index, value)
}

/// Parse a calendar date in `YYYY-MM-DD` form.
pub(crate) fn parse_iso_date(value: &str, field: FieldName) -> Result<NaiveDate, Error> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        let name = field.as_str();
        ValidationError::new(name, format!("{name} must be a YYYY-MM-DD date"))
            .with_value(ErrorCode::InvalidDate, value)
    })
}

pub(crate) fn parse_grade_name(value: &str, field: FieldName) -> Result<GradeName, Error> {
    GradeName::new(value).map_err(|_| {
        let name = field.as_str();
        ValidationError::new(name, format!("{name} must not be blank"))
            .with_value(ErrorCode::InvalidGrade, value)
    })
}

/// Parse one state of a batch; the message names the rejected value.
pub(crate) fn parse_state_at(
    value: &str,
    field: FieldName,
    index: usize,
) -> Result<AttendanceState, Error> {
    value.parse::<AttendanceState>().map_err(|err| {
        ValidationError::new(field.as_str(), err.to_string()).with_index(
            ErrorCode::InvalidState,
            index,
            value,
        )
    })
}

pub(crate) fn empty_batch_error(field: FieldName) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must contain at least one entry"))
        .with_code(ErrorCode::EmptyBatch)
}
