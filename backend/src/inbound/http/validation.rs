//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every helper yields `invalid_request` errors whose details name the
//! offending field, so clients can highlight it:
//!
//! ```json
//! {"field": "appointmentDate", "value": "2024-6-1", "code": "invalid_date"}
//! ```

use std::fmt::Display;

use serde_json::json;

use crate::domain::{
    AppointmentDate, AppointmentValidationError, Error, InvalidSerialId, SlotTime,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidId,
    InvalidDate,
    InvalidTime,
    InvalidValue,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidId => "invalid_id",
            ErrorCode::InvalidDate => "invalid_date",
            ErrorCode::InvalidTime => "invalid_time",
            ErrorCode::InvalidValue => "invalid_value",
        }
    }
}

/// Wire name of a request field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    Error::invalid_request(format!("missing required field: {field}")).with_details(json!({
        "field": field,
        "code": ErrorCode::MissingField.as_str(),
    }))
}

/// Wrap a domain validation message with field context.
pub(crate) fn invalid_field_error(field: FieldName, message: impl Display) -> Error {
    Error::invalid_request(message.to_string()).with_details(json!({
        "field": field.as_str(),
        "code": ErrorCode::InvalidValue.as_str(),
    }))
}

fn invalid_value_error(
    field: FieldName,
    code: ErrorCode,
    message: impl Display,
    value: impl Display,
) -> Error {
    Error::invalid_request(message.to_string()).with_details(json!({
        "field": field.as_str(),
        "value": value.to_string(),
        "code": code.as_str(),
    }))
}

pub(crate) fn require<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

/// Parse a raw numeric identifier from a path or body into a typed id.
pub(crate) fn parse_id<T>(raw: i64, field: FieldName) -> Result<T, Error>
where
    T: TryFrom<i64, Error = InvalidSerialId>,
{
    T::try_from(raw).map_err(|_| {
        invalid_value_error(
            field,
            ErrorCode::InvalidId,
            format!("{} must be a positive integer", field.as_str()),
            raw,
        )
    })
}

/// Parse a literal `YYYY-MM-DD` date.
pub(crate) fn parse_date(raw: &str, field: FieldName) -> Result<AppointmentDate, Error> {
    raw.parse::<AppointmentDate>()
        .map_err(|err| invalid_value_error(field, ErrorCode::InvalidDate, err, raw))
}

/// Parse a requested booking time that must start a clinic slot.
pub(crate) fn parse_slot_time(raw: &str, field: FieldName) -> Result<SlotTime, Error> {
    SlotTime::parse_bookable(raw).map_err(|err| {
        let code = match err {
            AppointmentValidationError::OffGrid => ErrorCode::InvalidValue,
            _ => ErrorCode::InvalidTime,
        };
        invalid_value_error(field, code, err, raw)
    })
}
