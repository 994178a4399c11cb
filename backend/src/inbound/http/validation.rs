//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every validation failure becomes `400 invalid_request` with details
//! `{ "field", "code" }` and, where useful, the offending `value`.

use std::fmt::Display;

use serde_json::json;
use uuid::Uuid;

use crate::domain::{
    CredentialsValidationError, Error, FinderInputError, PetValidationError, TagCode,
};

/// Machine-readable validation codes placed in error details.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValidationCode {
    MissingField,
    InvalidUuid,
    InvalidTagCode,
    InvalidValue,
    OutOfRange,
}

impl ValidationCode {
    const fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidUuid => "invalid_uuid",
            Self::InvalidTagCode => "invalid_tag_code",
            Self::InvalidValue => "invalid_value",
            Self::OutOfRange => "out_of_range",
        }
    }
}

/// Name of a request field as clients spell it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub(crate) const fn as_str(self) -> &'static str {
        self.0
    }
}

pub(crate) fn field_error(field: &str, code: ValidationCode, message: impl Display) -> Error {
    Error::invalid_request(message.to_string()).with_details(json!({
        "field": field,
        "code": code.as_str(),
    }))
}

fn value_error(field: FieldName, code: ValidationCode, message: String, value: &str) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
        "value": value,
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    field_error(
        name,
        ValidationCode::MissingField,
        format!("missing required field: {name}"),
    )
}

/// Trimmed text, or a missing-field error when absent or blank.
pub(crate) fn require_text(value: Option<&str>, field: FieldName) -> Result<String, Error> {
    value
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| missing_field_error(field))
}

pub(crate) fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(value).map_err(|_| {
        value_error(
            field,
            ValidationCode::InvalidUuid,
            format!("{} must be a valid UUID", field.as_str()),
            value,
        )
    })
}

pub(crate) fn parse_tag_code(value: &str, field: FieldName) -> Result<TagCode, Error> {
    TagCode::new(value)
        .map_err(|err| value_error(field, ValidationCode::InvalidTagCode, err.to_string(), value))
}

pub(crate) fn invalid_value_error(field: FieldName, value: &str, message: impl Display) -> Error {
    value_error(field, ValidationCode::InvalidValue, message.to_string(), value)
}

pub(crate) fn out_of_range_error(field: FieldName, value: impl Display, message: impl Display) -> Error {
    value_error(
        field,
        ValidationCode::OutOfRange,
        message.to_string(),
        &value.to_string(),
    )
}

pub(crate) fn credentials_error(err: CredentialsValidationError) -> Error {
    let code = match err {
        CredentialsValidationError::MalformedEmail => ValidationCode::InvalidValue,
        CredentialsValidationError::EmptyEmail
        | CredentialsValidationError::EmptyPassword
        | CredentialsValidationError::EmptyFullName => ValidationCode::MissingField,
    };
    field_error(err.field(), code, err)
}

pub(crate) fn pet_error(err: PetValidationError) -> Error {
    let code = match err {
        PetValidationError::EmptyName => ValidationCode::MissingField,
        PetValidationError::NameTooLong { .. } => ValidationCode::InvalidValue,
        PetValidationError::AgeOutOfRange { .. } => ValidationCode::OutOfRange,
    };
    field_error(err.field(), code, err)
}

pub(crate) fn finder_error(err: &FinderInputError) -> Error {
    let code = match err {
        FinderInputError::LatitudeOutOfRange | FinderInputError::LongitudeOutOfRange => {
            ValidationCode::OutOfRange
        }
        FinderInputError::UnknownContactMethod { .. } => ValidationCode::InvalidValue,
        FinderInputError::EmptyFinderContact => ValidationCode::MissingField,
    };
    field_error(err.field(), code, err)
}
