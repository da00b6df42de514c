//! Shared field parsing helpers for inbound HTTP adapters.
//!
//! Values that must be converted before the validation engine runs (dates,
//! numbers, identifiers) are parsed here. A malformed value is an internal
//! error rather than a field message, so the request fails with the opaque
//! error page and the offending value is logged.

use std::fmt::Display;
use std::str::FromStr;

use actix_web::web;
use chrono::NaiveDate;

use crate::domain::{DATE_FORMAT, Error, FieldSet};

/// Newtype wrapper for HTTP field names to provide type safety.
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

/// Urlencoded body decoded as ordered pairs.
pub(crate) type UrlEncoded = web::Form<Vec<(String, String)>>;

/// Convert a decoded urlencoded body into a [`FieldSet`].
pub(crate) fn field_set(form: UrlEncoded) -> FieldSet {
    FieldSet::from(form.into_inner())
}

fn malformed_field_error(field: FieldName, value: &str, reason: impl Display) -> Error {
    Error::internal(format!(
        "malformed value for {}: {value:?} ({reason})",
        field.as_str()
    ))
}

/// Parse a required `YYYY-MM-DD` date.
pub(crate) fn parse_date(fields: &FieldSet, field: FieldName) -> Result<NaiveDate, Error> {
    let value = fields.value(field.as_str());
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|err| malformed_field_error(field, value, err))
}

/// Parse an optional `YYYY-MM-DD` date; blank becomes `None`.
pub(crate) fn parse_optional_date(
    fields: &FieldSet,
    field: FieldName,
) -> Result<Option<NaiveDate>, Error> {
    if fields.value(field.as_str()).trim().is_empty() {
        return Ok(None);
    }
    parse_date(fields, field).map(Some)
}

/// Parse a required number.
pub(crate) fn parse_number<T>(fields: &FieldSet, field: FieldName) -> Result<T, Error>
where
    T: FromStr,
    T::Err: Display,
{
    let value = fields.value(field.as_str());
    value
        .trim()
        .parse()
        .map_err(|err| malformed_field_error(field, value, err))
}

/// Parse an optional number; blank becomes `None`.
pub(crate) fn parse_optional_number<T>(
    fields: &FieldSet,
    field: FieldName,
) -> Result<Option<T>, Error>
where
    T: FromStr,
    T::Err: Display,
{
    if fields.value(field.as_str()).trim().is_empty() {
        return Ok(None);
    }
    parse_number(fields, field).map(Some)
}
