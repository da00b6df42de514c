//! Form validation engine.
//!
//! A [`Form`] wraps the submitted [`FieldSet`] for one request and
//! accumulates messages in a [`FormErrors`] map as rule methods run. Rules
//! never short-circuit: every rule for every field is evaluated so the page
//! can show all problems at once.
//!
//! A missing field and a field submitted as the empty string are treated the
//! same way by every rule.
//!
//! # Examples
//! ```
//! use roomdesk::domain::forms::{FieldSet, Form};
//!
//! let fields = FieldSet::from_pairs([("first_name", "Jo"), ("email", "jo@x.com")]);
//! let mut form = Form::new(fields);
//! form.required(&["first_name", "last_name", "email"]);
//! form.min_length("first_name", 3);
//! form.is_email("email");
//!
//! assert!(!form.is_valid());
//! assert_eq!(form.errors().get("last_name"), "This field cannot be blank");
//! assert_eq!(
//!     form.errors().get("first_name"),
//!     "This field must be at least 3 characters long"
//! );
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

/// Message appended by [`Form::required`].
pub const BLANK_MESSAGE: &str = "This field cannot be blank";
/// Message appended by [`Form::is_email`].
pub const INVALID_EMAIL_MESSAGE: &str = "Invalid email address";

/// Ordered `(name, value)` pairs decoded from one submission.
///
/// Duplicate names are kept; lookups return the last value for a name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSet(Vec<(String, String)>);

impl FieldSet {
    /// Empty field set, used when a page is rendered before any submission.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a field set from borrowed pairs.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        pairs
            .into_iter()
            .map(|(name, value)| (name.to_owned(), value.to_owned()))
            .collect()
    }

    /// Append a field.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    /// Last submitted value for `name`, if any.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .rev()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }

    /// Last submitted value for `name`, or `""` when absent.
    pub fn value(&self, name: &str) -> &str {
        self.get(name).unwrap_or_default()
    }

    /// Number of submitted pairs, duplicates included.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when nothing was submitted.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for FieldSet {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<Vec<(String, String)>> for FieldSet {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Self(pairs)
    }
}

/// Field name to ordered validation messages.
///
/// A field absent from the map is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    /// Append a message for `field`.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_owned())
            .or_default()
            .push(message.into());
    }

    /// First message recorded for `field`, or `""` when the field is valid.
    pub fn get(&self, field: &str) -> &str {
        self.0
            .get(field)
            .and_then(|messages| messages.first())
            .map_or("", String::as_str)
    }

    /// True when at least one message is recorded for `field`.
    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Every message recorded for `field`, in insertion order.
    pub fn all(&self, field: &str) -> &[String] {
        self.0.get(field).map_or(&[], Vec::as_slice)
    }

    /// Total number of messages across all fields.
    pub fn len(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    /// True when no field has a message.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Submitted fields plus the errors accumulated by rule calls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Form {
    fields: FieldSet,
    errors: FormErrors,
}

impl Form {
    /// Wrap a submission with an empty error map.
    pub fn new(fields: FieldSet) -> Self {
        Self {
            fields,
            errors: FormErrors::default(),
        }
    }

    /// Form with no fields and no errors.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Raw submitted value for `name`, or `""`.
    pub fn value(&self, name: &str) -> &str {
        self.fields.value(name)
    }

    /// Submitted fields.
    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    /// Accumulated errors.
    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    /// True iff the field exists and its untrimmed value is non-empty.
    pub fn has(&self, name: &str) -> bool {
        !self.value(name).is_empty()
    }

    /// Flag every listed field whose trimmed value is empty.
    pub fn required(&mut self, names: &[&str]) {
        for name in names {
            if self.value(name).trim().is_empty() {
                self.errors.add(name, BLANK_MESSAGE);
            }
        }
    }

    /// Require at least `min` characters in the raw, untrimmed value.
    ///
    /// Length is counted in Unicode scalar values.
    pub fn min_length(&mut self, name: &str, min: usize) -> bool {
        if self.value(name).chars().count() < min {
            self.errors.add(
                name,
                format!("This field must be at least {min} characters long"),
            );
            return false;
        }
        true
    }

    /// Require the value to be a plausible email address.
    pub fn is_email(&mut self, name: &str) {
        if !is_email_address(self.value(name)) {
            self.errors.add(name, INVALID_EMAIL_MESSAGE);
        }
    }

    /// True when no rule has recorded an error.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// HTML5 email grammar with a dotted domain.
fn is_email_address(value: &str) -> bool {
    if !value.to_owned().validate_email() {
        return false;
    }
    let Some((_, domain)) = value.rsplit_once('@') else {
        return false;
    };
    domain.contains('.') && domain.split('.').all(|label| !label.is_empty())
}
