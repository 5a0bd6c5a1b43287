//! # Base Model Capability
//!
//! Behavior shared by every OSCAL record type:
//!
//! - [`OscalModel::field_values`] enumerates the declared fields in
//!   declaration order, so constraint checks and reports are deterministic.
//! - [`OscalModel::check_fields`] compares current values against an
//!   [`AllowedValues`] mapping and reports the status of every field.
//! - [`OscalModel::to_oscal_json`] exports the record as OSCAL JSON:
//!   4-space indentation, OSCAL attribute names, absent fields omitted.
//!
//! Checking never fails and never mutates the record. Whether a violation
//! is fatal is decided by the caller.

use std::borrow::Cow;
use std::fmt;

use serde::Serialize;

use crate::error::OscalError;

/// Convert a Rust field name to its OSCAL attribute name.
///
/// Any `*_class` field is named `class`; otherwise underscores become hyphens
/// (`media_type` → `media-type`).
pub fn oscal_alias(field: &str) -> String {
    if field.rsplit('_').next() == Some("class") {
        return "class".to_string();
    }
    field.replace('_', "-")
}

/// A declared field and its current value, if present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValue<'a> {
    /// Rust field name.
    pub field: &'static str,
    /// String form of the value; `None` for an absent optional field.
    pub value: Option<Cow<'a, str>>,
}

impl<'a> FieldValue<'a> {
    /// A field that always carries a value.
    pub fn present(field: &'static str, value: impl Into<Cow<'a, str>>) -> Self {
        Self {
            field,
            value: Some(value.into()),
        }
    }

    /// An optional field.
    pub fn optional<V>(field: &'static str, value: Option<V>) -> Self
    where
        V: Into<Cow<'a, str>>,
    {
        Self {
            field,
            value: value.map(Into::into),
        }
    }
}

/// Ordered mapping from field name to the values that field may hold.
///
/// Fields absent from the mapping are unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowedValues {
    entries: Vec<(&'static str, Vec<String>)>,
}

impl AllowedValues {
    /// An empty mapping; nothing is constrained.
    pub fn new() -> Self {
        Self::default()
    }

    /// Constrain `field` to `values`, replacing any earlier constraint on it.
    pub fn allow<I, S>(mut self, field: &'static str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        match self.entries.iter_mut().find(|(f, _)| *f == field) {
            Some((_, existing)) => *existing = values,
            None => self.entries.push((field, values)),
        }
        self
    }

    /// The permitted values for `field`, if it is constrained.
    pub fn permitted(&self, field: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, values)| values.as_slice())
    }

    /// Iterate the constraints in the order they were declared.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &[String])> {
        self.entries.iter().map(|(f, v)| (*f, v.as_slice()))
    }

    /// Returns the number of constrained fields.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no field is constrained.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A field whose value is outside its permitted set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    /// Rust field name.
    pub field: &'static str,
    /// The offending value.
    pub value: String,
    /// The values the field may hold.
    pub permitted: Vec<String>,
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid value {:?} for field {:?} (permitted: ",
            self.value,
            oscal_alias(self.field)
        )?;
        for (i, p) in self.permitted.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{p:?}")?;
        }
        f.write_str(")")
    }
}

/// Outcome of checking one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldStatus {
    /// The value is in the permitted set.
    Match,
    /// The field is unconstrained, or an optional field is absent.
    Unchecked,
    /// The value is outside the permitted set.
    Violation(FieldViolation),
}

/// Per-field results of an allow-list check, in field declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldReport {
    entries: Vec<(&'static str, FieldStatus)>,
}

impl FieldReport {
    /// Status of every declared field.
    pub fn entries(&self) -> &[(&'static str, FieldStatus)] {
        &self.entries
    }

    /// Status of `field`, if it is declared.
    pub fn status(&self, field: &str) -> Option<&FieldStatus> {
        self.entries
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, status)| status)
    }

    /// True if `field` was checked and its value is permitted.
    pub fn matched(&self, field: &str) -> bool {
        matches!(self.status(field), Some(FieldStatus::Match))
    }

    /// Violations, in discovery order.
    pub fn violations(&self) -> impl Iterator<Item = &FieldViolation> {
        self.entries.iter().filter_map(|(_, status)| match status {
            FieldStatus::Violation(v) => Some(v),
            _ => None,
        })
    }

    /// Consume the report, keeping only the violations.
    pub fn into_violations(self) -> Vec<FieldViolation> {
        self.entries
            .into_iter()
            .filter_map(|(_, status)| match status {
                FieldStatus::Violation(v) => Some(v),
                _ => None,
            })
            .collect()
    }

    /// True if no field is in violation.
    pub fn is_clean(&self) -> bool {
        self.violations().next().is_none()
    }
}

/// Behavior shared by all OSCAL record types.
pub trait OscalModel {
    /// Every declared field with its current value, in declaration order.
    fn field_values(&self) -> Vec<FieldValue<'_>>;

    /// Check current values against `allowed`.
    ///
    /// Fields absent from `allowed` and optional fields with no value are
    /// [`FieldStatus::Unchecked`]. Never fails; the caller decides what a
    /// violation means.
    fn check_fields(&self, allowed: &AllowedValues) -> FieldReport {
        let entries = self
            .field_values()
            .into_iter()
            .map(|FieldValue { field, value }| {
                let status = match (allowed.permitted(field), value) {
                    (Some(permitted), Some(value)) => {
                        if permitted.iter().any(|p| p.as_str() == value.as_ref()) {
                            FieldStatus::Match
                        } else {
                            FieldStatus::Violation(FieldViolation {
                                field,
                                value: value.into_owned(),
                                permitted: permitted.to_vec(),
                            })
                        }
                    }
                    _ => FieldStatus::Unchecked,
                };
                (field, status)
            })
            .collect();
        FieldReport { entries }
    }

    /// Serialize as OSCAL JSON with 4-space indentation.
    fn to_oscal_json(&self) -> Result<String, OscalError>
    where
        Self: Serialize + Sized,
    {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        String::from_utf8(buf).map_err(|e| OscalError::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Sample {
        name: String,
        item_class: Option<String>,
        media_type: Option<String>,
    }

    impl OscalModel for Sample {
        fn field_values(&self) -> Vec<FieldValue<'_>> {
            vec![
                FieldValue::present("name", &self.name),
                FieldValue::optional("item_class", self.item_class.as_deref()),
                FieldValue::optional("media_type", self.media_type.as_deref()),
            ]
        }
    }

    fn sample(name: &str, class: Option<&str>) -> Sample {
        Sample {
            name: name.to_string(),
            item_class: class.map(str::to_string),
            media_type: None,
        }
    }

    #[test]
    fn test_oscal_alias() {
        assert_eq!(oscal_alias("prop_class"), "class");
        assert_eq!(oscal_alias("class"), "class");
        assert_eq!(oscal_alias("media_type"), "media-type");
        assert_eq!(oscal_alias("resource_fragment"), "resource-fragment");
        assert_eq!(oscal_alias("name"), "name");
    }

    #[test]
    fn test_check_fields_statuses() {
        let allowed = AllowedValues::new()
            .allow("name", ["type"])
            .allow("item_class", ["primary", "alternate"]);
        let report = sample("type", Some("tertiary")).check_fields(&allowed);

        assert_eq!(report.status("name"), Some(&FieldStatus::Match));
        assert!(matches!(report.status("item_class"), Some(FieldStatus::Violation(_))));
        assert_eq!(report.status("media_type"), Some(&FieldStatus::Unchecked));
        assert!(report.matched("name"));
        assert!(!report.is_clean());

        let violations = report.into_violations();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "item_class");
        assert_eq!(violations[0].value, "tertiary");
        assert_eq!(violations[0].permitted, vec!["primary", "alternate"]);
    }

    #[test]
    fn test_absent_optional_field_is_unchecked() {
        let allowed = AllowedValues::new().allow("item_class", ["primary"]);
        let report = sample("x", None).check_fields(&allowed);
        assert!(report.is_clean());
        assert_eq!(report.status("item_class"), Some(&FieldStatus::Unchecked));
    }

    #[test]
    fn test_violations_follow_declaration_order() {
        // Declared in reverse of field order on purpose.
        let allowed = AllowedValues::new()
            .allow("item_class", ["primary"])
            .allow("name", ["type"]);
        let report = sample("site", Some("other")).check_fields(&allowed);
        let fields: Vec<_> = report.violations().map(|v| v.field).collect();
        assert_eq!(fields, vec!["name", "item_class"]);
    }

    #[test]
    fn test_allow_replaces_existing_constraint() {
        let allowed = AllowedValues::new()
            .allow("name", ["a"])
            .allow("name", ["b", "c"]);
        assert_eq!(allowed.len(), 1);
        assert_eq!(allowed.permitted("name"), Some(&["b".to_string(), "c".to_string()][..]));
    }

    #[test]
    fn test_empty_allow_list_checks_nothing() {
        let report = sample("anything", Some("x")).check_fields(&AllowedValues::new());
        assert!(report.is_clean());
        assert!(report
            .entries()
            .iter()
            .all(|(_, s)| *s == FieldStatus::Unchecked));
    }

    #[test]
    fn test_violation_display() {
        let v = FieldViolation {
            field: "prop_class",
            value: "tertiary".into(),
            permitted: vec!["primary".into(), "alternate".into()],
        };
        assert_eq!(
            v.to_string(),
            "invalid value \"tertiary\" for field \"class\" (permitted: \"primary\", \"alternate\")"
        );
    }

    #[test]
    fn test_to_oscal_json_indents_four_spaces() {
        let json = sample("type", None).to_oscal_json().unwrap();
        assert!(json.starts_with("{\n    \"name\": \"type\""));
    }
}
