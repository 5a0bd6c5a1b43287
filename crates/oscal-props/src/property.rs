//! # Property Record
//!
//! The field set shared by every property variant: a namespace-qualified
//! name/value pair with optional identifier, class, and remarks.
//!
//! A bare [`Property`] has only passed datatype validation. Role
//! constraints are applied when it is turned into one of the validated
//! variants in [`crate::variants`].

use oscal_core::{
    DatatypeError, FieldValue, MarkupMultiline, OscalModel, OscalString, OscalUuid, Token, Uri,
};
use serde::{Deserialize, Serialize};

/// An attribute, characteristic, or quality of the containing object,
/// expressed as a namespace-qualified name/value pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Property {
    name: Token,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    uuid: Option<OscalUuid>,
    #[serde(default)]
    ns: Uri,
    value: OscalString,
    #[serde(rename = "class", default, skip_serializing_if = "Option::is_none")]
    prop_class: Option<Token>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    remarks: Option<MarkupMultiline>,
}

impl Property {
    /// A property in the OSCAL namespace with no optional fields set.
    pub fn new(name: Token, value: OscalString) -> Self {
        Self {
            name,
            uuid: None,
            ns: Uri::oscal_namespace(),
            value,
            prop_class: None,
            remarks: None,
        }
    }

    /// Build from raw strings, validating the `name` and `value` datatypes.
    pub fn parse(name: &str, value: &str) -> Result<Self, DatatypeError> {
        Ok(Self::new(Token::new(name)?, OscalString::new(value)?))
    }

    /// Set the identifier.
    pub fn with_uuid(mut self, uuid: OscalUuid) -> Self {
        self.uuid = Some(uuid);
        self
    }

    /// Set the namespace qualifying `name`.
    pub fn with_ns(mut self, ns: Uri) -> Self {
        self.ns = ns;
        self
    }

    /// Set the sub-type token.
    pub fn with_class(mut self, class: Token) -> Self {
        self.prop_class = Some(class);
        self
    }

    /// Set the remarks.
    pub fn with_remarks(mut self, remarks: MarkupMultiline) -> Self {
        self.remarks = Some(remarks);
        self
    }

    /// The label identifying the attribute.
    pub fn name(&self) -> &Token {
        &self.name
    }

    /// The globally unique identifier, if assigned.
    pub fn uuid(&self) -> Option<&OscalUuid> {
        self.uuid.as_ref()
    }

    /// The namespace qualifying `name`.
    pub fn ns(&self) -> &Uri {
        &self.ns
    }

    /// The attribute's value.
    pub fn value(&self) -> &OscalString {
        &self.value
    }

    /// The sub-type token (`class` in OSCAL JSON).
    pub fn prop_class(&self) -> Option<&Token> {
        self.prop_class.as_ref()
    }

    /// Free-text commentary.
    pub fn remarks(&self) -> Option<&MarkupMultiline> {
        self.remarks.as_ref()
    }
}

impl OscalModel for Property {
    fn field_values(&self) -> Vec<FieldValue<'_>> {
        vec![
            FieldValue::present("name", self.name.as_str()),
            FieldValue::optional("uuid", self.uuid.map(|id| id.to_string())),
            FieldValue::present("ns", self.ns.as_str()),
            FieldValue::present("value", self.value.as_str()),
            FieldValue::optional("prop_class", self.prop_class.as_ref().map(Token::as_str)),
            FieldValue::optional("remarks", self.remarks.as_ref().map(MarkupMultiline::as_str)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oscal_core::OSCAL_NAMESPACE;

    #[test]
    fn test_namespace_defaults_to_oscal() {
        let prop = Property::parse("marking", "test").unwrap();
        assert_eq!(prop.ns().as_str(), OSCAL_NAMESPACE);
        assert!(prop.uuid().is_none());
        assert!(prop.prop_class().is_none());
    }

    #[test]
    fn test_parse_rejects_bad_datatypes() {
        assert!(matches!(
            Property::parse("1st", "x"),
            Err(DatatypeError::InvalidToken(_))
        ));
        assert!(matches!(
            Property::parse("marking", ""),
            Err(DatatypeError::InvalidString(_))
        ));
    }

    #[test]
    fn test_deserialize_uses_class_alias_and_default_ns() {
        let prop: Property =
            serde_json::from_str(r#"{"name": "type", "value": "data-center", "class": "primary"}"#)
                .unwrap();
        assert_eq!(prop.prop_class().map(Token::as_str), Some("primary"));
        assert_eq!(prop.ns().as_str(), OSCAL_NAMESPACE);
    }

    #[test]
    fn test_deserialize_rejects_unknown_fields() {
        let result: Result<Property, _> =
            serde_json::from_str(r#"{"name": "marking", "value": "x", "prop_class": "a"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_requires_name_and_value() {
        assert!(serde_json::from_str::<Property>(r#"{"name": "marking"}"#).is_err());
        assert!(serde_json::from_str::<Property>(r#"{"value": "x"}"#).is_err());
    }

    #[test]
    fn test_serialize_omits_absent_optionals() {
        let prop = Property::parse("marking", "test").unwrap();
        assert_eq!(
            serde_json::to_string(&prop).unwrap(),
            r#"{"name":"marking","ns":"http://csrc.nist.gov/ns/oscal","value":"test"}"#
        );
    }

    #[test]
    fn test_field_values_declaration_order() {
        let prop = Property::parse("type", "data-center")
            .unwrap()
            .with_class(Token::new("primary").unwrap());
        let fields: Vec<_> = prop.field_values().iter().map(|f| f.field).collect();
        assert_eq!(fields, vec!["name", "uuid", "ns", "value", "prop_class", "remarks"]);
        assert_eq!(prop.field_values()[4].value.as_deref(), Some("primary"));
    }
}
