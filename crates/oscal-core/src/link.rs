//! # Link
//!
//! A reference to a local or remote resource that has a specific relation
//! to the containing object.

use serde::{Deserialize, Serialize};

use crate::datatypes::{MarkupLine, MediaType, Token, UrlReference};
use crate::model::{FieldValue, OscalModel};

/// A reference to a local or remote resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Link {
    /// A resolvable URI or a `#fragment` into the current document.
    pub href: UrlReference,
    /// The purpose of the link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rel: Option<Token>,
    /// Media type of the linked resource.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<MediaType>,
    /// When `href` points to a back-matter resource, the URI fragment to
    /// append to any rlink of that resource. Must be URI encoded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_fragment: Option<String>,
    /// Link text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<MarkupLine>,
}

impl Link {
    /// A bare link to `href`.
    pub fn new(href: UrlReference) -> Self {
        Self {
            href,
            rel: None,
            media_type: None,
            resource_fragment: None,
            text: None,
        }
    }

    /// Set the relation.
    pub fn with_rel(mut self, rel: Token) -> Self {
        self.rel = Some(rel);
        self
    }

    /// Set the media type.
    pub fn with_media_type(mut self, media_type: MediaType) -> Self {
        self.media_type = Some(media_type);
        self
    }

    /// Set the resource fragment.
    pub fn with_resource_fragment(mut self, fragment: impl Into<String>) -> Self {
        self.resource_fragment = Some(fragment.into());
        self
    }

    /// Set the link text.
    pub fn with_text(mut self, text: MarkupLine) -> Self {
        self.text = Some(text);
        self
    }
}

impl OscalModel for Link {
    fn field_values(&self) -> Vec<FieldValue<'_>> {
        vec![
            FieldValue::present("href", self.href.as_str()),
            FieldValue::optional("rel", self.rel.as_ref().map(Token::as_str)),
            FieldValue::optional("media_type", self.media_type.as_ref().map(MediaType::as_str)),
            FieldValue::optional("resource_fragment", self.resource_fragment.as_deref()),
            FieldValue::optional("text", self.text.as_ref().map(MarkupLine::as_str)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AllowedValues;

    #[test]
    fn test_deserialize_with_aliases() {
        let link: Link = serde_json::from_str(
            r##"{"href": "#res-1", "rel": "reference", "media-type": "application/pdf"}"##,
        )
        .unwrap();
        assert_eq!(link.href.as_str(), "#res-1");
        assert_eq!(link.rel.as_ref().map(Token::as_str), Some("reference"));
        assert_eq!(link.media_type.as_ref().map(MediaType::as_str), Some("application/pdf"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<Link, _> =
            serde_json::from_str(r#"{"href": "https://example.com", "color": "blue"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_href_rejected() {
        let result: Result<Link, _> = serde_json::from_str(r#"{"href": "relative.json"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_absent_optionals_omitted() {
        let link = Link::new(UrlReference::new("https://example.com").unwrap());
        assert_eq!(
            serde_json::to_string(&link).unwrap(),
            r#"{"href":"https://example.com"}"#
        );
    }

    #[test]
    fn test_allow_list_applies_to_links() {
        let allowed = AllowedValues::new().allow("rel", ["reference", "related"]);
        let good = Link::new(UrlReference::new("#a").unwrap())
            .with_rel(Token::new("reference").unwrap());
        let bad = Link::new(UrlReference::new("#a").unwrap())
            .with_rel(Token::new("canonical").unwrap());
        let bare = Link::new(UrlReference::new("#a").unwrap());

        assert!(good.check_fields(&allowed).is_clean());
        assert!(!bad.check_fields(&allowed).is_clean());
        assert!(bare.check_fields(&allowed).is_clean());
    }

    #[test]
    fn test_oscal_json_uses_kebab_case() {
        let link = Link::new(UrlReference::new("#a").unwrap())
            .with_media_type(MediaType::new("text/html").unwrap())
            .with_resource_fragment("section-2");
        let json = link.to_oscal_json().unwrap();
        assert!(json.contains("\"media-type\": \"text/html\""));
        assert!(json.contains("\"resource-fragment\": \"section-2\""));
    }
}
