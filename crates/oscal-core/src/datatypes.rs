//! # OSCAL Datatypes
//!
//! Newtypes for the OSCAL primitive datatypes used by properties and links.
//! Each type validates its format at construction time; there is no way to
//! hold a `Token` that is not a token.
//!
//! ## Validation
//!
//! | Type | Rule |
//! |------|------|
//! | [`Token`] | non-colonized token: `^([^\W\d]\|[:_])[\w\d:\-_.]*$` |
//! | [`Uri`] | absolute URI (scheme required) |
//! | [`OscalString`] | non-empty, no leading or trailing whitespace |
//! | [`MarkupLine`] | no line breaks |
//! | [`MarkupMultiline`] | any text |
//! | [`OscalUuid`] | RFC 4122 UUID, version 4 or 5 |
//! | [`MediaType`] | IANA media type |
//! | [`UrlReference`] | absolute URI or `#fragment` |
//! | [`OscalBool`] | `true`/`false`, or the lexical forms `1`/`0` |
//! | [`Decimal`] | finite real number |
//! | [`Integer`] | any signed integer |
//! | [`NonNegativeInteger`] | integer `>= 0` |
//! | [`PositiveInteger`] | integer `>= 1` |
//! | [`Base64Binary`] | standard base64 (RFC 4648), non-empty |
//! | [`Date`] | `YYYY-MM-DD`, optional `Z` or `+hh:mm`/`-hh:mm` offset |
//!
//! Reference: <https://pages.nist.gov/OSCAL/reference/datatypes/>

use std::sync::OnceLock;

use base64::Engine as _;
use chrono::{FixedOffset, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DatatypeError;

/// The organizational namespace that qualifies OSCAL-defined property names.
pub const OSCAL_NAMESPACE: &str = "http://csrc.nist.gov/ns/oscal";

/// Implement `Deserialize` for newtypes by deserializing the raw value
/// (a plain `String` unless another type is given) and routing it through
/// the type's `new()` constructor, so invalid values are rejected at
/// deserialization time.
macro_rules! impl_validating_deserialize {
    ($ty:ident) => {
        impl_validating_deserialize!($ty, String);
    };
    ($ty:ident, $raw:ty) => {
        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = <$raw>::deserialize(deserializer)?;
                Self::new(raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

/// Shared accessors for string-backed datatypes.
macro_rules! impl_str_newtype {
    ($ty:ident) => {
        impl $ty {
            /// Access the string value.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $ty {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl std::str::FromStr for $ty {
            type Err = DatatypeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }
    };
}

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([^\W\d]|[:_])[\w:\-_.]*$").expect("token pattern is a valid regex")
    })
}

fn date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}(Z|[+-][0-9]{2}:[0-9]{2})?$")
            .expect("date pattern is a valid regex")
    })
}

fn media_type_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\w+/([\w-]+\.)*[\w-]+(\+\w+)?(;.*)?$")
            .expect("media type pattern is a valid regex")
    })
}

// ---------------------------------------------------------------------------
// String-based datatypes
// ---------------------------------------------------------------------------

/// A non-colonized token, used for names, classes, and other identifiers.
///
/// The first character is a letter (any script), `_` or `:`; the rest are
/// word characters, `:`, `-`, `_` or `.`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Token(String);

impl_validating_deserialize!(Token);
impl_str_newtype!(Token);

impl Token {
    /// Create a token, validating the non-colonized token pattern.
    ///
    /// # Errors
    ///
    /// Returns [`DatatypeError::InvalidToken`] if the value does not match.
    pub fn new(value: impl Into<String>) -> Result<Self, DatatypeError> {
        let s = value.into();
        if !token_pattern().is_match(&s) {
            return Err(DatatypeError::InvalidToken(s));
        }
        Ok(Self(s))
    }
}

/// An absolute URI, such as a property namespace.
///
/// The original spelling is preserved; parsing is only used to check that
/// the value is a URI with a scheme.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Uri(String);

impl_validating_deserialize!(Uri);
impl_str_newtype!(Uri);

impl Uri {
    /// Create a URI, rejecting relative references.
    pub fn new(value: impl Into<String>) -> Result<Self, DatatypeError> {
        let s = value.into();
        if let Err(e) = url::Url::parse(&s) {
            return Err(DatatypeError::InvalidUri {
                value: s,
                reason: e.to_string(),
            });
        }
        Ok(Self(s))
    }

    /// The OSCAL organizational namespace, `http://csrc.nist.gov/ns/oscal`.
    pub fn oscal_namespace() -> Self {
        Self(OSCAL_NAMESPACE.to_string())
    }
}

impl Default for Uri {
    fn default() -> Self {
        Self::oscal_namespace()
    }
}

/// An OSCAL `string`: non-empty, with no leading or trailing whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct OscalString(String);

impl_validating_deserialize!(OscalString);
impl_str_newtype!(OscalString);

impl OscalString {
    /// Create a string value, rejecting empty or whitespace-padded input.
    pub fn new(value: impl Into<String>) -> Result<Self, DatatypeError> {
        let s = value.into();
        if s.is_empty() || s.trim() != s {
            return Err(DatatypeError::InvalidString(s));
        }
        Ok(Self(s))
    }
}

/// A single line of markup text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct MarkupLine(String);

impl_validating_deserialize!(MarkupLine);
impl_str_newtype!(MarkupLine);

impl MarkupLine {
    /// Create a markup line, rejecting embedded line breaks.
    pub fn new(value: impl Into<String>) -> Result<Self, DatatypeError> {
        let s = value.into();
        if s.contains(['\n', '\r']) {
            return Err(DatatypeError::InvalidMarkupLine(s));
        }
        Ok(Self(s))
    }
}

/// Multi-paragraph markup text. Any string is accepted.
// TODO: restrict to the markup-multiline HTML/Markdown subset once a
// markup parser is available.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct MarkupMultiline(String);

impl_validating_deserialize!(MarkupMultiline);
impl_str_newtype!(MarkupMultiline);

impl MarkupMultiline {
    /// Wrap free text as multiline markup.
    pub fn new(value: impl Into<String>) -> Result<Self, DatatypeError> {
        Ok(Self(value.into()))
    }
}

/// An IANA media type, e.g. `application/json` or `image/svg+xml`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct MediaType(String);

impl_validating_deserialize!(MediaType);
impl_str_newtype!(MediaType);

impl MediaType {
    /// Create a media type, validating the `type/subtype` shape.
    pub fn new(value: impl Into<String>) -> Result<Self, DatatypeError> {
        let s = value.into();
        if !media_type_pattern().is_match(&s) {
            return Err(DatatypeError::InvalidMediaType(s));
        }
        Ok(Self(s))
    }
}

// ---------------------------------------------------------------------------
// Structured datatypes
// ---------------------------------------------------------------------------

/// A machine-oriented, globally unique identifier.
///
/// OSCAL restricts UUIDs to the RFC 4122 variant, version 4 (random) or
/// version 5 (name-based SHA-1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct OscalUuid(Uuid);

impl OscalUuid {
    /// Generate a fresh random (version 4) identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse and validate a UUID string.
    pub fn new(value: impl Into<String>) -> Result<Self, DatatypeError> {
        let s = value.into();
        let parsed = Uuid::parse_str(&s).map_err(|e| DatatypeError::InvalidUuid {
            value: s.clone(),
            reason: e.to_string(),
        })?;
        Self::from_uuid(parsed).map_err(|reason| DatatypeError::InvalidUuid { value: s, reason })
    }

    fn from_uuid(id: Uuid) -> Result<Self, String> {
        if id.get_variant() != uuid::Variant::RFC4122 {
            return Err(format!("variant {:?} is not RFC 4122", id.get_variant()));
        }
        match id.get_version_num() {
            4 | 5 => Ok(Self(id)),
            n => Err(format!("version {n} is not permitted (expected 4 or 5)")),
        }
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl TryFrom<Uuid> for OscalUuid {
    type Error = DatatypeError;

    fn try_from(id: Uuid) -> Result<Self, Self::Error> {
        Self::from_uuid(id).map_err(|reason| DatatypeError::InvalidUuid {
            value: id.to_string(),
            reason,
        })
    }
}

impl_validating_deserialize!(OscalUuid);

impl std::fmt::Display for OscalUuid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A reference to a local or remote resource: an absolute URI, or a
/// fragment identifier (`#id`) pointing into the current document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UrlReference {
    /// Absolute URI.
    Uri(Uri),
    /// Fragment identifier, stored with its leading `#`.
    Fragment(String),
}

impl UrlReference {
    /// Parse a reference, preferring the fragment form when the value
    /// starts with `#`.
    pub fn new(value: impl Into<String>) -> Result<Self, DatatypeError> {
        let s = value.into();
        if s.starts_with('#') {
            return Ok(Self::Fragment(s));
        }
        Uri::new(s.clone())
            .map(Self::Uri)
            .map_err(|_| DatatypeError::InvalidUrlReference(s))
    }

    /// Access the reference as written.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Uri(uri) => uri.as_str(),
            Self::Fragment(fragment) => fragment,
        }
    }
}

impl Serialize for UrlReference {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl_validating_deserialize!(UrlReference);

impl std::fmt::Display for UrlReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Boolean and numeric datatypes
// ---------------------------------------------------------------------------

/// An OSCAL `boolean`.
///
/// JSON and YAML carry `true`/`false`; the XML lexical forms `1` and `0`
/// are accepted too, either as numbers or as strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct OscalBool(bool);

impl OscalBool {
    /// Parse the lexical form: `true`, `false`, `1` or `0`.
    pub fn new(value: impl Into<String>) -> Result<Self, DatatypeError> {
        let s = value.into();
        match s.as_str() {
            "true" | "1" => Ok(Self(true)),
            "false" | "0" => Ok(Self(false)),
            _ => Err(DatatypeError::InvalidBoolean(s)),
        }
    }

    pub fn get(self) -> bool {
        self.0
    }
}

impl From<bool> for OscalBool {
    fn from(value: bool) -> Self {
        Self(value)
    }
}

impl From<OscalBool> for bool {
    fn from(value: OscalBool) -> Self {
        value.0
    }
}

impl TryFrom<i64> for OscalBool {
    type Error = DatatypeError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self(true)),
            0 => Ok(Self(false)),
            n => Err(DatatypeError::InvalidBoolean(n.to_string())),
        }
    }
}

impl std::str::FromStr for OscalBool {
    type Err = DatatypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl std::fmt::Display for OscalBool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BoolRepr {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl<'de> Deserialize<'de> for OscalBool {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        match BoolRepr::deserialize(deserializer)? {
            BoolRepr::Bool(b) => Ok(Self(b)),
            BoolRepr::Int(n) => Self::try_from(n).map_err(serde::de::Error::custom),
            BoolRepr::Str(s) => Self::new(s).map_err(serde::de::Error::custom),
        }
    }
}

/// An OSCAL `decimal`: a finite real number.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Decimal(f64);

impl_validating_deserialize!(Decimal, f64);

impl Decimal {
    /// Create a decimal, rejecting NaN and infinities.
    pub fn new(value: f64) -> Result<Self, DatatypeError> {
        if !value.is_finite() {
            return Err(DatatypeError::InvalidDecimal(value.to_string()));
        }
        Ok(Self(value))
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl std::str::FromStr for Decimal {
    type Err = DatatypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: f64 = s
            .parse()
            .map_err(|_| DatatypeError::InvalidDecimal(s.to_string()))?;
        Self::new(value)
    }
}

impl std::fmt::Display for Decimal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn parse_integer(s: &str) -> Result<i64, DatatypeError> {
    s.parse().map_err(|e: std::num::ParseIntError| DatatypeError::InvalidInteger {
        value: s.to_string(),
        reason: e.to_string(),
    })
}

/// An OSCAL `integer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Integer(i64);

impl Integer {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for Integer {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl std::str::FromStr for Integer {
    type Err = DatatypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_integer(s).map(Self)
    }
}

impl std::fmt::Display for Integer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An OSCAL `nonNegativeInteger`: `0` or greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NonNegativeInteger(u64);

impl_validating_deserialize!(NonNegativeInteger, i64);

impl NonNegativeInteger {
    pub fn new(value: i64) -> Result<Self, DatatypeError> {
        u64::try_from(value)
            .map(Self)
            .map_err(|_| DatatypeError::InvalidInteger {
                value: value.to_string(),
                reason: "must be 0 or greater".to_string(),
            })
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl std::str::FromStr for NonNegativeInteger {
    type Err = DatatypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(parse_integer(s)?)
    }
}

impl std::fmt::Display for NonNegativeInteger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An OSCAL `positiveInteger`: `1` or greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PositiveInteger(u64);

impl_validating_deserialize!(PositiveInteger, i64);

impl PositiveInteger {
    pub fn new(value: i64) -> Result<Self, DatatypeError> {
        if value < 1 {
            return Err(DatatypeError::InvalidInteger {
                value: value.to_string(),
                reason: "must be 1 or greater".to_string(),
            });
        }
        Ok(Self(value.unsigned_abs()))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl std::str::FromStr for PositiveInteger {
    type Err = DatatypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(parse_integer(s)?)
    }
}

impl std::fmt::Display for PositiveInteger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Binary and date datatypes
// ---------------------------------------------------------------------------

/// Base64-encoded binary data (RFC 4648 standard alphabet, padded).
///
/// The encoded text is kept as written; the decoded bytes are available
/// through [`Base64Binary::bytes`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Base64Binary {
    encoded: String,
    bytes: Vec<u8>,
}

impl Base64Binary {
    /// Decode and validate base64 text.
    pub fn new(value: impl Into<String>) -> Result<Self, DatatypeError> {
        let encoded = value.into();
        if encoded.is_empty() {
            return Err(DatatypeError::InvalidBase64 {
                reason: "empty".to_string(),
            });
        }
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(&encoded)
            .map_err(|e| DatatypeError::InvalidBase64 {
                reason: e.to_string(),
            })?;
        Ok(Self { encoded, bytes })
    }

    /// Encode raw bytes.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        let bytes = bytes.into();
        Self {
            encoded: base64::engine::general_purpose::STANDARD.encode(&bytes),
            bytes,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.encoded
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl Serialize for Base64Binary {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.encoded)
    }
}

impl_validating_deserialize!(Base64Binary);

impl std::fmt::Display for Base64Binary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.encoded)
    }
}

/// A calendar date with an optional offset from UTC, e.g. `2024-02-29`,
/// `2024-02-29Z` or `2024-02-29-05:00`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Date {
    raw: String,
    date: NaiveDate,
    offset: Option<FixedOffset>,
}

fn parse_date(s: &str) -> Result<(NaiveDate, Option<FixedOffset>), String> {
    if !date_pattern().is_match(s) {
        return Err("expected YYYY-MM-DD with an optional Z or +hh:mm offset".to_string());
    }
    let date = NaiveDate::parse_from_str(&s[..10], "%Y-%m-%d")
        .map_err(|e| format!("not a calendar date: {e}"))?;
    let offset = match &s[10..] {
        "" => None,
        "Z" => FixedOffset::east_opt(0),
        tz => Some(parse_offset(tz).ok_or_else(|| format!("offset {tz} is out of range"))?),
    };
    Ok((date, offset))
}

/// `+hh:mm` or `-hh:mm`, at most 14 hours.
fn parse_offset(tz: &str) -> Option<FixedOffset> {
    let hours: i32 = tz.get(1..3)?.parse().ok()?;
    let minutes: i32 = tz.get(4..6)?.parse().ok()?;
    if hours > 14 || minutes > 59 {
        return None;
    }
    let seconds = hours * 3600 + minutes * 60;
    if tz.starts_with('-') {
        FixedOffset::west_opt(seconds)
    } else {
        FixedOffset::east_opt(seconds)
    }
}

impl Date {
    /// Parse and validate a date string.
    pub fn new(value: impl Into<String>) -> Result<Self, DatatypeError> {
        let raw = value.into();
        match parse_date(&raw) {
            Ok((date, offset)) => Ok(Self { raw, date, offset }),
            Err(reason) => Err(DatatypeError::InvalidDate { value: raw, reason }),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The calendar date, without its offset.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// The UTC offset, if one was given. `Z` is a zero offset.
    pub fn offset(&self) -> Option<FixedOffset> {
        self.offset
    }
}

impl Serialize for Date {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.raw)
    }
}

impl_validating_deserialize!(Date);

impl std::fmt::Display for Date {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// ASCII identifiers starting with a letter, `_` or `:` are tokens.
        #[test]
        fn ascii_identifiers_are_tokens(s in "[a-zA-Z_:][a-zA-Z0-9_:.-]{0,24}") {
            prop_assert!(Token::new(s).is_ok());
        }

        /// A leading digit is never a token.
        #[test]
        fn leading_digit_is_not_a_token(s in "[0-9][a-z]{0,10}") {
            prop_assert!(Token::new(s).is_err());
        }

        /// Whitespace padding is never an OSCAL string.
        #[test]
        fn padded_strings_rejected(s in "[a-z]{1,10}") {
            let leading = format!(" {s}");
            let trailing = format!("{s} ");
            prop_assert!(OscalString::new(leading).is_err());
            prop_assert!(OscalString::new(trailing).is_err());
            prop_assert!(OscalString::new(s).is_ok());
        }
    }
}
