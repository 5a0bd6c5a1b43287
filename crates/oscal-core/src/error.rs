//! # Error Types
//!
//! Error hierarchy for the OSCAL property crates. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Datatype errors carry the rejected input so callers can report it.
//! - Field constraint errors carry every violation collected across the
//!   validation chain, in discovery order, never just the first one.

use std::fmt;

use thiserror::Error;

use crate::model::FieldViolation;

/// Top-level error type for OSCAL model operations.
#[derive(Error, Debug)]
pub enum OscalError {
    /// A raw value did not satisfy its OSCAL datatype.
    #[error("datatype error: {0}")]
    Datatype(#[from] DatatypeError),

    /// One or more fields hold values outside their permitted sets.
    #[error(transparent)]
    FieldConstraint(#[from] FieldConstraintError),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for OscalError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// A raw value rejected by an OSCAL datatype constructor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DatatypeError {
    /// Not a non-colonized token.
    #[error("invalid token: {0:?}")]
    InvalidToken(String),

    /// Not an absolute URI.
    #[error("invalid uri {value:?}: {reason}")]
    InvalidUri {
        /// The rejected input.
        value: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// Empty, or has leading/trailing whitespace.
    #[error("invalid string: {0:?} (must be non-empty without leading or trailing whitespace)")]
    InvalidString(String),

    /// Markup line containing a line break.
    #[error("invalid markup line: {0:?} (line breaks are not permitted)")]
    InvalidMarkupLine(String),

    /// Not a version 4 or 5 RFC 4122 UUID.
    #[error("invalid uuid {value:?}: {reason}")]
    InvalidUuid {
        /// The rejected input.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Not an IANA media type.
    #[error("invalid media type: {0:?}")]
    InvalidMediaType(String),

    /// Neither an absolute URI nor a `#fragment`.
    #[error("invalid url reference: {0:?}")]
    InvalidUrlReference(String),

    /// Not `true`/`false`/`1`/`0`.
    #[error("invalid boolean: {0:?} (expected true, false, 1 or 0)")]
    InvalidBoolean(String),

    /// Not a finite decimal number.
    #[error("invalid decimal: {0:?}")]
    InvalidDecimal(String),

    /// Not an integer, or outside the type's range.
    #[error("invalid integer {value:?}: {reason}")]
    InvalidInteger {
        /// The rejected input.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Not valid standard base64.
    #[error("invalid base64 binary: {reason}")]
    InvalidBase64 {
        /// Decoder diagnostic.
        reason: String,
    },

    /// Not a calendar date with an optional UTC offset.
    #[error("invalid date {value:?}: {reason}")]
    InvalidDate {
        /// The rejected input.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Raised when the most specific validation step of a model finds values
/// outside their permitted sets.
///
/// `violations` holds everything collected for the instance: violations
/// deferred by intermediate steps first, then the raising step's own.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("field constraint violation for {model}:\n{violations}")]
pub struct FieldConstraintError {
    /// Name of the model variant whose construction was rejected.
    pub model: String,
    /// Every collected violation.
    pub violations: FieldViolations,
}

impl FieldConstraintError {
    /// Build an error for `model` from the collected violations.
    pub fn new(model: impl Into<String>, violations: Vec<FieldViolation>) -> Self {
        Self {
            model: model.into(),
            violations: FieldViolations(violations),
        }
    }

    /// Returns a slice of all violations.
    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations.0
    }

    /// Returns true if any violation concerns `field`.
    pub fn has_violation_on(&self, field: &str) -> bool {
        self.violations.0.iter().any(|v| v.field == field)
    }
}

/// Ordered collection of field violations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldViolations(Vec<FieldViolation>);

impl FieldViolations {
    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consumes self and returns the inner Vec.
    pub fn into_inner(self) -> Vec<FieldViolation> {
        self.0
    }
}

impl fmt::Display for FieldViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  {v}")?;
        }
        Ok(())
    }
}
