//! # oscal-core — Foundational OSCAL Types
//!
//! Defines the primitives every OSCAL model is built from.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for OSCAL datatypes.** `Token`, `Uri`, `OscalString`,
//!    `OscalUuid` and friends validate at construction and on
//!    deserialization. No bare strings for constrained values.
//!
//! 2. **One base capability.** [`OscalModel`] enumerates a record's declared
//!    fields and checks them against an [`AllowedValues`] mapping. The check
//!    only reports; callers decide whether a violation is fatal.
//!
//! 3. **OSCAL attribute naming.** [`oscal_alias`] maps Rust field names to
//!    OSCAL names (`prop_class` → `class`, `media_type` → `media-type`) for
//!    both serialization and error messages.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `oscal-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod datatypes;
pub mod error;
pub mod link;
pub mod model;

// Re-export primary types for ergonomic imports.
pub use datatypes::{
    Base64Binary, Date, Decimal, Integer, MarkupLine, MarkupMultiline, MediaType,
    NonNegativeInteger, OscalBool, OscalString, OscalUuid, PositiveInteger, Token, Uri,
    UrlReference, OSCAL_NAMESPACE,
};
pub use error::{DatatypeError, FieldConstraintError, FieldViolations, OscalError};
pub use link::Link;
pub use model::{
    oscal_alias, AllowedValues, FieldReport, FieldStatus, FieldValue, FieldViolation, OscalModel,
};
