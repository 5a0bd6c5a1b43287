//! # oscal-props — OSCAL Property Variants
//!
//! Models OSCAL properties and the role-specific constraints placed on them
//! by location, resource, and party objects.
//!
//! ## Structure
//!
//! - [`property`] — the [`Property`] record shared by every variant.
//! - [`kind`] — the [`PropertyKind`] leaf tag and its lineage.
//! - [`rules`] — the allow-list each kind adds.
//! - [`pipeline`] — runs the lineage stages in order; violations below the
//!   leaf are deferred, violations at the leaf are raised with everything
//!   collected so far.
//! - [`variants`] — validated, immutable wrappers (`LocationProperty`, ...).
//!
//! ```
//! use oscal_props::{LocationProperty, OscalProperty};
//!
//! assert!(OscalProperty::parse("marking", "test").is_ok());
//! assert!(LocationProperty::parse("type", "data-center").is_ok());
//! assert!(LocationProperty::parse("type", "office").is_err());
//! ```

pub mod kind;
pub mod pipeline;
pub mod property;
pub mod rules;
pub mod variants;

pub use kind::{PropertyKind, UnknownPropertyKind};
pub use pipeline::{validate, StageOutcome, ValidationContext, ValidationPipeline, ValidationStage};
pub use property::Property;
pub use variants::{
    LocationProperty, OscalProperty, PartyProperty, ResourceProperty, ValidatedProperty,
};
