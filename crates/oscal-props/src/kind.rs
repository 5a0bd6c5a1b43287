//! # Property Kinds
//!
//! The variant tag carried by every validated property. The tag identifies
//! the most specific variant being built, and [`PropertyKind::lineage`]
//! names the validation stages that run for it, from the generic base to
//! the leaf.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A string that names no property kind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown property kind: {0:?} (expected one of: generic, location, resource, party)")]
pub struct UnknownPropertyKind(pub String);

/// The role a property plays in its containing object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    /// An OSCAL-namespaced property on any object.
    Generic,
    /// A property of a location.
    Location,
    /// A property of a back-matter resource.
    Resource,
    /// A property of a party.
    Party,
}

impl PropertyKind {
    /// Returns all kinds.
    pub fn all() -> &'static [PropertyKind] {
        &[Self::Generic, Self::Location, Self::Resource, Self::Party]
    }

    /// The stages that validate this kind, base first, this kind last.
    pub fn lineage(&self) -> &'static [PropertyKind] {
        match self {
            Self::Generic => &[Self::Generic],
            Self::Location => &[Self::Generic, Self::Location],
            Self::Resource => &[Self::Generic, Self::Resource],
            Self::Party => &[Self::Generic, Self::Party],
        }
    }

    /// The kind this one specializes, if any.
    pub fn parent(&self) -> Option<PropertyKind> {
        let lineage = self.lineage();
        lineage.len().checked_sub(2).map(|i| lineage[i])
    }

    /// Returns the snake_case identifier, matching the serde format.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::Location => "location",
            Self::Resource => "resource",
            Self::Party => "party",
        }
    }

    /// Human-readable model name used in error reports.
    pub fn model_name(&self) -> &'static str {
        match self {
            Self::Generic => "property",
            Self::Location => "location property",
            Self::Resource => "resource property",
            Self::Party => "party property",
        }
    }
}

impl std::fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyKind {
    type Err = UnknownPropertyKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "generic" => Ok(Self::Generic),
            "location" => Ok(Self::Location),
            "resource" => Ok(Self::Resource),
            "party" => Ok(Self::Party),
            other => Err(UnknownPropertyKind(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lineage_ends_with_self() {
        for kind in PropertyKind::all() {
            assert_eq!(kind.lineage().last(), Some(kind));
            assert_eq!(kind.lineage().first(), Some(&PropertyKind::Generic));
        }
    }

    #[test]
    fn test_parent() {
        assert_eq!(PropertyKind::Generic.parent(), None);
        assert_eq!(PropertyKind::Location.parent(), Some(PropertyKind::Generic));
        assert_eq!(PropertyKind::Party.parent(), Some(PropertyKind::Generic));
    }

    #[test]
    fn test_as_str_roundtrip() {
        for kind in PropertyKind::all() {
            let parsed: PropertyKind = kind.as_str().parse().unwrap();
            assert_eq!(*kind, parsed);
            assert_eq!(kind.to_string(), kind.as_str());
        }
    }

    #[test]
    fn test_from_str_invalid() {
        assert!("Location".parse::<PropertyKind>().is_err());
        assert!("".parse::<PropertyKind>().is_err());
    }

    #[test]
    fn test_serde_format_matches_as_str() {
        for kind in PropertyKind::all() {
            let json = serde_json::to_string(kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }
}
