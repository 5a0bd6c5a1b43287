//! # Allow-Lists
//!
//! The values each property kind permits, keyed by field name. Each kind
//! declares only its own constraints; inherited constraints come from the
//! earlier stages of [`PropertyKind::lineage`].
//!
//! | Kind | Field | Permitted |
//! |------|-------|-----------|
//! | generic | `ns` | `http://csrc.nist.gov/ns/oscal` |
//! | generic | `name` | `marking` |
//! | location | `name` | `type` |
//! | location | `value` | `data-center` |
//! | location | `class` | `primary`, `alternate` |
//! | resource | `name` | `type`, `version`, `published` |
//! | party | `name` | `mail-stop`, `office`, `job-title` |

use oscal_core::{AllowedValues, OSCAL_NAMESPACE};

use crate::kind::PropertyKind;

/// Constraints a single kind adds on top of its parent.
pub fn allowed_values(kind: PropertyKind) -> AllowedValues {
    match kind {
        PropertyKind::Generic => AllowedValues::new()
            .allow("ns", [OSCAL_NAMESPACE])
            .allow("name", ["marking"]),
        PropertyKind::Location => AllowedValues::new()
            .allow("name", ["type"])
            .allow("value", ["data-center"])
            .allow("prop_class", ["primary", "alternate"]),
        PropertyKind::Resource => {
            AllowedValues::new().allow("name", ["type", "version", "published"])
        }
        PropertyKind::Party => {
            AllowedValues::new().allow("name", ["mail-stop", "office", "job-title"])
        }
    }
}
