//! # Validated Property Variants
//!
//! Immutable wrappers around [`Property`] that can only be obtained by
//! passing the validation pipeline for their kind. There is no way to hold
//! a `LocationProperty` whose fields violate the location allow-list.
//!
//! Deserialization goes through the raw [`Property`] and then the pipeline,
//! so reading a document performs the same validation as construction.

use std::ops::Deref;

use oscal_core::{FieldConstraintError, FieldValue, OscalError, OscalModel};
use serde::{Deserialize, Serialize};

use crate::kind::PropertyKind;
use crate::pipeline::validate;
use crate::property::Property;

macro_rules! validated_property {
    ($(#[$meta:meta])* $name:ident => $kind:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(try_from = "Property", into = "Property")]
        pub struct $name(Property);

        impl $name {
            /// The leaf tag this variant validates as.
            pub const KIND: PropertyKind = $kind;

            /// Validate `property` and wrap it.
            ///
            /// # Errors
            ///
            /// Returns every violation collected across the lineage when
            /// any field is outside its permitted set.
            pub fn new(property: Property) -> Result<Self, FieldConstraintError> {
                validate(Self::KIND, &property)?;
                Ok(Self(property))
            }

            /// Build from raw `name` and `value` strings.
            pub fn parse(name: &str, value: &str) -> Result<Self, OscalError> {
                Ok(Self::new(Property::parse(name, value)?)?)
            }

            /// Unwrap the validated record.
            pub fn into_inner(self) -> Property {
                self.0
            }
        }

        impl TryFrom<Property> for $name {
            type Error = FieldConstraintError;

            fn try_from(property: Property) -> Result<Self, Self::Error> {
                Self::new(property)
            }
        }

        impl From<$name> for Property {
            fn from(validated: $name) -> Self {
                validated.0
            }
        }

        impl Deref for $name {
            type Target = Property;

            fn deref(&self) -> &Property {
                &self.0
            }
        }

        impl OscalModel for $name {
            fn field_values(&self) -> Vec<FieldValue<'_>> {
                self.0.field_values()
            }
        }
    };
}

validated_property!(
    /// A property in the OSCAL namespace named `marking`.
    OscalProperty => PropertyKind::Generic
);

validated_property!(
    /// A location property: `type` = `data-center`, with an optional class
    /// of `primary` or `alternate`.
    LocationProperty => PropertyKind::Location
);

validated_property!(
    /// A back-matter resource property: `type`, `version`, or `published`.
    ResourceProperty => PropertyKind::Resource
);

validated_property!(
    /// A party property: `mail-stop`, `office`, or `job-title`.
    PartyProperty => PropertyKind::Party
);

/// A property validated as a kind chosen at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedProperty {
    kind: PropertyKind,
    property: Property,
}

impl ValidatedProperty {
    /// Validate `property` as a `kind` property.
    pub fn new(kind: PropertyKind, property: Property) -> Result<Self, FieldConstraintError> {
        validate(kind, &property)?;
        Ok(Self { kind, property })
    }

    /// The kind it was validated as.
    pub fn kind(&self) -> PropertyKind {
        self.kind
    }

    /// Unwrap the validated record.
    pub fn into_inner(self) -> Property {
        self.property
    }
}

impl Deref for ValidatedProperty {
    type Target = Property;

    fn deref(&self) -> &Property {
        &self.property
    }
}

impl Serialize for ValidatedProperty {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.property.serialize(serializer)
    }
}

impl OscalModel for ValidatedProperty {
    fn field_values(&self) -> Vec<FieldValue<'_>> {
        self.property.field_values()
    }
}
