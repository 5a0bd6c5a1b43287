//! # Validation Pipeline
//!
//! Runs the allow-list stages of a property's lineage in order, base first,
//! and decides at each stage whether violations are fatal or deferred.
//!
//! ## Fatal vs. Deferred
//!
//! Every property carries a leaf tag: the most specific kind being built.
//! A stage whose kind equals the leaf tag is the leaf stage. Its own
//! violations, together with everything deferred by earlier stages, abort
//! construction with a [`FieldConstraintError`]. A stage below the leaf only
//! records its violations in the [`ValidationContext`] threaded through the
//! pipeline; nothing is raised there.
//!
//! ```text
//! stage result         stage == leaf    stage != leaf
//! ------------------   -------------    -------------
//! no violations        Clean            Clean
//! violations           Err (fatal)      Deferred(n)
//! ```
//!
//! ## Supersession
//!
//! A later stage that checks a field and accepts its value overrides earlier
//! constraints on that field: deferred violations for the field are dropped.
//! This is how a location property named `type` survives the generic
//! `name ∈ {marking}` constraint. Deferred violations on fields no later
//! stage accepts are carried to the leaf and raised there.
//!
//! ## Ordering
//!
//! Reported violations are ordered by stage (base first), then by field
//! declaration order within a stage.

use oscal_core::{AllowedValues, FieldConstraintError, FieldReport, FieldViolation, OscalModel};

use crate::kind::PropertyKind;
use crate::property::Property;
use crate::rules;

/// One tier of the lineage: a kind and the constraints it adds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationStage {
    kind: PropertyKind,
    allowed: AllowedValues,
}

impl ValidationStage {
    /// A stage for `kind` checking `allowed`.
    pub fn new(kind: PropertyKind, allowed: AllowedValues) -> Self {
        Self { kind, allowed }
    }

    /// The kind this stage validates.
    pub fn kind(&self) -> PropertyKind {
        self.kind
    }

    /// The constraints this stage checks.
    pub fn allowed(&self) -> &AllowedValues {
        &self.allowed
    }

    /// Check `property` against this stage's constraints only.
    pub fn check(&self, property: &Property) -> FieldReport {
        property.check_fields(&self.allowed)
    }
}

/// What a non-fatal stage did with its violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    /// The stage found nothing wrong.
    Clean,
    /// The stage recorded this many violations for the leaf stage.
    Deferred(usize),
}

/// State threaded through the pipeline: the leaf tag and the violations
/// deferred so far. Passed by value from stage to stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationContext {
    leaf: PropertyKind,
    deferred: Vec<FieldViolation>,
}

impl ValidationContext {
    /// A fresh context for building a `leaf` property.
    pub fn new(leaf: PropertyKind) -> Self {
        Self {
            leaf,
            deferred: Vec::new(),
        }
    }

    /// The most specific kind being built.
    pub fn leaf(&self) -> PropertyKind {
        self.leaf
    }

    /// Violations deferred by earlier stages.
    pub fn deferred(&self) -> &[FieldViolation] {
        &self.deferred
    }

    /// Fold one stage's report into the context.
    ///
    /// Returns the updated context, or the aggregated error when `stage` is
    /// the leaf and anything has been collected.
    pub fn absorb(
        mut self,
        stage: PropertyKind,
        report: FieldReport,
    ) -> Result<(Self, StageOutcome), FieldConstraintError> {
        let before = self.deferred.len();
        self.deferred.retain(|v| !report.matched(v.field));
        if self.deferred.len() < before {
            tracing::debug!(
                stage = %stage,
                leaf = %self.leaf,
                superseded = before - self.deferred.len(),
                "deferred violations superseded by a more specific constraint"
            );
        }

        let own = report.into_violations();

        if stage == self.leaf {
            let mut collected = self.deferred;
            collected.extend(own);
            if collected.is_empty() {
                return Ok((Self::new(self.leaf), StageOutcome::Clean));
            }
            return Err(FieldConstraintError::new(self.leaf.model_name(), collected));
        }

        if own.is_empty() {
            return Ok((self, StageOutcome::Clean));
        }

        let count = own.len();
        tracing::debug!(
            stage = %stage,
            leaf = %self.leaf,
            count,
            "deferring violations to leaf stage"
        );
        self.deferred.extend(own);
        Ok((self, StageOutcome::Deferred(count)))
    }

    /// Close the context after the last stage. Anything still deferred is
    /// raised, so violations are never dropped by a pipeline that lacks a
    /// leaf stage.
    pub fn finish(self) -> Result<(), FieldConstraintError> {
        if self.deferred.is_empty() {
            return Ok(());
        }
        tracing::debug!(
            leaf = %self.leaf,
            count = self.deferred.len(),
            "pipeline ended with deferred violations and no leaf stage"
        );
        Err(FieldConstraintError::new(self.leaf.model_name(), self.deferred))
    }
}

/// An ordered sequence of stages ending at a configured leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationPipeline {
    leaf: PropertyKind,
    stages: Vec<ValidationStage>,
}

impl ValidationPipeline {
    /// An empty pipeline for `leaf`. Add stages with [`Self::stage`].
    pub fn new(leaf: PropertyKind) -> Self {
        Self {
            leaf,
            stages: Vec::new(),
        }
    }

    /// The standard pipeline for `kind`: one stage per tier of its lineage,
    /// each with that tier's allow-list.
    pub fn for_kind(kind: PropertyKind) -> Self {
        kind.lineage()
            .iter()
            .fold(Self::new(kind), |pipeline, tier| {
                pipeline.stage(*tier, rules::allowed_values(*tier))
            })
    }

    /// Append a stage.
    pub fn stage(mut self, kind: PropertyKind, allowed: AllowedValues) -> Self {
        self.stages.push(ValidationStage::new(kind, allowed));
        self
    }

    /// The kind whose stage raises.
    pub fn leaf(&self) -> PropertyKind {
        self.leaf
    }

    /// The stages, base first.
    pub fn stages(&self) -> &[ValidationStage] {
        &self.stages
    }

    /// Run every stage against `property`.
    pub fn run(&self, property: &Property) -> Result<(), FieldConstraintError> {
        let mut ctx = ValidationContext::new(self.leaf);
        for stage in &self.stages {
            let (next, outcome) = ctx.absorb(stage.kind, stage.check(property))?;
            tracing::trace!(stage = %stage.kind, ?outcome, "stage complete");
            ctx = next;
        }
        ctx.finish()
    }
}

/// Validate `property` as a `kind` property.
pub fn validate(kind: PropertyKind, property: &Property) -> Result<(), FieldConstraintError> {
    ValidationPipeline::for_kind(kind).run(property)
}

#[cfg(test)]
mod tests {
    use super::*;
    use oscal_core::{Token, Uri};

    fn prop(name: &str, value: &str) -> Property {
        Property::parse(name, value).unwrap()
    }

    #[test]
    fn test_standard_pipeline_follows_lineage() {
        let pipeline = ValidationPipeline::for_kind(PropertyKind::Location);
        let kinds: Vec<_> = pipeline.stages().iter().map(ValidationStage::kind).collect();
        assert_eq!(kinds, vec![PropertyKind::Generic, PropertyKind::Location]);
        assert_eq!(pipeline.leaf(), PropertyKind::Location);
    }

    #[test]
    fn test_non_leaf_stage_defers() {
        let ctx = ValidationContext::new(PropertyKind::Location);
        let stage = ValidationStage::new(PropertyKind::Generic, rules::allowed_values(PropertyKind::Generic));
        let (ctx, outcome) = ctx.absorb(stage.kind(), stage.check(&prop("type", "x"))).unwrap();
        assert_eq!(outcome, StageOutcome::Deferred(1));
        assert_eq!(ctx.deferred().len(), 1);
        assert_eq!(ctx.deferred()[0].field, "name");
    }

    #[test]
    fn test_leaf_stage_is_fatal() {
        let ctx = ValidationContext::new(PropertyKind::Generic);
        let stage = ValidationStage::new(PropertyKind::Generic, rules::allowed_values(PropertyKind::Generic));
        let err = ctx.absorb(stage.kind(), stage.check(&prop("type", "x"))).unwrap_err();
        assert_eq!(err.model, "property");
        assert!(err.has_violation_on("name"));
    }

    #[test]
    fn test_leaf_stage_supersedes_accepted_field() {
        let p = prop("type", "data-center");
        assert!(ValidationPipeline::for_kind(PropertyKind::Location).run(&p).is_ok());
    }

    #[test]
    fn test_deferred_violation_raised_at_leaf() {
        let p = prop("type", "data-center").with_ns(Uri::new("https://example.com/ns").unwrap());
        let err = validate(PropertyKind::Location, &p).unwrap_err();
        assert_eq!(err.violations().len(), 1);
        assert_eq!(err.violations()[0].field, "ns");
        assert_eq!(err.model, "location property");
    }

    #[test]
    fn test_deferred_violations_come_first() {
        let p = prop("type", "data-center")
            .with_ns(Uri::new("https://example.com/ns").unwrap())
            .with_class(Token::new("tertiary").unwrap());
        let err = validate(PropertyKind::Location, &p).unwrap_err();
        let fields: Vec<_> = err.violations().iter().map(|v| v.field).collect();
        assert_eq!(fields, vec!["ns", "prop_class"]);
    }

    #[test]
    fn test_rejected_by_both_stages_reports_both() {
        let err = validate(PropertyKind::Location, &prop("site", "data-center")).unwrap_err();
        let permitted: Vec<_> = err.violations().iter().map(|v| v.permitted.clone()).collect();
        assert_eq!(permitted, vec![vec!["marking".to_string()], vec!["type".to_string()]]);
    }

    #[test]
    fn test_pipeline_without_leaf_stage_still_raises() {
        let pipeline = ValidationPipeline::new(PropertyKind::Location)
            .stage(PropertyKind::Generic, rules::allowed_values(PropertyKind::Generic));
        let err = pipeline.run(&prop("type", "data-center")).unwrap_err();
        assert!(err.has_violation_on("name"));
    }

    #[test]
    fn test_empty_pipeline_accepts() {
        assert!(ValidationPipeline::new(PropertyKind::Party).run(&prop("any", "thing")).is_ok());
    }
}
