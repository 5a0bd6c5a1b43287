//! # Rules Subcommand
//!
//! Prints the lineage of each property kind and the allow-list every tier
//! of that lineage contributes.

use anyhow::Result;
use clap::Args;

use oscal_core::oscal_alias;
use oscal_props::{PropertyKind, ValidationPipeline};

/// Arguments for the `oscal rules` subcommand.
#[derive(Args, Debug)]
pub struct RulesArgs {
    /// Only show this kind.
    #[arg(long)]
    pub kind: Option<PropertyKind>,
}

/// Render the rules applied when building a `kind` property.
pub fn render_rules(kind: PropertyKind) -> String {
    let pipeline = ValidationPipeline::for_kind(kind);
    let lineage: Vec<&str> = pipeline.stages().iter().map(|s| s.kind().as_str()).collect();
    let mut out = format!("{kind} ({})\n", lineage.join(" -> "));
    for stage in pipeline.stages() {
        for (field, permitted) in stage.allowed().iter() {
            out.push_str(&format!(
                "  [{}] {} in {{{}}}\n",
                stage.kind(),
                oscal_alias(field),
                permitted.join(", ")
            ));
        }
    }
    out
}

/// Execute the rules subcommand.
pub fn run_rules(args: &RulesArgs) -> Result<u8> {
    let kinds = match args.kind {
        Some(kind) => vec![kind],
        None => PropertyKind::all().to_vec(),
    };
    for kind in kinds {
        print!("{}", render_rules(kind));
    }
    Ok(0)
}
