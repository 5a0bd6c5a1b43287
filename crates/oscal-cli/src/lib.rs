//! # oscal-cli — OSCAL Property Command-Line Interface
//!
//! Provides the `oscal` command for checking property documents.
//!
//! ## Subcommands
//!
//! - `oscal validate <PATH> --kind <KIND>` — validate every property in a
//!   JSON or YAML document as the given kind.
//! - `oscal rules [--kind <KIND>]` — print the allow-lists applied to each kind.
//!
//! ## Crate Policy
//!
//! - CLI construction (argument parsing) is separated from business logic.
//! - Handler functions delegate to `oscal-props`; no validation logic here.

pub mod rules;
pub mod validate;
