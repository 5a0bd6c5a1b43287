//! # Validate Subcommand
//!
//! Reads a JSON or YAML document holding one property object or an array of
//! them, and validates each as the requested kind.
//!
//! Exit code 0 when every property is valid, 1 otherwise.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use serde_json::Value;

use oscal_core::FieldConstraintError;
use oscal_props::{Property, PropertyKind, ValidatedProperty};

/// Arguments for the `oscal validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to the property document.
    pub path: PathBuf,

    /// Property kind to validate as (generic, location, resource, party).
    #[arg(long, default_value = "generic")]
    pub kind: PropertyKind,

    /// Document format. Inferred from the file extension when omitted.
    #[arg(long, value_enum)]
    pub format: Option<DocumentFormat>,
}

/// Serialization format of a property document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DocumentFormat {
    /// JSON.
    Json,
    /// YAML.
    Yaml,
}

impl DocumentFormat {
    /// `.yaml`/`.yml` is YAML; anything else is treated as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Self::Yaml,
            _ => Self::Json,
        }
    }
}

/// Parse the raw records from `content`, which holds one property object or
/// an array of them. Datatype errors (malformed tokens, URIs, ...) surface
/// here; allow-lists are not applied yet.
///
/// Unquoted YAML scalars such as `value: 1.2` or `value: true` are read as
/// their text, since every property field is a string.
pub fn parse_properties(content: &str, format: DocumentFormat) -> Result<Vec<Property>> {
    let doc: Value = match format {
        DocumentFormat::Json => serde_json::from_str(content).context("document is not valid JSON")?,
        DocumentFormat::Yaml => {
            let mut doc: Value =
                serde_yaml::from_str(content).context("document is not valid YAML")?;
            stringify_scalar_fields(&mut doc);
            doc
        }
    };
    if doc.is_array() {
        serde_json::from_value(doc).context("invalid property in list")
    } else {
        let property: Property = serde_json::from_value(doc).context("invalid property")?;
        Ok(vec![property])
    }
}

/// Replace number and boolean field values of each property object with
/// their text.
fn stringify_scalar_fields(doc: &mut Value) {
    match doc {
        Value::Array(items) => items.iter_mut().for_each(stringify_scalar_fields),
        Value::Object(fields) => {
            for value in fields.values_mut() {
                if value.is_number() || value.is_boolean() {
                    *value = Value::String(value.to_string());
                }
            }
        }
        _ => {}
    }
}

/// Validate every property as `kind`, preserving order.
pub fn check_properties(
    kind: PropertyKind,
    properties: Vec<Property>,
) -> Vec<Result<ValidatedProperty, FieldConstraintError>> {
    properties
        .into_iter()
        .map(|p| ValidatedProperty::new(kind, p))
        .collect()
}

/// Execute the validate subcommand.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let format = args
        .format
        .unwrap_or_else(|| DocumentFormat::from_path(&args.path));
    tracing::debug!(path = %args.path.display(), ?format, kind = %args.kind, "validating document");

    let content = std::fs::read_to_string(&args.path)
        .with_context(|| format!("failed to read {}", args.path.display()))?;
    let properties = parse_properties(&content, format)
        .with_context(|| format!("failed to parse {}", args.path.display()))?;
    tracing::info!(count = properties.len(), "parsed properties");

    let results = check_properties(args.kind, properties);
    let mut failures = 0usize;
    for (i, result) in results.iter().enumerate() {
        match result {
            Ok(p) => println!("OK    [{i}] {}={}", p.name(), p.value()),
            Err(e) => {
                failures += 1;
                println!("FAIL  [{i}] {e}");
            }
        }
    }

    println!(
        "{} of {} {} valid",
        results.len() - failures,
        results.len(),
        args.kind.model_name()
    );
    Ok(if failures == 0 { 0 } else { 1 })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_extension() {
        assert_eq!(DocumentFormat::from_path(Path::new("p.yaml")), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::from_path(Path::new("p.yml")), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::from_path(Path::new("p.json")), DocumentFormat::Json);
        assert_eq!(DocumentFormat::from_path(Path::new("props")), DocumentFormat::Json);
    }

    #[test]
    fn parse_single_and_list() {
        let one = parse_properties(r#"{"name": "marking", "value": "x"}"#, DocumentFormat::Json)
            .unwrap();
        assert_eq!(one.len(), 1);

        let many = parse_properties(
            "- name: type\n  value: data-center\n- name: type\n  value: office\n",
            DocumentFormat::Yaml,
        )
        .unwrap();
        assert_eq!(many.len(), 2);
    }

    #[test]
    fn parse_yaml_unquoted_scalars_as_text() {
        let props = parse_properties("name: version\nvalue: 1.2\n", DocumentFormat::Yaml).unwrap();
        assert_eq!(props[0].value().as_str(), "1.2");

        let quoted = parse_properties("name: version\nvalue: '1.2'\n", DocumentFormat::Yaml).unwrap();
        assert_eq!(quoted[0].value(), props[0].value());

        let list = parse_properties(
            "- name: version\n  value: 3\n- name: marking\n  value: true\n",
            DocumentFormat::Yaml,
        )
        .unwrap();
        assert_eq!(list[0].value().as_str(), "3");
        assert_eq!(list[1].value().as_str(), "true");
    }

    #[test]
    fn parse_rejects_malformed_token() {
        assert!(parse_properties(r#"{"name": "1x", "value": "x"}"#, DocumentFormat::Json).is_err());
    }

    #[test]
    fn check_preserves_order() {
        let props = parse_properties(
            r#"[{"name": "type", "value": "data-center"}, {"name": "type", "value": "office"}]"#,
            DocumentFormat::Json,
        )
        .unwrap();
        let results = check_properties(PropertyKind::Location, props);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
    }

    #[test]
    fn run_validate_exit_codes() {
        let dir = tempfile::tempdir().unwrap();

        let good = dir.path().join("good.json");
        std::fs::write(&good, r#"{"name": "type", "value": "data-center", "class": "primary"}"#)
            .unwrap();
        let args = ValidateArgs {
            path: good,
            kind: PropertyKind::Location,
            format: None,
        };
        assert_eq!(run_validate(&args).unwrap(), 0);

        let bad = dir.path().join("bad.yaml");
        std::fs::write(&bad, "name: type\nvalue: data-center\nclass: tertiary\n").unwrap();
        let args = ValidateArgs {
            path: bad,
            kind: PropertyKind::Location,
            format: None,
        };
        assert_eq!(run_validate(&args).unwrap(), 1);
    }

    #[test]
    fn run_validate_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let args = ValidateArgs {
            path: dir.path().join("absent.json"),
            kind: PropertyKind::Generic,
            format: None,
        };
        assert!(run_validate(&args).is_err());
    }
}
