//! Pass/fail summaries per document root and per schema.
//!
//! This is a structural stub on purpose: it reports that data exists and
//! that each schema parsed, and nothing more. A real constraint evaluator
//! would resolve each rule's key against the data and apply its attributes
//! as predicates (required/range/enum/...); that extension point is left
//! unimplemented.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map as JsonMap, Value as Json};

use crate::normalize::SchemaView;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    pub path: String,
    pub valid: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

pub fn validate(
    data: &JsonMap<String, Json>,
    schemas: &IndexMap<String, SchemaView>,
) -> Vec<ValidationResult> {
    let mut results = Vec::new();

    if data.is_empty() {
        results.push(ValidationResult {
            path: "root".into(),
            valid: false,
            message: "No data found".into(),
            details: Some("The configuration appears to be empty".into()),
        });
    } else {
        let keys: Vec<&str> = data.keys().map(String::as_str).collect();
        results.push(ValidationResult {
            path: "root".into(),
            valid: true,
            message: format!("Successfully parsed {} top-level items", data.len()),
            details: Some(format!("Found keys: {}", keys.join(", "))),
        });
    }

    for (name, schema) in schemas {
        results.push(ValidationResult {
            path: format!("schema:{name}"),
            valid: true,
            message: format!("Schema \"{name}\" is valid"),
            details: Some(format!("Contains {} rules", schema.rules.len())),
        });
    }

    results
}
