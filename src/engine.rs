//! Analysis and conversion entry points, wire-envelope shaped.
//!
//! Every call here is synchronous and stateless: parse, derive the views,
//! build the response, done. All failures are caught at this boundary and
//! folded into `{success: false, error}`; nothing propagates past it and
//! nothing is retried.

use std::str::FromStr;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{json, Map as JsonMap, Value as Json};

use crate::attr_scan::{scan_attributes, AttributeRecord};
use crate::convert::{self, Format};
use crate::error::Result;
use crate::normalize::{split_document, SchemaView};
use crate::parse::parse_bring;
use crate::stats::{collect_statistics, Statistics};
use crate::validate::{validate, ValidationResult};

/// Everything the engine derives from one document.
#[derive(Debug, Serialize)]
pub struct AnalysisReport {
    pub data: JsonMap<String, Json>,
    pub schemas: IndexMap<String, SchemaView>,
    pub attributes: IndexMap<String, Vec<AttributeRecord>>,
    pub validation: Vec<ValidationResult>,
    pub statistics: Statistics,
}

pub fn analyze_document(content: &str) -> Result<AnalysisReport> {
    let doc = parse_bring(content)?;
    let (data, schemas) = split_document(&doc);
    let attributes = scan_attributes(content);
    let validation = validate(&data, &schemas);
    let statistics = collect_statistics(&data, &schemas, &attributes, content);
    Ok(AnalysisReport {
        data,
        schemas,
        attributes,
        validation,
        statistics,
    })
}

/// Analysis envelope. Blank content short-circuits to the all-empty
/// success shape without invoking the parser.
pub fn analyze(content: &str) -> Json {
    if content.trim().is_empty() {
        return json!({
            "success": true,
            "data": {},
            "schemas": {},
            "attributes": {},
            "validation": [],
            "statistics": {}
        });
    }
    match analyze_document(content) {
        Ok(report) => json!({
            "success": true,
            "data": report.data,
            "schemas": report.schemas,
            "attributes": report.attributes,
            "validation": report.validation,
            "statistics": report.statistics
        }),
        Err(e) => failure(e),
    }
}

/// Conversion envelope. The selector is checked first, so an unknown
/// format fails even for empty content.
pub fn convert(content: &str, format_selector: &str) -> Json {
    match convert_inner(content, format_selector) {
        Ok(converted) => json!({"success": true, "converted": converted}),
        Err(e) => failure(e),
    }
}

fn convert_inner(content: &str, format_selector: &str) -> Result<String> {
    let format = Format::from_str(format_selector)?;
    let doc = parse_bring(content)?;
    let (data, _) = split_document(&doc);
    convert::convert(&data, format)
}

fn failure(e: impl std::fmt::Display) -> Json {
    json!({"success": false, "error": e.to_string()})
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
# Application Configuration
schema DatabaseConfig {
    host = string @required=true @default="localhost"
    port = integer @required=true @range=[1, 65535]
}

app_name = "Bring Demo App"
version = "1.0.0"
debug @environment="development" = true

server = {
    name = "web-server-01"
    port = 8080
    max_connections @tuning="performance" = 1000
}

features = [
    { name = "new_ui", enabled = true, rollout = 0.75 }
    { name = "analytics", enabled = false, rollout = 0.1 }
]
"#;

    #[test]
    fn blank_input_short_circuits_without_the_parser() {
        for blank in ["", "   ", "\n\t\n"] {
            let resp = analyze(blank);
            assert_eq!(resp["success"], json!(true));
            assert_eq!(resp["data"], json!({}));
            assert_eq!(resp["schemas"], json!({}));
            assert_eq!(resp["attributes"], json!({}));
            assert_eq!(resp["validation"], json!([]));
            assert_eq!(resp["statistics"], json!({}));
        }
    }

    #[test]
    fn success_envelope_carries_all_derived_views() {
        let resp = analyze(SAMPLE);
        assert_eq!(resp["success"], json!(true));

        assert_eq!(resp["data"]["app_name"], json!("Bring Demo App"));
        assert_eq!(resp["data"]["server"]["port"], json!(8080));
        assert_eq!(resp["data"]["features"][0]["rollout"], json!(0.75));
        assert!(resp["data"].get("schema:DatabaseConfig").is_none());

        let schema = &resp["schemas"]["DatabaseConfig"];
        assert_eq!(schema["name"], json!("DatabaseConfig"));
        assert_eq!(schema["rules"][1]["type"], json!("integer"));
        assert_eq!(schema["rules"][1]["attributes"]["range"], json!([1, 65535]));

        // one capture per annotated line, keyed by line id
        let attrs = resp["attributes"].as_object().unwrap();
        assert!(attrs.keys().all(|k| k.starts_with("line_")));
        assert!(attrs.values().all(|v| v.as_array().unwrap().len() == 1));

        assert_eq!(resp["validation"][0]["path"], json!("root"));
        assert_eq!(resp["validation"][0]["valid"], json!(true));

        let structure = &resp["statistics"]["structure"];
        assert_eq!(structure["top_level_keys"], json!(5));
        assert_eq!(structure["schemas_defined"], json!(1));
        assert_eq!(resp["statistics"]["complexity"]["schema_rules"], json!(2));
    }

    #[test]
    fn parse_failures_surface_verbatim() {
        let resp = analyze("invalid = @#$");
        assert_eq!(resp["success"], json!(false));
        let msg = resp["error"].as_str().unwrap();
        assert!(msg.contains("line 1"), "unexpected message: {msg}");
    }

    #[test]
    fn conversion_round_trips_json() {
        let resp = convert(SAMPLE, "json");
        assert_eq!(resp["success"], json!(true));
        let back: Json = serde_json::from_str(resp["converted"].as_str().unwrap()).unwrap();
        assert_eq!(back, analyze(SAMPLE)["data"]);
    }

    #[test]
    fn unsupported_format_fails_even_on_empty_content() {
        for content in ["", SAMPLE] {
            let resp = convert(content, "toml");
            assert_eq!(resp["success"], json!(false));
            assert!(resp["error"].as_str().unwrap().contains("Unsupported format"));
        }
    }

    #[test]
    fn conversion_excludes_schema_entries() {
        let resp = convert(SAMPLE, "json");
        assert!(!resp["converted"].as_str().unwrap().contains("DatabaseConfig"));
    }

    #[test]
    fn too_deep_documents_are_rejected_at_the_boundary() {
        let mut src = String::from("deep = ");
        src.push_str(&"[".repeat(80));
        src.push('1');
        src.push_str(&"]".repeat(80));
        let resp = analyze(&src);
        assert_eq!(resp["success"], json!(false));
        assert!(resp["error"].as_str().unwrap().contains("nesting depth"));
    }
}
