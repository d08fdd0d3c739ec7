//! Lower the parsed tree to canonical JSON and split out schema
//! declarations.
//!
//! `normalize` is total: every [`Value`] becomes a `serde_json::Value`
//! (maps keep insertion order via the `preserve_order` feature). The one
//! node JSON cannot represent, a non-finite float, falls back to its
//! string rendering instead of failing.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map as JsonMap, Value as Json};

use crate::doc::{Document, Entry, FieldRule, Scalar, Value, SCHEMA_KEY_PREFIX};

/// Display-oriented view of one schema declaration.
#[derive(Debug, Clone, Serialize)]
pub struct SchemaView {
    pub name: String,
    pub rules: Vec<RuleView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RuleView {
    pub key: String,
    #[serde(rename = "type")]
    pub declared_type: String,
    pub attributes: JsonMap<String, Json>,
}

pub fn normalize(value: &Value) -> Json {
    match value {
        Value::Primitive(s) => match s {
            Scalar::Null => Json::Null,
            Scalar::Bool(b) => Json::Bool(*b),
            Scalar::Int(i) => Json::Number((*i).into()),
            Scalar::Float(f) => match serde_json::Number::from_f64(*f) {
                Some(n) => Json::Number(n),
                // NaN/inf: render the node as its string form
                None => Json::String(f.to_string()),
            },
            Scalar::Str(s) => Json::String(s.clone()),
        },
        Value::Object(map) => {
            let mut out = JsonMap::new();
            for (k, v) in map {
                out.insert(k.clone(), normalize(v));
            }
            Json::Object(out)
        }
        Value::Array(items) => Json::Array(items.iter().map(normalize).collect()),
    }
}

/// One pass over the document: `schema:`-prefixed entries become
/// [`SchemaView`]s keyed by the stripped name, everything else is
/// normalized into `data`. Both sides keep document order; no key lands
/// in both.
pub fn split_document(doc: &Document) -> (JsonMap<String, Json>, IndexMap<String, SchemaView>) {
    let mut data = JsonMap::new();
    let mut schemas = IndexMap::new();
    for (key, entry) in doc {
        match entry {
            Entry::Schema(schema) => {
                let name = key
                    .strip_prefix(SCHEMA_KEY_PREFIX)
                    .unwrap_or(key)
                    .to_string();
                schemas.insert(
                    name,
                    SchemaView {
                        name: schema.name.clone(),
                        rules: schema.rules.iter().map(rule_view).collect(),
                    },
                );
            }
            Entry::Value(value) => {
                data.insert(key.clone(), normalize(value));
            }
        }
    }
    (data, schemas)
}

fn rule_view(rule: &FieldRule) -> RuleView {
    let mut attributes = JsonMap::new();
    for (name, literal) in &rule.attributes {
        attributes.insert(name.clone(), normalize(literal));
    }
    RuleView {
        key: rule.key.clone(),
        declared_type: rule.declared_type.clone(),
        attributes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_bring;
    use serde_json::json;

    #[test]
    fn normalizes_the_three_shapes_recursively() {
        let doc = parse_bring(
            r#"
            app = {
                name = "WebApp"
                features = ["auth", "api"]
                retries = null
            }
            "#,
        )
        .unwrap();
        let (data, _) = split_document(&doc);
        assert_eq!(
            Json::Object(data),
            json!({"app": {"name": "WebApp", "features": ["auth", "api"], "retries": null}})
        );
    }

    #[test]
    fn key_order_survives_normalization() {
        let doc = parse_bring("z = 1\na = 2\nm = 3").unwrap();
        let (data, _) = split_document(&doc);
        let keys: Vec<&String> = data.keys().collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }

    #[test]
    fn non_finite_floats_fall_back_to_string_rendering() {
        let v = Value::Primitive(Scalar::Float(f64::NAN));
        assert_eq!(normalize(&v), Json::String("NaN".into()));
        let v = Value::Primitive(Scalar::Float(f64::INFINITY));
        assert_eq!(normalize(&v), Json::String("inf".into()));
    }

    #[test]
    fn schema_goes_only_to_schemas_and_data_only_to_data() {
        let doc = parse_bring(
            r#"
            schema User {
                id = number @min=1
            }
            app_name = "Demo"
            "#,
        )
        .unwrap();
        let (data, schemas) = split_document(&doc);
        assert_eq!(data.len(), 1);
        assert!(data.contains_key("app_name"));
        assert!(!data.contains_key("schema:User"));
        assert_eq!(schemas.len(), 1);
        assert_eq!(schemas["User"].name, "User");
        assert!(!schemas.contains_key("app_name"));
    }

    #[test]
    fn rule_attributes_serialize_as_json_literals() {
        let doc = parse_bring(
            r#"
            schema ServerConfig {
                port = integer @range=[1, 65535] @required=true
            }
            "#,
        )
        .unwrap();
        let (_, schemas) = split_document(&doc);
        let rule = &schemas["ServerConfig"].rules[0];
        assert_eq!(rule.declared_type, "integer");
        assert_eq!(rule.attributes["range"], json!([1, 65535]));
        assert_eq!(rule.attributes["required"], json!(true));
    }
}
