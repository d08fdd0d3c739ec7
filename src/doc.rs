// Strongly-typed document model. No serde_json::Value here; the parser
// produces this tree and the normalizer lowers it to canonical JSON.

use indexmap::IndexMap;

/// Reserved key prefix under which schema declarations live in a [`Document`].
pub const SCHEMA_KEY_PREFIX: &str = "schema:";

/// One parsed source file: ordered top-level entries, keys unique,
/// insertion order preserved (it is meaningful for display).
pub type Document = IndexMap<String, Entry>;

#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Value(Value),
    Schema(SchemaDef),
}

/// Strictly tree-shaped: ownership is top-down, no sharing, so no cycles.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Primitive(Scalar),
    Object(IndexMap<String, Value>),
    Array(Vec<Value>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDef {
    pub name: String,
    pub rules: Vec<FieldRule>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldRule {
    pub key: String,
    /// Opaque token ("string", "integer", ...); never enforced here.
    pub declared_type: String,
    /// Opaque attribute literals, declaration order preserved.
    pub attributes: IndexMap<String, Value>,
}

impl From<Scalar> for Value {
    fn from(s: Scalar) -> Self {
        Value::Primitive(s)
    }
}
