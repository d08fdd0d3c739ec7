//! Structural and textual statistics over one analyzed document.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map as JsonMap, Value as Json};

use crate::attr_scan::AttributeRecord;
use crate::normalize::SchemaView;

const COMMENT_MARKER: char = '#';

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Statistics {
    pub file_info: FileInfo,
    pub structure: StructureInfo,
    pub complexity: ComplexityInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FileInfo {
    pub total_lines: usize,
    pub non_empty_lines: usize,
    pub comment_lines: usize,
    pub character_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StructureInfo {
    pub top_level_keys: usize,
    pub schemas_defined: usize,
    pub objects: usize,
    pub arrays: usize,
    pub primitives: usize,
    pub null_values: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComplexityInfo {
    pub nesting_depth: usize,
    pub total_attributes: usize,
    pub schema_rules: usize,
}

pub fn collect_statistics(
    data: &JsonMap<String, Json>,
    schemas: &IndexMap<String, SchemaView>,
    attributes: &IndexMap<String, Vec<AttributeRecord>>,
    raw: &str,
) -> Statistics {
    let lines: Vec<&str> = raw.split('\n').collect();

    let mut structure = StructureInfo {
        top_level_keys: data.len(),
        schemas_defined: schemas.len(),
        ..StructureInfo::default()
    };
    // the top-level data map itself counts as one object
    structure.objects += 1;
    for value in data.values() {
        count_types(value, &mut structure);
    }

    Statistics {
        file_info: FileInfo {
            total_lines: lines.len(),
            non_empty_lines: lines.iter().filter(|l| !l.trim().is_empty()).count(),
            comment_lines: lines
                .iter()
                .filter(|l| l.trim_start().starts_with(COMMENT_MARKER))
                .count(),
            character_count: raw.chars().count(),
        },
        structure,
        complexity: ComplexityInfo {
            nesting_depth: data.values().map(|v| max_depth(v, 1)).max().unwrap_or(0),
            total_attributes: attributes.values().map(Vec::len).sum(),
            schema_rules: schemas.values().map(|s| s.rules.len()).sum(),
        },
    }
}

/// Additive recursive type counts: every map is one object, every list one
/// array, then recurse. No deduplication.
fn count_types(value: &Json, counts: &mut StructureInfo) {
    match value {
        Json::Object(map) => {
            counts.objects += 1;
            for v in map.values() {
                count_types(v, counts);
            }
        }
        Json::Array(items) => {
            counts.arrays += 1;
            for v in items {
                count_types(v, counts);
            }
        }
        Json::Null => counts.null_values += 1,
        _ => counts.primitives += 1,
    }
}

/// Scalars sit at their own depth; containers take the max over children
/// one level down. An empty container contributes its own depth unchanged.
fn max_depth(value: &Json, depth: usize) -> usize {
    match value {
        Json::Object(map) => map
            .values()
            .map(|v| max_depth(v, depth + 1))
            .max()
            .unwrap_or(depth),
        Json::Array(items) => items
            .iter()
            .map(|v| max_depth(v, depth + 1))
            .max()
            .unwrap_or(depth),
        _ => depth,
    }
}
