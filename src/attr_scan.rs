//! Flat, line-oriented inventory of `@name=value` annotations.
//!
//! This runs over raw source text, independent of the parse tree, and has
//! no awareness of nesting paths. Known limitation, kept on purpose: only
//! the first `@` token on a line is captured, so
//! `port = 8080 @min=1024 @max=65535` yields one record, not two.

use indexmap::IndexMap;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeRecord {
    pub name: String,
    /// Literal value text as written, quotes and all. Opaque to the engine.
    pub value: String,
    /// 1-based source line.
    pub line: usize,
}

/// Scan `raw` line by line; records group under `line_<n>` keys in source
/// order. Records on different lines never merge.
pub fn scan_attributes(raw: &str) -> IndexMap<String, Vec<AttributeRecord>> {
    let mut out: IndexMap<String, Vec<AttributeRecord>> = IndexMap::new();
    for (idx, line) in raw.split('\n').enumerate() {
        let line_no = idx + 1;
        let line = line.trim();
        if !(line.contains('@') && line.contains('=')) {
            continue;
        }
        // segment between the first '@' and the next '@' (if any)
        let after = &line[line.find('@').unwrap() + 1..];
        let segment = match after.find('@') {
            Some(i) => &after[..i],
            None => after,
        };
        let mut pieces = segment.split('=');
        let name = pieces.next().unwrap_or_default().trim().to_string();
        let value = pieces
            .next()
            .map(|v| v.trim().to_string())
            .unwrap_or_else(|| "true".to_string());
        out.entry(format!("line_{line_no}"))
            .or_default()
            .push(AttributeRecord {
                name,
                value,
                line: line_no,
            });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_only_the_first_attribute_on_a_line() {
        let found = scan_attributes("port = 8080 @min=1024 @max=65535");
        assert_eq!(found.len(), 1);
        let records = &found["line_1"];
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0],
            AttributeRecord {
                name: "min".into(),
                value: "1024".into(),
                line: 1
            }
        );
    }

    #[test]
    fn value_text_is_the_raw_literal() {
        let found = scan_attributes(r#"debug @environment="development" = true"#);
        assert_eq!(found["line_1"][0].name, "environment");
        assert_eq!(found["line_1"][0].value, r#""development""#);
    }

    #[test]
    fn bare_attribute_reads_as_true_when_the_line_has_an_equals() {
        // the '=' before the '@' satisfies the line check; the segment
        // itself has none, so the value defaults to "true"
        let found = scan_attributes("x = 1 @flag");
        assert_eq!(found["line_1"][0].name, "flag");
        assert_eq!(found["line_1"][0].value, "true");
    }

    #[test]
    fn lines_without_both_markers_produce_nothing() {
        assert!(scan_attributes("# just a comment\nname = \"x\"\n@orphan\n").is_empty());
    }

    #[test]
    fn records_group_per_line_and_keep_source_order() {
        let found = scan_attributes("a = 1 @p=1\nplain = 2\nb = 3 @q=2\n");
        let keys: Vec<&String> = found.keys().collect();
        assert_eq!(keys, ["line_1", "line_3"]);
        assert_eq!(found["line_3"][0].line, 3);
    }
}
