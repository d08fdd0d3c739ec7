//! Re-serialize the canonical data map to JSON, YAML, or a flat XML form.

use std::str::FromStr;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde_json::{Map as JsonMap, Value as Json};

use crate::error::{EngineError, Result};

const XML_ROOT: &str = "config";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
    Xml,
}

impl FromStr for Format {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "json" => Ok(Format::Json),
            "yaml" => Ok(Format::Yaml),
            "xml" => Ok(Format::Xml),
            other => Err(EngineError::UnsupportedFormat(other.to_string())),
        }
    }
}

pub fn convert(data: &JsonMap<String, Json>, format: Format) -> Result<String> {
    match format {
        Format::Json => serde_json::to_string_pretty(data).map_err(internal),
        Format::Yaml => to_yaml(data),
        Format::Xml => to_flat_xml(data),
    }
}

fn internal<E: std::fmt::Display>(e: E) -> EngineError {
    EngineError::InternalAnalysisError(e.to_string())
}

#[cfg(feature = "yaml")]
fn to_yaml(data: &JsonMap<String, Json>) -> Result<String> {
    serde_yaml::to_string(data).map_err(internal)
}

#[cfg(not(feature = "yaml"))]
fn to_yaml(_data: &JsonMap<String, Json>) -> Result<String> {
    Err(EngineError::ConversionUnavailable("YAML"))
}

/// Flat by design: one `<key>` element per top-level key whose text is a
/// direct string rendering of the value. Nested objects and arrays are not
/// expanded into elements; they appear as their compact JSON text. Known
/// shallow-serialization limitation.
fn to_flat_xml(data: &JsonMap<String, Json>) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", None, None)))
        .map_err(internal)?;
    writer
        .write_event(Event::Start(BytesStart::new(XML_ROOT)))
        .map_err(internal)?;
    for (key, value) in data {
        writer
            .write_event(Event::Start(BytesStart::new(key.as_str())))
            .map_err(internal)?;
        writer
            .write_event(Event::Text(BytesText::new(&render_flat(value))))
            .map_err(internal)?;
        writer
            .write_event(Event::End(BytesEnd::new(key.as_str())))
            .map_err(internal)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(XML_ROOT)))
        .map_err(internal)?;

    String::from_utf8(writer.into_inner()).map_err(internal)
}

fn render_flat(value: &Json) -> String {
    match value {
        Json::String(s) => s.clone(),
        other => other.to_string(),
    }
}
