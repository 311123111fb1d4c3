//! Bootstrap Synthesizer.
//!
//! Builds, as literal program text, the async routine that installs the
//! import map and replays the extracted scripts. Nothing here executes
//! JS — the output is opaque source handed to the minifier and spliced
//! into the document.
//!
//! Ordering guarantee: the generated program awaits import-map
//! installation before the first replayed script element is appended.
//! Browsers only honor an import map that is present before the first
//! module script executes.

use serde_json::{Map, Value};

use crate::resolver::validate_resolver_source;
use crate::runtime;
use crate::{ImportmapSpec, ScriptLocation, ScriptRecord, TransformError, TransformOptions};

/// Build the bootstrap program text for the given extracted scripts and
/// options.
///
/// Shape of the emitted program:
///
/// ```text
/// (async () => {
///   await (install)((respectOverride && (override)()) || <resolution>);
///   (replay)([...script records...]);
/// })();
/// document.currentScript.remove();
/// ```
///
/// The resolution expression is fixed at synthesis time by the
/// [`ImportmapSpec`] variant. The trailing statement removes the
/// bootstrap's own script element so no scaffolding remains in the DOM.
pub fn synthesize_bootstrap(
    scripts: &[ScriptRecord],
    options: &TransformOptions,
) -> Result<String, TransformError> {
    let resolution = resolution_expression(&options.importmap)?;
    let records = script_records_json(scripts)?;

    Ok(format!(
        "(async () => {{\n  await ({install})(({respect} && ({lookup})()) || {resolution});\n  ({replay})({records});\n}})();\ndocument.currentScript.remove();",
        install = runtime::ADD_IMPORTMAP_TO_DOM,
        respect = options.respect_override,
        lookup = runtime::importmap_override_source(),
        resolution = resolution,
        replay = runtime::ADD_SCRIPTS_TO_DOM,
        records = records,
    ))
}

/// The strategy-selected expression producing the resolved import map.
fn resolution_expression(spec: &ImportmapSpec) -> Result<String, TransformError> {
    match spec {
        ImportmapSpec::Url(url) => Ok(format!(
            "await ({})(\"{}\")",
            runtime::FETCH_IMPORTMAP,
            escape_js_string(url)
        )),
        ImportmapSpec::Resolver(source) => {
            validate_resolver_source(source)?;
            Ok(format!("await ({source})()"))
        }
        ImportmapSpec::Static(importmap) => Ok(serde_json::to_string(importmap)?),
    }
}

/// Serialize the script records as the compact JSON array consumed by the
/// replay helper. The head location is the default and is omitted from
/// the record, matching the wire shape the replay helper expects.
fn script_records_json(scripts: &[ScriptRecord]) -> Result<String, TransformError> {
    let records: Vec<Value> = scripts
        .iter()
        .map(|script| {
            let mut record = Map::new();
            record.insert(
                "innerHTML".to_string(),
                Value::String(script.inner_html.clone()),
            );
            let attributes: Map<String, Value> = script
                .attributes
                .iter()
                .map(|(name, value)| (name.clone(), Value::String(value.clone())))
                .collect();
            record.insert("attributes".to_string(), Value::Object(attributes));
            if script.location == ScriptLocation::Body {
                record.insert("location".to_string(), Value::String("body".to_string()));
            }
            Value::Object(record)
        })
        .collect();

    Ok(serde_json::to_string(&Value::Array(records))?)
}

/// Escape a string for embedding inside a JS double-quoted literal.
fn escape_js_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
