//! Runtime helper sources.
//!
//! These are the JS functions inlined verbatim into the generated
//! bootstrap. They run in the browser, never at build time, and are kept
//! self-contained for that reason: each one is a named function expression
//! that closes over nothing.
//!
//! The bootstrap is one sequential async task. Its only suspension points
//! are the import-map fetch and the awaited resolver call; a failure in
//! either propagates as an unhandled rejection that halts the bootstrap
//! before any application script runs. That is deliberate — a broken
//! import map must not silently let scripts run unresolved.

/// Well-known `localStorage` key consulted for an import-map override.
pub const OVERRIDE_STORAGE_KEY: &str = "importmap";

/// Source of the override lookup: returns the parsed stored import map,
/// or `undefined` when nothing is stored.
pub fn importmap_override_source() -> String {
    format!(
        r#"function getImportmapOverride() {{
  const stored = localStorage.getItem("{key}");
  if (stored) {{
    console.warn("using importmap override from localStorage");
    return JSON.parse(stored);
  }}
  return undefined;
}}"#,
        key = OVERRIDE_STORAGE_KEY
    )
}

/// Source of the URL resolution strategy: fetch the import map and parse
/// the response body as JSON.
pub const FETCH_IMPORTMAP: &str = r#"async function fetchImportmap(importmapUrl) {
  const response = await fetch(importmapUrl);
  return await response.json();
}"#;

/// Source of the installation step: append a `type="importmap"` script
/// element to the document head. Must complete before any replayed module
/// script executes.
pub const ADD_IMPORTMAP_TO_DOM: &str = r#"async function addImportmapToDom(importmap) {
  const scriptNode = document.createElement("script");
  scriptNode.type = "importmap";
  scriptNode.innerHTML = JSON.stringify(importmap);
  document.head.append(scriptNode);
}"#;

/// Source of the replay step: recreate every extracted script element with
/// its original content and attributes, appended to its recorded section
/// (head when unspecified) in record order.
pub const ADD_SCRIPTS_TO_DOM: &str = r#"function addScriptsToDom(scripts) {
  for (const script of scripts) {
    const scriptNode = document.createElement("script");
    scriptNode.innerHTML = script.innerHTML;
    for (const [name, value] of Object.entries(script.attributes)) scriptNode.setAttribute(name, value);
    document[script.location || "head"].append(scriptNode);
  }
}"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_source_embeds_the_storage_key() {
        let source = importmap_override_source();
        assert!(source.contains(r#"localStorage.getItem("importmap")"#));
        assert!(source.contains(OVERRIDE_STORAGE_KEY));
    }

    #[test]
    fn helpers_are_named_function_expressions() {
        // The names survive minification and give the generated program a
        // stable, testable vocabulary.
        assert!(importmap_override_source().starts_with("function getImportmapOverride("));
        assert!(FETCH_IMPORTMAP.starts_with("async function fetchImportmap("));
        assert!(ADD_IMPORTMAP_TO_DOM.starts_with("async function addImportmapToDom("));
        assert!(ADD_SCRIPTS_TO_DOM.starts_with("function addScriptsToDom("));
    }
}
