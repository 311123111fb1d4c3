//! # dynamic-importmap
//!
//! Build-time HTML transform that rewrites an application's entry document
//! so that import-map resolution happens at runtime, before any of the
//! document's original scripts execute.
//!
//! The transform removes every `<script>` element from the head and body,
//! then splices a single minified bootstrap `<script>` in front of the
//! closing body tag. When the bootstrap runs in the browser it:
//!
//! 1. Resolves the import map (fetched from a URL, computed by an inlined
//!    resolver function, or embedded as a literal)
//! 2. Applies a `localStorage` override when one is present and enabled
//! 3. Installs the result as a `type="importmap"` script in the head
//! 4. Replays the original scripts in document order, and
//! 5. Removes itself from the DOM.
//!
//! Import maps are only honored if they are installed before the first
//! module script executes — deferring the original scripts behind the
//! installation step is the entire reason this crate exists.
//!
//! # Architecture
//!
//! ```text
//! raw HTML → extract scripts → synthesize bootstrap → minify → final HTML
//! ```
//!
//! Each invocation is a pure function of its HTML input and options; there
//! is no shared state across documents.

pub mod extract;
pub mod minify;
pub mod plugin;
pub mod resolver;
pub mod runtime;
pub mod synth;
pub mod transform;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use minify::{EsMinifier, Minifier, MinifyOutput, MinifyRequest};
pub use plugin::{DynamicImportmapPlugin, HookOrder};
pub use runtime::OVERRIDE_STORAGE_KEY;
pub use synth::synthesize_bootstrap;
pub use transform::{transform_index_html, transform_index_html_with};

// ---------------------------------------------------------------------------
// Importmap
// ---------------------------------------------------------------------------

/// A browser import map.
///
/// Treated as an opaque value by this crate — it is serialized to compact
/// JSON and embedded or installed as-is, never validated against the
/// import-map standard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Importmap {
    /// Top-level specifier → URL mappings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imports: Option<BTreeMap<String, String>>,
    /// Scope URL → (specifier → URL) mappings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scopes: Option<BTreeMap<String, BTreeMap<String, String>>>,
    /// URL → integrity hash mappings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub integrity: Option<BTreeMap<String, String>>,
}

// ---------------------------------------------------------------------------
// ImportmapSpec
// ---------------------------------------------------------------------------

/// How the import map is resolved at runtime.
///
/// The variant is fixed at build time; the generated bootstrap contains
/// exactly one resolution path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportmapSpec {
    /// Fetch the import map from this URL at runtime.
    Url(String),
    /// The literal JS source text of a zero-argument function returning an
    /// import map (or a promise of one). The text is inlined into the
    /// bootstrap and invoked in the browser, so it must be self-contained:
    /// nothing from the surrounding scope survives serialization.
    Resolver(String),
    /// An import map already known at build time, embedded as a literal.
    Static(Importmap),
}

// ---------------------------------------------------------------------------
// TransformOptions
// ---------------------------------------------------------------------------

/// Configuration for one transform invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOptions {
    /// How the import map is resolved at runtime.
    pub importmap: ImportmapSpec,
    /// When `true` (the default), a JSON import map stored under the
    /// [`OVERRIDE_STORAGE_KEY`] in `localStorage` takes precedence over
    /// the configured resolution strategy. Absence of a stored override
    /// falls back to the configured strategy.
    pub respect_override: bool,
}

impl TransformOptions {
    /// Options with the given resolution strategy and override handling
    /// enabled.
    pub fn new(importmap: ImportmapSpec) -> Self {
        Self {
            importmap,
            respect_override: true,
        }
    }

    /// Enable or disable the `localStorage` override check.
    pub fn with_respect_override(mut self, respect_override: bool) -> Self {
        self.respect_override = respect_override;
        self
    }
}

// ---------------------------------------------------------------------------
// ScriptRecord
// ---------------------------------------------------------------------------

/// Which document section a script was extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptLocation {
    /// `<head>` — the default; omitted from the serialized record.
    Head,
    /// `<body>`.
    Body,
}

/// One extracted `<script>` element, as authored.
///
/// Created once during extraction, immutable thereafter, consumed by the
/// synthesizer to emit a replay entry. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptRecord {
    /// Literal text content of the element (empty for external scripts).
    pub inner_html: String,
    /// Attribute name/value pairs in authored order. Bare attributes carry
    /// an empty value; names keep their authored case, values are kept
    /// exactly as written.
    pub attributes: Vec<(String, String)>,
    /// Section the element originated from.
    pub location: ScriptLocation,
}

// ---------------------------------------------------------------------------
// TransformError
// ---------------------------------------------------------------------------

/// Errors that abort the transform (and with it, the build).
#[derive(Debug, Error)]
pub enum TransformError {
    /// The configured resolver source cannot be re-parsed as a standalone
    /// function or arrow expression in the browser, so inlining it would
    /// embed broken program text.
    #[error(
        "options.importmap must refer to a function expression or arrow function, got `{source_text}`\n\
         note: method definitions using shorthand syntax are not supported, because their serialized \
         source text is not a valid standalone expression (see MDN: Method definitions)"
    )]
    InvalidResolverSyntax {
        /// First line of the offending source text.
        source_text: String,
    },

    /// The minifier collaborator rejected the bootstrap source. There is
    /// no unminified fallback path.
    #[error("bootstrap minification failed: {0}")]
    Minify(String),

    /// The configured import map could not be serialized to JSON.
    #[error("importmap is not serializable to JSON: {0}")]
    Serialize(#[from] serde_json::Error),
}
