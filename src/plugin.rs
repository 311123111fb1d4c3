//! Host build-tool hook adapter.
//!
//! [`DynamicImportmapPlugin`] is the surface a host build tool wires into
//! its HTML-processing lifecycle. It runs in the "post" phase — after all
//! other HTML transforms — so the scripts it extracts and replays are the
//! fully processed ones.
//!
//! A resolver-sourced import map is validated eagerly at construction:
//! a malformed resolver should fail plugin setup, not the first page
//! build.

use crate::resolver::validate_resolver_source;
use crate::transform::transform_index_html;
use crate::{ImportmapSpec, TransformError, TransformOptions};

/// Where the host should schedule this transform relative to its other
/// HTML transforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookOrder {
    Pre,
    Post,
}

/// The dynamic-importmap HTML transform, packaged as a host plugin.
#[derive(Debug, Clone)]
pub struct DynamicImportmapPlugin {
    options: TransformOptions,
}

impl DynamicImportmapPlugin {
    /// Create the plugin, validating a resolver-sourced import map up
    /// front.
    pub fn new(options: TransformOptions) -> Result<Self, TransformError> {
        if let ImportmapSpec::Resolver(source) = &options.importmap {
            validate_resolver_source(source)?;
        }
        Ok(Self { options })
    }

    pub fn name(&self) -> &'static str {
        "dynamic-importmap"
    }

    /// This transform must see the final HTML, so it registers for the
    /// "post" phase.
    pub fn order(&self) -> HookOrder {
        HookOrder::Post
    }

    pub fn options(&self) -> &TransformOptions {
        &self.options
    }

    /// The HTML hook: receives the fully processed document, returns the
    /// rewritten one.
    pub async fn transform_index_html(&self, html: &str) -> Result<String, TransformError> {
        transform_index_html(html, &self.options).await
    }
}
