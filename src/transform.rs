//! Pipeline orchestration and document reassembly.
//!
//! One invocation per HTML document at build time:
//!
//! 1. Locate the head and body regions (absent regions are empty, not
//!    errors)
//! 2. Extract and parse every script element from both regions
//! 3. Synthesize the bootstrap program text
//! 4. Minify it via the collaborator seam
//! 5. Splice the stripped regions back and insert the bootstrap script
//!    immediately before the closing body tag.
//!
//! A document without a body region is returned unmodified — there is
//! nowhere to put the bootstrap. That silence is a documented limitation
//! (surfaced via `log::warn!`), not an error.

use log::{debug, warn};
use regex::NoExpand;

use crate::extract::{extract_scripts, locate_section, parse_script, section_regex, Section};
use crate::minify::{EsMinifier, Minifier, MinifyRequest};
use crate::synth::synthesize_bootstrap;
use crate::{ScriptLocation, TransformError, TransformOptions};

/// Transform an entry HTML document using the crate's default minifier.
pub async fn transform_index_html(
    html: &str,
    options: &TransformOptions,
) -> Result<String, TransformError> {
    transform_index_html_with(html, options, &EsMinifier).await
}

/// Transform an entry HTML document with a caller-supplied minifier.
///
/// The returned document has every original `<script>` removed from head
/// and body and a single minified bootstrap `<script>` inserted before
/// `</body>`. Invocations are independent and safe to run concurrently on
/// different documents.
pub async fn transform_index_html_with<M: Minifier>(
    html: &str,
    options: &TransformOptions,
    minifier: &M,
) -> Result<String, TransformError> {
    let head = locate_section(html, Section::Head).unwrap_or("");
    let body = locate_section(html, Section::Body);

    let (head_tags, head_stripped) = extract_scripts(head);
    let (body_tags, body_stripped) = extract_scripts(body.unwrap_or(""));
    debug!(
        "extracted {} head and {} body scripts",
        head_tags.len(),
        body_tags.len()
    );

    let mut scripts = Vec::with_capacity(head_tags.len() + body_tags.len());
    for tag in &head_tags {
        scripts.push(parse_script(tag, ScriptLocation::Head));
    }
    for tag in &body_tags {
        scripts.push(parse_script(tag, ScriptLocation::Body));
    }

    let bootstrap = synthesize_bootstrap(&scripts, options)?;
    let minified = minifier.minify(&bootstrap, &MinifyRequest { minify: true })?;
    debug!(
        "bootstrap synthesized: {} bytes, {} bytes minified",
        bootstrap.len(),
        minified.code.len()
    );

    if body.is_none() {
        warn!("document has no <body> region; bootstrap script was not injected");
        return Ok(html.to_string());
    }

    Ok(reassemble(html, &head_stripped, &body_stripped, &minified.code))
}

/// Replace the head region with its stripped text and the body region
/// with its stripped text plus the bootstrap script, inserted immediately
/// before the closing body tag.
fn reassemble(
    original_html: &str,
    head_stripped: &str,
    body_stripped: &str,
    minified_bootstrap: &str,
) -> String {
    let with_head = section_regex(Section::Head)
        .replace(original_html, NoExpand(head_stripped))
        .into_owned();

    let body_with_bootstrap = inject_before_body_close(body_stripped, minified_bootstrap);
    section_regex(Section::Body)
        .replace(&with_head, NoExpand(&body_with_bootstrap))
        .into_owned()
}

/// Insert `<script>{code}</script>` before the closing body tag,
/// whichever case it was authored in.
fn inject_before_body_close(body: &str, code: &str) -> String {
    let close = regex::Regex::new(r"(?i)</body>").unwrap();
    match close.find(body) {
        Some(m) => {
            let mut out = String::with_capacity(body.len() + code.len() + 17);
            out.push_str(&body[..m.start()]);
            out.push_str("<script>");
            out.push_str(code);
            out.push_str("</script>");
            out.push_str(&body[m.start()..]);
            out
        }
        None => body.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn injects_before_closing_body_tag() {
        assert_eq!(
            inject_before_body_close("<body><p>hi</p></body>", "x()"),
            "<body><p>hi</p><script>x()</script></body>"
        );
    }

    #[test]
    fn injects_before_uppercase_close() {
        assert_eq!(
            inject_before_body_close("<BODY></BODY>", "x()"),
            "<BODY><script>x()</script></BODY>"
        );
    }

    #[test]
    fn no_close_tag_is_a_no_op() {
        assert_eq!(inject_before_body_close("<p>hi</p>", "x()"), "<p>hi</p>");
    }

    #[test]
    fn reassemble_swaps_both_regions() {
        let html = "<html><head><script>a</script></head><body><script>b</script></body></html>";
        let out = reassemble(html, "<head></head>", "<body></body>", "boot()");
        assert_eq!(
            out,
            "<html><head></head><body><script>boot()</script></body></html>"
        );
    }
}
