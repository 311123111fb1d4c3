//! Script Extractor.
//!
//! Locates the first `<head>` and `<body>` spans of a document, removes
//! every `<script>` element from a section, and parses each removed span
//! into a [`ScriptRecord`].
//!
//! This is deliberately a heuristic span scanner, not an HTML parser. The
//! entry document of an application build has a single well-known shape,
//! and a full parser dependency would cost more than it buys. The
//! heuristics live in this module only, so they stay visible and
//! independently testable. Known limitations:
//!
//! - An unclosed `<script>` tag is not matched and stays in the document
//!   (the span regex requires a closing tag).
//! - A literal `>` inside a quoted attribute value ends the open tag
//!   early.

use regex::Regex;

use crate::{ScriptLocation, ScriptRecord};

/// A document section with a well-known open/close tag pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Head,
    Body,
}

/// Regex matching the first span of the given section, case-insensitively
/// and across newlines. `(?:\s[^>]*)?` keeps `<head>` from matching
/// `<header>`.
pub fn section_regex(section: Section) -> Regex {
    let pattern = match section {
        Section::Head => r"(?is)<head(?:\s[^>]*)?>.*?</head>",
        Section::Body => r"(?is)<body(?:\s[^>]*)?>.*?</body>",
    };
    Regex::new(pattern).unwrap()
}

fn script_span_regex() -> Regex {
    Regex::new(r"(?is)<script(?:\s[^>]*)?>.*?</script>").unwrap()
}

/// Find the first span of `section` in `html`. An absent section is not an
/// error; callers treat its content as empty.
pub fn locate_section(html: &str, section: Section) -> Option<&str> {
    section_regex(section).find(html).map(|m| m.as_str())
}

/// Match every `<script ...>...</script>` span in `section_html` in
/// document order and remove them, leaving all other markup and
/// whitespace intact.
///
/// Returns the raw script spans and the section text without them. A
/// section with zero scripts yields an empty list and the unchanged text.
pub fn extract_scripts(section_html: &str) -> (Vec<String>, String) {
    let re = script_span_regex();
    let scripts = re
        .find_iter(section_html)
        .map(|m| m.as_str().to_string())
        .collect();
    let without = re.replace_all(section_html, "").into_owned();
    (scripts, without)
}

/// Parse one raw script span into its inner text and ordered attribute
/// pairs.
///
/// Attribute names keep their authored case; values are kept exactly as
/// written (quoted, single-quoted, or unquoted), and bare attributes get
/// an empty value.
pub fn parse_script(raw: &str, location: ScriptLocation) -> ScriptRecord {
    let tag = Regex::new(r"(?is)^<script((?:\s[^>]*)?)>(.*)</script>$").unwrap();
    let Some(caps) = tag.captures(raw.trim()) else {
        // Extraction only hands us spans matched by the same grammar.
        return ScriptRecord {
            inner_html: String::new(),
            attributes: Vec::new(),
            location,
        };
    };

    let attrs_segment = caps.get(1).map_or("", |m| m.as_str());
    let inner_html = caps.get(2).map_or("", |m| m.as_str()).to_string();

    let attr = Regex::new(
        r#"([A-Za-z_:][-A-Za-z0-9_:.]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>'"]+)))?"#,
    )
    .unwrap();

    let attributes = attr
        .captures_iter(attrs_segment)
        .map(|c| {
            let name = c[1].to_string();
            let value = c
                .get(2)
                .or_else(|| c.get(3))
                .or_else(|| c.get(4))
                .map_or(String::new(), |m| m.as_str().to_string());
            (name, value)
        })
        .collect();

    ScriptRecord {
        inner_html,
        attributes,
        location,
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
    fn locates_first_head_span() {
        let html = "<html><head><title>t</title></head><body></body></html>";
        assert_eq!(
            locate_section(html, Section::Head),
            Some("<head><title>t</title></head>")
        );
    }

    #[test]
    fn head_regex_does_not_match_header_element() {
        let html = "<body><header>nav</header></body>";
        assert_eq!(locate_section(html, Section::Head), None);
    }

    #[test]
    fn absent_section_is_none() {
        assert_eq!(locate_section("<p>fragment</p>", Section::Body), None);
    }

    #[test]
    fn section_with_attributes_and_newlines() {
        let html = "<body class=\"app\"\n  data-x>\n<p>hi</p>\n</body>";
        assert_eq!(locate_section(html, Section::Body), Some(html));
    }

    #[test]
    fn extracts_scripts_in_document_order() {
        let section = r#"<head>
            <script src="/a.js"></script>
            <title>t</title>
            <script>inline</script>
        </head>"#;
        let (scripts, without) = extract_scripts(section);
        assert_eq!(
            scripts,
            vec![
                r#"<script src="/a.js"></script>"#.to_string(),
                "<script>inline</script>".to_string(),
            ]
        );
        assert!(without.contains("<title>t</title>"));
        assert!(!without.contains("<script"));
    }

    #[test]
    fn zero_scripts_leaves_section_unchanged() {
        let section = "<head><title>t</title></head>";
        let (scripts, without) = extract_scripts(section);
        assert!(scripts.is_empty());
        assert_eq!(without, section);
    }

    #[test]
    fn unclosed_script_is_left_in_place() {
        let section = "<body><script src=\"/a.js\"><p>rest</p></body>";
        let (scripts, without) = extract_scripts(section);
        assert!(scripts.is_empty());
        assert_eq!(without, section);
    }

    #[test]
    fn matches_case_insensitively() {
        let section = "<body><SCRIPT SRC=\"/a.js\"></SCRIPT></body>";
        let (scripts, _) = extract_scripts(section);
        assert_eq!(scripts.len(), 1);
    }

    #[test]
    fn parses_attributes_in_authored_order() {
        let record = parse_script(
            r#"<script type="module" src='/a.js' data-n=3 async></script>"#,
            ScriptLocation::Head,
        );
        assert_eq!(
            record.attributes,
            vec![
                ("type".to_string(), "module".to_string()),
                ("src".to_string(), "/a.js".to_string()),
                ("data-n".to_string(), "3".to_string()),
                ("async".to_string(), String::new()),
            ]
        );
        assert_eq!(record.inner_html, "");
    }

    #[test]
    fn preserves_attribute_name_case_and_value_text() {
        let record = parse_script(
            r#"<script data-URL="a&amp;b"></script>"#,
            ScriptLocation::Head,
        );
        assert_eq!(
            record.attributes,
            vec![("data-URL".to_string(), "a&amp;b".to_string())]
        );
    }

    #[test]
    fn parses_inline_content_across_newlines() {
        let record = parse_script(
            "<script>\nconsole.log(1);\nconsole.log(2);\n</script>",
            ScriptLocation::Body,
        );
        assert_eq!(record.inner_html, "\nconsole.log(1);\nconsole.log(2);\n");
        assert_eq!(record.location, ScriptLocation::Body);
        assert!(record.attributes.is_empty());
    }
}
