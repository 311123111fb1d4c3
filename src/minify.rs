//! Minifier collaborator seam.
//!
//! The synthesized bootstrap is handed to a minifier before being spliced
//! into the document. The minifier is modeled as a port so the pipeline
//! can be exercised against fakes in tests; [`EsMinifier`] is the crate's
//! default implementation.
//!
//! `EsMinifier` is conservative by construction: it strips comments and
//! collapses whitespace, never touches the contents of string or template
//! literals, and leaves anything it is unsure about unchanged. It must be
//! semantics-preserving for the bootstrap programs this crate emits and
//! deterministic for identical input. It does not rename identifiers.
//!
//! Known limitation: whitespace inside a regex literal in user-supplied
//! resolver source is collapsed like ordinary code.

use crate::TransformError;

/// Instruction passed alongside the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinifyRequest {
    /// When `false`, the source is passed through untouched.
    pub minify: bool,
}

/// Minification result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinifyOutput {
    /// The (possibly compacted) program text. Semantics must match the
    /// input; this crate does not re-verify.
    pub code: String,
}

/// A service that compacts program source text.
pub trait Minifier {
    fn minify(&self, source: &str, request: &MinifyRequest) -> Result<MinifyOutput, TransformError>;
}

/// Default pure-Rust minifier: comment stripping followed by whitespace
/// collapsing.
#[derive(Debug, Clone, Copy, Default)]
pub struct EsMinifier;

impl Minifier for EsMinifier {
    fn minify(&self, source: &str, request: &MinifyRequest) -> Result<MinifyOutput, TransformError> {
        if !request.minify {
            return Ok(MinifyOutput {
                code: source.to_string(),
            });
        }
        let code = collapse_whitespace(&strip_comments(source));
        Ok(MinifyOutput { code })
    }
}

// ---------------------------------------------------------------------------
// Comment stripping
// ---------------------------------------------------------------------------

enum Scan {
    Code,
    SlashSeen,
    Str { quote: char, escaped: bool },
    LineComment,
    BlockComment { star_seen: bool },
}

/// Remove `// ...` and `/* ... */` comments, leaving string and template
/// literal contents untouched.
fn strip_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut state = Scan::Code;

    for ch in source.chars() {
        state = match state {
            Scan::Code => match ch {
                '/' => Scan::SlashSeen,
                '"' | '\'' | '`' => {
                    out.push(ch);
                    Scan::Str {
                        quote: ch,
                        escaped: false,
                    }
                }
                _ => {
                    out.push(ch);
                    Scan::Code
                }
            },
            Scan::SlashSeen => match ch {
                '/' => Scan::LineComment,
                '*' => Scan::BlockComment { star_seen: false },
                _ => {
                    // Division or a regex literal head. Emit the withheld
                    // slash plus the current char and resume.
                    out.push('/');
                    out.push(ch);
                    match ch {
                        '"' | '\'' | '`' => Scan::Str {
                            quote: ch,
                            escaped: false,
                        },
                        _ => Scan::Code,
                    }
                }
            },
            Scan::Str { quote, escaped } => {
                out.push(ch);
                if escaped {
                    Scan::Str {
                        quote,
                        escaped: false,
                    }
                } else if ch == '\\' {
                    Scan::Str {
                        quote,
                        escaped: true,
                    }
                } else if ch == quote {
                    Scan::Code
                } else {
                    Scan::Str {
                        quote,
                        escaped: false,
                    }
                }
            }
            Scan::LineComment => {
                if ch == '\n' || ch == '\r' {
                    out.push(ch);
                    Scan::Code
                } else {
                    Scan::LineComment
                }
            }
            Scan::BlockComment { star_seen } => {
                if star_seen && ch == '/' {
                    Scan::Code
                } else {
                    Scan::BlockComment {
                        star_seen: ch == '*',
                    }
                }
            }
        };
    }

    // A trailing lone slash was withheld waiting for a comment opener.
    if matches!(state, Scan::SlashSeen) {
        out.push('/');
    }
    out
}

// ---------------------------------------------------------------------------
// Whitespace collapsing
// ---------------------------------------------------------------------------

/// Drop whitespace runs entirely, re-inserting a single space only where
/// removing it would merge tokens (`const x`, `a + ++b`).
fn collapse_whitespace(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut in_string: Option<char> = None;
    let mut escaped = false;
    let mut pending_space = false;

    for ch in source.chars() {
        if let Some(quote) = in_string {
            out.push(ch);
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == quote {
                in_string = None;
            }
            continue;
        }

        if ch.is_whitespace() {
            pending_space = true;
            continue;
        }

        if pending_space {
            push_boundary_space(&mut out, ch);
            pending_space = false;
        }

        out.push(ch);
        if ch == '"' || ch == '\'' || ch == '`' {
            in_string = Some(ch);
        }
    }
    out
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

fn push_boundary_space(out: &mut String, next: char) {
    let Some(prev) = out.chars().last() else {
        return;
    };
    let merges_words = is_word_char(prev) && is_word_char(next);
    // `a + ++b` must not become `a+++b`.
    let merges_operators = (prev == '+' && next == '+') || (prev == '-' && next == '-');
    if merges_words || merges_operators {
        out.push(' ');
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
    fn strips_line_and_block_comments() {
        let out = strip_comments("var a = 1; // gone\n/* also\ngone */ var b = 2;");
        assert!(!out.contains("gone"));
        assert!(out.contains("var a = 1;"));
        assert!(out.contains("var b = 2;"));
    }

    #[test]
    fn keeps_comment_markers_inside_strings() {
        let out = strip_comments(r#"const u = "https://example.com"; const t = `/* keep */`;"#);
        assert!(out.contains("https://example.com"));
        assert!(out.contains("/* keep */"));
    }

    #[test]
    fn keeps_division_and_regex_heads() {
        let out = strip_comments(r#"const a = x / y; const ok = /ab/.test("z");"#);
        assert!(out.contains("x / y"));
        assert!(out.contains("/ab/.test"));
    }

    #[test]
    fn escaped_quote_does_not_end_string() {
        let out = strip_comments(r#"const s = "a\"b // still string";"#);
        assert!(out.contains(r#"a\"b // still string"#));
    }

    #[test]
    fn collapses_whitespace_outside_strings() {
        assert_eq!(
            collapse_whitespace("function foo ( x ) { return x + 1 ; }"),
            "function foo(x){return x+1;}"
        );
    }

    #[test]
    fn preserves_string_whitespace() {
        assert_eq!(
            collapse_whitespace(r#"warn( "two  words" )"#),
            r#"warn("two  words")"#
        );
    }

    #[test]
    fn keeps_spaces_that_merge_operators() {
        assert_eq!(collapse_whitespace("a + ++b"), "a+ ++b");
        assert_eq!(collapse_whitespace("a - --b"), "a- --b");
    }

    #[test]
    fn keeps_keyword_boundaries() {
        assert_eq!(
            collapse_whitespace("const stored = localStorage.getItem(\"importmap\");"),
            "const stored=localStorage.getItem(\"importmap\");"
        );
        assert_eq!(
            collapse_whitespace("return await response.json();"),
            "return await response.json();"
        );
    }

    #[test]
    fn minify_request_false_is_passthrough() {
        let source = "var  a  =  1; // comment";
        let out = EsMinifier
            .minify(source, &MinifyRequest { minify: false })
            .unwrap();
        assert_eq!(out.code, source);
    }

    #[test]
    fn minify_is_deterministic() {
        let source = "(async () => {\n  await doThing();\n})();\n// done\n";
        let a = EsMinifier
            .minify(source, &MinifyRequest { minify: true })
            .unwrap();
        let b = EsMinifier
            .minify(source, &MinifyRequest { minify: true })
            .unwrap();
        assert_eq!(a.code, b.code);
        assert_eq!(a.code, "(async()=>{await doThing();})();");
    }
}
