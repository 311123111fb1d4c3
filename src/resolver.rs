//! Resolver source validation.
//!
//! The resolver crosses an environment boundary: its literal source text
//! is inlined into the bootstrap and re-parsed standalone in the browser.
//! Only source shaped like a free-standing function expression or a
//! parenthesized-parameter arrow function survives that round trip.
//! Method shorthand (`{ foo() {} }.foo` serializes to `foo() {}`) does
//! not — re-parsed on its own it is a syntax error — so it is rejected at
//! build time rather than shipped broken.
//!
//! One coincidence is accepted on purpose: a shorthand method literally
//! named `function` serializes to `function() {}`, which is
//! indistinguishable from a normal function expression head. Tests pin
//! that edge down so it does not get "fixed" by accident.

use crate::TransformError;

/// Validate that `source` is the text of a standalone function expression
/// or arrow function: an optional `async ` qualifier followed by either
/// `function` at a word boundary or a parenthesized parameter list whose
/// matching `)` is followed by `=>`.
///
/// Success leaves the source untouched; it is embedded verbatim and
/// invoked with zero arguments at runtime.
pub fn validate_resolver_source(source: &str) -> Result<(), TransformError> {
    if is_function_expression(source) || is_parenthesized_arrow(source) {
        Ok(())
    } else {
        Err(TransformError::InvalidResolverSyntax {
            source_text: source.lines().next().unwrap_or_default().trim().to_string(),
        })
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// Strip a leading `async` qualifier. The qualifier must be followed by
/// whitespace — `async()` is an ordinary call head, not a qualifier.
fn strip_async(source: &str) -> &str {
    let trimmed = source.trim_start();
    if let Some(rest) = trimmed.strip_prefix("async") {
        if rest.starts_with(char::is_whitespace) {
            return rest.trim_start();
        }
    }
    trimmed
}

fn is_function_expression(source: &str) -> bool {
    match strip_async(source).strip_prefix("function") {
        // Word boundary: `function (`, `function name(`, `function*` — but
        // not `functionA(`.
        Some(rest) => !rest.starts_with(is_ident_char),
        None => false,
    }
}

fn is_parenthesized_arrow(source: &str) -> bool {
    let rest = strip_async(source);
    if !rest.starts_with('(') {
        return false;
    }
    match skip_parenthesized(rest) {
        Some(after_params) => after_params.trim_start().starts_with("=>"),
        None => false,
    }
}

/// Return the text after the parenthesized group opening at the start of
/// `source`, or `None` if it never closes. Parens inside string literals
/// (with escape handling) do not count toward nesting.
fn skip_parenthesized(source: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, ch) in source.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == q {
                quote = None;
            }
            continue;
        }
        match ch {
            '"' | '\'' | '`' => quote = Some(ch),
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&source[i + 1..]);
                }
            }
            _ => {}
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
