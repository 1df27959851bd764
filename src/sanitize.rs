//! Escaping for user text placed into HTML and `<script>` bodies, and
//! validation of user-supplied CSS values before they reach a stylesheet.
//!
//! CSS values come straight from the style config (colours, gradients) and
//! are interpolated into `prop: value !important;` declarations, so anything
//! that could terminate the declaration or pull in remote content is
//! rejected.

use log::warn;

// ---------------------------------------------------------------------------
// HTML
// ---------------------------------------------------------------------------

/// Escape the five HTML special characters.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Make serialized JSON safe to embed as the text of a `<script>` element.
///
/// `<`, `>` and `&` only ever occur inside JSON strings, where the `\uXXXX`
/// forms decode to the same characters.
pub fn escape_json_for_script(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for ch in json.chars() {
        match ch {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            _ => out.push(ch),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// CSS values
// ---------------------------------------------------------------------------

const FORBIDDEN_CHARS: &[char] = &[';', '{', '}', '<', '>', '\\'];

const FORBIDDEN_PATTERNS: &[&str] = &[
    "url(",
    "expression(",
    "javascript:",
    "@import",
    "behavior:",
    "-moz-binding",
];

/// Check a CSS value for anything that could escape its declaration.
pub fn check_css_value(value: &str) -> Result<(), String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("Empty CSS value".to_string());
    }

    if let Some(ch) = trimmed.chars().find(|c| FORBIDDEN_CHARS.contains(c)) {
        return Err(format!("Forbidden character '{ch}' in CSS value '{trimmed}'"));
    }

    let lower = trimmed.to_ascii_lowercase();
    for pattern in FORBIDDEN_PATTERNS {
        if lower.contains(pattern) {
            return Err(format!(
                "Forbidden pattern '{pattern}' in CSS value '{trimmed}'"
            ));
        }
    }

    Ok(())
}

/// Return `value` trimmed when it passes [`check_css_value`], otherwise
/// `fallback`. `field` names the style path for the log line.
pub fn sanitize_css_value(field: &str, value: &str, fallback: &str) -> String {
    match check_css_value(value) {
        Ok(()) => value.trim().to_string(),
        Err(reason) => {
            warn!("Rejected value for {field}: {reason}");
            fallback.to_string()
        }
    }
}

/// Quote a template id for use inside a CSS attribute selector
/// (`[data-template="..."]`).
///
/// Characters that could end the `<style>` element or the rule are written
/// as six-digit hex escapes, so the selector still matches the literal id.
pub fn escape_css_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '"' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            '\n' | '\r' | '<' | '>' | '{' | '}' | ';' => {
                out.push_str(&format!("\\{:06x}", ch as u32));
            }
            _ => out.push(ch),
        }
    }
    out
}

/// Inverse of [`escape_css_string`] for the body of a quoted CSS string.
/// Handles both single-character and hex escapes.
pub fn unescape_css_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let mut hex = String::new();
        while hex.len() < 6 {
            match chars.peek() {
                Some(h) if h.is_ascii_hexdigit() => {
                    hex.push(*h);
                    chars.next();
                }
                _ => break,
            }
        }
        if hex.is_empty() {
            if let Some(next) = chars.next() {
                out.push(next);
            }
            continue;
        }
        if hex.len() < 6 && chars.peek().is_some_and(|w| w.is_whitespace()) {
            chars.next();
        }
        let decoded = u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32);
        out.push(decoded.unwrap_or(char::REPLACEMENT_CHARACTER));
    }
    out
}
