//! Token and condition translators shared by the construct rules

use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    /// Upper-case legacy word, optionally dashed (WS-AMOUNT, TOTAL, I)
    static ref LEGACY_WORD: Regex = Regex::new(r"\b[A-Z][A-Z0-9-]*\b").unwrap();
    static ref IDENTIFIER: Regex = Regex::new(r"(?i)^[A-Z][A-Z0-9-]*$").unwrap();
    static ref NUMERIC: Regex = Regex::new(r"^-?\d+(\.\d+)?$").unwrap();
    static ref SPACED_EQUALS: Regex = Regex::new(r"\s=\s").unwrap();
    static ref SPACED_AND: Regex = Regex::new(r"(?i)\sAND\s").unwrap();
    static ref SPACED_OR: Regex = Regex::new(r"(?i)\sOR\s").unwrap();
    static ref NOT_KEYWORD: Regex = Regex::new(r"(?i)\bNOT\b").unwrap();
    static ref ZERO: Regex = Regex::new(r"(?i)^ZERO(S|ES)?$").unwrap();
    static ref SPACES: Regex = Regex::new(r"(?i)^SPACES?$").unwrap();
    static ref RANGE_OR_CONNECTIVE: Regex = Regex::new(r"(?i)\bTHRU\b|\bAND\b|\bOR\b").unwrap();
}

/// `WS-AMOUNT` -> `wsAmount`, `AMOUNT` -> `amount`
pub fn to_js_identifier(legacy_name: &str) -> String {
    let lower = legacy_name.to_lowercase();
    let mut parts = lower.split('-');
    let mut out = parts.next().unwrap_or_default().to_string();
    for part in parts {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

pub fn is_numeric_literal(token: &str) -> bool {
    NUMERIC.is_match(token)
}

pub fn is_identifier(token: &str) -> bool {
    IDENTIFIER.is_match(token)
}

/// camelCase every upper-case legacy word in an expression, leaving the rest
pub fn camelize_words(expr: &str) -> String {
    LEGACY_WORD
        .replace_all(expr, |caps: &Captures| to_js_identifier(&caps[0]))
        .into_owned()
}

/// Translate a legacy condition into a JS boolean expression.
///
/// Operators are rewritten before identifiers so `AND`/`OR` never reach the
/// identifier mapping.
pub fn translate_condition(condition: &str) -> String {
    let c = condition.trim().replace("<>", "!==");
    let c = SPACED_EQUALS.replace_all(&c, " === ");
    let c = SPACED_AND.replace_all(&c, " && ");
    let c = SPACED_OR.replace_all(&c, " || ");
    camelize_words(&c)
}

/// True if the condition uses NOT, which the translation only partially handles
pub fn contains_negation(condition: &str) -> bool {
    NOT_KEYWORD.is_match(condition)
}

/// Translate a statement operand. Returns `None` when the token is not recognized.
pub fn translate_operand(token: &str) -> Option<String> {
    let t = token.trim();

    if ZERO.is_match(t) {
        return Some("0".to_string());
    }
    if SPACES.is_match(t) {
        return Some("\"\"".to_string());
    }
    if is_numeric_literal(t) {
        return Some(t.to_string());
    }
    if is_identifier(t) {
        return Some(to_js_identifier(t));
    }
    None
}

/// Translate the value of a branch arm into a `case` label
pub fn translate_branch_value(value: &str) -> String {
    let t = value.trim();

    if is_numeric_literal(t) {
        return t.to_string();
    }

    let quoted = t.len() >= 2
        && ((t.starts_with('"') && t.ends_with('"')) || (t.starts_with('\'') && t.ends_with('\'')));
    if quoted {
        return t.to_string();
    }

    if is_identifier(t) {
        return to_js_identifier(t);
    }

    // Unknown shape: emit as a string literal
    serde_json::to_string(t).unwrap_or_else(|_| format!("\"{}\"", t))
}

/// Arms with ranges, comparisons or boolean connectives need manual review
pub fn is_complex_branch_arm(raw: &str) -> bool {
    RANGE_OR_CONNECTIVE.is_match(raw) || raw.contains(['<', '>', '='])
}
