//! Numeric-with-unit values.
//!
//! Parsing follows `parseFloat` prefix rules: leading whitespace is skipped,
//! the longest valid float prefix becomes the number, and the unit is what is
//! left after stripping the leading run of `[0-9.+-]` and any whitespace.
//! A string without a numeric prefix parses to `NaN`, which callers treat as
//! "not absolute".

use serde::{Deserialize, Serialize};

/// Raw user input for a position or property bound: either a JS-style number or a string.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        RawValue::Number(v)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Text(s)
    }
}

/// A parsed `{ value, unit }` pair. `unit` may be empty.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnchorValue {
    pub value: f64,
    pub unit: String,
}

impl AnchorValue {
    pub fn new(value: f64, unit: impl Into<String>) -> Self {
        Self {
            value,
            unit: unit.into(),
        }
    }

    /// Pixel value, as produced by anchor resolution.
    pub fn px(value: f64) -> Self {
        Self::new(value, "px")
    }

    #[inline]
    pub fn is_absolute(&self) -> bool {
        !self.value.is_nan()
    }
}

/// Parse a raw value into number + unit. Never fails; a missing number yields `NaN`.
pub fn parse(raw: &RawValue) -> AnchorValue {
    match raw {
        // String(n) of a JS number never carries a unit.
        RawValue::Number(n) => AnchorValue::new(*n, ""),
        RawValue::Text(s) => parse_str(s),
    }
}

/// String form of [`parse`].
pub fn parse_str(s: &str) -> AnchorValue {
    let value = parse_float_prefix(s);
    let unit = s
        .trim_start_matches(|c: char| c.is_ascii_digit() || matches!(c, '.' | '-' | '+'))
        .trim_start();
    AnchorValue::new(value, unit)
}

/// True when the value carries a usable number.
pub fn is_absolute(raw: &RawValue) -> bool {
    parse(raw).is_absolute()
}

/// True for relative anchor expressions shaped like `word-word` (lowercase ASCII).
pub fn is_relative(raw: &RawValue) -> bool {
    match raw {
        RawValue::Number(_) => false,
        RawValue::Text(s) => match s.split_once('-') {
            Some((head, tail)) => is_lower_word(head) && is_lower_word(tail),
            None => false,
        },
    }
}

fn is_lower_word(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_lowercase())
}

/// Longest float prefix of `s` (after leading whitespace), or `NaN`.
fn parse_float_prefix(s: &str) -> f64 {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    if s[end..].starts_with("Infinity") {
        return if bytes[0] == b'-' {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return f64::NAN;
    }

    // Exponent only counts when at least one digit follows.
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().unwrap_or(f64::NAN)
}

/// Most decimal places an `f64` can carry; larger precisions are capped to it.
pub const MAX_PRECISION: u32 = 15;

/// Round to `precision` decimal places with JS `Math.round` semantics (ties toward +inf).
pub fn round_to(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision.min(MAX_PRECISION) as i32);
    // `+ 0.0` folds -0 into 0 so it never prints as "-0".
    ((value * factor + 0.5).floor() / factor) + 0.0
}

/// Render a number the way a style string expects it: no trailing `.0`.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else {
        format!("{}", value + 0.0)
    }
}
