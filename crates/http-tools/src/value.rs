//! Loose JSON value coercions shared by request building and rendering.

use serde_json::{Number, Value};

/// Truthiness as the remote API's clients understand it: `null`, `false`, `0` and `""` are
/// false, everything else (including empty arrays/objects) is true.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// String form of a value for URLs, headers and plain text.
///
/// Arrays are joined with `,`; objects fall back to compact JSON.
pub(crate) fn to_display_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => format_number(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|v| match v {
                Value::Null => String::new(),
                other => to_display_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => value.to_string(),
    }
}

/// Shortest decimal form; integral floats print without a fraction (`12.0` → `12`).
pub(crate) fn format_number(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    n.as_f64().map_or_else(|| n.to_string(), format_f64)
}

pub(crate) fn format_f64(f: f64) -> String {
    if f == 0.0 {
        return "0".to_string();
    }
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e21 {
        return format!("{f:.0}");
    }
    format!("{f}")
}

/// `f` with exactly `digits` fraction digits, ties rounded away from zero (`0.03125` →
/// `0.0313` at four digits).
///
/// Rounds on the exact binary value, so `1.005` stays `1.00` because it is stored below the tie.
pub(crate) fn to_fixed(f: f64, digits: usize) -> String {
    if !f.is_finite() {
        return format!("{f}");
    }
    // 1100 fraction digits hold the full expansion of any finite f64.
    let exact = format!("{:.1100}", f.abs());
    let (int_part, frac_part) = exact.split_once('.').unwrap_or((exact.as_str(), ""));
    let mut kept: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().take(digits))
        .collect();

    if frac_part.as_bytes().get(digits).is_some_and(|d| *d >= b'5') {
        let mut carry = true;
        for d in kept.iter_mut().rev() {
            if *d == b'9' {
                *d = b'0';
            } else {
                *d += 1;
                carry = false;
                break;
            }
        }
        if carry {
            kept.insert(0, b'1');
        }
    }

    let int_len = kept.len() - digits;
    let mut out = String::with_capacity(kept.len() + 2);
    if f < 0.0 {
        out.push('-');
    }
    out.extend(kept[..int_len].iter().map(|d| char::from(*d)));
    if digits > 0 {
        out.push('.');
        out.extend(kept[int_len..].iter().map(|d| char::from(*d)));
    }
    out
}

/// Thousands-grouped form with at most three fraction digits (`1234567.8912` →
/// `1,234,567.891`).
pub(crate) fn group_thousands(f: f64) -> String {
    let fixed = to_fixed(f.abs(), 3);
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let digits = int_part.as_bytes();
    let mut out = String::with_capacity(fixed.len() + digits.len() / 3 + 1);
    if f.is_sign_negative() && (int_part != "0" || !frac_part.is_empty()) {
        out.push('-');
    }
    for (i, d) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(char::from(*d));
    }
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}
