//! Value rendering
//!
//! Numbers go through the specifier interpreter. Everything else prints its
//! plain text form and ignores the specifier.

use serde_json::{Number, Value};

use crate::config::FalsyPolicy;
use crate::specifier::{format_number, number_to_string};

/// Render a resolved value (or a missed lookup) to text
pub fn render(value: Option<&Value>, specifier: Option<&str>, falsy: FalsyPolicy) -> String {
    let Some(value) = value else {
        return String::new();
    };

    let blank = match falsy {
        FalsyPolicy::Blank => is_falsy(value),
        FalsyPolicy::Render => value.is_null(),
    };
    if blank {
        return String::new();
    }

    match value {
        Value::Number(n) => format_number(number_value(n), specifier),
        other => to_text(other),
    }
}

/// `null`, `false`, `0`, `NaN` and `""`
pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => {
            let n = number_value(n);
            n == 0.0 || n.is_nan()
        }
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Plain text form of any value
///
/// Arrays join their elements with `,` (nulls print empty), objects print
/// `[object Object]`.
pub fn to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_to_string(number_value(n)),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(to_text).collect::<Vec<_>>().join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

fn number_value(n: &Number) -> f64 {
    n.as_f64().unwrap_or(f64::NAN)
}
