//! Property-based testing for bracefmt
//!
//! Uses proptest to fuzz the scanner, the path grammar and the specifier
//! interpreter.

use bracefmt::{format, format_number};
use proptest::prelude::*;
use serde_json::{json, Map, Value};

proptest! {
    /// Property: formatting never panics, whatever the template
    #[test]
    fn test_format_never_panics(template in ".*") {
        let args = [json!({"a": [1, 2]}), json!(3.5), json!("s")];
        let _ = format(&template, &args);
    }

    /// Property: text without braces comes back unchanged
    #[test]
    fn test_brace_free_template_is_identity(template in "[^{}]*") {
        prop_assert_eq!(format(&template, &[json!(1)]).unwrap(), template);
    }

    /// Property: escaped braces always collapse to a single brace
    #[test]
    fn test_escapes_collapse(text in "[a-z ]{0,10}") {
        let template = format!("{{{{{}}}}}", text);
        prop_assert_eq!(format(&template, &[]).unwrap(), format!("{{{}}}", text));
    }

    /// Property: simple identifiers resolve to their string value
    #[test]
    fn test_named_lookup(key in "[a-z_][a-z0-9_]{0,12}", value in "[A-Za-z]{1,12}") {
        let mut fields = Map::new();
        fields.insert(key.clone(), json!(value.clone()));
        let args = [Value::Object(fields)];
        let template = format!("<{{{}}}>", key);
        prop_assert_eq!(format(&template, &args).unwrap(), format!("<{}>", value));
    }

    /// Property: padded output is never shorter than the width
    #[test]
    fn test_width_is_a_minimum(
        value in -1.0e9f64..1.0e9,
        flags in "[+\\-0#]{0,3}",
        width in 0usize..30,
        kind in prop::sample::select(vec!["", "d", "x", "X", "b", "o", "f"]),
    ) {
        let specifier = format!("{}{}{}", flags, width, kind);
        let out = format_number(value, Some(&specifier));
        prop_assert!(out.len() >= width);
    }

    /// Property: the `+` flag signs every non-negative decimal
    #[test]
    fn test_plus_flag_signs(value in 0.0f64..1.0e12) {
        prop_assert!(format_number(value, Some("+d")).starts_with('+'));
    }

    /// Property: `d` matches the floored integer
    #[test]
    fn test_decimal_floors(value in -1.0e12f64..1.0e12) {
        prop_assert_eq!(format_number(value, Some("d")), format!("{}", value.floor() as i64));
    }
}
