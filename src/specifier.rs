//! Numeric format specifiers: `[flags][width][.precision][type]`
//!
//! - flags: any of `+` (sign non-negative values), `-` (left-align),
//!   `0` (zero-fill after the sign), `#` (accepted, no effect)
//! - width: minimum result length
//! - precision: minimum count of fractional digits, filled with `0`
//! - type: `d` `x` `X` `b` `o` `f` `F`; anything else renders the default form
//!
//! Integer types floor the value first. Precision pads but never truncates.

use once_cell::sync::Lazy;
use regex::Regex;

static SPECIFIER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^([+\-#0]*)([0-9]*)(?:\.([0-9]+))?(.*)$").unwrap());

/// Widths and precisions above this are dropped instead of allocating the padding
pub const MAX_PADDING: usize = 1 << 20;

/// Largest magnitude that still floors into an `i128`
const MAX_INTEGRAL: f64 = 1.7e38;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags {
    pub plus: bool,
    pub minus: bool,
    pub alternate: bool,
    pub zero: bool,
}

impl Flags {
    fn parse(flags: &str) -> Self {
        let mut parsed = Self::default();
        for ch in flags.chars() {
            match ch {
                '+' => parsed.plus = true,
                '-' => parsed.minus = true,
                '#' => parsed.alternate = true,
                '0' => parsed.zero = true,
                _ => {}
            }
        }
        parsed
    }
}

/// Presentation type of a specifier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Kind {
    /// `d`
    Decimal,
    /// `x`
    LowerHex,
    /// `X`
    UpperHex,
    /// `b`
    Binary,
    /// `o`
    Octal,
    /// `f` / `F`
    Fixed,
    /// Empty or unrecognized (`e`, `g` and friends land here)
    #[default]
    Default,
}

impl Kind {
    pub fn from_code(code: &str) -> Self {
        match code {
            "d" => Kind::Decimal,
            "x" => Kind::LowerHex,
            "X" => Kind::UpperHex,
            "b" => Kind::Binary,
            "o" => Kind::Octal,
            "f" | "F" => Kind::Fixed,
            _ => Kind::Default,
        }
    }
}

/// A parsed numeric format specifier
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Specifier {
    pub flags: Flags,
    pub width: Option<usize>,
    pub precision: Option<usize>,
    pub kind: Kind,
}

impl Specifier {
    /// Parse a specifier. Never fails: unknown trailing text selects the default type.
    ///
    /// Width or precision above [`MAX_PADDING`] is dropped.
    pub fn parse(specifier: &str) -> Self {
        let Some(caps) = SPECIFIER_RE.captures(specifier) else {
            return Self::default();
        };

        let digits = |i: usize| {
            caps.get(i)
                .and_then(|m| m.as_str().parse::<usize>().ok())
                .filter(|n| *n <= MAX_PADDING)
        };

        Self {
            flags: Flags::parse(caps.get(1).map_or("", |m| m.as_str())),
            width: digits(2),
            precision: digits(3),
            kind: Kind::from_code(caps.get(4).map_or("", |m| m.as_str())),
        }
    }

    /// Render a number with this specifier
    pub fn apply(&self, value: f64) -> String {
        let mut result = if !value.is_finite() {
            number_to_string(value)
        } else {
            match self.kind {
                Kind::Decimal => self.apply_precision(floor_digits(value, self.kind)),
                Kind::LowerHex | Kind::Binary | Kind::Octal => floor_digits(value, self.kind),
                Kind::UpperHex => floor_digits(value, self.kind).to_uppercase(),
                Kind::Fixed | Kind::Default => self.apply_precision(number_to_string(value)),
            }
        };

        if self.flags.plus && value >= 0.0 {
            result.insert(0, '+');
        }

        self.pad(result)
    }

    /// Append fractional zeros until `precision` digits follow the decimal point
    fn apply_precision(&self, mut result: String) -> String {
        let Some(precision) = self.precision else {
            return result;
        };

        let after_decimal = result.split_once('.').map_or(0, |(_, frac)| frac.len());
        if precision > after_decimal {
            if !result.contains('.') {
                result.push('.');
            }
            result.push_str(&"0".repeat(precision - after_decimal));
        }
        result
    }

    fn pad(&self, result: String) -> String {
        let Some(width) = self.width else {
            return result;
        };
        if result.len() >= width {
            return result;
        }

        let missing = width - result.len();
        if self.flags.minus {
            return result + &" ".repeat(missing);
        }

        if self.flags.zero {
            let padding = "0".repeat(missing);
            if let Some(sign @ ('+' | '-')) = result.chars().next() {
                return format!("{sign}{padding}{}", &result[1..]);
            }
            return padding + &result;
        }

        " ".repeat(missing) + &result
    }
}

/// Format a number with an optional specifier
///
/// Example: `format_number(5.0, Some("08.2d"))` → `"00005.00"`
pub fn format_number(value: f64, specifier: Option<&str>) -> String {
    match specifier {
        None | Some("") => number_to_string(value),
        Some(specifier) => Specifier::parse(specifier).apply(value),
    }
}

/// Default decimal text of a number
///
/// Shortest round-trip digits, no exponent, `-0` as `0`,
/// non-finite values as `NaN`, `Infinity`, `-Infinity`.
pub fn number_to_string(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        let text = if value > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    }
}

/// Floor a finite value and write it in the radix of `kind`
fn floor_digits(value: f64, kind: Kind) -> String {
    let floored = value.floor();
    if floored.abs() >= MAX_INTEGRAL {
        return number_to_string(floored);
    }

    let floored = floored as i128;
    let sign = if floored < 0 { "-" } else { "" };
    let magnitude = floored.unsigned_abs();
    match kind {
        Kind::LowerHex | Kind::UpperHex => format!("{sign}{magnitude:x}"),
        Kind::Binary => format!("{sign}{magnitude:b}"),
        Kind::Octal => format!("{sign}{magnitude:o}"),
        _ => format!("{sign}{magnitude}"),
    }
}
