//! Placeholder path parser and resolver
//!
//! Supports:
//! - `0`, `name` (top-level key)
//! - `0.a.b` (dot notation)
//! - `0[a][b]` (bracket notation, freely mixed with dots)
//!
//! Keys never contain `.`, `[` or `]`. A top-level key that is not an
//! array index is looked up on argument 0, so `{name}` means `{0.name}`.
//!
//! Strings index by character (`{0[0]}` on `"abc"` is `"a"`). Strings and
//! arrays also answer `length`, counted in characters and elements.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::error::FormatError;

/// Leftmost segment: `[key]` or `.key` / `key`, then the unparsed rest
static KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^(?:\[([^.\[\]]+)\]|\.?([^.\[\]]+))(.*)$").unwrap());

/// A parsed path segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Bracketed key: `[key]`
    Bracket(String),
    /// Bare or dotted key: `key` / `.key`
    Dot(String),
}

impl Segment {
    pub fn key(&self) -> &str {
        match self {
            Segment::Bracket(key) | Segment::Dot(key) => key,
        }
    }
}

/// A placeholder identifier split into segments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    /// Parse a path string into segments
    ///
    /// Examples:
    /// - "0.a.b" → [Dot("0"), Dot("a"), Dot("b")]
    /// - "name[first]" → [Dot("name"), Bracket("first")]
    ///
    /// The whole path is validated, even the parts a lookup would never reach.
    /// On failure the error carries the remainder that did not match.
    pub fn parse(path: &str) -> Result<Self, FormatError> {
        let mut segments = Vec::new();
        let mut rest = path;

        loop {
            let caps = KEY_RE
                .captures(rest)
                .ok_or_else(|| FormatError::invalid_identifier(rest))?;

            let segment = match (caps.get(1), caps.get(2)) {
                (Some(key), _) => Segment::Bracket(key.as_str().to_string()),
                (None, Some(key)) => Segment::Dot(key.as_str().to_string()),
                (None, None) => return Err(FormatError::invalid_identifier(rest)),
            };
            segments.push(segment);

            rest = caps.get(3).map_or("", |m| m.as_str());
            if rest.is_empty() {
                break;
            }
        }

        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Walk the path against the argument list
    ///
    /// Returns `None` as soon as a step misses. Values stay borrowed until a
    /// string character or a `length` is produced.
    pub fn resolve<'a>(&self, args: &'a [Value]) -> Option<Cow<'a, Value>> {
        let (first, rest) = self.segments.split_first()?;

        let mut current = if is_index_like(first.key()) {
            Cow::Borrowed(array_index(first.key()).and_then(|index| args.get(index))?)
        } else {
            lookup(Cow::Borrowed(args.first()?), first.key())?
        };

        for segment in rest {
            current = lookup(current, segment.key())?;
        }

        Some(current)
    }
}

impl FromStr for Path {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Bracket(key) => write!(f, "[{key}]")?,
                Segment::Dot(key) if i == 0 => f.write_str(key)?,
                Segment::Dot(key) => write!(f, ".{key}")?,
            }
        }
        Ok(())
    }
}

/// A top-level key made only of digits addresses the argument list itself
fn is_index_like(key: &str) -> bool {
    !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit())
}

/// Canonical array index: digits without leading zeros
fn array_index(key: &str) -> Option<usize> {
    if !is_index_like(key) || (key.len() > 1 && key.starts_with('0')) {
        return None;
    }
    key.parse().ok()
}

fn lookup<'a>(value: Cow<'a, Value>, key: &str) -> Option<Cow<'a, Value>> {
    match value {
        Cow::Borrowed(Value::Object(map)) => map.get(key).map(Cow::Borrowed),
        Cow::Borrowed(Value::Array(items)) => match key {
            "length" => Some(Cow::Owned(Value::from(items.len()))),
            _ => array_index(key).and_then(|index| items.get(index)).map(Cow::Borrowed),
        },
        Cow::Borrowed(Value::String(text)) => string_lookup(text, key).map(Cow::Owned),
        Cow::Owned(Value::String(text)) => string_lookup(&text, key).map(Cow::Owned),
        _ => None,
    }
}

fn string_lookup(text: &str, key: &str) -> Option<Value> {
    match key {
        "length" => Some(Value::from(text.chars().count())),
        _ => array_index(key)
            .and_then(|index| text.chars().nth(index))
            .map(|ch| Value::String(ch.to_string())),
    }
}
