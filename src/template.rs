//! Single-pass template scanner and formatter with caching
//!
//! Template syntax:
//! - `{path}` or `{path:specifier}` is a placeholder
//! - `{path:{other}}` takes its specifier from another argument
//! - `{{` and `}}` are literal braces; a lone `}` passes through
//!
//! The free [`format`] scans on every call and keeps nothing between calls.
//! A [`Formatter`] can opt into a bounded cache of scanned templates behind
//! an `Arc`, so repeated formatting of the same template only pays for path
//! lookups and rendering.

use std::borrow::Cow;
use std::ops::Range;
use std::sync::Arc;

use dashmap::DashMap;
use serde_json::Value;
use tracing::{debug, instrument, trace};

use crate::config::{FalsyPolicy, FormatterConfig};
use crate::error::FormatError;
use crate::path::Path;
use crate::render::{render, to_text};
use crate::specifier;

/// Token representing a parsed template fragment
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Literal text (range in the original string, `}}` still uncollapsed)
    Literal(Range<usize>),
    /// Escaped `{{`
    LeftBrace,
    /// `{path}` or `{path:specifier}`
    Placeholder {
        path: Path,
        specifier: Option<SpecifierSource>,
    },
}

/// Where a placeholder's specifier comes from
#[derive(Debug, Clone, PartialEq)]
pub enum SpecifierSource {
    /// Written inline: `{0:+05d}`
    Literal(String),
    /// Looked up at format time: `{0:{1}}`
    Path(Path),
}

impl SpecifierSource {
    fn parse(text: &str) -> Result<Self, FormatError> {
        match text.strip_prefix('{').and_then(|t| t.strip_suffix('}')) {
            Some(inner) => Ok(SpecifierSource::Path(Path::parse(inner)?)),
            None => Ok(SpecifierSource::Literal(text.to_string())),
        }
    }

    fn resolve<'a>(&'a self, args: &'a [Value]) -> Option<Cow<'a, str>> {
        match self {
            SpecifierSource::Literal(text) => Some(Cow::Borrowed(text)),
            SpecifierSource::Path(path) => path.resolve(args).map(|value| match value {
                Cow::Borrowed(Value::String(s)) => Cow::Borrowed(s.as_str()),
                other => Cow::Owned(to_text(&other)),
            }),
        }
    }
}

/// Split a template into tokens
///
/// Identifier and specifier paths are parsed here, so a bad identifier
/// anywhere in the template fails before any output is produced.
pub fn scan(template: &str) -> Result<Vec<Token>, FormatError> {
    let mut tokens = Vec::new();
    let mut pos = 0;

    while let Some(offset) = template[pos..].find('{') {
        let open = pos + offset;
        if open > pos {
            tokens.push(Token::Literal(pos..open));
        }

        if template.as_bytes().get(open + 1) == Some(&b'{') {
            tokens.push(Token::LeftBrace);
            pos = open + 2;
            continue;
        }

        let start = open + 1;
        let rest = &template[start..];
        let bytes = rest.as_bytes();
        let Some(mut close) = rest.find('}') else {
            // No closer: all but the last character is the identifier,
            // and the text after '{' is scanned again as literal
            let identifier = rest.char_indices().last().map_or("", |(i, _)| &rest[..i]);
            tokens.push(Token::Placeholder {
                path: Path::parse(identifier)?,
                specifier: None,
            });
            pos = start;
            continue;
        };

        let (identifier, specifier) = match rest.find(':') {
            Some(colon) if colon < close => {
                // {path:{other}} - the first '}' closes the nested placeholder
                if bytes.get(colon + 1) == Some(&b'{') && bytes.get(close + 1) == Some(&b'}') {
                    close += 1;
                }
                (&rest[..colon], Some(&rest[colon + 1..close]))
            }
            _ => (&rest[..close], None),
        };

        tokens.push(Token::Placeholder {
            path: Path::parse(identifier)?,
            specifier: specifier.map(SpecifierSource::parse).transpose()?,
        });
        pos = start + close + 1;
    }

    if pos < template.len() {
        tokens.push(Token::Literal(pos..template.len()));
    }

    Ok(tokens)
}

/// Append literal text, collapsing each `}}` to `}`
fn push_literal(out: &mut String, text: &str) {
    let mut rest = text;
    while let Some(i) = rest.find("}}") {
        out.push_str(&rest[..=i]);
        rest = &rest[i + 2..];
    }
    out.push_str(rest);
}

/// Render scanned tokens against the arguments
pub fn render_tokens(template: &str, tokens: &[Token], args: &[Value], falsy: FalsyPolicy) -> String {
    let mut result = String::with_capacity(template.len() + 32);

    for token in tokens {
        match token {
            Token::Literal(range) => push_literal(&mut result, &template[range.clone()]),
            Token::LeftBrace => result.push('{'),
            Token::Placeholder { path, specifier } => {
                let value = path.resolve(args);
                let specifier = specifier.as_ref().and_then(|s| s.resolve(args));
                trace!(%path, found = value.is_some(), specifier = ?specifier, "Resolved placeholder");

                result.push_str(&render(value.as_deref(), specifier.as_deref(), falsy));
            }
        }
    }

    result
}

/// Template formatter with an optional bounded cache
pub struct Formatter {
    config: FormatterConfig,
    /// Cache of scanned templates
    cache: DashMap<String, Arc<Vec<Token>>>,
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter {
    pub fn new() -> Self {
        Self::with_config(FormatterConfig::default())
    }

    pub fn with_config(config: FormatterConfig) -> Self {
        Self {
            config,
            cache: DashMap::new(),
        }
    }

    pub fn config(&self) -> &FormatterConfig {
        &self.config
    }

    /// Parse template into tokens (cached when the config enables it)
    ///
    /// Failed scans are not cached. A full cache is cleared before the next insert.
    pub fn tokenize(&self, template: &str) -> Result<Arc<Vec<Token>>, FormatError> {
        if self.config.cache {
            if let Some(cached) = self.cache.get(template) {
                return Ok(Arc::clone(&cached));
            }
        }

        let tokens = Arc::new(scan(template)?);
        debug!(tokens = tokens.len(), "Scanned template");

        if self.config.cache && self.config.cache_capacity > 0 {
            if self.cache.len() >= self.config.cache_capacity {
                debug!(capacity = self.config.cache_capacity, "Template cache full, clearing");
                self.cache.clear();
            }
            self.cache.insert(template.to_string(), Arc::clone(&tokens));
        }
        Ok(tokens)
    }

    /// Substitute every placeholder in `template` from `args`
    #[instrument(skip(self, args), fields(template_len = template.len()))]
    pub fn format(&self, template: &str, args: &[Value]) -> Result<String, FormatError> {
        let tokens = self.tokenize(template)?;
        Ok(render_tokens(template, &tokens, args, self.config.falsy))
    }

    pub fn format_number(&self, value: f64, specifier: Option<&str>) -> String {
        specifier::format_number(value, specifier)
    }

    /// Number of templates currently cached
    pub fn cached_templates(&self) -> usize {
        self.cache.len()
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

/// Format with default settings; nothing outlives the call
pub fn format(template: &str, args: &[Value]) -> Result<String, FormatError> {
    let tokens = scan(template)?;
    Ok(render_tokens(template, &tokens, args, FalsyPolicy::default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cached(capacity: usize) -> Formatter {
        Formatter::with_config(FormatterConfig::default().with_cache(true).with_cache_capacity(capacity))
    }

    fn path(s: &str) -> Path {
        Path::parse(s).unwrap()
    }

    #[test]
    fn test_scan_simple_literal() {
        let tokens = scan("simple text").unwrap();
        assert_eq!(tokens, vec![Token::Literal(0..11)]);
    }

    #[test]
    fn test_scan_placeholder() {
        let tokens = scan("a{0}b").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Literal(0..1),
                Token::Placeholder {
                    path: path("0"),
                    specifier: None
                },
                Token::Literal(4..5),
            ]
        );
    }

    #[test]
    fn test_scan_specifier() {
        let tokens = scan("{0:+06.2d}").unwrap();
        assert_eq!(
            tokens,
            vec![Token::Placeholder {
                path: path("0"),
                specifier: Some(SpecifierSource::Literal("+06.2d".to_string())),
            }]
        );
    }

    #[test]
    fn test_scan_nested_specifier() {
        let tokens = scan("{0:{1}}!").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Placeholder {
                    path: path("0"),
                    specifier: Some(SpecifierSource::Path(path("1"))),
                },
                Token::Literal(7..8),
            ]
        );
    }

    #[test]
    fn test_scan_colon_after_close_is_literal() {
        let tokens = scan("{0}:x").unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1], Token::Literal(3..5));
    }

    #[test]
    fn test_scan_escapes() {
        let tokens = scan("{{}}").unwrap();
        assert_eq!(tokens, vec![Token::LeftBrace, Token::Literal(2..4)]);
    }

    #[test]
    fn test_scan_unclosed_placeholder_drops_last_char() {
        let tokens = scan("x{abc").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Literal(0..1),
                Token::Placeholder {
                    path: path("ab"),
                    specifier: None
                },
                Token::Literal(2..5),
            ]
        );
    }

    #[test]
    fn test_scan_unclosed_placeholder_with_empty_identifier() {
        assert_eq!(scan("ab{0").unwrap_err(), FormatError::invalid_identifier(""));
        assert_eq!(scan("a{").unwrap_err(), FormatError::invalid_identifier(""));
    }

    #[test]
    fn test_scan_invalid_specifier_path() {
        let err = scan("{0:{[a.b}}").unwrap_err();
        assert!(matches!(err, FormatError::InvalidIdentifier { .. }));
    }

    #[test]
    fn test_push_literal_collapses_pairs() {
        let mut out = String::new();
        push_literal(&mut out, "a}}b}c}}}");
        assert_eq!(out, "a}b}c}}");
    }

    #[test]
    fn test_cache_reuse() {
        let formatter = cached(8);
        let template = "{0} and {1}";

        let tokens1 = formatter.tokenize(template).unwrap();
        let tokens2 = formatter.tokenize(template).unwrap();

        assert!(Arc::ptr_eq(&tokens1, &tokens2));
        assert_eq!(formatter.cached_templates(), 1);

        formatter.clear_cache();
        assert_eq!(formatter.cached_templates(), 0);
    }

    #[test]
    fn test_cache_disabled_by_default() {
        let formatter = Formatter::new();
        let tokens1 = formatter.tokenize("{0}").unwrap();
        let tokens2 = formatter.tokenize("{0}").unwrap();

        assert!(!Arc::ptr_eq(&tokens1, &tokens2));
        assert_eq!(formatter.cached_templates(), 0);
    }

    #[test]
    fn test_failed_scan_is_not_cached() {
        let formatter = cached(8);
        assert!(formatter.tokenize("{a]}").is_err());
        assert_eq!(formatter.cached_templates(), 0);
    }

    #[test]
    fn test_cache_is_bounded() {
        let formatter = cached(3);
        for i in 0..10 {
            formatter.format(&std::format!("row {i} = {{0}}"), &[json!(i)]).unwrap();
            assert!(formatter.cached_templates() <= 3);
        }
        assert_eq!(formatter.format("row 9 = {0}", &[json!(9)]).unwrap(), "row 9 = 9");
    }

    #[test]
    fn test_free_format_keeps_no_state() {
        for i in 0..5000 {
            let out = format(&std::format!("row {i} = {{0}}"), &[json!("v")]).unwrap();
            assert_eq!(out, std::format!("row {i} = v"));
        }
        assert!(!FormatterConfig::default().cache);
        assert_eq!(Formatter::new().cached_templates(), 0);
    }

    #[test]
    fn test_format_with_render_policy() {
        let formatter = Formatter::with_config(FormatterConfig::default().with_falsy(FalsyPolicy::Render));
        let out = formatter.format("{0}/{1}", &[json!(0), json!(false)]).unwrap();
        assert_eq!(out, "0/false");
        assert_eq!(formatter.config().falsy, FalsyPolicy::Render);
        assert_eq!(formatter.format_number(0.0, Some("03x")), "000");
    }

    #[test]
    fn test_numeric_specifier_from_argument() {
        let out = format("[{0:{1}}]", &[json!(42), json!(6)]).unwrap();
        assert_eq!(out, "[    42]");
    }
}
