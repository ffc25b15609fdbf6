//! Error types with fix suggestions

use thiserror::Error;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    // ─────────────────────────────────────────────────────────────
    // Template errors (FMT-010)
    // ─────────────────────────────────────────────────────────────

    #[error("FMT-010: Invalid identifier: {path}")]
    InvalidIdentifier { path: String },

    // ─────────────────────────────────────────────────────────────
    // Config errors (FMT-020)
    // ─────────────────────────────────────────────────────────────

    #[error("FMT-020: Config error: {reason}")]
    Config { reason: String },
}

impl FormatError {
    pub(crate) fn invalid_identifier(path: &str) -> Self {
        FormatError::InvalidIdentifier {
            path: path.to_string(),
        }
    }
}

impl FixSuggestion for FormatError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            FormatError::InvalidIdentifier { .. } => {
                Some("Use keys like {0}, {name}, {0.a.b} or {0[a][b]}; keys cannot contain '.', '[' or ']'. Write '{{' for a literal brace")
            }
            FormatError::Config { .. } => Some("Check the YAML syntax and the falsy/cache keys"),
        }
    }
}
