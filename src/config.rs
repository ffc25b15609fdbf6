//! Formatter configuration
//!
//! ```yaml
//! falsy: blank   # or: render
//! cache: true   # default: false
//! cache_capacity: 256
//! ```
//!
//! Every key is optional; missing keys take the defaults below.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::FormatError;

/// What to print for a resolved value that is zero, `false` or empty
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FalsyPolicy {
    /// `0`, `false`, `""`, `null` and missing values all print as nothing
    #[default]
    Blank,
    /// Only `null` and missing values print as nothing
    Render,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FormatterConfig {
    #[serde(default)]
    pub falsy: FalsyPolicy,

    /// Keep scanned templates for reuse
    #[serde(default)]
    pub cache: bool,

    /// Templates kept before the cache is cleared
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

fn default_cache_capacity() -> usize {
    256
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            falsy: FalsyPolicy::default(),
            cache: false,
            cache_capacity: default_cache_capacity(),
        }
    }
}

impl FormatterConfig {
    pub fn from_yaml(content: &str) -> Result<Self, FormatError> {
        // An empty document deserializes to unit, not to a map
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(content).map_err(|e| FormatError::Config {
            reason: format!("Failed to parse config: {}", e),
        })
    }

    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FormatError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| FormatError::Config {
            reason: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        Self::from_yaml(&content)
    }

    pub fn with_falsy(mut self, falsy: FalsyPolicy) -> Self {
        self.falsy = falsy;
        self
    }

    pub fn with_cache(mut self, cache: bool) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }
}
