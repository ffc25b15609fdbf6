//! bracefmt - brace-placeholder string formatting
//!
//! ```
//! use serde_json::json;
//!
//! let out = bracefmt::format("{name} owes {0.total:+08.2d}", &[json!({"name": "Ada", "total": 42})]).unwrap();
//! assert_eq!(out, "Ada owes +0042.00");
//! ```

pub mod config;
pub mod error;
pub mod path;
pub mod render;
pub mod specifier;
pub mod template;

pub use config::{FalsyPolicy, FormatterConfig};
pub use error::{FixSuggestion, FormatError};
pub use path::{Path, Segment};
pub use specifier::{format_number, Specifier};
pub use template::{format, Formatter, Token};
