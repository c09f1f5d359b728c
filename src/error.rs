//! Error types.
//!
//! Resolution never fails: an unknown or unmatched section is just empty.
//! Errors only come from the edges, when a route pattern does not compile or
//! when configuration names something the application does not know.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A route pattern that cannot be compiled.
#[derive(Debug, Error)]
pub enum PatternError {
    /// `:` not followed by a parameter name.
    #[error("empty parameter name at byte {position} in `{pattern}`")]
    EmptyParamName { pattern: String, position: usize },

    /// Custom regex groups are not supported.
    #[error("unsupported group at byte {position} in `{pattern}`")]
    UnsupportedGroup { pattern: String, position: usize },

    /// Two parameters share a name.
    #[error("duplicate parameter `{name}` in `{pattern}`")]
    DuplicateParam { pattern: String, name: String },

    #[error("compiled pattern for `{pattern}` is invalid: {source}")]
    Regex {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Configuration could not be read or parsed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Host construction failed.
#[derive(Debug, Error)]
pub enum HostError {
    /// A section name from configuration is not one the application defines.
    #[error("unknown section `{0}`")]
    UnknownSection(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Pattern(#[from] PatternError),
}
