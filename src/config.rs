//! Host Configuration - serde/TOML settings for routing and history.
//!
//! Every field has a default, so an empty document is a valid config.
//!
//! ```toml
//! default_section = "main"
//! root_section = "main"
//! initial_path = "/"
//! basename = "/app"
//! case_sensitive = false
//! strict = false
//! history_limit = 64
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, HostError};
use crate::router::MatchFlags;
use crate::types::SectionName;

/// Settings applied by [`Host`](crate::pipeline::Host) when it is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HostConfig {
    /// Section used by `add_part` when none is given.
    /// `None` falls back to [`SectionName::default_section`].
    pub default_section: Option<String>,
    /// Section mounted by `App::mount`. Falls back to the default section.
    pub root_section: Option<String>,
    /// Location the history starts at.
    pub initial_path: String,
    /// Prefix stripped from every navigated path.
    pub basename: String,
    /// Route matching is case sensitive.
    pub case_sensitive: bool,
    /// A trailing slash is significant when matching.
    pub strict: bool,
    /// Maximum number of history entries kept. `0` keeps everything.
    pub history_limit: usize,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            default_section: None,
            root_section: None,
            initial_path: "/".to_string(),
            basename: String::new(),
            case_sensitive: false,
            strict: false,
            history_limit: 0,
        }
    }
}

impl HostConfig {
    /// Parse a config from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Matching flags shared by every registered part (exactness is per part).
    pub fn match_flags(&self) -> MatchFlags {
        let mut flags = MatchFlags::empty();
        flags.set(MatchFlags::SENSITIVE, self.case_sensitive);
        flags.set(MatchFlags::STRICT, self.strict);
        flags
    }

    /// Resolve `default_section` against the application's section names.
    pub fn default_section<S: SectionName>(&self) -> Result<S, HostError> {
        resolve_section(self.default_section.as_deref())
    }

    /// Resolve `root_section`, falling back to the default section.
    pub fn root_section<S: SectionName>(&self) -> Result<S, HostError> {
        match self.root_section.as_deref() {
            Some(name) => resolve_section(Some(name)),
            None => self.default_section(),
        }
    }
}

fn resolve_section<S: SectionName>(name: Option<&str>) -> Result<S, HostError> {
    match name {
        None => Ok(S::default_section()),
        Some(name) => S::from_name(name).ok_or_else(|| HostError::UnknownSection(name.to_string())),
    }
}
