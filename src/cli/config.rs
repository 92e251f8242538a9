//! Output settings read from `~/.jql.toml` and the environment.
//!
//! ```toml
//! monochrome = true
//! compact = false
//! ```

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use super::CliError;

const CONFIG_FILE_NAME: &str = ".jql.toml";
const ENV_MONOCHROME: &str = "JQL_MONOCHROME";
const ENV_COMPACT: &str = "JQL_COMPACT";
const ENV_NO_COLOR: &str = "NO_COLOR";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Never colorize output
    pub monochrome: bool,
    /// Print each result on a single line
    pub compact: bool,
}

impl Config {
    /// Load configuration from `path`, or from `~/.jql.toml` when no path is
    /// given, then apply environment overrides.
    ///
    /// A missing default file is not an error; a missing explicit one is.
    pub fn load(path: Option<&Path>) -> Result<Self, CliError> {
        let path = match path {
            Some(path) => Some(path.to_path_buf()),
            None => default_path().filter(|path| path.exists()),
        };

        let mut config = match path {
            Some(path) => Self::from_file(&path)?,
            None => Config::default(),
        };

        config.apply_overrides(|key| env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, CliError> {
        let content = fs::read_to_string(path).map_err(|source| CliError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&content).map_err(|source| CliError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "using config file");
        Ok(config)
    }

    /// Apply overrides from `lookup` (the process environment in production).
    ///
    /// Unparseable flag values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(monochrome) = lookup(ENV_MONOCHROME).as_deref().and_then(parse_flag) {
            self.monochrome = monochrome;
        }

        if let Some(compact) = lookup(ENV_COMPACT).as_deref().and_then(parse_flag) {
            self.compact = compact;
        }

        // https://no-color.org: any non-empty value disables color.
        if lookup(ENV_NO_COLOR).is_some_and(|value| !value.is_empty()) {
            self.monochrome = true;
        }
    }
}

fn default_path() -> Option<PathBuf> {
    env::var_os("HOME").map(|home| PathBuf::from(home).join(CONFIG_FILE_NAME))
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
