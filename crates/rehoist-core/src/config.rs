//! Configuration handling for rehoist.
//!
//! Settings are read from an optional `rehoist.toml`:
//!
//! ```toml
//! [rehoist]
//! base_name = "REGEX"
//! max_passes = 10
//! source_type = "auto"
//! include = ["src/**/*.js"]
//! exclude = ["dist/**"]
//! ```
//!
//! Every field has a default, so an empty file (or no file) is valid.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// File name looked up in the workspace root.
pub const CONFIG_FILE_NAME: &str = "rehoist.toml";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Explicitly requested config file does not exist.
    #[error("config file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Config file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Config file is not valid TOML or has unexpected fields.
    #[error("invalid config {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// A setting has an invalid value.
    #[error("invalid setting `{key}`: {message}")]
    Invalid { key: String, message: String },
}

/// rehoist configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Rehoist settings.
    #[serde(default)]
    pub rehoist: RehoistConfig,
}

/// How sources are interpreted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceTypeSetting {
    /// Module when the file has a top-level `import`/`export`, script otherwise.
    #[default]
    Auto,
    /// Always a classic script.
    Script,
    /// Always an ES module.
    Module,
}

/// Core rehoist settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RehoistConfig {
    /// Base identifier for hoisted constants.
    #[serde(default = "default_base_name")]
    pub base_name: String,

    /// Maximum number of fix passes per file.
    #[serde(default = "default_max_passes")]
    pub max_passes: u32,

    /// Source type of analyzed files.
    #[serde(default)]
    pub source_type: SourceTypeSetting,

    /// Glob patterns of files to include (all JavaScript files when empty).
    #[serde(default)]
    pub include: Vec<String>,

    /// Glob patterns of files to exclude.
    #[serde(default)]
    pub exclude: Vec<String>,
}

fn default_base_name() -> String {
    "REGEX".to_string()
}

fn default_max_passes() -> u32 {
    10
}

impl Default for RehoistConfig {
    fn default() -> Self {
        Self {
            base_name: default_base_name(),
            max_passes: default_max_passes(),
            source_type: SourceTypeSetting::default(),
            include: Vec::new(),
            exclude: Vec::new(),
        }
    }
}

impl Config {
    /// Parse configuration from TOML text. `path` is used for error messages.
    pub fn from_toml(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from an explicit file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded config");
        Self::from_toml(&text, path)
    }

    /// Load `rehoist.toml` from `workspace_root` if present, defaults otherwise.
    pub fn discover(workspace_root: &Path) -> Result<Self, ConfigError> {
        let path = workspace_root.join(CONFIG_FILE_NAME);
        if path.is_file() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Check setting values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = &self.rehoist.base_name;
        let mut chars = base.chars();
        let valid_start = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$');
        if !valid_start || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$') {
            return Err(ConfigError::Invalid {
                key: "base_name".to_string(),
                message: format!("'{}' is not an identifier", base),
            });
        }
        if self.rehoist.max_passes == 0 {
            return Err(ConfigError::Invalid {
                key: "max_passes".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_toml("", Path::new("rehoist.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.rehoist.base_name, "REGEX");
        assert_eq!(config.rehoist.max_passes, 10);
        assert_eq!(config.rehoist.source_type, SourceTypeSetting::Auto);
    }

    #[test]
    fn test_full_config() {
        let text = r#"
[rehoist]
base_name = "PATTERN"
max_passes = 3
source_type = "module"
include = ["src/**/*.js"]
exclude = ["dist/**"]
"#;
        let config = Config::from_toml(text, Path::new("rehoist.toml")).unwrap();
        assert_eq!(config.rehoist.base_name, "PATTERN");
        assert_eq!(config.rehoist.max_passes, 3);
        assert_eq!(config.rehoist.source_type, SourceTypeSetting::Module);
        assert_eq!(config.rehoist.include, vec!["src/**/*.js"]);
        assert_eq!(config.rehoist.exclude, vec!["dist/**"]);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = Config::from_toml("[rehoist]\nbase = 1\n", Path::new("x.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_invalid_base_name_rejected() {
        let err =
            Config::from_toml("[rehoist]\nbase_name = \"1ABC\"\n", Path::new("x.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref key, .. } if key == "base_name"));
    }

    #[test]
    fn test_zero_passes_rejected() {
        let err =
            Config::from_toml("[rehoist]\nmax_passes = 0\n", Path::new("x.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref key, .. } if key == "max_passes"));
    }

    #[test]
    fn test_discover() {
        let dir = TempDir::new().unwrap();
        assert_eq!(Config::discover(dir.path()).unwrap(), Config::default());

        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[rehoist]\nbase_name = \"RE\"\n",
        )
        .unwrap();
        assert_eq!(Config::discover(dir.path()).unwrap().rehoist.base_name, "RE");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = Config::load(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }
}
