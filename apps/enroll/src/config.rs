//! Configuration for the enroll CLI.
//!
//! Settings are layered, later layers winning:
//! 1. Built-in defaults
//! 2. `enroll.toml` (or the file given with `--config`)
//! 3. Environment: `ENROLL_SNAPSHOT`, `ENROLL_USER`, `ENROLL_ROLE`, `ENROLL_LOG_FORMAT`
//! 4. Command-line flags
//!
//! ```toml
//! snapshot = "data/enroll.snapshot"
//! log_format = "json"
//!
//! [user]
//! id = "jdoe"
//! role = "admin"
//! ```

use crate::AppError;
use enroll_core::{CurrentUser, Role};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Config file looked up in the working directory when `--config` is absent.
pub const CONFIG_FILE: &str = "enroll.toml";

/// Snapshot file used when nothing else is configured.
pub const DEFAULT_SNAPSHOT: &str = "enroll.snapshot";

// =============================================================================
// Log format
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(AppError::Config(format!(
                "unknown log format '{}', use text or json",
                other
            ))),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Text => f.write_str("text"),
            LogFormat::Json => f.write_str("json"),
        }
    }
}

// =============================================================================
// Config file
// =============================================================================

/// Identity handed to the session at login.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    pub id: String,
    pub role: Role,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            id: "local".to_string(),
            role: Role::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Binary snapshot the CLI loads and saves.
    pub snapshot: PathBuf,
    pub log_format: LogFormat,
    pub user: UserConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            snapshot: PathBuf::from(DEFAULT_SNAPSHOT),
            log_format: LogFormat::default(),
            user: UserConfig::default(),
        }
    }
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub snapshot: Option<PathBuf>,
    pub user: Option<String>,
    pub role: Option<Role>,
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Self, AppError> {
        toml::from_str(text).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Read a config file.
    ///
    /// An explicit path must exist. Without one, `enroll.toml` is used when
    /// present and defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let path = match path {
            Some(path) => path,
            None if Path::new(CONFIG_FILE).is_file() => Path::new(CONFIG_FILE),
            None => return Ok(Self::default()),
        };
        let text = fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_toml(&text)
    }

    /// Apply environment overrides. `lookup` is `std::env::var` in the binary.
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), AppError> {
        if let Some(snapshot) = lookup("ENROLL_SNAPSHOT") {
            self.snapshot = PathBuf::from(snapshot);
        }
        if let Some(user) = lookup("ENROLL_USER") {
            self.user.id = user;
        }
        if let Some(role) = lookup("ENROLL_ROLE") {
            self.user.role = role.parse()?;
        }
        if let Some(format) = lookup("ENROLL_LOG_FORMAT") {
            self.log_format = format.parse()?;
        }
        Ok(())
    }

    pub fn apply_overrides(&mut self, overrides: Overrides) {
        if let Some(snapshot) = overrides.snapshot {
            self.snapshot = snapshot;
        }
        if let Some(user) = overrides.user {
            self.user.id = user;
        }
        if let Some(role) = overrides.role {
            self.user.role = role;
        }
    }

    /// Defaults, file, environment, then flags.
    pub fn resolve(
        path: Option<&Path>,
        lookup: impl Fn(&str) -> Option<String>,
        overrides: Overrides,
    ) -> Result<Self, AppError> {
        let mut config = Self::load(path)?;
        config.apply_env(lookup)?;
        config.apply_overrides(overrides);
        if config.user.id.trim().is_empty() {
            return Err(AppError::Config("user id must not be empty".to_string()));
        }
        Ok(config)
    }

    #[must_use]
    pub fn current_user(&self) -> CurrentUser {
        CurrentUser::new(self.user.id.clone(), self.user.role)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(Config::from_toml("").expect("parse"), Config::default());
    }

    #[test]
    fn file_values_parsed() {
        let config = Config::from_toml(
            r#"
            snapshot = "data/store.bin"
            log_format = "json"

            [user]
            id = "jdoe"
            role = "admin"
            "#,
        )
        .expect("parse");
        assert_eq!(config.snapshot, PathBuf::from("data/store.bin"));
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.current_user(), CurrentUser::new("jdoe", Role::Admin));
    }

    #[test]
    fn unknown_keys_rejected() {
        assert!(matches!(
            Config::from_toml("snapshots = \"x\""),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn layers_apply_in_order() {
        let mut config = Config::from_toml("[user]\nid = \"from-file\"").expect("parse");
        config
            .apply_env(env(&[("ENROLL_USER", "from-env"), ("ENROLL_ROLE", "viewer")]))
            .expect("env");
        assert_eq!(config.user.id, "from-env");
        assert_eq!(config.user.role, Role::Viewer);

        config.apply_overrides(Overrides {
            user: Some("from-flag".to_string()),
            ..Overrides::default()
        });
        assert_eq!(config.user.id, "from-flag");
        assert_eq!(config.user.role, Role::Viewer);
    }

    #[test]
    fn bad_env_values_rejected() {
        let mut config = Config::default();
        assert!(config.apply_env(env(&[("ENROLL_ROLE", "owner")])).is_err());
        assert!(config.apply_env(env(&[("ENROLL_LOG_FORMAT", "xml")])).is_err());
    }
}
