// src/core/settings.rs

//! Runtime settings for the execution layer. The composition engine itself
//! needs no configuration.

use crate::{
    constants::{DEBUG_ENV_VAR, SUDO_PROGRAM},
    core::paths::{self, PathError},
};
use serde::Deserialize;
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Errors raised while loading settings.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// The settings file exists but could not be read.
    #[error("Filesystem Error: {0}")]
    Io(#[from] std::io::Error),
    /// The settings file is not valid TOML or has unknown fields.
    #[error("Error parsing TOML in '{path}': {source}")]
    TomlParse {
        /// The settings file.
        path: String,
        /// The underlying parse error.
        #[source]
        source: toml::de::Error,
    },
    /// The config directory could not be determined.
    #[error(transparent)]
    Path(#[from] PathError),
}

/// Settings read from `config.toml`.
///
/// ```toml
/// debug = true
/// search_paths = ["/usr/local/bin", "/usr/bin"]
/// sudo_program = "doas"
/// ```
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Echo every executed command line to stderr.
    pub debug: bool,
    /// Directories searched for programs instead of `PATH`.
    pub search_paths: Option<Vec<PathBuf>>,
    /// The privilege-elevation program. Defaults to `sudo`.
    pub sudo_program: Option<String>,
}

impl Settings {
    /// Loads the user's settings file (if any) and applies the environment override.
    pub fn load() -> Result<Self, SettingsError> {
        let path = paths::settings_file()?;
        let settings = if path.is_file() {
            Self::load_from(&path)?
        } else {
            log::debug!("No settings file at '{}', using defaults.", path.display());
            Self::default()
        };
        Ok(settings.with_debug_override(env::var(DEBUG_ENV_VAR).ok().as_deref()))
    }

    /// Loads settings from a specific file.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|source| SettingsError::TomlParse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Applies the value of the debug environment variable, if it is set.
    /// Unrecognized values leave the setting unchanged.
    pub fn with_debug_override(mut self, value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("1" | "true" | "yes" | "on") => self.debug = true,
            Some("0" | "false" | "no" | "off") => self.debug = false,
            Some(other) => log::warn!("Ignoring unrecognized {} value '{}'.", DEBUG_ENV_VAR, other),
            None => {}
        }
        self
    }

    /// The privilege-elevation program name.
    pub fn sudo_program(&self) -> &str {
        self.sudo_program.as_deref().unwrap_or(SUDO_PROGRAM)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(!settings.debug);
        assert!(settings.search_paths.is_none());
        assert_eq!(settings.sudo_program(), "sudo");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"debug = true\nsearch_paths = [\"/opt/bin\"]\nsudo_program = \"doas\"\n")
            .unwrap();
        file.flush().unwrap();

        let settings = Settings::load_from(file.path()).unwrap();
        assert!(settings.debug);
        assert_eq!(settings.search_paths, Some(vec![PathBuf::from("/opt/bin")]));
        assert_eq!(settings.sudo_program(), "doas");
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"debgu = true\n").unwrap();
        file.flush().unwrap();

        let err = Settings::load_from(file.path()).unwrap_err();
        assert!(matches!(err, SettingsError::TomlParse { .. }));
        assert!(err.to_string().contains("unknown field `debgu`"));
    }

    #[test]
    fn test_debug_override() {
        assert!(Settings::default().with_debug_override(Some("1")).debug);
        assert!(Settings::default().with_debug_override(Some(" TRUE ")).debug);

        let enabled = Settings {
            debug: true,
            ..Settings::default()
        };
        assert!(!enabled.clone().with_debug_override(Some("off")).debug);
        assert!(enabled.clone().with_debug_override(Some("maybe")).debug);
        assert!(enabled.with_debug_override(None).debug);
    }
}
