// src/core/paths.rs

//! Where argsmith looks for its configuration files.

use crate::constants::{CATALOG_FILENAME, CONFIG_DIR_NAME, SETTINGS_FILENAME};
use std::path::PathBuf;
use thiserror::Error;

/// Errors locating the configuration directory.
#[derive(Error, Debug)]
pub enum PathError {
    /// The platform reports no config directory.
    #[error("Could not find system config directory.")]
    ConfigDirNotFound,
}

/// Returns the path to the argsmith configuration directory (`~/.config/argsmith`).
/// The directory is not created; every file inside it is optional.
pub fn config_dir() -> Result<PathBuf, PathError> {
    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_DIR_NAME))
        .ok_or(PathError::ConfigDirNotFound)
}

/// Path of the settings file.
pub fn settings_file() -> Result<PathBuf, PathError> {
    Ok(config_dir()?.join(SETTINGS_FILENAME))
}

/// Path of the default task catalog.
pub fn catalog_file() -> Result<PathBuf, PathError> {
    Ok(config_dir()?.join(CATALOG_FILENAME))
}
