// src/system/search_path.rs

use crate::core::settings::Settings;
use std::{env, path::PathBuf};

/// The directories searched for programs: the configured list, or `PATH`.
pub fn search_paths(settings: &Settings) -> Vec<PathBuf> {
    if let Some(paths) = &settings.search_paths {
        return paths.clone();
    }
    // An unset PATH simply means there is nowhere to look.
    env::var_os("PATH")
        .map(|path_var| env::split_paths(&path_var).collect())
        .unwrap_or_default()
}

/// Finds the full path of the program with the matching name.
pub fn find_program(name: &str, settings: &Settings) -> Option<PathBuf> {
    let file_name = if cfg!(target_os = "windows") && !name.to_ascii_lowercase().ends_with(".exe") {
        format!("{}.exe", name)
    } else {
        name.to_string()
    };

    let found = search_paths(settings)
        .into_iter()
        .map(|dir| dir.join(&file_name))
        .find(|candidate| candidate.is_file());

    log::debug!("Looking up program '{}': {:?}", name, found);
    found
}

/// Finds the first program matching one of the names.
pub fn find_program_by_names<S: AsRef<str>>(names: &[S], settings: &Settings) -> Option<PathBuf> {
    names
        .iter()
        .find_map(|name| find_program(name.as_ref(), settings))
}
