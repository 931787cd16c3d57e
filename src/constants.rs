// src/constants.rs

/// The name of the directory holding argsmith configuration (inside the system config dir).
pub const CONFIG_DIR_NAME: &str = "argsmith";

/// The name of the settings file (inside the argsmith config dir).
pub const SETTINGS_FILENAME: &str = "config.toml";

/// The name of the default task catalog file (inside the argsmith config dir).
pub const CATALOG_FILENAME: &str = "tasks.toml";

/// Environment variable overriding the `debug` setting.
pub const DEBUG_ENV_VAR: &str = "ARGSMITH_DEBUG";

/// The token inserted before tailing arguments that look like flags.
pub const END_OF_OPTIONS: &str = "--";

/// The default privilege-elevation program.
pub const SUDO_PROGRAM: &str = "sudo";
