//! # System Interaction Layer
//!
//! This module is the boundary between argument composition and the operating
//! system. Nothing here influences which arguments a task composes.
//!
//! ## Modules
//!
//! - **`search_path`**: Locates executables on the configured search path or `PATH`.
//! - **`program`**: A located executable that can run composed tasks.
//! - **`executor`**: Spawns processes, applies redirections and reports exit status.
//! - **`sudo`**: The built-in task type describing the privilege-elevation program.

/// Process spawning and exit status.
pub mod executor;
/// Located executables.
pub mod program;
/// Executable lookup.
pub mod search_path;
/// The built-in `sudo` task type.
pub mod sudo;
