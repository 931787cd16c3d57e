// src/cli/handlers/mod.rs

//! One module per CLI command.

/// Shared handler state and helpers.
pub mod commons;
/// `compose`: print the arguments of a task.
pub mod compose;
/// `info`: describe a task's declarations.
pub mod info;
/// `list`: list catalog tasks.
pub mod list;
/// `run`: compose a task and run its program.
pub mod run;
