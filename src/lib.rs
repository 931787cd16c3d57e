//! # argsmith
//!
//! Declare, per external program, the flags ("options") and positional arguments
//! ("non-options") it accepts, assign values to them, and compose those values into
//! the exact `argv` vector a process-execution API expects.
//!
//! - **`core`**: the composition engine (task types, parameter definitions, value
//!   coercion, task instances) plus the settings and catalog layers.
//! - **`system`**: program discovery on the search path and process execution.
//! - **`cli`**: the command-line front-end used by the `argsmith` binary.

/// Command-line front-end.
pub mod cli;
/// File names, environment variables and fixed tokens.
pub mod constants;
pub mod core;
/// Values assigned to task parameters.
pub mod models;
pub mod system;
