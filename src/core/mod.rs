// src/core/mod.rs

//! The composition engine plus its settings and catalog layers.

pub mod assignment;
pub mod catalog;
pub mod coercion;
/// Flag to parameter-name conversion.
pub mod naming;
/// Positional parameter declarations.
pub mod non_option;
/// Flag declarations and their token rendering.
pub mod option;
/// Locations of the configuration files.
pub mod paths;
pub mod settings;
/// Keyed sub-flags held by a single option.
pub mod sub_options;
/// Task instances and argument composition.
pub mod task;
pub mod task_type;
