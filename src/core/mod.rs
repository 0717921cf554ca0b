// src/core/mod.rs

/// Configuration values to argument fragments.
pub mod arg_formatter;
/// Prompt color names.
pub mod color;
/// Small helpers over YAML values.
pub mod commons;
/// Task normalization and compilation.
pub mod compiler;
/// Layer discovery and loading.
pub mod config_loader;
/// Built-in settings, schemas and the task argument map.
pub mod defaults;
/// Strategy and key-selection merges.
pub mod merge;
