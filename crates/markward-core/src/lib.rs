//! Markward Core: shared errors, configuration, and utilities.
//!
//! This crate provides the foundational types used across all Markward
//! crates. It has no internal Markward dependencies (dependency level 0).
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`config`]: Pipeline and host configuration
//! - [`util`]: Heading id utilities

pub mod config;
pub mod error;
pub mod util;

// Re-export key types at crate root for convenience
pub use config::{
    ConverterConfig, FrontMatterLimits, MarkwardConfig, PageConfig, RenderDefaults,
    SanitizerConfig,
};
pub use error::{Error, Result};
pub use util::ids::{slugify, SlugRegistry};
