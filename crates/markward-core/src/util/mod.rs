//! Utility modules shared across Markward crates.
//!
//! # Modules
//!
//! - [`ids`]: Heading slug computation

pub mod ids;
