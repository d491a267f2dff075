//! # markward-cli
//!
//! Command-line host for the Markward rendering pipeline.
//!
//! This crate provides:
//! - `render`: Markdown file to a templated, sanitized HTML page
//! - `sanitize`: scrub an existing HTML file
//! - `config`: inspect and create the config file

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod config_handlers;
pub mod render_handlers;
pub mod template;

use markward_core::Result;

use crate::cli::{Args, Command};

/// Dispatch parsed arguments to their handler.
pub fn run(args: Args) -> Result<()> {
    let config_path = args.config.as_deref();
    tracing::debug!(config = ?config_path, command = ?args.command, "Dispatching command");

    match args.command {
        Command::Render(render) => render_handlers::cmd_render(config_path, &render),
        Command::Sanitize { input, out } => {
            render_handlers::cmd_sanitize(config_path, &input, out.as_deref())
        }
        Command::Config { action } => config_handlers::handle_config_command(config_path, action),
    }
}
