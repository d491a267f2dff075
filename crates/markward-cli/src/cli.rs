//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Markward: render Markdown to sanitized HTML
#[derive(Parser, Debug)]
#[command(name = "markward")]
#[command(author, version, about = "Render Markdown to sanitized HTML", long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render a Markdown file into an HTML page
    Render(RenderArgs),

    /// Sanitize an HTML file
    Sanitize {
        /// HTML file, or `-` for stdin
        input: String,

        /// Write output here instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Configuration file operations
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Options of the `render` subcommand.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct RenderArgs {
    /// Markdown file, or `-` for stdin
    pub input: String,

    /// Write output here instead of stdout
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Keep raw HTML from the converter
    #[arg(long)]
    pub no_sanitize: bool,

    /// Skip leading-indentation normalization
    #[arg(long)]
    pub no_normalize: bool,

    /// Add pragma-line ids to block elements
    #[arg(long)]
    pub pragma_lines: bool,

    /// Page template overriding the configured one
    #[arg(long)]
    pub template: Option<PathBuf>,

    /// Print only the rendered HTML fragment
    #[arg(long, conflicts_with_all = ["template", "json"])]
    pub fragment: bool,

    /// Print the document model as JSON
    #[arg(long, conflicts_with = "template")]
    pub json: bool,
}

/// `config` subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigAction {
    /// Print the resolved config file path
    Path,

    /// Print the effective configuration
    Show,

    /// Print one value by dotted key, e.g. `render.sanitize`
    Get {
        /// Dotted key
        key: String,
    },

    /// Write a default config file
    Init {
        /// Target file instead of the default location
        #[arg(long)]
        file: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_render_flags() {
        let args = Args::try_parse_from([
            "markward",
            "-vv",
            "render",
            "doc.md",
            "--no-sanitize",
            "--pragma-lines",
            "--out",
            "doc.html",
        ])
        .unwrap();
        assert_eq!(args.verbose, 2);
        let Command::Render(render) = args.command else {
            panic!("expected render");
        };
        assert_eq!(render.input, "doc.md");
        assert!(render.no_sanitize);
        assert!(render.pragma_lines);
        assert!(!render.no_normalize);
        assert_eq!(render.out, Some(PathBuf::from("doc.html")));
    }

    #[test]
    fn test_parse_global_config_after_subcommand() {
        let args =
            Args::try_parse_from(["markward", "config", "show", "--config", "/tmp/m.toml"]).unwrap();
        assert_eq!(args.config.as_deref(), Some("/tmp/m.toml"));
        assert!(matches!(
            args.command,
            Command::Config {
                action: ConfigAction::Show
            }
        ));
    }

    #[test]
    fn test_json_conflicts_with_template() {
        let result =
            Args::try_parse_from(["markward", "render", "a.md", "--json", "--template", "t.html"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_config_get() {
        let args = Args::try_parse_from(["markward", "config", "get", "render.sanitize"]).unwrap();
        assert!(matches!(
            args.command,
            Command::Config { action: ConfigAction::Get { ref key } } if key == "render.sanitize"
        ));
    }
}
