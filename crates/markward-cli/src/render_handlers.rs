//! Handler functions for the `render` and `sanitize` subcommands.
//!
//! Each command has a pure half that returns the output text and a thin
//! `cmd_*` wrapper that writes it to a file or stdout.

use std::io::{Read, Write};
use std::path::Path;

use markward_content::{DocumentPipeline, RenderOptions, SourceInfo};
use markward_core::{Error, MarkwardConfig, Result};

use crate::cli::RenderArgs;
use crate::template::PageTemplate;

/// Input name that reads from stdin.
pub const STDIN: &str = "-";

// ============================================================================
// render
// ============================================================================

/// Handle `markward render`.
pub fn cmd_render(config_path: Option<&str>, args: &RenderArgs) -> Result<()> {
    let config = MarkwardConfig::load(config_path)?;
    let output = render_to_string(&config, args)?;
    write_output(args.out.as_deref(), &output)
}

/// Render the input named in `args` according to `config`.
pub fn render_to_string(config: &MarkwardConfig, args: &RenderArgs) -> Result<String> {
    let pipeline = DocumentPipeline::from_config(config)?;
    let markdown = read_input(&args.input)?;
    let options = render_options(config, args);

    let doc = pipeline.render_source(&markdown, &options, source_info(&args.input))?;
    tracing::info!(
        input = %args.input,
        title = doc.title.as_deref().unwrap_or(""),
        bytes = doc.rendered_html.len(),
        "Rendered document"
    );

    if args.json {
        return serde_json::to_string_pretty(&doc)
            .map_err(|e| Error::serialization("Failed to serialize document", e));
    }
    if args.fragment {
        return Ok(doc.rendered_html);
    }

    let template_path = args.template.as_deref().or(config.page.template.as_deref());
    Ok(PageTemplate::load(template_path)?.render(&doc))
}

/// Configured render defaults with command-line overrides applied.
pub fn render_options(config: &MarkwardConfig, args: &RenderArgs) -> RenderOptions {
    let mut options = RenderOptions::from(&config.render);
    if args.no_sanitize {
        options.sanitize = false;
    }
    if args.no_normalize {
        options.normalize_whitespace = false;
    }
    if args.pragma_lines {
        options.use_pragma_lines = true;
    }
    options
}

fn source_info(input: &str) -> SourceInfo {
    if input == STDIN {
        return SourceInfo::default();
    }
    let physical = std::fs::canonicalize(input)
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| input.to_string());
    SourceInfo::new(physical, input)
}

// ============================================================================
// sanitize
// ============================================================================

/// Handle `markward sanitize`.
pub fn cmd_sanitize(config_path: Option<&str>, input: &str, out: Option<&Path>) -> Result<()> {
    let config = MarkwardConfig::load(config_path)?;
    let output = sanitize_to_string(&config, input)?;
    write_output(out, &output)
}

/// Sanitize the HTML input with the configured blocked tags.
pub fn sanitize_to_string(config: &MarkwardConfig, input: &str) -> Result<String> {
    let html = read_input(input)?;
    markward_content::sanitize_html(&html, Some(&config.sanitizer.blocked_tags))
}

// ============================================================================
// I/O
// ============================================================================

/// Read a file, or stdin for `-`.
pub fn read_input(input: &str) -> Result<String> {
    if input == STDIN {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }
    std::fs::read_to_string(input).map_err(|e| Error::io_with_path(e, input))
}

/// Write to `out`, or stdout when absent.
pub fn write_output(out: Option<&Path>, text: &str) -> Result<()> {
    match out {
        Some(path) => {
            std::fs::write(path, text).map_err(|e| Error::io_with_path(e, path))?;
            tracing::info!(path = %path.display(), "Wrote output");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}
