//! Handler functions for the `config` subcommands.

use std::path::PathBuf;

use markward_core::{Error, MarkwardConfig, Result};

use crate::cli::ConfigAction;

// ============================================================================
// Command dispatch
// ============================================================================

/// Handle a config subcommand.
pub fn handle_config_command(config_path: Option<&str>, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Path => cmd_config_path(config_path),
        ConfigAction::Show => cmd_config_show(config_path),
        ConfigAction::Get { key } => cmd_config_get(config_path, &key),
        ConfigAction::Init { file, force } => cmd_config_init(file.as_deref(), force),
    }
}

// ============================================================================
// Command handlers
// ============================================================================

/// Show the resolved config file path.
pub fn cmd_config_path(config_path: Option<&str>) -> Result<()> {
    match MarkwardConfig::resolve_config_path(config_path) {
        Some(path) => {
            println!("{}", path.display());
            if !path.exists() {
                eprintln!(
                    "(file does not exist; run `{} config init` to create it)",
                    MarkwardConfig::project_name()
                );
            }
            Ok(())
        }
        None => Err(Error::config(
            "Could not determine config directory for this platform",
        )),
    }
}

/// Print the effective configuration as TOML.
pub fn cmd_config_show(config_path: Option<&str>) -> Result<()> {
    print!("{}", effective_config(config_path)?);
    Ok(())
}

/// Effective configuration, defaults filled in, as TOML text.
pub fn effective_config(config_path: Option<&str>) -> Result<String> {
    MarkwardConfig::load(config_path)?.to_toml_string()
}

/// Get a configuration value by dotted key.
pub fn cmd_config_get(config_path: Option<&str>, key: &str) -> Result<()> {
    println!("{}", config_value(config_path, key)?);
    Ok(())
}

/// One configuration value by dotted key, formatted for display.
pub fn config_value(config_path: Option<&str>, key: &str) -> Result<String> {
    let config = MarkwardConfig::load(config_path)?;
    let value = toml::Value::try_from(&config).map_err(|e| Error::config(e.to_string()))?;
    get_nested_value(&value, key)
        .map(format_toml_value)
        .ok_or_else(|| Error::config(format!("Key '{key}' not found in configuration")))
}

/// Create a default configuration file.
pub fn cmd_config_init(file: Option<&str>, force: bool) -> Result<()> {
    let path = match file {
        Some(p) => PathBuf::from(p),
        None => MarkwardConfig::default_config_path()
            .ok_or_else(|| Error::config("Could not determine config directory"))?,
    };

    if path.exists() && !force {
        return Err(Error::config(format!(
            "Config file already exists at {}. Use --force to overwrite.",
            path.display()
        )));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| Error::io_with_path(e, parent))?;
    }

    let toml_str = MarkwardConfig::default().to_toml_string()?;
    std::fs::write(&path, &toml_str).map_err(|e| Error::io_with_path(e, &path))?;

    println!("Config file created at {}", path.display());
    Ok(())
}

// ============================================================================
// TOML helpers
// ============================================================================

/// Navigate a dotted key path in a TOML value tree.
pub fn get_nested_value<'a>(value: &'a toml::Value, key: &str) -> Option<&'a toml::Value> {
    key.split('.')
        .try_fold(value, |current, part| current.as_table()?.get(part))
}

/// Format a TOML value for display on stdout.
pub fn format_toml_value(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        toml::Value::Integer(i) => i.to_string(),
        toml::Value::Float(f) => f.to_string(),
        toml::Value::Boolean(b) => b.to_string(),
        toml::Value::Datetime(dt) => dt.to_string(),
        toml::Value::Array(items) => {
            let items: Vec<String> = items.iter().map(format_toml_value).collect();
            items.join(", ")
        }
        toml::Value::Table(_) => {
            toml::to_string_pretty(value).unwrap_or_else(|_| format!("{value:?}"))
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn write_config(dir: &tempfile::TempDir, content: &str) -> String {
        let path = dir.path().join("config.toml");
        std::fs::write(&path, content).unwrap();
        path.to_str().unwrap().to_string()
    }

    // ------------------------------------------------------------------------
    // cmd_config_path tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_cmd_config_path_explicit() {
        let result = cmd_config_path(Some("/explicit/config.toml"));
        assert!(result.is_ok());
    }

    // ------------------------------------------------------------------------
    // show / get tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_effective_config_fills_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_config(&dir, "[render]\nsanitize = false\n");

        let shown = effective_config(Some(&path)).unwrap();
        assert!(shown.contains("sanitize = false"));
        assert!(shown.contains("[front_matter]"));
        assert!(shown.contains("block_scan_lines = 30"));
    }

    #[test]
    fn test_effective_config_missing_explicit_file() {
        let result = effective_config(Some("/nonexistent/markward.toml"));
        assert!(result.unwrap_err().to_string().contains("not found"));
    }

    #[test]
    fn test_config_value_nested_key() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_config(&dir, "[front_matter]\nheading_scan_lines = 5\n");

        assert_eq!(config_value(Some(&path), "front_matter.heading_scan_lines").unwrap(), "5");
        assert_eq!(config_value(Some(&path), "render.sanitize").unwrap(), "true");
    }

    #[test]
    fn test_config_value_array() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_config(&dir, "[sanitizer]\nblocked_tags = [\"script\", \"style\"]\n");

        assert_eq!(
            config_value(Some(&path), "sanitizer.blocked_tags").unwrap(),
            "script, style"
        );
    }

    #[test]
    fn test_config_value_missing_key() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_config(&dir, "");

        let result = config_value(Some(&path), "nonexistent.key");
        assert!(result.unwrap_err().to_string().contains("not found"));
    }

    #[test]
    fn test_config_value_invalid_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_config(&dir, "[front_matter]\nblock_scan_lines = 0\n");

        assert!(config_value(Some(&path), "render.sanitize").is_err());
    }

    // ------------------------------------------------------------------------
    // cmd_config_init tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_cmd_config_init_creates_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("markward").join("config.toml");

        let result = cmd_config_init(Some(path.to_str().unwrap()), false);
        assert!(result.is_ok());

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("[sanitizer]"));
        assert!(content.contains("blocked_tags"));
        assert_eq!(
            MarkwardConfig::from_toml_str(&content).unwrap(),
            MarkwardConfig::default()
        );
    }

    #[test]
    fn test_cmd_config_init_no_overwrite() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_config(&dir, "existing");

        let result = cmd_config_init(Some(&path), false);
        assert!(result.unwrap_err().to_string().contains("already exists"));
    }

    #[test]
    fn test_cmd_config_init_force_overwrites() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_config(&dir, "old content");

        cmd_config_init(Some(&path), true).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("[render]"));
    }

    // ------------------------------------------------------------------------
    // TOML helper tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_get_nested_value() {
        let val: toml::Value = toml::from_str("[render]\nsanitize = true").unwrap();
        assert_eq!(
            get_nested_value(&val, "render.sanitize"),
            Some(&toml::Value::Boolean(true))
        );
        assert!(get_nested_value(&val, "render.nonexistent").is_none());
        assert!(get_nested_value(&val, "render.sanitize.deeper").is_none());
    }

    #[test]
    fn test_format_toml_value() {
        assert_eq!(format_toml_value(&toml::Value::String("x".into())), "x");
        assert_eq!(format_toml_value(&toml::Value::Integer(30)), "30");
        assert_eq!(format_toml_value(&toml::Value::Boolean(false)), "false");
    }
}
