//! Utility functions for CLI commands.

use std::path::PathBuf;

use nskv_storage::{RedisPlugin, StorageConfig};

use crate::Cli;

/// Default base configuration directory name.
pub const DEFAULT_BASE_DIR: &str = ".nskv";
/// Default configuration filename.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// Gets the default config file path.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(DEFAULT_BASE_DIR).join(DEFAULT_CONFIG_FILE))
}

/// Resolves the config file to read.
pub fn config_path(cli: &Cli) -> anyhow::Result<PathBuf> {
    match &cli.config {
        Some(path) => Ok(PathBuf::from(path)),
        None => default_config_path()
            .ok_or_else(|| anyhow::anyhow!("cannot determine home directory, use --config")),
    }
}

/// Builds the Redis plugin from --url or the config file.
pub fn open_plugin(cli: &Cli) -> anyhow::Result<RedisPlugin> {
    if let Some(url) = &cli.url {
        print_verbose(cli, "Using --url, config file ignored");
        return Ok(RedisPlugin::from_url(url)?);
    }

    let path = config_path(cli)?;
    print_verbose(cli, &format!("Loading config from {}", path.display()));
    let config = StorageConfig::load(&path)?;
    Ok(RedisPlugin::new(&config)?)
}

/// Parses a command-line value as JSON, falling back to a plain string.
pub fn parse_value(raw: &str) -> serde_json::Value {
    serde_json::from_str(raw).unwrap_or_else(|_| serde_json::Value::String(raw.to_string()))
}

/// Renders a result as JSON or YAML.
pub fn render<T: serde::Serialize>(result: &T, as_json: bool) -> anyhow::Result<String> {
    let output = if as_json {
        let mut s = serde_json::to_string_pretty(result)?;
        s.push('\n');
        s
    } else {
        serde_yaml::to_string(result)?
    };
    Ok(output)
}

/// Prints verbose output if enabled.
pub fn print_verbose(cli: &Cli, msg: &str) {
    if cli.verbose {
        eprintln!("[verbose] {}", msg);
    }
}

/// Prints success message.
pub fn print_success(msg: &str) {
    eprintln!("\x1b[32m✓\x1b[0m {}", msg);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serde_json::json;

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value(r#"{"x":1}"#), json!({"x": 1}));
        assert_eq!(parse_value("[1,2]"), json!([1, 2]));
        assert_eq!(parse_value("42"), json!(42));
        assert_eq!(parse_value("hello world"), json!("hello world"));
        assert_eq!(parse_value(r#""quoted""#), json!("quoted"));
    }

    #[test]
    fn test_render() {
        assert_eq!(render(&json!({"a": 1}), true).unwrap(), "{\n  \"a\": 1\n}\n");
        assert_eq!(render(&json!({"a": 1}), false).unwrap(), "a: 1\n");
    }

    #[test]
    fn test_config_path_flag_wins() {
        let cli = Cli::parse_from(["nskv", "--config", "/tmp/x.yaml", "keys"]);
        assert_eq!(config_path(&cli).unwrap(), PathBuf::from("/tmp/x.yaml"));
    }

    #[test]
    fn test_open_plugin_from_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "server: 127.0.0.1\nport: 6379\ndb: 0\npassword: null\ncodec: msgpack\n",
        )
        .unwrap();

        let cli = Cli::parse_from(["nskv", "--config", path.to_str().unwrap(), "count"]);
        let plugin = open_plugin(&cli).unwrap();
        assert_eq!(plugin.codec(), nskv_storage::AnyCodec::MsgPack);
    }

    #[test]
    fn test_open_plugin_incomplete_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "server: 127.0.0.1\n").unwrap();

        let cli = Cli::parse_from(["nskv", "--config", path.to_str().unwrap(), "count"]);
        let err = open_plugin(&cli).unwrap_err();
        assert!(err.to_string().contains("missing: port, db, password"), "{err}");
    }

    #[test]
    fn test_open_plugin_url() {
        let cli = Cli::parse_from(["nskv", "--url", "redis://localhost/2", "keys"]);
        assert!(open_plugin(&cli).is_ok());
    }
}
