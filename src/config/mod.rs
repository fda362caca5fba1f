pub mod merge;
pub mod schema;

pub use schema::*;

use crate::cli::Cli;
use crate::error::ConfigError;
use std::path::{Path, PathBuf};

/// Load configuration by merging global, local, and CLI sources.
/// Precedence: CLI > local config (--config or ./ptguide.toml) > global config > defaults.
///
/// Missing config files are handled gracefully (defaults apply).
pub fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    // Layer 1: Global config (~/.config/ptguide/ptguide.toml or platform equivalent)
    let global = load_global_config();

    // Layer 2: Explicit --config file, or ptguide.toml in the working directory
    let local_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from("ptguide.toml"));
    let local = load_toml_file(&local_path).unwrap_or_default();

    // Layer 3: CLI args (converted to PartialConfig)
    let cli_partial = cli_to_partial(cli);

    let config = cli_partial
        .with_fallback(local)
        .with_fallback(global)
        .finalize(cli.logging);

    Ok(config)
}

/// Load global config from the platform-specific config directory.
/// Returns empty PartialConfig if file not found.
fn load_global_config() -> PartialConfig {
    match global_config_path() {
        Some(p) => load_toml_file(&p).unwrap_or_default(),
        None => {
            tracing::debug!("Could not determine global config directory");
            PartialConfig::default()
        }
    }
}

/// Load and parse a TOML config file into a PartialConfig.
/// Returns None on file-not-found; logs and skips files that fail to parse.
fn load_toml_file(path: &Path) -> Option<PartialConfig> {
    match parse_config_file(path) {
        Ok(Some(partial)) => {
            tracing::info!("Loaded config from {}", path.display());
            Some(partial)
        }
        Ok(None) => {
            tracing::debug!("No config file at {}, using defaults", path.display());
            None
        }
        Err(e) => {
            tracing::warn!("Config error: {e}");
            None
        }
    }
}

/// Read and parse one config file. `Ok(None)` means the file does not exist.
pub fn parse_config_file(path: &Path) -> Result<Option<PartialConfig>, ConfigError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let file: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(Some(file.to_partial()))
}

/// Resolve the platform-specific global config path.
/// Linux: ~/.config/ptguide/ptguide.toml
/// macOS: ~/Library/Application Support/ptguide/ptguide.toml
fn global_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "ptguide")
        .map(|dirs| dirs.config_dir().join("ptguide.toml"))
}

/// Convert CLI arguments to a PartialConfig for merging.
fn cli_to_partial(cli: &Cli) -> PartialConfig {
    PartialConfig {
        reasoning_model: cli.reasoning_model.clone(),
        parsing_model: cli.parsing_model.clone(),
        log_dir: cli.log_dir.clone(),
        session_dir: cli.session_dir.clone(),
        agent_timeout_secs: cli.timeout,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    #[test]
    fn parses_all_sections() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("ptguide.toml");
        std::fs::write(
            &path,
            r#"
[general]
reasoning_model = "gpt-4"
log_dir = "/var/log/ptguide"

[agent]
timeout_secs = 45
parsing_char_window = 12000

[search]
result_count = 3
"#,
        )
        .unwrap();

        let partial = parse_config_file(&path).unwrap().expect("file exists");
        assert_eq!(partial.reasoning_model.as_deref(), Some("gpt-4"));
        assert_eq!(partial.log_dir, Some(PathBuf::from("/var/log/ptguide")));
        assert_eq!(partial.agent_timeout_secs, Some(45));
        assert_eq!(partial.parsing_char_window, Some(12000));
        assert_eq!(partial.search_result_count, Some(3));
        assert!(partial.parsing_model.is_none());
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let tmp = TempDir::new().unwrap();
        let result = parse_config_file(&tmp.path().join("absent.toml")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn malformed_file_reports_parse_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.toml");
        std::fs::write(&path, "[general\nreasoning_model = ").unwrap();

        match parse_config_file(&path) {
            Err(ConfigError::ParseError { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected ParseError, got {other:?}"),
        }
    }

    #[test]
    fn cli_overrides_explicit_config_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("custom.toml");
        std::fs::write(
            &path,
            "[general]\nreasoning_model = \"gpt-4\"\nparsing_model = \"gpt-4\"\n",
        )
        .unwrap();

        let cli = Cli::parse_from([
            "ptguide",
            "--config",
            path.to_str().unwrap(),
            "--parsing-model",
            "gpt-3.5-turbo-16k",
        ]);
        let config = load_config(&cli).unwrap();
        assert_eq!(config.reasoning_model, "gpt-4");
        assert_eq!(config.parsing_model, "gpt-3.5-turbo-16k");
    }
}
