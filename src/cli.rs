use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "ptguide",
    version,
    about = "LLM-guided interactive penetration testing assistant"
)]
pub struct Cli {
    /// Directory where conversation transcripts are stored
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Model for the reasoning and generation agents (e.g. "gpt-4-o")
    #[arg(long)]
    pub reasoning_model: Option<String>,

    /// Model for the input parsing agent (e.g. "gpt-4-turbo")
    #[arg(long)]
    pub parsing_model: Option<String>,

    /// Also write debug logs to <log-dir>/ptguide.log
    #[arg(long)]
    pub logging: bool,

    /// Deprecated: cookie mode was removed, API mode is always used
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub use_api: bool,

    /// Directory holding saved sessions
    #[arg(long)]
    pub session_dir: Option<PathBuf>,

    /// Agent call timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Path to config file (overrides default search)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_leave_overrides_unset() {
        let cli = Cli::parse_from(["ptguide"]);
        assert!(cli.log_dir.is_none());
        assert!(cli.reasoning_model.is_none());
        assert!(!cli.logging);
        assert!(cli.use_api);
    }

    #[test]
    fn parses_model_flags_and_deprecated_api_switch() {
        let cli = Cli::parse_from([
            "ptguide",
            "--reasoning-model",
            "gpt-4-turbo",
            "--parsing-model",
            "gpt-3.5-turbo-16k",
            "--use-api",
            "false",
            "--logging",
        ]);
        assert_eq!(cli.reasoning_model.as_deref(), Some("gpt-4-turbo"));
        assert_eq!(cli.parsing_model.as_deref(), Some("gpt-3.5-turbo-16k"));
        assert!(!cli.use_api);
        assert!(cli.logging);
    }
}
