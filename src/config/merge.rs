use super::schema::{AppConfig, PartialConfig};
use std::path::PathBuf;

pub const DEFAULT_MODEL: &str = "gpt-4-o";
pub const DEFAULT_PARSING_CHAR_WINDOW: usize = 16000;
pub const DEFAULT_PARSING_CHUNK_CHARS: usize = 8000;

impl PartialConfig {
    /// Merge self with a lower-priority fallback.
    /// Self's non-None values take precedence.
    pub fn with_fallback(self, fallback: PartialConfig) -> PartialConfig {
        PartialConfig {
            reasoning_model: self.reasoning_model.or(fallback.reasoning_model),
            parsing_model: self.parsing_model.or(fallback.parsing_model),
            log_dir: self.log_dir.or(fallback.log_dir),
            session_dir: self.session_dir.or(fallback.session_dir),
            agent_timeout_secs: self.agent_timeout_secs.or(fallback.agent_timeout_secs),
            parsing_char_window: self.parsing_char_window.or(fallback.parsing_char_window),
            parsing_chunk_chars: self.parsing_chunk_chars.or(fallback.parsing_chunk_chars),
            search_result_count: self.search_result_count.or(fallback.search_result_count),
        }
    }

    /// Convert to AppConfig, filling any remaining gaps with defaults.
    ///
    /// A zero chunk size would never make progress, so it is raised to 1.
    pub fn finalize(self, file_logging: bool) -> AppConfig {
        AppConfig {
            reasoning_model: self
                .reasoning_model
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            parsing_model: self
                .parsing_model
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            log_dir: self.log_dir.unwrap_or_else(|| PathBuf::from("logs")),
            session_dir: self
                .session_dir
                .unwrap_or_else(|| PathBuf::from("test_history")),
            agent_timeout_secs: self.agent_timeout_secs.unwrap_or(120),
            parsing_char_window: self
                .parsing_char_window
                .unwrap_or(DEFAULT_PARSING_CHAR_WINDOW),
            parsing_chunk_chars: self
                .parsing_chunk_chars
                .unwrap_or(DEFAULT_PARSING_CHUNK_CHARS)
                .max(1),
            search_result_count: self.search_result_count.unwrap_or(5),
            file_logging,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn higher_priority_values_win() {
        let cli = PartialConfig {
            reasoning_model: Some("gpt-4-turbo".into()),
            ..Default::default()
        };
        let file = PartialConfig {
            reasoning_model: Some("gpt-4".into()),
            parsing_model: Some("gpt-3.5-turbo-16k".into()),
            agent_timeout_secs: Some(30),
            ..Default::default()
        };

        let config = cli.with_fallback(file).finalize(false);
        assert_eq!(config.reasoning_model, "gpt-4-turbo");
        assert_eq!(config.parsing_model, "gpt-3.5-turbo-16k");
        assert_eq!(config.agent_timeout_secs, 30);
    }

    #[test]
    fn defaults_fill_gaps() {
        let config = PartialConfig::default().finalize(true);
        assert_eq!(config.reasoning_model, DEFAULT_MODEL);
        assert_eq!(config.log_dir, PathBuf::from("logs"));
        assert_eq!(config.session_dir, PathBuf::from("test_history"));
        assert_eq!(config.parsing_char_window, 16000);
        assert_eq!(config.parsing_chunk_chars, 8000);
        assert_eq!(config.search_result_count, 5);
        assert!(config.file_logging);
    }

    #[test]
    fn zero_chunk_size_is_clamped() {
        let config = PartialConfig {
            parsing_chunk_chars: Some(0),
            ..Default::default()
        }
        .finalize(false);
        assert_eq!(config.parsing_chunk_chars, 1);
    }
}
