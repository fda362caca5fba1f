use serde::Deserialize;
use std::path::PathBuf;

/// The TOML file structure for ptguide.toml.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub general: Option<GeneralConfig>,
    pub agent: Option<AgentConfig>,
    pub search: Option<SearchConfig>,
}

#[derive(Debug, Deserialize)]
pub struct GeneralConfig {
    pub reasoning_model: Option<String>,
    pub parsing_model: Option<String>,
    pub log_dir: Option<String>,
    pub session_dir: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AgentConfig {
    pub timeout_secs: Option<u64>,
    pub parsing_char_window: Option<usize>,
    pub parsing_chunk_chars: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct SearchConfig {
    pub result_count: Option<usize>,
}

impl ConfigFile {
    pub fn to_partial(&self) -> PartialConfig {
        let general = self.general.as_ref();
        let agent = self.agent.as_ref();
        PartialConfig {
            reasoning_model: general.and_then(|g| g.reasoning_model.clone()),
            parsing_model: general.and_then(|g| g.parsing_model.clone()),
            log_dir: general.and_then(|g| g.log_dir.as_ref().map(PathBuf::from)),
            session_dir: general.and_then(|g| g.session_dir.as_ref().map(PathBuf::from)),
            agent_timeout_secs: agent.and_then(|a| a.timeout_secs),
            parsing_char_window: agent.and_then(|a| a.parsing_char_window),
            parsing_chunk_chars: agent.and_then(|a| a.parsing_chunk_chars),
            search_result_count: self.search.as_ref().and_then(|s| s.result_count),
        }
    }
}

/// Fully-resolved runtime configuration. All fields have values.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub reasoning_model: String,
    pub parsing_model: String,
    pub log_dir: PathBuf,
    pub session_dir: PathBuf,
    pub agent_timeout_secs: u64,
    /// Inputs longer than this many characters are summarized before reasoning.
    pub parsing_char_window: usize,
    /// Upper bound on the size of each chunk sent to the parsing agent.
    pub parsing_chunk_chars: usize,
    pub search_result_count: usize,
    pub file_logging: bool,
}

/// Partial config used during merge. All fields are Option so that
/// missing fields don't override lower-priority values.
#[derive(Debug, Clone, Default)]
pub struct PartialConfig {
    pub reasoning_model: Option<String>,
    pub parsing_model: Option<String>,
    pub log_dir: Option<PathBuf>,
    pub session_dir: Option<PathBuf>,
    pub agent_timeout_secs: Option<u64>,
    pub parsing_char_window: Option<usize>,
    pub parsing_chunk_chars: Option<usize>,
    pub search_result_count: Option<usize>,
}
