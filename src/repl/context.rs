use crate::agent::AgentSet;
use crate::config::AppConfig;
use crate::session::{ActiveSession, History, SessionStore};
use crate::web_search::WebSearch;

use super::console::Console;
use super::input::Prompter;

/// Tunables the handlers need from the configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    pub parsing_char_window: usize,
    pub parsing_chunk_chars: usize,
    pub search_result_count: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            parsing_char_window: crate::config::merge::DEFAULT_PARSING_CHAR_WINDOW,
            parsing_chunk_chars: crate::config::merge::DEFAULT_PARSING_CHUNK_CHARS,
            search_result_count: 5,
        }
    }
}

impl From<&AppConfig> for Settings {
    fn from(config: &AppConfig) -> Self {
        Self {
            parsing_char_window: config.parsing_char_window,
            parsing_chunk_chars: config.parsing_chunk_chars,
            search_result_count: config.search_result_count,
        }
    }
}

/// User-facing terminal: input plus styled output.
pub struct Io {
    pub prompter: Box<dyn Prompter>,
    pub console: Console,
}

impl Io {
    pub fn new(prompter: Box<dyn Prompter>, console: Console) -> Self {
        Self { prompter, console }
    }
}

/// Everything a command handler may read or change.
pub struct Context {
    pub agents: AgentSet,
    pub session: ActiveSession,
    pub history: History,
    pub io: Io,
    pub search: Box<dyn WebSearch>,
    pub store: SessionStore,
    pub settings: Settings,
    /// Output of the last successful `next`, consumed by `more`.
    pub pending_reasoning: Option<String>,
}

impl Context {
    pub fn new(
        agents: AgentSet,
        session: ActiveSession,
        history: History,
        io: Io,
        search: Box<dyn WebSearch>,
        store: SessionStore,
        settings: Settings,
    ) -> Self {
        Self {
            agents,
            session,
            history,
            io,
            search,
            store,
            settings,
            pending_reasoning: None,
        }
    }
}
