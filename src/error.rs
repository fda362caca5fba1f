use std::path::PathBuf;

/// Errors related to configuration loading and parsing.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse config at {path}: {message}")]
    ParseError { path: PathBuf, message: String },
}

/// Errors raised by agent clients and the agent registry.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("Agent '{agent}' call failed: {message}")]
    Call { agent: String, message: String },

    #[error("Agent '{agent}' did not respond within {timeout_secs}s")]
    Timeout { agent: String, timeout_secs: u64 },

    #[error("Model '{name}' is not supported (available: {available})")]
    ModelNotFound { name: String, available: String },
}

/// Errors from the persisted session store.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Saved session '{name}' not found in {dir}")]
    NotFound { name: String, dir: PathBuf },

    #[error("Saved session at {path} is malformed: {message}")]
    Malformed { path: PathBuf, message: String },

    #[error("'{0}' is not a valid saved session name")]
    InvalidName(String),

    #[error("Session store I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from reading user input at the terminal.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("input stream closed")]
    Closed,

    #[error("input interrupted")]
    Interrupted,

    #[error("terminal error: {0}")]
    Terminal(String),
}

/// Raised when typed text is outside the active command vocabulary.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("'{0}' is not a valid command")]
    Invalid(String),
}

/// Errors returned by command handlers.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error(
        "You have not initialized the task yet. Please perform the basic testing following `next` option."
    )]
    NotInitialized,

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error(transparent)]
    Input(#[from] InputError),
}
