//! The interactive loop: read a command, run its handler, repeat.
//!
//! Lifecycle: a [`Repl`] is built around an already established
//! [`Context`] (see [`startup::establish_session`]), [`Repl::run`] loops until
//! `quit` or an unrecovered error, and [`Repl::shutdown`] writes the
//! transcript and saves the session.

pub mod command;
pub mod console;
pub mod context;
pub mod handlers;
pub mod input;
pub mod startup;

use std::path::PathBuf;

use crate::error::HandlerError;
use crate::session::HistorySource;

use command::{MainCommand, Vocabulary};
use handlers::Reply;
use input::read_command;

pub use context::{Context, Io, Settings};

/// File name prefix of conversation transcripts.
pub const TRANSCRIPT_PREFIX: &str = "ptguide";

/// Outcome of one dispatcher iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Continue(String),
    Terminate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitReason {
    Quit,
    Error(String),
}

#[derive(Debug, Default)]
pub struct ShutdownReport {
    pub transcript: Option<PathBuf>,
    pub saved_as: Option<String>,
}

pub struct Repl {
    ctx: Context,
    log_dir: PathBuf,
}

impl Repl {
    pub fn new(ctx: Context, log_dir: impl Into<PathBuf>) -> Self {
        Self {
            ctx,
            log_dir: log_dir.into(),
        }
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Read one valid command and handle it.
    ///
    /// Agent failures and missing state are reported to the user and end only
    /// this iteration; input failures propagate.
    pub async fn step(&mut self) -> anyhow::Result<Step> {
        let command: MainCommand =
            read_command(self.ctx.io.prompter.as_mut(), &mut self.ctx.io.console)?;
        self.ctx
            .history
            .append(HistorySource::User, command.keyword());
        tracing::debug!(command = command.keyword(), "Dispatching command");

        match handlers::handle(&mut self.ctx, command).await {
            Ok(Reply::Text(text)) => Ok(Step::Continue(text)),
            Ok(Reply::Quit) => Ok(Step::Terminate),
            Err(HandlerError::NotInitialized) => {
                let message = HandlerError::NotInitialized.to_string();
                self.ctx.io.console.error(&message);
                self.ctx
                    .history
                    .append(HistorySource::Assistant, message.as_str());
                Ok(Step::Continue(message))
            }
            Err(HandlerError::Agent(e)) => {
                let message = e.to_string();
                tracing::warn!(command = command.keyword(), "{message}");
                self.ctx
                    .history
                    .append(HistorySource::Exception, message.as_str());
                self.ctx.io.console.error(&format!("Agent error: {message}"));
                Ok(Step::Continue(message))
            }
            Err(HandlerError::Input(e)) => Err(e.into()),
        }
    }

    /// Run until `quit` or an unrecovered error.
    pub async fn run(&mut self) -> ExitReason {
        loop {
            match self.step().await {
                Ok(Step::Continue(_)) => self.ctx.io.console.rule(),
                Ok(Step::Terminate) => return ExitReason::Quit,
                Err(e) => {
                    let trace = format!("{e:#}");
                    tracing::error!("Session loop aborted: {trace}");
                    self.ctx
                        .history
                        .append(HistorySource::Exception, trace.as_str());
                    let console = &mut self.ctx.io.console;
                    console.error(&format!("Exception: {e}"));
                    console.success(
                        "Exception details are below. You may submit an issue and paste the error trace",
                    );
                    console.print(&format!("{e:?}"));
                    return ExitReason::Error(trace);
                }
            }
        }
    }

    /// Write the transcript, then save the session under a user-chosen name.
    pub fn shutdown(&mut self) -> ShutdownReport {
        let transcript = match self.ctx.history.flush(&self.log_dir, TRANSCRIPT_PREFIX) {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::error!("Failed to write transcript: {e:#}");
                self.ctx
                    .io
                    .console
                    .error(&format!("Failed to write the conversation log: {e:#}"));
                None
            }
        };

        ShutdownReport {
            transcript,
            saved_as: self.save_session(),
        }
    }

    fn save_session(&mut self) -> Option<String> {
        let io = &mut self.ctx.io;
        io.console
            .success("Before you quit, you may want to save the current session.");
        let name = match io.prompter.read_line(
            "Please enter the name of the current session. (Default with current timestamp)\n> ",
        ) {
            Ok(name) => name,
            Err(e) => {
                tracing::warn!("No session name entered ({e}), using a timestamp");
                String::new()
            }
        };

        match self.ctx.store.save(&self.ctx.session.to_record(), &name) {
            Ok(saved) => {
                self.ctx
                    .io
                    .console
                    .success(&format!("The current session is saved as {saved}"));
                Some(saved)
            }
            Err(e) => {
                tracing::error!("Failed to save session: {e}");
                self.ctx
                    .io
                    .console
                    .error(&format!("Failed to save the session: {e}"));
                None
            }
        }
    }
}
