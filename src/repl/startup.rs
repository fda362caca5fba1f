//! Establishing the active session: resume a saved one or start fresh.

use anyhow::Context as _;

use crate::agent::prompts;
use crate::agent::{AgentRole, AgentSet};
use crate::config::AppConfig;
use crate::error::InputError;
use crate::session::{ActiveSession, History, HistorySource, SessionIds, SessionRecord, SessionStore, TaskLog};

use super::console::Console;
use super::context::Io;
use super::input::confirm;

pub const TASK_DESCRIPTION_KEY: &str = "task description";

pub fn print_banner(console: &mut Console, config: &AppConfig, use_api: bool) {
    console.success("Welcome to ptguide, an LLM-guided penetration testing assistant.");
    console.print("The settings are: ");
    console.success(&format!(" - parsing model: {}", config.parsing_model));
    console.success(&format!(" - reasoning model: {}", config.reasoning_model));
    console.success(&format!(" - use API: {use_api}"));
    console.success(&format!(" - log directory: {}", config.log_dir.display()));
}

/// Resume a saved session if the user asks for it, otherwise open new agent
/// sessions and collect the task description.
///
/// Agent failures here are fatal.
pub async fn establish_session(
    agents: &AgentSet,
    io: &mut Io,
    history: &mut History,
    store: &SessionStore,
) -> anyhow::Result<ActiveSession> {
    let mut task_log = TaskLog::new();

    if let Some(record) = preload(io, store)? {
        match record.ids() {
            Some(ids) => {
                io.console
                    .success(&format!("Task log: {:?}", record.task_log));
                io.console
                    .print("You may use discussion function to remind yourself of the task.");
                tracing::info!(reasoning = %ids.reasoning, "Resumed saved session");
                return Ok(ActiveSession::new(ids, record.task_log));
            }
            None => {
                io.console
                    .error("Error: the previous session ids are not valid. Loading new sessions");
                task_log = record.task_log;
            }
        }
    }

    initialize(agents, io, history, task_log).await
}

/// Ask whether to resume and, if so, which saved session to load.
///
/// Any problem with the choice or the file falls back to `None` (fresh session).
pub fn preload(io: &mut Io, store: &SessionStore) -> Result<Option<SessionRecord>, InputError> {
    if !confirm(
        io.prompter.as_mut(),
        "Do you want to continue from previous session?",
    )? {
        return Ok(None);
    }

    let names = match store.list() {
        Ok(names) => names,
        Err(e) => {
            tracing::warn!("Failed to list saved sessions: {e}");
            io.console.error(&format!("Could not read saved sessions: {e}"));
            return Ok(None);
        }
    };
    if names.is_empty() {
        io.console
            .print("No previous session found. Please start a new session.");
        return Ok(None);
    }

    io.console
        .print("Please select the previous session by its index (integer):");
    for (i, name) in names.iter().enumerate() {
        io.console.option(i, name, "");
    }
    let line = io
        .prompter
        .read_line("Please key in your option (integer): ")?;
    let Some(name) = line.trim().parse::<usize>().ok().and_then(|i| names.get(i)) else {
        io.console
            .error("You input an invalid option. Will start a new session.");
        return Ok(None);
    };
    io.console.print(&format!("You selected: {name}"));

    match store.load(name) {
        Ok(record) => Ok(Some(record)),
        Err(e) => {
            tracing::warn!("Failed to load session '{name}': {e}");
            io.console
                .error("Error when loading the previous session. Will start a new session.");
            io.console.print(&e.to_string());
            Ok(None)
        }
    }
}

async fn initialize(
    agents: &AgentSet,
    io: &mut Io,
    history: &mut History,
    task_log: TaskLog,
) -> anyhow::Result<ActiveSession> {
    io.console.status("Initializing agent sessions...");
    let (_, generation) = agents
        .start(AgentRole::Generation, prompts::GENERATION_SESSION_INIT)
        .await
        .context("failed to open the generation session")?;
    let (_, reasoning) = agents
        .start(AgentRole::Reasoning, prompts::REASONING_SESSION_INIT)
        .await
        .context("failed to open the reasoning session")?;
    let (_, parsing) = agents
        .start(AgentRole::Parsing, prompts::PARSING_SESSION_INIT)
        .await
        .context("failed to open the parsing session")?;
    io.console.success("- Agent sessions initialized.");

    let mut session = ActiveSession::new(
        SessionIds {
            reasoning,
            generation,
            parsing,
        },
        task_log,
    );
    feed_task_description(agents, io, history, &mut session).await?;
    Ok(session)
}

/// Collect the one-line task description and build the initial plan.
async fn feed_task_description(
    agents: &AgentSet,
    io: &mut Io,
    history: &mut History,
    session: &mut ActiveSession,
) -> anyhow::Result<()> {
    let description = io.prompter.read_line(
        "Please describe the penetration testing task in one line, including the target IP, task type, etc.\n> ",
    )?;
    history.append(HistorySource::User, description.as_str());
    session
        .task_log
        .insert(TASK_DESCRIPTION_KEY.to_string(), description.clone());

    io.console
        .status("Constructing initial penetration testing tree...");
    let plan = agents
        .send(
            AgentRole::Reasoning,
            &format!("{}{description}", prompts::TASK_DESCRIPTION),
            &session.ids.reasoning,
        )
        .await
        .context("failed to build the initial testing tree")?;
    history.append(HistorySource::Reasoning, plan.as_str());

    io.console.status("Generating initial task...");
    let first_steps = agents
        .send(
            AgentRole::Generation,
            &format!("{}{plan}", prompts::TODO_TO_COMMAND),
            &session.ids.generation,
        )
        .await
        .context("failed to generate the initial task")?;
    history.append(HistorySource::Generation, first_steps.as_str());

    let response = format!("{plan}\n{first_steps}");
    io.console.success("ptguide output: ");
    io.console.print(&response);
    history.append(HistorySource::Assistant, format!("ptguide output: {response}"));
    Ok(())
}
