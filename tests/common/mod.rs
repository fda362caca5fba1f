//! Test doubles shared by the integration tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;

use ptguide::agent::{AgentClient, AgentSet};
use ptguide::error::{AgentError, InputError};
use ptguide::repl::console::Console;
use ptguide::repl::input::Prompter;
use ptguide::repl::{Context, Io, Settings};
use ptguide::session::{ActiveSession, History, SessionIds, SessionStore, TaskLog};
use ptguide::web_search::{SearchError, SearchResult, WebSearch};

/// Replays scripted lines; reports closed input once they run out.
///
/// A multi-line read consumes lines up to a lone `EOF` marker.
pub struct ScriptedPrompter {
    lines: VecDeque<String>,
}

pub const EOF: &str = "<EOF>";

impl ScriptedPrompter {
    pub fn new(lines: &[&str]) -> Self {
        Self {
            lines: lines.iter().map(|l| l.to_string()).collect(),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn read_line(&mut self, _prompt: &str) -> Result<String, InputError> {
        self.lines.pop_front().ok_or(InputError::Closed)
    }

    fn read_multiline(&mut self, _prompt: &str) -> Result<String, InputError> {
        let mut collected = Vec::new();
        loop {
            match self.lines.pop_front() {
                Some(line) if line == EOF => return Ok(collected.join("\n")),
                Some(line) => collected.push(line),
                None if collected.is_empty() => return Err(InputError::Closed),
                None => return Ok(collected.join("\n")),
            }
        }
    }
}

pub type CallLog = Arc<Mutex<Vec<(String, String)>>>;

/// Agent that records every call and answers `<role>-reply-<n>`.
pub struct RecordingAgent {
    role: &'static str,
    calls: CallLog,
    counter: Mutex<usize>,
    delay: Option<Duration>,
    fail_after: Option<usize>,
}

impl RecordingAgent {
    pub fn new(role: &'static str, calls: CallLog) -> Self {
        Self {
            role,
            calls,
            counter: Mutex::new(0),
            delay: None,
            fail_after: None,
        }
    }

    /// Answers the first `successes` calls, then fails every call.
    pub fn failing_after(role: &'static str, calls: CallLog, successes: usize) -> Self {
        Self {
            fail_after: Some(successes),
            ..Self::new(role, calls)
        }
    }

    pub fn slow(role: &'static str, calls: CallLog, delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::new(role, calls)
        }
    }

    fn record(&self, text: &str) -> Result<String, AgentError> {
        self.calls
            .lock()
            .unwrap()
            .push((self.role.to_string(), text.to_string()));
        let mut counter = self.counter.lock().unwrap();
        *counter += 1;
        if self.fail_after.is_some_and(|limit| *counter > limit) {
            return Err(AgentError::Call {
                agent: self.role.to_string(),
                message: "rate limited".into(),
            });
        }
        Ok(format!("{}-reply-{}", self.role, *counter))
    }
}

#[async_trait]
impl AgentClient for RecordingAgent {
    fn name(&self) -> &str {
        self.role
    }

    async fn send_new_message(&self, init_prompt: &str) -> Result<(String, String), AgentError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let reply = self.record(init_prompt)?;
        Ok((reply, format!("{}-session", self.role)))
    }

    async fn send_message(&self, text: &str, _session_id: &str) -> Result<String, AgentError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.record(text)
    }
}

/// Agent whose every call fails.
pub struct FailingAgent;

#[async_trait]
impl AgentClient for FailingAgent {
    fn name(&self) -> &str {
        "failing"
    }

    async fn send_new_message(&self, _init_prompt: &str) -> Result<(String, String), AgentError> {
        Err(AgentError::Call {
            agent: "failing".into(),
            message: "connection refused".into(),
        })
    }

    async fn send_message(&self, _text: &str, _session_id: &str) -> Result<String, AgentError> {
        Err(AgentError::Call {
            agent: "failing".into(),
            message: "connection refused".into(),
        })
    }
}

/// Search backend returning fixed results.
pub struct StaticSearch(pub Vec<SearchResult>);

#[async_trait]
impl WebSearch for StaticSearch {
    async fn search(&self, _query: &str, count: usize) -> Result<Vec<SearchResult>, SearchError> {
        Ok(self.0.iter().take(count).cloned().collect())
    }
}

/// Search backend whose every query fails.
pub struct FailingSearch;

#[async_trait]
impl WebSearch for FailingSearch {
    async fn search(&self, _query: &str, _count: usize) -> Result<Vec<SearchResult>, SearchError> {
        Err(SearchError::Request("connection reset".into()))
    }
}

pub fn recording_agents(calls: &CallLog) -> AgentSet {
    AgentSet::new(
        Box::new(RecordingAgent::new("reasoning", calls.clone())),
        Box::new(RecordingAgent::new("generation", calls.clone())),
        Box::new(RecordingAgent::new("parsing", calls.clone())),
        Duration::from_secs(5),
    )
}

pub fn session_ids() -> SessionIds {
    SessionIds {
        reasoning: "reasoning-session".into(),
        generation: "generation-session".into(),
        parsing: "parsing-session".into(),
    }
}

pub fn io(lines: &[&str]) -> Io {
    Io::new(Box::new(ScriptedPrompter::new(lines)), Console::sink())
}

/// A ready context with temporary log and session directories.
pub struct Harness {
    pub ctx: Context,
    pub calls: CallLog,
    pub log_dir: TempDir,
    pub session_dir: TempDir,
}

pub fn harness(lines: &[&str]) -> Harness {
    harness_with(lines, Settings::default())
}

pub fn harness_with(lines: &[&str], settings: Settings) -> Harness {
    let calls = CallLog::default();
    let log_dir = TempDir::new().unwrap();
    let session_dir = TempDir::new().unwrap();
    let ctx = Context::new(
        recording_agents(&calls),
        ActiveSession::new(session_ids(), TaskLog::new()),
        History::new(),
        io(lines),
        Box::new(StaticSearch(vec![SearchResult {
            title: "OpenSSH 7.2 vulnerabilities".into(),
            url: "https://example.org/openssh".into(),
            snippet: "Known CVEs for OpenSSH 7.2".into(),
        }])),
        SessionStore::new(session_dir.path()),
        settings,
    );
    Harness {
        ctx,
        calls,
        log_dir,
        session_dir,
    }
}

pub fn roles(calls: &CallLog) -> Vec<String> {
    calls.lock().unwrap().iter().map(|(r, _)| r.clone()).collect()
}
