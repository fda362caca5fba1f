//! Chat agents used by the REPL.
//!
//! Three logical agents share one interface: the parsing agent condenses long
//! inputs, the reasoning agent maintains the testing plan, and the generation
//! agent turns plan items into concrete instructions. [`AgentSet`] bundles the
//! three and bounds every call with a timeout.

pub mod genai_client;
pub mod prompts;
pub mod registry;

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::AgentError;

/// A remote chat backend addressed by session id.
#[async_trait]
pub trait AgentClient: Send + Sync {
    /// Human-readable backend name (usually the model name).
    fn name(&self) -> &str;

    /// Open a new conversation seeded with `init_prompt`.
    ///
    /// Returns the model's reply and the id of the new session.
    async fn send_new_message(&self, init_prompt: &str) -> Result<(String, String), AgentError>;

    /// Send `text` within an existing session and return the reply.
    async fn send_message(&self, text: &str, session_id: &str) -> Result<String, AgentError>;
}

/// The role an agent plays in the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentRole {
    Reasoning,
    Generation,
    Parsing,
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AgentRole::Reasoning => "reasoning",
            AgentRole::Generation => "generation",
            AgentRole::Parsing => "parsing",
        };
        f.write_str(name)
    }
}

/// The three agents plus the per-call timeout applied to each of them.
pub struct AgentSet {
    reasoning: Box<dyn AgentClient>,
    generation: Box<dyn AgentClient>,
    parsing: Box<dyn AgentClient>,
    timeout: Duration,
}

impl AgentSet {
    pub fn new(
        reasoning: Box<dyn AgentClient>,
        generation: Box<dyn AgentClient>,
        parsing: Box<dyn AgentClient>,
        timeout: Duration,
    ) -> Self {
        Self {
            reasoning,
            generation,
            parsing,
            timeout,
        }
    }

    pub fn client(&self, role: AgentRole) -> &dyn AgentClient {
        match role {
            AgentRole::Reasoning => self.reasoning.as_ref(),
            AgentRole::Generation => self.generation.as_ref(),
            AgentRole::Parsing => self.parsing.as_ref(),
        }
    }

    /// Start a new session for `role`. Returns `(reply, session_id)`.
    pub async fn start(
        &self,
        role: AgentRole,
        init_prompt: &str,
    ) -> Result<(String, String), AgentError> {
        let client = self.client(role);
        tracing::debug!(%role, agent = client.name(), "Opening agent session");
        let result = self
            .bounded(client, client.send_new_message(init_prompt))
            .await;
        if let Err(ref e) = result {
            tracing::warn!(%role, "Agent session init failed: {e}");
        }
        result
    }

    /// Send `text` to `role` within `session_id`.
    pub async fn send(
        &self,
        role: AgentRole,
        text: &str,
        session_id: &str,
    ) -> Result<String, AgentError> {
        let client = self.client(role);
        tracing::debug!(
            %role,
            agent = client.name(),
            session_id,
            chars = text.chars().count(),
            "Sending agent message"
        );
        let result = self
            .bounded(client, client.send_message(text, session_id))
            .await;
        match &result {
            Ok(reply) => tracing::debug!(%role, chars = reply.chars().count(), "Agent replied"),
            Err(e) => tracing::warn!(%role, "Agent call failed: {e}"),
        }
        result
    }

    async fn bounded<T>(
        &self,
        client: &dyn AgentClient,
        call: impl Future<Output = Result<T, AgentError>>,
    ) -> Result<T, AgentError> {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(AgentError::Timeout {
                agent: client.name().to_string(),
                timeout_secs: self.timeout.as_secs(),
            }),
        }
    }
}
