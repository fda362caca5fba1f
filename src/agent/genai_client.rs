//! Agent client backed by the `genai` multi-provider chat client.
//!
//! Chat-completion APIs are stateless, so each session id maps to a locally
//! held message list that is replayed on every call. Session ids are v4 UUIDs.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use genai::Client;
use genai::chat::{ChatMessage, ChatRequest};
use uuid::Uuid;

use super::AgentClient;
use crate::error::AgentError;

pub struct GenAiAgent {
    /// Name the user selected (e.g. "gpt-4-o").
    name: String,
    /// Model identifier passed to genai (e.g. "gpt-4o").
    model: String,
    client: Client,
    sessions: Mutex<HashMap<String, Vec<ChatMessage>>>,
}

impl GenAiAgent {
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
            client: Client::default(),
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Messages recorded so far for `session_id` (empty for unknown ids).
    fn transcript(&self, session_id: &str) -> Vec<ChatMessage> {
        let sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        sessions.get(session_id).cloned().unwrap_or_default()
    }

    fn record_exchange(&self, session_id: &str, user: &str, reply: &str) {
        let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        let messages = sessions.entry(session_id.to_string()).or_default();
        messages.push(ChatMessage::user(user));
        messages.push(ChatMessage::assistant(reply));
    }

    async fn complete(&self, mut messages: Vec<ChatMessage>, text: &str) -> Result<String, AgentError> {
        messages.push(ChatMessage::user(text));
        let request = ChatRequest::new(messages);

        let response = self
            .client
            .exec_chat(self.model.as_str(), request, None)
            .await
            .map_err(|e| AgentError::Call {
                agent: self.name.clone(),
                message: e.to_string(),
            })?;

        response
            .first_text()
            .map(str::to_string)
            .ok_or_else(|| AgentError::Call {
                agent: self.name.clone(),
                message: "response contained no text".to_string(),
            })
    }
}

#[async_trait]
impl AgentClient for GenAiAgent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn send_new_message(&self, init_prompt: &str) -> Result<(String, String), AgentError> {
        let session_id = Uuid::new_v4().to_string();
        let reply = self.complete(Vec::new(), init_prompt).await?;
        self.record_exchange(&session_id, init_prompt, &reply);
        Ok((reply, session_id))
    }

    async fn send_message(&self, text: &str, session_id: &str) -> Result<String, AgentError> {
        // The lock is released before the request is awaited; a failed call
        // leaves the session untouched.
        let history = self.transcript(session_id);
        let reply = self.complete(history, text).await?;
        self.record_exchange(session_id, text, &reply);
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_session_starts_empty() {
        let agent = GenAiAgent::new("gpt-4-o", "gpt-4o");
        assert!(agent.transcript("restored-id").is_empty());
    }

    #[test]
    fn exchanges_accumulate_per_session() {
        let agent = GenAiAgent::new("gpt-4-o", "gpt-4o");
        agent.record_exchange("a", "hello", "hi");
        agent.record_exchange("a", "scan done", "noted");
        agent.record_exchange("b", "other", "reply");

        assert_eq!(agent.transcript("a").len(), 4);
        assert_eq!(agent.transcript("b").len(), 2);
        assert_eq!(agent.model, "gpt-4o");
        assert_eq!(agent.name(), "gpt-4-o");
    }
}
