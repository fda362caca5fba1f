//! Model name -> agent constructor lookup.

use std::collections::BTreeMap;

use super::AgentClient;
use super::genai_client::GenAiAgent;
use crate::error::AgentError;

type Constructor = Box<dyn Fn() -> Box<dyn AgentClient> + Send + Sync>;

/// Maps user-facing model names to agent constructors.
pub struct AgentRegistry {
    constructors: BTreeMap<String, Constructor>,
}

/// Built-in model names and the provider model id genai should call.
const BUILTIN_MODELS: &[(&str, &str)] = &[
    ("gpt-3.5-turbo-16k", "gpt-3.5-turbo-16k"),
    ("gpt-4", "gpt-4"),
    ("gpt-4-turbo", "gpt-4-turbo"),
    ("gpt-4-o", "gpt-4o"),
    ("gpt-4o-mini", "gpt-4o-mini"),
    ("claude-3-5-sonnet", "claude-3-5-sonnet-latest"),
    ("gemini-1.5-pro", "gemini-1.5-pro"),
    ("deepseek-chat", "deepseek-chat"),
    ("llama3.2", "llama3.2"),
];

impl AgentRegistry {
    pub fn empty() -> Self {
        Self {
            constructors: BTreeMap::new(),
        }
    }

    /// Registry pre-populated with the genai-backed models.
    pub fn with_builtin_models() -> Self {
        let mut registry = Self::empty();
        for &(name, model) in BUILTIN_MODELS {
            registry.register(name, move || {
                Box::new(GenAiAgent::new(name, model)) as Box<dyn AgentClient>
            });
        }
        registry
    }

    /// Register (or replace) a constructor under `name`.
    pub fn register<F>(&mut self, name: &str, constructor: F)
    where
        F: Fn() -> Box<dyn AgentClient> + Send + Sync + 'static,
    {
        self.constructors
            .insert(name.to_string(), Box::new(constructor));
    }

    /// Build an agent for `name`, or fail with [`AgentError::ModelNotFound`].
    pub fn create(&self, name: &str) -> Result<Box<dyn AgentClient>, AgentError> {
        self.constructors
            .get(name)
            .map(|construct| construct())
            .ok_or_else(|| AgentError::ModelNotFound {
                name: name.to_string(),
                available: self.names().join(", "),
            })
    }

    pub fn names(&self) -> Vec<&str> {
        self.constructors.keys().map(String::as_str).collect()
    }
}
