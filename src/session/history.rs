//! Append-only conversation history.
//!
//! Every prompt, reply and failure of a run is recorded with a Unix timestamp
//! and a source tag. The list is written once, as a JSON array, when the
//! session shuts down.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Where a history entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistorySource {
    User,
    Assistant,
    Reasoning,
    Parsing,
    Generation,
    Exception,
}

impl HistorySource {
    pub const ALL: [HistorySource; 6] = [
        HistorySource::User,
        HistorySource::Assistant,
        HistorySource::Reasoning,
        HistorySource::Parsing,
        HistorySource::Generation,
        HistorySource::Exception,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HistorySource::User => "user",
            HistorySource::Assistant => "assistant",
            HistorySource::Reasoning => "reasoning",
            HistorySource::Parsing => "parsing",
            HistorySource::Generation => "generation",
            HistorySource::Exception => "exception",
        }
    }

    /// Map a tag to its source. Unknown tags land in `Exception`.
    pub fn from_tag(tag: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|source| source.as_str() == tag)
            .unwrap_or(HistorySource::Exception)
    }
}

impl fmt::Display for HistorySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Seconds since the Unix epoch.
    pub timestamp: f64,
    pub source: HistorySource,
    pub text: String,
}

#[derive(Debug, Default)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

/// Current time as fractional seconds since the Unix epoch.
pub fn unix_timestamp() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, source: HistorySource, text: impl Into<String>) {
        // Timestamps never go backwards, even if the wall clock does.
        let now = unix_timestamp();
        let timestamp = self
            .entries
            .last()
            .map_or(now, |last| now.max(last.timestamp));
        self.entries.push(HistoryEntry {
            timestamp,
            source,
            text: text.into(),
        });
    }

    /// Append under a free-form tag; unknown tags are recorded as `exception`.
    pub fn append_tagged(&mut self, tag: &str, text: impl Into<String>) {
        let source = HistorySource::from_tag(tag);
        if source == HistorySource::Exception && tag != "exception" {
            tracing::debug!(tag, "Unknown history source, recording as exception");
        }
        self.append(source, text);
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count(&self, source: HistorySource) -> usize {
        self.entries.iter().filter(|e| e.source == source).count()
    }

    /// Write the whole history to `<dir>/<prefix>_log_<timestamp>.txt`.
    pub fn flush(&self, dir: &Path, prefix: &str) -> anyhow::Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(format!("{prefix}_log_{}.txt", unix_timestamp()));
        let json = serde_json::to_string(&self.entries)?;
        fs::write(&path, json)?;
        tracing::info!(entries = self.entries.len(), path = %path.display(), "History written");
        Ok(path)
    }
}
