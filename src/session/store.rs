//! Saved sessions, one JSON file per session in a dedicated directory.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::history::unix_timestamp;
use crate::error::SessionError;

/// Task metadata carried across resumed sessions.
pub type TaskLog = BTreeMap<String, String>;

/// Identifiers of the three agent sessions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIds {
    pub reasoning: String,
    pub generation: String,
    pub parsing: String,
}

/// On-disk form of a saved session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub reasoning: Option<String>,
    pub test_generation: Option<String>,
    pub parsing: Option<String>,
    #[serde(default)]
    pub task_log: TaskLog,
}

impl SessionRecord {
    /// All three ids, or `None` if any is missing.
    pub fn ids(&self) -> Option<SessionIds> {
        Some(SessionIds {
            reasoning: self.reasoning.clone()?,
            generation: self.test_generation.clone()?,
            parsing: self.parsing.clone()?,
        })
    }
}

/// The session a running REPL works in. Always holds all three ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSession {
    pub ids: SessionIds,
    pub task_log: TaskLog,
}

impl ActiveSession {
    pub fn new(ids: SessionIds, task_log: TaskLog) -> Self {
        Self { ids, task_log }
    }

    pub fn to_record(&self) -> SessionRecord {
        SessionRecord {
            reasoning: Some(self.ids.reasoning.clone()),
            test_generation: Some(self.ids.generation.clone()),
            parsing: Some(self.ids.parsing.clone()),
            task_log: self.task_log.clone(),
        }
    }
}

static UNSAFE_NAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9._-]").expect("static regex"));

/// Turn a user-supplied name into a file name that stays inside the store.
fn sanitize_name(name: &str) -> String {
    let cleaned = UNSAFE_NAME_CHARS.replace_all(name.trim(), "_");
    match cleaned.strip_prefix('.') {
        Some(rest) => format!("_{rest}"),
        None => cleaned.into_owned(),
    }
}

pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Save `record` under `name` (blank -> current Unix timestamp).
    /// Returns the file name used.
    pub fn save(&self, record: &SessionRecord, name: &str) -> Result<String, SessionError> {
        let file_name = if name.trim().is_empty() {
            unix_timestamp().to_string()
        } else {
            sanitize_name(name)
        };

        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(record).map_err(|e| SessionError::Malformed {
            path: self.dir.join(&file_name),
            message: e.to_string(),
        })?;
        fs::write(self.dir.join(&file_name), json)?;

        tracing::info!(name = %file_name, dir = %self.dir.display(), "Session saved");
        Ok(file_name)
    }

    /// Load the session stored under exactly `name`, as returned by
    /// [`SessionStore::list`]. Names that could leave the directory are refused.
    pub fn load(&self, name: &str) -> Result<SessionRecord, SessionError> {
        if matches!(name, "" | "." | "..") || name.contains(['/', '\\']) {
            return Err(SessionError::InvalidName(name.to_string()));
        }
        let path = self.dir.join(name);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SessionError::NotFound {
                    name: name.to_string(),
                    dir: self.dir.clone(),
                });
            }
            Err(e) => {
                return Err(SessionError::Malformed {
                    path,
                    message: e.to_string(),
                });
            }
        };

        serde_json::from_str(&contents).map_err(|e| SessionError::Malformed {
            path,
            message: e.to_string(),
        })
    }

    /// Names of saved sessions, sorted. A missing directory lists as empty.
    pub fn list(&self) -> Result<Vec<String>, SessionError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn sanitize_keeps_plain_names() {
        assert_eq!(sanitize_name("htb-lame_01.v2"), "htb-lame_01.v2");
    }

    #[test]
    fn sanitize_blocks_path_escape() {
        assert_eq!(sanitize_name("../../etc/passwd"), "_._.._etc_passwd");
        assert_eq!(sanitize_name(".hidden"), "_hidden");
        assert_eq!(sanitize_name("my target"), "my_target");
    }

    #[test]
    fn record_with_missing_id_has_no_ids() {
        let record = SessionRecord {
            reasoning: Some("r".into()),
            test_generation: None,
            parsing: Some("p".into()),
            task_log: TaskLog::new(),
        };
        assert!(record.ids().is_none());
    }

    #[test]
    fn blank_name_uses_timestamp() {
        let tmp = TempDir::new().unwrap();
        let store = SessionStore::new(tmp.path().join("test_history"));
        let name = store.save(&SessionRecord::default(), "  ").unwrap();
        assert!(name.parse::<f64>().is_ok(), "{name} should be a timestamp");
        assert_eq!(store.list().unwrap(), vec![name]);
    }

    #[test]
    fn listed_names_load_verbatim() {
        let tmp = TempDir::new().unwrap();
        let record = SessionRecord {
            reasoning: Some("r-1".into()),
            ..SessionRecord::default()
        };
        fs::write(
            tmp.path().join("my session"),
            serde_json::to_string(&record).unwrap(),
        )
        .unwrap();
        let store = SessionStore::new(tmp.path());

        let names = store.list().unwrap();
        assert_eq!(names, vec!["my session"]);
        assert_eq!(store.load(&names[0]).unwrap(), record);
    }

    #[test]
    fn saved_name_round_trips_through_load() {
        let tmp = TempDir::new().unwrap();
        let store = SessionStore::new(tmp.path());
        let saved = store.save(&SessionRecord::default(), "htb lame").unwrap();
        assert_eq!(saved, "htb_lame");
        assert_eq!(store.load(&saved).unwrap(), SessionRecord::default());
    }

    #[test]
    fn load_refuses_names_outside_the_store() {
        let tmp = TempDir::new().unwrap();
        let store = SessionStore::new(tmp.path().join("sessions"));
        for name in ["../secrets", "..", "a/b", "a\\b", ""] {
            assert!(
                matches!(store.load(name), Err(SessionError::InvalidName(_))),
                "{name:?} should be refused"
            );
        }
    }

    #[test]
    fn missing_dir_lists_empty() {
        let tmp = TempDir::new().unwrap();
        let store = SessionStore::new(tmp.path().join("nope"));
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn serialized_keys_match_file_format() {
        let record = SessionRecord {
            reasoning: Some("r-1".into()),
            test_generation: Some("g-1".into()),
            parsing: Some("p-1".into()),
            task_log: TaskLog::from([("task description".into(), "10.0.0.5 web".into())]),
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["reasoning"], "r-1");
        assert_eq!(value["test_generation"], "g-1");
        assert_eq!(value["parsing"], "p-1");
        assert_eq!(value["task_log"]["task description"], "10.0.0.5 web");
    }
}
