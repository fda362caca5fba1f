pub mod history;
pub mod store;

pub use history::{History, HistoryEntry, HistorySource};
pub use store::{ActiveSession, SessionIds, SessionRecord, SessionStore, TaskLog};
