//! Navigation History
//!
//! The back/forward stack of visited paths, and the bounded log of completed
//! navigations kept for diagnostics.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Log length above which the log is trimmed.
pub const HISTORY_LIMIT: usize = 50;
/// Entries kept when the log is trimmed.
pub const HISTORY_KEEP: usize = 25;

// == Navigation Record ==
/// One completed navigation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavigationRecord {
    pub path: String,
    pub previous_path: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl NavigationRecord {
    pub fn new(path: impl Into<String>, previous_path: Option<String>) -> Self {
        Self {
            path: path.into(),
            previous_path,
            timestamp: Utc::now(),
        }
    }
}

/// Appends `record`, trimming to the newest [`HISTORY_KEEP`] entries once the
/// log grows past [`HISTORY_LIMIT`].
pub fn push_record(log: &mut Vec<NavigationRecord>, record: NavigationRecord) {
    log.push(record);
    if log.len() > HISTORY_LIMIT {
        log.drain(..log.len() - HISTORY_KEEP);
    }
}

// == Session History ==
/// Back/forward stack with a cursor at the current entry.
#[derive(Debug, Clone)]
pub struct SessionHistory {
    entries: Vec<String>,
    cursor: usize,
}

impl SessionHistory {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            entries: vec![initial.into()],
            cursor: 0,
        }
    }

    /// Pushes `path` as the new current entry, dropping any forward entries.
    pub fn push(&mut self, path: impl Into<String>) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(path.into());
        self.cursor = self.entries.len() - 1;
    }

    pub fn current(&self) -> &str {
        &self.entries[self.cursor]
    }

    pub fn back_target(&self) -> Option<&str> {
        self.cursor
            .checked_sub(1)
            .map(|i| self.entries[i].as_str())
    }

    pub fn forward_target(&self) -> Option<&str> {
        self.entries.get(self.cursor + 1).map(String::as_str)
    }

    /// Moves the cursor by one entry back (`-1`) or forward (`1`).
    pub fn step(&mut self, delta: isize) {
        let target = self.cursor as isize + delta;
        if target >= 0 && (target as usize) < self.entries.len() {
            self.cursor = target as usize;
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_record_trims_to_newest() {
        let mut log = Vec::new();
        for i in 0..=HISTORY_LIMIT {
            push_record(&mut log, NavigationRecord::new(format!("/p{i}"), None));
        }

        assert_eq!(log.len(), HISTORY_KEEP);
        assert_eq!(log.last().unwrap().path, format!("/p{HISTORY_LIMIT}"));
        assert_eq!(log[0].path, format!("/p{}", HISTORY_LIMIT + 1 - HISTORY_KEEP));
    }

    #[test]
    fn test_push_record_keeps_up_to_limit() {
        let mut log = Vec::new();
        for i in 0..HISTORY_LIMIT {
            push_record(&mut log, NavigationRecord::new(format!("/p{i}"), None));
        }
        assert_eq!(log.len(), HISTORY_LIMIT);
    }

    #[test]
    fn test_session_back_and_forward() {
        let mut history = SessionHistory::new("/");
        history.push("/information");
        history.push("/analytics");

        assert_eq!(history.current(), "/analytics");
        assert_eq!(history.back_target(), Some("/information"));
        assert_eq!(history.forward_target(), None);

        history.step(-1);
        assert_eq!(history.current(), "/information");
        assert_eq!(history.forward_target(), Some("/analytics"));

        history.step(-1);
        history.step(-1);
        assert_eq!(history.current(), "/");
        assert_eq!(history.back_target(), None);
    }

    #[test]
    fn test_push_drops_forward_entries() {
        let mut history = SessionHistory::new("/");
        history.push("/information");
        history.step(-1);
        history.push("/stock?bank_code=VCB");

        assert_eq!(history.len(), 2);
        assert_eq!(history.forward_target(), None);
        assert_eq!(history.back_target(), Some("/"));
    }
}
