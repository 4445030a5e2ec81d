//! Highscore table persisted as JSON.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Entries kept in the table.
pub const MAX_ENTRIES: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighscoreEntry {
    pub name: String,
    pub score: u32,
    pub lines: u32,
    /// Unix seconds.
    pub achieved_at: u64,
}

/// Best scores, highest first. Equal scores keep insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HighscoreTable {
    entries: Vec<HighscoreEntry>,
}

impl HighscoreTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[HighscoreEntry] {
        &self.entries
    }

    pub fn best(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }

    /// Whether `score` would make it into the table.
    pub fn qualifies(&self, score: u32) -> bool {
        self.rank_for(score) < MAX_ENTRIES
    }

    fn rank_for(&self, score: u32) -> usize {
        self.entries
            .iter()
            .position(|e| e.score < score)
            .unwrap_or(self.entries.len())
    }

    /// Insert `entry`, returning its 0-based rank, or `None` if it did not
    /// place.
    pub fn insert(&mut self, entry: HighscoreEntry) -> Option<usize> {
        let rank = self.rank_for(entry.score);
        if rank >= MAX_ENTRIES {
            return None;
        }
        self.entries.insert(rank, entry);
        self.entries.truncate(MAX_ENTRIES);
        Some(rank)
    }

    /// Load from `path`. A missing file is an empty table; an unreadable one
    /// is logged and treated as empty.
    pub fn load(path: &Path) -> Self {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::new(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read highscores");
                return Self::new();
            }
        };
        match serde_json::from_slice::<Self>(&bytes) {
            Ok(mut table) => {
                table.entries.sort_by(|a, b| b.score.cmp(&a.score));
                table.entries.truncate(MAX_ENTRIES);
                table
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring corrupt highscores");
                Self::new()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_vec_pretty(self).context("failed to encode highscores")?;
        fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, score: u32) -> HighscoreEntry {
        HighscoreEntry {
            name: name.to_string(),
            score,
            lines: 0,
            achieved_at: 0,
        }
    }

    #[test]
    fn test_insert_keeps_descending_order() {
        let mut table = HighscoreTable::new();
        assert_eq!(table.insert(entry("a", 100)), Some(0));
        assert_eq!(table.insert(entry("b", 300)), Some(0));
        assert_eq!(table.insert(entry("c", 200)), Some(1));
        assert_eq!(table.insert(entry("d", 200)), Some(2));

        let scores: Vec<_> = table.entries().iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![300, 200, 200, 100]);
        assert_eq!(table.entries()[1].name, "c");
        assert_eq!(table.best(), Some(300));
    }

    #[test]
    fn test_full_table_drops_lowest() {
        let mut table = HighscoreTable::new();
        for i in 1..=MAX_ENTRIES as u32 {
            table.insert(entry("p", i * 10));
        }
        assert!(!table.qualifies(10));
        assert_eq!(table.insert(entry("low", 5)), None);
        assert!(table.qualifies(11));
        assert_eq!(table.insert(entry("new", 11)), Some(9));
        assert_eq!(table.entries().len(), MAX_ENTRIES);
        assert_eq!(table.entries().last().map(|e| e.score), Some(11));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores").join("highscores.json");
        let mut table = HighscoreTable::new();
        table.insert(entry("ada", 1200));
        table.save(&path).unwrap();
        assert_eq!(HighscoreTable::load(&path), table);
    }

    #[test]
    fn test_missing_or_corrupt_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("highscores.json");
        assert!(HighscoreTable::load(&path).entries().is_empty());
        fs::write(&path, "[oops").unwrap();
        assert!(HighscoreTable::load(&path).entries().is_empty());
    }
}
