//! Named save slots in a directory, one JSON file per slot.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::{debug, info};

use crate::record::SavedGame;

const EXTENSION: &str = "sav";

/// Directory of save slots. Slot `name` lives in `<dir>/<name>.sav`.
#[derive(Debug, Clone)]
pub struct SaveStore {
    dir: PathBuf,
}

impl SaveStore {
    /// Open `dir`, creating it if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create save directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Slot names are limited to ASCII letters, digits, `-` and `_`.
    fn slot_path(&self, slot: &str) -> Result<PathBuf> {
        let valid = !slot.is_empty()
            && slot
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            bail!("invalid save slot name {:?}", slot);
        }
        Ok(self.dir.join(format!("{}.{}", slot, EXTENSION)))
    }

    /// Write `game` to `slot`, replacing what was there.
    ///
    /// The record goes to a temporary file first and is renamed into place.
    pub fn save(&self, slot: &str, game: &SavedGame) -> Result<()> {
        let path = self.slot_path(slot)?;
        let tmp = path.with_extension("sav.tmp");
        let json = serde_json::to_vec_pretty(game).context("failed to encode saved game")?;
        fs::write(&tmp, json).with_context(|| format!("failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &path)
            .with_context(|| format!("failed to move save into {}", path.display()))?;
        info!(slot, score = game.score, path = %path.display(), "game saved");
        Ok(())
    }

    pub fn load(&self, slot: &str) -> Result<SavedGame> {
        let path = self.slot_path(slot)?;
        let bytes =
            fs::read(&path).with_context(|| format!("failed to read save {}", path.display()))?;
        let game = serde_json::from_slice(&bytes)
            .with_context(|| format!("failed to parse save {}", path.display()))?;
        debug!(slot, "game loaded");
        Ok(game)
    }

    /// Remove `slot`. Returns false if it did not exist.
    pub fn delete(&self, slot: &str) -> Result<bool> {
        let path = self.slot_path(slot)?;
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path)
            .with_context(|| format!("failed to delete save {}", path.display()))?;
        info!(slot, "save deleted");
        Ok(true)
    }

    pub fn exists(&self, slot: &str) -> bool {
        self.slot_path(slot).map(|p| p.is_file()).unwrap_or(false)
    }

    /// Slot names in the directory, sorted.
    pub fn list(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.dir)
            .with_context(|| format!("failed to list {}", self.dir.display()))?;
        let mut slots = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                slots.push(stem.to_string());
            }
        }
        slots.sort();
        Ok(slots)
    }
}
