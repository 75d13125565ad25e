//! Campaign progress persistence
//!
//! Progress is a small JSON document (highest level reached, best score,
//! unlocked level list). Stores degrade gracefully: a missing or corrupt
//! file loads as defaults with a `warn!`, and a failed write is logged but
//! never interrupts play.

use std::fs;
use std::io;
use std::path::PathBuf;

use log::{info, warn};
use serde::{Deserialize, Serialize};

/// Saved campaign progress
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub highest_level: u32,
    pub high_score: u64,
    pub unlocked_levels: Vec<u32>,
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            highest_level: 1,
            high_score: 0,
            unlocked_levels: vec![1],
        }
    }
}

impl Progress {
    /// Merge a finished-level result in. Level and score only ever rise;
    /// `unlock_next` appends the following level at most once, never past
    /// the end of the campaign.
    pub fn record(&mut self, level: u32, score: u64, unlock_next: bool) {
        self.highest_level = self.highest_level.max(level);
        self.high_score = self.high_score.max(score);
        let next = level + 1;
        if unlock_next
            && next <= crate::levels::TOTAL_LEVELS
            && !self.unlocked_levels.contains(&next)
        {
            self.unlocked_levels.push(next);
        }
        self.unlocked_levels.sort_unstable();
    }

    pub fn is_unlocked(&self, level: u32) -> bool {
        self.unlocked_levels.contains(&level)
    }
}

/// Progress storage boundary; the session calls this on level clear and
/// session end
pub trait ProgressStore {
    fn load(&mut self) -> Progress;
    fn save(&mut self, progress: &Progress) -> io::Result<()>;
}

/// JSON file-backed store
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ProgressStore for FileStore {
    fn load(&mut self) -> Progress {
        match fs::read_to_string(&self.path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(progress) => progress,
                Err(err) => {
                    warn!("corrupt progress file {:?}: {err}", self.path);
                    Progress::default()
                }
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => Progress::default(),
            Err(err) => {
                warn!("failed to read progress file {:?}: {err}", self.path);
                Progress::default()
            }
        }
    }

    fn save(&mut self, progress: &Progress) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(progress).map_err(io::Error::other)?;
        fs::write(&self.path, json)?;
        info!("progress saved to {:?}", self.path);
        Ok(())
    }
}

/// In-memory store for tests and embedders without a filesystem
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub progress: Progress,
}

impl ProgressStore for MemoryStore {
    fn load(&mut self) -> Progress {
        self.progress.clone()
    }

    fn save(&mut self, progress: &Progress) -> io::Result<()> {
        self.progress = progress.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_is_monotone() {
        let mut progress = Progress::default();
        progress.record(3, 500, true);
        assert_eq!(progress.highest_level, 3);
        assert_eq!(progress.high_score, 500);
        assert!(progress.is_unlocked(4));

        // A worse run never regresses anything
        progress.record(2, 100, false);
        assert_eq!(progress.highest_level, 3);
        assert_eq!(progress.high_score, 500);
    }

    #[test]
    fn test_unlock_next_appends_once() {
        let mut progress = Progress::default();
        progress.record(1, 10, true);
        progress.record(1, 20, true);
        let twos = progress.unlocked_levels.iter().filter(|&&l| l == 2).count();
        assert_eq!(twos, 1);
    }

    #[test]
    fn test_unlock_stops_at_campaign_end() {
        let mut progress = Progress::default();
        progress.record(crate::levels::TOTAL_LEVELS, 1, true);
        assert!(!progress.is_unlocked(crate::levels::TOTAL_LEVELS + 1));
    }

    #[test]
    fn test_corrupt_file_loads_defaults() {
        let dir = std::env::temp_dir().join("bubblebyte-test-corrupt");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("progress.json");
        fs::write(&path, "{not valid json").unwrap();

        let mut store = FileStore::new(&path);
        assert_eq!(store.load(), Progress::default());
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = std::env::temp_dir().join("bubblebyte-test-roundtrip");
        let path = dir.join("progress.json");
        let mut store = FileStore::new(&path);

        let mut progress = store.load();
        progress.record(5, 12_345, true);
        store.save(&progress).unwrap();

        assert_eq!(FileStore::new(&path).load(), progress);
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_file_is_defaults() {
        let mut store = FileStore::new("/nonexistent/dir/progress.json");
        assert_eq!(store.load(), Progress::default());
    }
}
