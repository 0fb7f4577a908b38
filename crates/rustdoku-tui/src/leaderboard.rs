//! File-backed leaderboard store and fire-and-forget submission.
//!
//! Scores live in a JSON file under the platform's local data directory,
//! kept sorted by score descending so reads are a plain prefix take.

use rustdoku_core::leaderboard::{
    LeaderboardEntry, LeaderboardError, LeaderboardResult, LeaderboardStore, NewScore,
    TOP_SCORES_LIMIT,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

/// Entries kept on disk beyond the visible top list.
const MAX_STORED: usize = 100;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoreData {
    entries: Vec<LeaderboardEntry>,
}

/// JSON-file leaderboard for local play.
pub struct LocalStore {
    path: PathBuf,
    cache: Mutex<Option<StoreData>>,
}

impl LocalStore {
    pub fn new() -> Self {
        let path = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("rustdoku_leaderboard.json");
        Self::with_path(path)
    }

    /// Store backed by an explicit file, used by tests.
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            path,
            cache: Mutex::new(None),
        }
    }

    fn load(&self) -> StoreData {
        let mut cache = self.cache.lock().unwrap();
        if let Some(ref data) = *cache {
            return data.clone();
        }

        let data = match std::fs::read_to_string(&self.path) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_default(),
            Err(_) => StoreData::default(),
        };

        *cache = Some(data.clone());
        data
    }

    fn save(&self, data: &StoreData) -> LeaderboardResult<()> {
        let json = serde_json::to_string_pretty(data)
            .map_err(|e| LeaderboardError::Storage(e.to_string()))?;

        std::fs::write(&self.path, json).map_err(|e| LeaderboardError::Storage(e.to_string()))?;

        *self.cache.lock().unwrap() = Some(data.clone());
        Ok(())
    }

    fn now_unix() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

impl Default for LocalStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LeaderboardStore for LocalStore {
    fn submit(&self, score: NewScore) -> LeaderboardResult<()> {
        let mut data = self.load();

        let entry = LeaderboardEntry {
            player_name: score.player_name,
            score: score.score,
            game_time_secs: score.game_time_secs,
            difficulty: score.difficulty,
            timestamp: Self::now_unix(),
        };

        // Insert in sorted position, best score first.
        let pos = data
            .entries
            .iter()
            .position(|e| e.score < entry.score)
            .unwrap_or(data.entries.len());
        data.entries.insert(pos, entry);
        data.entries.truncate(MAX_STORED);

        self.save(&data)
    }

    fn top_scores(&self) -> LeaderboardResult<Vec<LeaderboardEntry>> {
        let data = self.load();
        Ok(data.entries.into_iter().take(TOP_SCORES_LIMIT).collect())
    }
}

/// Submit a score on a detached thread. The win transition never waits for
/// (or depends on) the outcome; a failure is only logged.
pub fn submit_detached(store: Arc<dyn LeaderboardStore>, score: NewScore) {
    std::thread::spawn(move || {
        if let Err(e) = store.submit(score) {
            log::warn!("score submission failed: {e}");
        }
    });
}
