//! Leaderboard collaborator boundary.
//!
//! The engine never talks to storage or the network itself; it submits
//! finished scores to, and reads top lists from, whatever implements
//! [`LeaderboardStore`]. Failures on this boundary are logged and absorbed:
//! a lost submission never rolls back a win, and a failed fetch degrades to
//! an empty list.

use crate::Difficulty;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Mutex;

/// How many entries a top-scores read returns, best score first.
pub const TOP_SCORES_LIMIT: usize = 10;

/// A stored leaderboard row. The timestamp is assigned by the store at
/// submission time, never by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub player_name: String,
    pub score: u32,
    pub game_time_secs: u64,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub timestamp: u64,
}

/// A finished game's score, as submitted by the frontend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewScore {
    pub player_name: String,
    pub score: u32,
    pub game_time_secs: u64,
    pub difficulty: Difficulty,
}

/// Errors crossing the store boundary.
#[derive(Debug, Clone)]
pub enum LeaderboardError {
    /// Reading or writing the backing storage failed.
    Storage(String),
    /// The store is not reachable right now.
    Unavailable,
}

impl fmt::Display for LeaderboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage(e) => write!(f, "storage error: {e}"),
            Self::Unavailable => write!(f, "leaderboard unavailable"),
        }
    }
}

impl std::error::Error for LeaderboardError {}

pub type LeaderboardResult<T> = Result<T, LeaderboardError>;

/// A score store. `Send + Sync` so submissions can run on a detached thread
/// while the game loop keeps going.
pub trait LeaderboardStore: Send + Sync {
    /// Persist a finished game's score. The store assigns the timestamp.
    fn submit(&self, score: NewScore) -> LeaderboardResult<()>;

    /// The best [`TOP_SCORES_LIMIT`] entries, ordered by score descending.
    fn top_scores(&self) -> LeaderboardResult<Vec<LeaderboardEntry>>;
}

/// Generated player name used when none is configured.
pub fn guest_name() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(char::from)
        .collect();
    format!("Guest player {suffix}")
}

/// In-memory store for tests, with a switchable unavailable mode to
/// exercise the failure path.
#[derive(Default)]
pub struct MockStore {
    entries: Mutex<Vec<LeaderboardEntry>>,
    unavailable: Mutex<bool>,
    clock: Mutex<u64>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.lock().unwrap() = unavailable;
    }

    pub fn count(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}

impl LeaderboardStore for MockStore {
    fn submit(&self, score: NewScore) -> LeaderboardResult<()> {
        if *self.unavailable.lock().unwrap() {
            return Err(LeaderboardError::Unavailable);
        }

        let mut clock = self.clock.lock().unwrap();
        *clock += 1;
        let entry = LeaderboardEntry {
            player_name: score.player_name,
            score: score.score,
            game_time_secs: score.game_time_secs,
            difficulty: score.difficulty,
            timestamp: *clock,
        };

        let mut entries = self.entries.lock().unwrap();
        let pos = entries
            .iter()
            .position(|e| e.score < entry.score)
            .unwrap_or(entries.len());
        entries.insert(pos, entry);
        Ok(())
    }

    fn top_scores(&self) -> LeaderboardResult<Vec<LeaderboardEntry>> {
        if *self.unavailable.lock().unwrap() {
            return Err(LeaderboardError::Unavailable);
        }
        let entries = self.entries.lock().unwrap();
        Ok(entries.iter().take(TOP_SCORES_LIMIT).cloned().collect())
    }
}
