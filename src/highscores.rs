//! High score leaderboard system
//!
//! One entry per player name, top 10 scores, persisted as JSON through a
//! pluggable key-value store (LocalStorage on the web, a file on native).

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::platform::{KeyValueStore, now_ms};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Player's name
    pub name: String,
    /// Player's best score
    pub score: u32,
    /// Unix timestamp (ms) when achieved
    #[serde(default)]
    pub timestamp: f64,
}

/// High score leaderboard, sorted descending by score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct HighScores {
    entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert or improve `name`'s entry
    ///
    /// An existing entry is only replaced by a strictly greater score.
    /// Returns true if the board changed.
    pub fn upsert(&mut self, name: &str, score: u32, timestamp: f64) -> bool {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.name == name) {
            if score <= entry.score {
                return false;
            }
            entry.score = score;
            entry.timestamp = timestamp;
        } else {
            self.entries.push(HighScoreEntry {
                name: name.to_string(),
                score,
                timestamp,
            });
        }

        // Stable sort keeps earlier holders ahead on ties
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_HIGH_SCORES);
        true
    }

    /// Top entry, or an empty name with score 0
    pub fn highest(&self) -> HighScoreEntry {
        self.entries.first().cloned().unwrap_or_default()
    }

    /// Rank (1-indexed) of a player's entry
    pub fn rank_of(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name == name).map(|i| i + 1)
    }

    pub fn entries(&self) -> &[HighScoreEntry] {
        &self.entries
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Restore the sorted/capped/unique invariants on data read from storage
    fn normalize(&mut self) {
        let mut seen = std::collections::HashSet::new();
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.retain(|e| seen.insert(e.name.clone()));
        self.entries.truncate(MAX_HIGH_SCORES);
    }
}

/// What the game loop needs from score persistence
pub trait Leaderboard {
    /// Best recorded entry (empty name and 0 when nothing is recorded)
    fn highest_score(&self) -> HighScoreEntry;

    /// Record `score` under the current player's name
    fn save_high_score(&mut self, score: u32) -> Result<(), StoreError>;
}

/// Leaderboard persisted through a key-value store
#[derive(Debug)]
pub struct LocalLeaderboard<S: KeyValueStore> {
    store: S,
    scores: HighScores,
    player_name: String,
}

impl<S: KeyValueStore> LocalLeaderboard<S> {
    /// Storage key for the score list
    pub const SCORES_KEY: &'static str = "highScores";
    /// Storage key for the current player's name
    pub const PLAYER_KEY: &'static str = "playerName";

    /// Load scores and player name from the store; unreadable data starts fresh
    pub fn open(store: S) -> Self {
        let scores = match store.get_item(Self::SCORES_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<HighScores>(&json) {
                Ok(mut scores) => {
                    scores.normalize();
                    log::info!("Loaded {} high scores", scores.entries.len());
                    scores
                }
                Err(e) => {
                    log::warn!("Discarding corrupt high scores: {}", e);
                    HighScores::new()
                }
            },
            Ok(None) => {
                log::info!("No high scores found, starting fresh");
                HighScores::new()
            }
            Err(e) => {
                log::warn!("Could not read high scores: {}", e);
                HighScores::new()
            }
        };

        let player_name = match store.get_item(Self::PLAYER_KEY) {
            Ok(name) => name.unwrap_or_default(),
            Err(e) => {
                log::warn!("Could not read player name: {}", e);
                String::new()
            }
        };

        Self {
            store,
            scores,
            player_name,
        }
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    /// Change and persist the current player's name
    pub fn set_player_name(&mut self, name: &str) -> Result<(), StoreError> {
        self.player_name = name.trim().to_string();
        self.store.set_item(Self::PLAYER_KEY, &self.player_name)
    }

    pub fn scores(&self) -> &HighScores {
        &self.scores
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: KeyValueStore> Leaderboard for LocalLeaderboard<S> {
    fn highest_score(&self) -> HighScoreEntry {
        self.scores.highest()
    }

    fn save_high_score(&mut self, score: u32) -> Result<(), StoreError> {
        if self.player_name.is_empty() {
            log::debug!("No player name set, score {} not saved", score);
            return Ok(());
        }
        let mut updated = self.scores.clone();
        if !updated.upsert(&self.player_name, score, now_ms()) {
            return Ok(());
        }

        // Memory only changes once the store has accepted the write
        let json = serde_json::to_string(&updated)?;
        self.store.set_item(Self::SCORES_KEY, &json)?;
        self.scores = updated;
        log::info!(
            "High scores saved ({} entries, {} now has {})",
            self.scores.entries.len(),
            self.player_name,
            score
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryStore;

    #[test]
    fn test_upsert_sorted_and_capped() {
        let mut scores = HighScores::new();
        for i in 0..15u32 {
            scores.upsert(&format!("p{}", i), i * 3, 0.0);
        }
        assert_eq!(scores.entries().len(), MAX_HIGH_SCORES);
        assert_eq!(scores.highest().name, "p14");
        assert!(
            scores
                .entries()
                .windows(2)
                .all(|w| w[0].score >= w[1].score)
        );
        // The five lowest fell off
        assert_eq!(scores.rank_of("p4"), None);
        assert_eq!(scores.rank_of("p5"), Some(10));
    }

    #[test]
    fn test_upsert_only_improves() {
        let mut scores = HighScores::new();
        assert!(scores.upsert("ada", 20, 1.0));
        assert!(!scores.upsert("ada", 20, 2.0));
        assert!(!scores.upsert("ada", 5, 3.0));
        assert_eq!(scores.entries().len(), 1);
        assert_eq!(scores.highest().score, 20);
        assert_eq!(scores.highest().timestamp, 1.0);

        assert!(scores.upsert("ada", 21, 4.0));
        assert_eq!(scores.entries().len(), 1);
        assert_eq!(scores.highest().score, 21);
    }

    #[test]
    fn test_highest_when_empty() {
        let scores = HighScores::new();
        assert!(scores.is_empty());
        assert_eq!(
            scores.highest(),
            HighScoreEntry {
                name: String::new(),
                score: 0,
                timestamp: 0.0
            }
        );
    }

    #[test]
    fn test_local_leaderboard_persists() {
        let mut board = LocalLeaderboard::open(MemoryStore::new());
        board.set_player_name("  grace ").unwrap();
        assert_eq!(board.player_name(), "grace");

        board.save_high_score(12).unwrap();
        assert_eq!(board.highest_score().name, "grace");
        assert_eq!(board.highest_score().score, 12);

        // Reopen from the same storage contents
        let reopened = LocalLeaderboard::open(board.store().clone());
        assert_eq!(reopened.player_name(), "grace");
        assert_eq!(reopened.highest_score().score, 12);
    }

    #[test]
    fn test_save_without_name_is_noop() {
        let mut board = LocalLeaderboard::open(MemoryStore::new());
        board.save_high_score(30).unwrap();
        assert!(board.scores().is_empty());
        assert_eq!(
            board
                .store()
                .get_item(LocalLeaderboard::<MemoryStore>::SCORES_KEY)
                .unwrap(),
            None
        );
    }

    #[test]
    fn test_corrupt_storage_starts_fresh() {
        let mut store = MemoryStore::new();
        store
            .set_item(LocalLeaderboard::<MemoryStore>::SCORES_KEY, "{not json")
            .unwrap();
        let board = LocalLeaderboard::open(store);
        assert!(board.scores().is_empty());
    }

    /// Store that refuses writes until told otherwise
    #[derive(Debug, Default)]
    struct FlakyStore {
        inner: MemoryStore,
        refuse_writes: bool,
    }

    impl KeyValueStore for FlakyStore {
        fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.inner.get_item(key)
        }

        fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
            if self.refuse_writes {
                return Err(StoreError::Unavailable("quota exceeded".into()));
            }
            self.inner.set_item(key, value)
        }
    }

    #[test]
    fn test_failed_save_leaves_board_unchanged() {
        let mut board = LocalLeaderboard::open(FlakyStore::default());
        board.set_player_name("ada").unwrap();
        board.store.refuse_writes = true;

        assert!(board.save_high_score(5).is_err());
        assert_eq!(board.highest_score().score, 0);
        assert!(board.scores().is_empty());

        // Retrying the same score once the store recovers actually writes it
        board.store.refuse_writes = false;
        board.save_high_score(5).unwrap();
        assert_eq!(board.highest_score().score, 5);

        let reopened = LocalLeaderboard::open(FlakyStore {
            inner: board.store().inner.clone(),
            refuse_writes: false,
        });
        assert_eq!(reopened.highest_score().score, 5);
        assert_eq!(reopened.highest_score().name, "ada");
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_corrupt_file_is_repaired_by_saving() {
        use crate::platform::FileStore;

        let path = std::env::temp_dir().join(format!(
            "brick_breaker_board_repair_{}.json",
            std::process::id()
        ));
        std::fs::write(&path, "garbage").unwrap();

        let mut board = LocalLeaderboard::open(FileStore::new(&path));
        assert!(board.scores().is_empty());
        board.set_player_name("ada").unwrap();
        board.save_high_score(5).unwrap();

        let reopened = LocalLeaderboard::open(FileStore::new(&path));
        assert_eq!(reopened.player_name(), "ada");
        assert_eq!(reopened.highest_score().score, 5);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_stored_scores_are_normalized() {
        let mut store = MemoryStore::new();
        store
            .set_item(
                LocalLeaderboard::<MemoryStore>::SCORES_KEY,
                r#"[{"name":"a","score":1},{"name":"b","score":9},{"name":"a","score":4}]"#,
            )
            .unwrap();
        let board = LocalLeaderboard::open(store);
        let names: Vec<_> = board.scores().entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(board.scores().entries()[1].score, 4);
    }
}
