//! Best score tracking
//!
//! The only thing that survives between sessions is a single best score,
//! stored as a plain integer string.

use crate::platform::Storage;

/// Best score across sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BestScore {
    pub score: u64,
}

impl BestScore {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "algapuri_highscore";

    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a score beats the current best
    pub fn qualifies(&self, score: u64) -> bool {
        score > self.score
    }

    /// Record a finished session's score.
    ///
    /// Returns true when it set a new best.
    pub fn record(&mut self, score: u64) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        log::info!("New best score: {} (was {})", score, self.score);
        self.score = score;
        true
    }

    /// Load from storage; missing or unreadable values start at zero
    pub fn load(storage: &dyn Storage) -> Self {
        match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(raw)) => match raw.trim().parse::<u64>() {
                Ok(score) => {
                    log::info!("Loaded best score {}", score);
                    Self { score }
                }
                Err(_) => {
                    log::warn!("Ignoring malformed best score {:?}", raw);
                    Self::new()
                }
            },
            Ok(None) => {
                log::info!("No best score found, starting fresh");
                Self::new()
            }
            Err(e) => {
                log::warn!("Failed to read best score: {:#}", e);
                Self::new()
            }
        }
    }

    /// Save to storage; failures are logged and otherwise ignored
    pub fn save(&self, storage: &mut dyn Storage) {
        match storage.set_item(Self::STORAGE_KEY, &self.score.to_string()) {
            Ok(()) => log::info!("Best score saved ({})", self.score),
            Err(e) => log::warn!("Failed to save best score: {:#}", e),
        }
    }
}
