use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::game::MAX_MOVES;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestScore {
    pub name: String,
    pub moves: u32,
    pub achieved_at: DateTime<Utc>,
}

/// Player preferences persisted between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub best: Option<BestScore>,
    pub sound_on: bool,
    /// Cleared by the client once the introduction has been shown
    pub first_run: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            best: None,
            sound_on: true,
            first_run: true,
        }
    }
}

impl Preferences {
    /// Move count a solved game has to beat to become the new best score
    pub fn record_threshold(&self) -> u32 {
        self.best.as_ref().map_or(MAX_MOVES, |best| best.moves)
    }

    pub fn is_new_record(&self, moves: u32) -> bool {
        moves < self.record_threshold()
    }

    /// Store a new best score. Returns false when the name is blank or the
    /// move count does not beat the current threshold.
    pub fn record_best(&mut self, name: &str, moves: u32, achieved_at: DateTime<Utc>) -> bool {
        let name = name.trim();
        if name.is_empty() || !self.is_new_record(moves) {
            return false;
        }

        self.best = Some(BestScore {
            name: name.to_string(),
            moves,
            achieved_at,
        });
        true
    }
}
