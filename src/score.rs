//! Current score and high score

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub current: u32,
    pub high: u32,
}

impl Score {
    pub fn with_high(high: u32) -> Self {
        Self { current: 0, high }
    }

    /// Add points. Returns the new high score if this beat it.
    pub fn add(&mut self, points: u32) -> Option<u32> {
        self.current = self.current.saturating_add(points);
        if self.current > self.high {
            self.high = self.current;
            Some(self.high)
        } else {
            None
        }
    }

    /// Start a new game; the high score stays
    pub fn reset_current(&mut self) {
        self.current = 0;
    }
}
