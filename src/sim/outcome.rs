//! End-of-round judgement

use crate::consts::LEVEL_COMPLETE_BONUS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// All targets down and another level follows
    LevelComplete,
    /// Targets remain but no tries do
    OutOfTries,
    /// All targets down on the final level
    GameWon,
    StillPlaying,
}

impl Outcome {
    /// Points awarded for reaching this outcome
    pub fn bonus(&self) -> u32 {
        match self {
            Outcome::LevelComplete => LEVEL_COMPLETE_BONUS,
            _ => 0,
        }
    }
}

/// Decide the round state. Clearing the last target wins over running out of
/// tries on the same shot.
pub fn evaluate(
    targets_remaining: usize,
    tries_left: u32,
    level: u32,
    has_more_levels: bool,
) -> Outcome {
    let outcome = if targets_remaining == 0 {
        if has_more_levels {
            Outcome::LevelComplete
        } else {
            Outcome::GameWon
        }
    } else if tries_left == 0 {
        Outcome::OutOfTries
    } else {
        Outcome::StillPlaying
    };
    if outcome != Outcome::StillPlaying {
        log::info!(
            "Level {}: {:?} ({} targets left, {} tries left)",
            level,
            outcome,
            targets_remaining,
            tries_left
        );
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cleared_beats_out_of_tries() {
        assert_eq!(evaluate(0, 0, 1, true), Outcome::LevelComplete);
        assert_eq!(evaluate(0, 0, 7, false), Outcome::GameWon);
    }

    #[test]
    fn test_out_of_tries() {
        assert_eq!(evaluate(2, 0, 3, true), Outcome::OutOfTries);
        assert_eq!(evaluate(1, 0, 3, false), Outcome::OutOfTries);
    }

    #[test]
    fn test_still_playing() {
        assert_eq!(evaluate(2, 1, 1, true), Outcome::StillPlaying);
    }

    #[test]
    fn test_bonus_only_for_level_complete() {
        assert_eq!(Outcome::LevelComplete.bonus(), LEVEL_COMPLETE_BONUS);
        assert_eq!(Outcome::GameWon.bonus(), 0);
        assert_eq!(Outcome::OutOfTries.bonus(), 0);
    }
}
