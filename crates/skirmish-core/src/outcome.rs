//! Outcome classification from terminal health values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a run ended, from the Player's point of view.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Player alive and Enemy defeated.
    WinWithBonus,
    /// Player alive, Enemy alive.
    Win,
    /// Player defeated, whatever the Enemy's health.
    Lose,
}

impl Outcome {
    /// Classifies a run from the final health of both sides.
    ///
    /// ```
    /// use skirmish_core::outcome::Outcome;
    ///
    /// assert_eq!(Outcome::classify(3, 0), Outcome::WinWithBonus);
    /// assert_eq!(Outcome::classify(1, 1), Outcome::Win);
    /// assert_eq!(Outcome::classify(0, -1), Outcome::Lose);
    /// ```
    #[must_use]
    pub const fn classify(player_hp: i32, enemy_hp: i32) -> Self {
        if player_hp > 0 && enemy_hp <= 0 {
            Self::WinWithBonus
        } else if player_hp > 0 {
            Self::Win
        } else {
            Self::Lose
        }
    }

    /// True for either kind of win.
    #[must_use]
    pub const fn is_win(self) -> bool {
        !matches!(self, Self::Lose)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WinWithBonus => write!(f, "WIN with 2x BONUS (Bonus from killing Enemy)"),
            Self::Win => write!(f, "WIN (Player didn't die)"),
            Self::Lose => write!(f, "Lose (Player died)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lose_ignores_enemy_health() {
        for enemy_hp in [-2, 0, 1, 5] {
            assert_eq!(Outcome::classify(0, enemy_hp), Outcome::Lose);
            assert_eq!(Outcome::classify(-1, enemy_hp), Outcome::Lose);
        }
    }

    #[test]
    fn bonus_requires_defeated_enemy() {
        assert_eq!(Outcome::classify(1, 0), Outcome::WinWithBonus);
        assert_eq!(Outcome::classify(1, -3), Outcome::WinWithBonus);
        assert_eq!(Outcome::classify(1, 1), Outcome::Win);
    }

    #[test]
    fn wins_are_wins() {
        assert!(Outcome::WinWithBonus.is_win());
        assert!(Outcome::Win.is_win());
        assert!(!Outcome::Lose.is_win());
    }
}
