//! A pair of six-sided dice and the initial-roll protocol.
//!
//! Values are valid only after a roll; reading them earlier is a
//! [`GameError::DiceNotRolled`]. Doubles expand into four move units.
//! The initial roll (one die per player, highest starts) only reports a
//! single comparison; the re-roll-on-tie loop lives in the orchestrator.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::{GameError, GameResult};
use crate::player::PlayerId;
use crate::rng::GameRng;

/// The pip pool a roll grants: two values, or four copies on doubles.
pub type MovePool = SmallVec<[u8; 4]>;

/// A pair of dice. `[0, 0]` means not yet rolled.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dice {
    values: [u8; 2],
    initial_values: [u8; 2],
}

impl Dice {
    /// Create unrolled dice.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Roll both dice; the values stay cached until the next roll.
    pub fn roll(&mut self, rng: &mut GameRng) -> [u8; 2] {
        self.values = [rng.roll_die(), rng.roll_die()];
        self.values
    }

    /// Whether the dice have been rolled at least once.
    #[must_use]
    pub fn rolled(&self) -> bool {
        self.values != [0, 0]
    }

    /// The most recent roll.
    pub fn values(&self) -> GameResult<[u8; 2]> {
        if !self.rolled() {
            return Err(GameError::DiceNotRolled);
        }
        Ok(self.values)
    }

    /// Whether both dice show the same value.
    pub fn is_doubles(&self) -> GameResult<bool> {
        let [a, b] = self.values()?;
        Ok(a == b)
    }

    /// The pip pool for the current roll: the two values, or four copies of
    /// the shared value on doubles.
    pub fn moves(&self) -> GameResult<MovePool> {
        let [a, b] = self.values()?;
        if a == b {
            Ok(SmallVec::from_slice(&[a; 4]))
        } else {
            Ok(SmallVec::from_slice(&[a, b]))
        }
    }

    /// Roll one die per player to decide who starts.
    pub fn initial_roll(&mut self, rng: &mut GameRng) -> (u8, u8) {
        self.initial_values = [rng.roll_die(), rng.roll_die()];
        (self.initial_values[0], self.initial_values[1])
    }

    /// The most recent initial roll (`[0, 0]` before the first one).
    #[must_use]
    pub fn initial_values(&self) -> [u8; 2] {
        self.initial_values
    }

    /// Whether the last initial roll was a tie.
    #[must_use]
    pub fn is_initial_tie(&self) -> bool {
        self.initial_values[0] == self.initial_values[1]
    }

    /// Who rolled higher on the initial roll, or `None` on a tie.
    #[must_use]
    pub fn highest_roller(&self) -> Option<PlayerId> {
        match self.initial_values {
            [a, b] if a > b => Some(PlayerId::ONE),
            [a, b] if b > a => Some(PlayerId::TWO),
            _ => None,
        }
    }
}
