//! The serialized state contract.
//!
//! [`GameSnapshot`] is the full persistable state of a game: board, dice,
//! both players with their checker mirrors, and whose turn it is. The dice
//! RNG is deliberately not part of the contract; a restored game gets a
//! fresh entropy seed unless the caller pins one.
//!
//! The `winner` field is derived state. It is written on export for the
//! benefit of consumers, accepted on import for compatibility, and never
//! trusted: [`crate::Game::from_snapshot`] recomputes it from the board.

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::dice::Dice;
use crate::player::{Player, PlayerId};

/// Complete game state as it travels over the wire.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub board: Board,
    pub dice: Dice,
    pub player1: Player,
    pub player2: Player,
    /// `None` until the initial roll has decided a first mover.
    pub current_player: Option<PlayerId>,
    /// Derived from the board on export; ignored on import.
    #[serde(default)]
    pub winner: Option<Player>,
}
