//! # backgammon-engine
//!
//! A rules engine for two-player backgammon with a serializable state
//! contract.
//!
//! ## Design Principles
//!
//! 1. **Board Is Truth**: All occupancy mutations go through [`Board`]; the
//!    per-player checker mirrors are re-derived from it, never edited.
//!
//! 2. **Deterministic Replay**: Dice come from a seeded RNG. Same seed, same
//!    game; snapshots restore with a fresh or pinned seed.
//!
//! 3. **Errors Over Panics**: Precondition violations are [`GameError`]
//!    values. Merely illegal move proposals return `Ok(false)` so callers
//!    can prompt again.
//!
//! ## Modules
//!
//! - `board`: 24-point occupancy, bar and home counts, move primitives
//! - `checker`: Individual checker lifecycle (on board, on bar, borne off)
//! - `dice`: Two-die rolls, doubles expansion, the opening roll
//! - `error`: The crate-wide error type
//! - `game`: Turn state machine, legality queries, auto turn-skipping
//! - `player`: Player identity, colors and directions, the pip pool
//! - `rng`: Seeded dice source with capturable state
//! - `snapshot`: The serialized state contract

pub mod board;
pub mod checker;
pub mod dice;
pub mod error;
pub mod game;
pub mod player;
pub mod rng;
pub mod snapshot;

pub use crate::board::{Board, MoveOutcome, Point};
pub use crate::checker::{Checker, CheckerState};
pub use crate::dice::{Dice, MovePool};
pub use crate::error::{GameError, GameResult};
pub use crate::game::{Game, MoveFrom, MoveTarget, AUTO_SKIP_LIMIT};
pub use crate::player::{Color, Player, PlayerId, PlayerTable, CHECKERS_PER_PLAYER};
pub use crate::rng::{GameRng, GameRngState};
pub use crate::snapshot::GameSnapshot;
