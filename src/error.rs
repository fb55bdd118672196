//! Error taxonomy for the rules engine.
//!
//! Every failure the engine can signal is one variant of [`GameError`], with
//! a structured payload (offending indices, player names, a human-readable
//! reason) rather than a hierarchy of error types.
//!
//! ## Propagation policy
//!
//! Precondition failures (initialization, turn ownership, game over) are
//! returned as errors that callers must handle. An ordinary "this proposed
//! move is illegal" outcome is reported as `Ok(false)` from
//! [`Game::apply_move`](crate::game::Game::apply_move) so interactive callers
//! can re-prompt without error-driven control flow; bar entry and bear-off
//! failures are hard [`GameError::InvalidMove`] errors because those contexts
//! already gathered enough input to justify one.

use std::fmt::Display;

use thiserror::Error;

use crate::checker::CheckerState;

/// Convenience result alias used across the crate.
pub type GameResult<T> = Result<T, GameError>;

/// All error kinds the engine can raise.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GameError {
    /// Operation attempted before `setup_game`.
    #[error("game must be initialized before {0}")]
    GameNotInitialized(&'static str),

    /// No current player is set, or a player acted with zero remaining moves.
    #[error("invalid player turn: {0}")]
    InvalidPlayerTurn(String),

    /// Operation attempted after a winner exists.
    #[error("cannot {0} when the game is over")]
    GameAlreadyOver(&'static str),

    /// The board or the rules rejected a move after input was gathered.
    #[error("invalid move from {from} to {to}: {reason}")]
    InvalidMove {
        from: String,
        to: String,
        reason: String,
    },

    /// Point index outside 0-23.
    #[error("invalid point: {0}. Points must be between 0-23")]
    PointOutOfRange(u8),

    /// A checker mirror was assigned a position outside its valid range.
    #[error("position must be between {valid_range}, got {position}")]
    InvalidCheckerPosition {
        position: u8,
        valid_range: &'static str,
    },

    /// A checker mirror operation was attempted in the wrong state.
    #[error("invalid checker state: {current}, expected {expected}")]
    InvalidCheckerState {
        current: CheckerState,
        expected: CheckerState,
    },

    /// Decrementing an exhausted move counter.
    #[error("player {0} has no remaining moves")]
    NoMovesRemaining(String),

    /// Dice values were read before any roll.
    #[error("dice must be rolled before reading values")]
    DiceNotRolled,

    /// The auto-skip driver exceeded its iteration cap. The engine cannot
    /// prove the skip loop terminates; hitting the cap means the board is in
    /// a state no legal rule sequence produces.
    #[error("auto-skip gave up after {0} consecutive skipped turns")]
    AutoSkipLimitExceeded(u32),
}

impl GameError {
    /// Build an [`GameError::InvalidMove`] from any displayable endpoints.
    ///
    /// `from` is a point index or `"bar"`; `to` is a point index or `"off"`.
    pub fn invalid_move(
        from: impl Display,
        to: impl Display,
        reason: impl Into<String>,
    ) -> Self {
        GameError::InvalidMove {
            from: from.to_string(),
            to: to.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_move_message() {
        let err = GameError::invalid_move("bar", 19, "no available dice for this move");
        assert_eq!(
            err.to_string(),
            "invalid move from bar to 19: no available dice for this move"
        );
    }

    #[test]
    fn test_point_out_of_range_message() {
        let err = GameError::PointOutOfRange(24);
        assert_eq!(
            err.to_string(),
            "invalid point: 24. Points must be between 0-23"
        );
    }

    #[test]
    fn test_checker_state_message() {
        let err = GameError::InvalidCheckerState {
            current: CheckerState::BorneOff,
            expected: CheckerState::OnBar,
        };
        assert_eq!(
            err.to_string(),
            "invalid checker state: BORNE_OFF, expected ON_BAR"
        );
    }
}
