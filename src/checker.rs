//! Per-checker mirror entities.
//!
//! The [`Board`](crate::board::Board) holds aggregate occupancy counts and is
//! always the source of truth. A [`Checker`] is a derived per-unit view for
//! layers that want piece identity (UI animation, tests). Mirrors are
//! reconciled from the board by
//! [`Game::sync_checkers`](crate::game::Game::sync_checkers) into stable
//! (color, index-within-color) slots; they are never written back.

use serde::{Deserialize, Serialize};

use crate::error::{GameError, GameResult};
use crate::player::Color;

/// Where a checker currently lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckerState {
    /// On one of the 24 points.
    OnBoard,
    /// On the bar after being hit; must re-enter before any other move.
    OnBar,
    /// Permanently removed via bear-off.
    BorneOff,
}

impl std::fmt::Display for CheckerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CheckerState::OnBoard => "ON_BOARD",
            CheckerState::OnBar => "ON_BAR",
            CheckerState::BorneOff => "BORNE_OFF",
        };
        write!(f, "{name}")
    }
}

/// A single checker: color, state, and board position while on a point.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checker {
    color: Color,
    state: CheckerState,
    position: Option<u8>,
}

impl Checker {
    /// Create a checker that is on the board but not yet placed.
    #[must_use]
    pub fn new(color: Color) -> Self {
        Self {
            color,
            state: CheckerState::OnBoard,
            position: None,
        }
    }

    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }

    #[must_use]
    pub fn state(&self) -> CheckerState {
        self.state
    }

    /// Point index while on the board, `None` on the bar or once borne off.
    #[must_use]
    pub fn position(&self) -> Option<u8> {
        self.position
    }

    /// Place the checker on a board point.
    pub fn set_position(&mut self, position: u8) -> GameResult<()> {
        if position > 23 {
            return Err(GameError::InvalidCheckerPosition {
                position,
                valid_range: "0-23",
            });
        }
        self.position = Some(position);
        self.state = CheckerState::OnBoard;
        Ok(())
    }

    /// Send the checker to the bar after being hit.
    pub fn send_to_bar(&mut self) {
        self.state = CheckerState::OnBar;
        self.position = None;
    }

    /// Re-enter from the bar onto an entry point of this checker's color.
    pub fn enter_from_bar(&mut self, position: u8) -> GameResult<()> {
        if self.state != CheckerState::OnBar {
            return Err(GameError::InvalidCheckerState {
                current: self.state,
                expected: CheckerState::OnBar,
            });
        }
        if !self.color.entry_range().contains(&position) {
            return Err(GameError::InvalidCheckerPosition {
                position,
                valid_range: self.color.entry_range_label(),
            });
        }
        self.position = Some(position);
        self.state = CheckerState::OnBoard;
        Ok(())
    }

    /// Bear the checker off; it must be on a home-board point.
    pub fn bear_off(&mut self) -> GameResult<()> {
        if self.state != CheckerState::OnBoard {
            return Err(GameError::InvalidCheckerState {
                current: self.state,
                expected: CheckerState::OnBoard,
            });
        }
        let Some(position) = self.position else {
            return Err(GameError::InvalidCheckerState {
                current: self.state,
                expected: CheckerState::OnBoard,
            });
        };
        if !self.is_in_home_board() {
            return Err(GameError::InvalidCheckerPosition {
                position,
                valid_range: self.color.home_range_label(),
            });
        }
        self.state = CheckerState::BorneOff;
        self.position = None;
        Ok(())
    }

    /// Whether the checker sits on a point of its color's home board.
    #[must_use]
    pub fn is_in_home_board(&self) -> bool {
        matches!(self.position, Some(p) if self.color.home_range().contains(&p))
    }

    /// Overwrite state and position during board reconciliation.
    pub(crate) fn sync_to(&mut self, state: CheckerState, position: Option<u8>) {
        self.state = state;
        self.position = position;
    }
}
