//! Canonical board occupancy state and primitive move legality.
//!
//! The board owns 24 points, the two bar counts, and the two borne-off
//! (home) counts, and it is the single source of truth for occupancy. All
//! reads and writes go through range-checked accessors; the conservation
//! invariant (points + bar + home = 15 per player) holds after every
//! operation that starts from a conserving state.
//!
//! Direction is a board-level rule here: [`Board::is_valid_move`] rejects a
//! move on the wrong side of the mover's direction regardless of occupancy,
//! before dice are ever consulted.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{GameError, GameResult};
use crate::player::{PlayerId, PlayerTable};

/// Occupancy of a single point: who owns it, and how many checkers sit there.
///
/// Serialized as an `[owner, count]` pair with `[0, 0]` for an empty point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Point {
    owner: Option<PlayerId>,
    count: u8,
}

impl Point {
    /// An unoccupied point.
    pub const EMPTY: Point = Point {
        owner: None,
        count: 0,
    };

    /// A point held by `owner` with `count` checkers (`count` >= 1).
    #[must_use]
    pub const fn occupied(owner: PlayerId, count: u8) -> Point {
        Point {
            owner: Some(owner),
            count,
        }
    }

    #[must_use]
    pub const fn owner(self) -> Option<PlayerId> {
        self.owner
    }

    #[must_use]
    pub const fn count(self) -> u8 {
        self.count
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.count == 0
    }

    /// A point blocks `player` when the opponent holds it with 2+ checkers.
    #[must_use]
    pub fn is_blocked_for(self, player: PlayerId) -> bool {
        matches!(self.owner, Some(owner) if owner != player && self.count >= 2)
    }

    /// A blot is a lone opposing checker, vulnerable to a hit by `player`.
    #[must_use]
    pub fn is_blot_against(self, player: PlayerId) -> bool {
        matches!(self.owner, Some(owner) if owner != player && self.count == 1)
    }
}

impl Serialize for Point {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let owner = self.owner.map_or(0, PlayerId::id);
        (owner, self.count).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Point {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (owner, count) = <(u8, u8)>::deserialize(deserializer)?;
        match (owner, count) {
            (0, 0) => Ok(Point::EMPTY),
            (0, _) => Err(D::Error::custom("occupied point without an owner")),
            (_, 0) => Err(D::Error::custom("owned point with zero checkers")),
            (id, count) => {
                let owner = PlayerId::try_from(id).map_err(D::Error::custom)?;
                Ok(Point::occupied(owner, count))
            }
        }
    }
}

/// Result of a [`Board::move_checker`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Whether the move was applied at all.
    pub moved: bool,
    /// Whether a lone opposing checker was hit on the destination.
    pub hit: bool,
    /// The owner of the hit checker, now on the bar.
    pub hit_owner: Option<PlayerId>,
}

/// The backgammon board: 24 points plus bar and home counts per player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    points: [Point; 24],
    bar: PlayerTable<u8>,
    home: PlayerTable<u8>,
}

impl Board {
    /// Create a board in the standard starting position.
    #[must_use]
    pub fn new() -> Self {
        let mut board = Self::empty();
        board.setup_starting_positions();
        board
    }

    /// Create a board with no checkers anywhere.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            points: [Point::EMPTY; 24],
            bar: PlayerTable::with_value(0),
            home: PlayerTable::with_value(0),
        }
    }

    /// Reset to the standard start: white on 23/12/7/5, black on 0/11/16/18,
    /// bar and home empty for both.
    pub fn setup_starting_positions(&mut self) {
        self.points = [Point::EMPTY; 24];
        self.bar = PlayerTable::with_value(0);
        self.home = PlayerTable::with_value(0);

        for id in PlayerId::both() {
            for (point, count) in id.color().starting_positions() {
                self.points[point as usize] = Point::occupied(id, count);
            }
        }
    }

    fn check_point(point: u8) -> GameResult<()> {
        if point > 23 {
            return Err(GameError::PointOutOfRange(point));
        }
        Ok(())
    }

    /// Read-only view of all 24 points.
    #[must_use]
    pub fn points(&self) -> &[Point; 24] {
        &self.points
    }

    /// The owner of a point, if any.
    pub fn point_owner(&self, point: u8) -> GameResult<Option<PlayerId>> {
        Self::check_point(point)?;
        Ok(self.points[point as usize].owner())
    }

    /// The number of checkers on a point.
    pub fn point_count(&self, point: u8) -> GameResult<u8> {
        Self::check_point(point)?;
        Ok(self.points[point as usize].count())
    }

    /// Checkers on the bar for `player`.
    #[must_use]
    pub fn bar(&self, player: PlayerId) -> u8 {
        self.bar[player]
    }

    /// Checkers borne off by `player`.
    #[must_use]
    pub fn home(&self, player: PlayerId) -> u8 {
        self.home[player]
    }

    /// Overwrite a point's occupancy. `count` of zero clears the point.
    pub fn set_checkers(&mut self, point: u8, owner: PlayerId, count: u8) -> GameResult<()> {
        Self::check_point(point)?;
        self.points[point as usize] = if count == 0 {
            Point::EMPTY
        } else {
            Point::occupied(owner, count)
        };
        Ok(())
    }

    /// Clear a point entirely.
    pub fn clear_point(&mut self, point: u8) -> GameResult<()> {
        Self::check_point(point)?;
        self.points[point as usize] = Point::EMPTY;
        Ok(())
    }

    /// Overwrite a player's bar count.
    pub fn set_bar(&mut self, player: PlayerId, count: u8) {
        self.bar[player] = count;
    }

    /// Overwrite a player's borne-off count.
    pub fn set_home(&mut self, player: PlayerId, count: u8) {
        self.home[player] = count;
    }

    /// Whether `player` may move a checker from `from` to `to`.
    ///
    /// False when the move runs against the player's direction, when the
    /// player still has bar checkers to enter, when the source is not the
    /// player's, or when the opponent blocks the destination. Errors only on
    /// out-of-range indices.
    pub fn is_valid_move(&self, player: PlayerId, from: u8, to: u8) -> GameResult<bool> {
        Self::check_point(from)?;
        Self::check_point(to)?;
        Ok(self.move_allowed(player, from, to))
    }

    fn move_allowed(&self, player: PlayerId, from: u8, to: u8) -> bool {
        // Backwards moves are illegal before occupancy is even considered.
        if player.color().move_distance(from, to) <= 0 {
            return false;
        }
        if self.bar[player] > 0 {
            return false;
        }
        let source = self.points[from as usize];
        if source.owner() != Some(player) || source.count() == 0 {
            return false;
        }
        !self.points[to as usize].is_blocked_for(player)
    }

    /// Move one checker from `from` to `to`, hitting a blot if present.
    ///
    /// An invalid move returns an outcome with `moved: false` rather than an
    /// error; only out-of-range indices error.
    pub fn move_checker(&mut self, player: PlayerId, from: u8, to: u8) -> GameResult<MoveOutcome> {
        if !self.is_valid_move(player, from, to)? {
            return Ok(MoveOutcome::default());
        }

        self.remove_one(from);

        let target = self.points[to as usize];
        let mut outcome = MoveOutcome {
            moved: true,
            hit: false,
            hit_owner: None,
        };
        if target.is_blot_against(player) {
            let hit_owner = target.owner().unwrap_or(player.opponent());
            self.bar[hit_owner] += 1;
            self.points[to as usize] = Point::occupied(player, 1);
            outcome.hit = true;
            outcome.hit_owner = Some(hit_owner);
        } else {
            self.points[to as usize] = Point::occupied(player, target.count() + 1);
        }

        Ok(outcome)
    }

    /// Enter a checker from the bar onto `point`.
    ///
    /// False when the player has no bar checkers, when `point` is outside
    /// the player's entry range, or when the opponent blocks it. Hits apply
    /// as in [`Board::move_checker`].
    pub fn enter_from_bar(&mut self, player: PlayerId, point: u8) -> GameResult<bool> {
        Self::check_point(point)?;

        if self.bar[player] == 0 {
            return Ok(false);
        }
        if !player.color().entry_range().contains(&point) {
            return Ok(false);
        }

        let target = self.points[point as usize];
        if target.is_blocked_for(player) {
            return Ok(false);
        }

        if target.is_blot_against(player) {
            let hit_owner = target.owner().unwrap_or(player.opponent());
            self.bar[hit_owner] += 1;
            self.points[point as usize] = Point::occupied(player, 1);
        } else {
            self.points[point as usize] = Point::occupied(player, target.count() + 1);
        }

        self.bar[player] -= 1;
        Ok(true)
    }

    /// Whether every one of `player`'s checkers still in play sits in the
    /// home board. Bar checkers always disqualify.
    #[must_use]
    pub fn all_checkers_in_home_board(&self, player: PlayerId) -> bool {
        if self.bar[player] > 0 {
            return false;
        }
        let home = player.color().home_range();
        self.points
            .iter()
            .enumerate()
            .filter(|(_, p)| p.owner() == Some(player))
            .all(|(idx, _)| home.contains(&(idx as u8)))
    }

    /// Bear one checker off from `point`.
    ///
    /// False when `point` is outside the player's home board, when checkers
    /// remain outside it, or when the point is not the player's. The
    /// overage ("highest checker") rule is the orchestrator's concern, not
    /// the board's.
    pub fn bear_off(&mut self, player: PlayerId, point: u8) -> GameResult<bool> {
        Self::check_point(point)?;

        if !player.color().home_range().contains(&point) {
            return Ok(false);
        }
        if !self.all_checkers_in_home_board(player) {
            return Ok(false);
        }
        if self.points[point as usize].owner() != Some(player) {
            return Ok(false);
        }

        self.remove_one(point);
        self.home[player] += 1;
        Ok(true)
    }

    /// The player whose home count reached 15, if any. Player 1 is checked
    /// first, an unreachable-in-practice tie-break.
    #[must_use]
    pub fn check_winner(&self) -> Option<PlayerId> {
        PlayerId::both()
            .into_iter()
            .find(|&player| self.home[player] == 15)
    }

    /// Total checkers `player` has on points.
    #[must_use]
    pub fn count_on_board(&self, player: PlayerId) -> u8 {
        self.points
            .iter()
            .filter(|p| p.owner() == Some(player))
            .map(|p| p.count())
            .sum()
    }

    /// Points + bar + home for `player`; 15 in any consistent state.
    #[must_use]
    pub fn total_checkers(&self, player: PlayerId) -> u8 {
        self.count_on_board(player) + self.bar[player] + self.home[player]
    }

    fn remove_one(&mut self, point: u8) {
        let current = self.points[point as usize];
        self.points[point as usize] = match (current.owner(), current.count()) {
            (Some(owner), count) if count > 1 => Point::occupied(owner, count - 1),
            _ => Point::EMPTY,
        };
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
