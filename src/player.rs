//! Player identity, per-player storage, and turn/move bookkeeping.
//!
//! ## PlayerId and Color
//!
//! Exactly two players exist: player 1 is white, player 2 is black. Board
//! geometry is fixed per color: white moves toward lower indices with home
//! board 0-5 and bar entry on 18-23, black the mirror image. All
//! direction-dependent arithmetic lives on [`Color`] so the board and the
//! orchestrator never hand-roll it.
//!
//! ## PlayerTable
//!
//! Two-slot per-player storage indexed by [`PlayerId`], serialized as a map
//! keyed by player number (`{"1": .., "2": ..}`) to match the state contract.
//!
//! ## Player
//!
//! Turn flag, remaining-move counter, the pip pool for the current turn, and
//! the dice-to-distance allocation algorithm: a requested distance is paid by
//! the first sub-multiset of the pool that sums to it, searching sizes 1,
//! then 2, then 3 (doubles), then the full set of 4.

use std::ops::{Index, IndexMut, RangeInclusive};

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smallvec::SmallVec;

use crate::checker::{Checker, CheckerState};
use crate::error::{GameError, GameResult};

/// Identifier of one of the two players: 1 (white) or 2 (black).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PlayerId(u8);

impl PlayerId {
    /// Player 1, always white.
    pub const ONE: PlayerId = PlayerId(1);
    /// Player 2, always black.
    pub const TWO: PlayerId = PlayerId(2);

    /// The raw player number (1 or 2), as used in the wire format.
    #[must_use]
    pub const fn id(self) -> u8 {
        self.0
    }

    /// Zero-based slot index for array storage.
    #[must_use]
    pub const fn index(self) -> usize {
        (self.0 - 1) as usize
    }

    /// The other player.
    #[must_use]
    pub const fn opponent(self) -> PlayerId {
        match self.0 {
            1 => PlayerId::TWO,
            _ => PlayerId::ONE,
        }
    }

    /// The color bound to this player number.
    #[must_use]
    pub const fn color(self) -> Color {
        match self.0 {
            1 => Color::White,
            _ => Color::Black,
        }
    }

    /// Both players, in id order.
    #[must_use]
    pub const fn both() -> [PlayerId; 2] {
        [PlayerId::ONE, PlayerId::TWO]
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

impl TryFrom<u8> for PlayerId {
    type Error = GameError;

    fn try_from(value: u8) -> GameResult<Self> {
        match value {
            1 => Ok(PlayerId::ONE),
            2 => Ok(PlayerId::TWO),
            other => Err(GameError::InvalidPlayerTurn(format!(
                "player id must be 1 or 2, got {other}"
            ))),
        }
    }
}

impl Serialize for PlayerId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.0)
    }
}

impl<'de> Deserialize<'de> for PlayerId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = u8::deserialize(deserializer)?;
        PlayerId::try_from(raw).map_err(D::Error::custom)
    }
}

/// A player's side of the board, and the direction authority for all moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// The player number bound to this color.
    #[must_use]
    pub const fn player_id(self) -> PlayerId {
        match self {
            Color::White => PlayerId::ONE,
            Color::Black => PlayerId::TWO,
        }
    }

    /// The six points nearest this color's bear-off edge.
    #[must_use]
    pub const fn home_range(self) -> RangeInclusive<u8> {
        match self {
            Color::White => 0..=5,
            Color::Black => 18..=23,
        }
    }

    /// The points a checker may re-enter on from the bar.
    #[must_use]
    pub const fn entry_range(self) -> RangeInclusive<u8> {
        match self {
            Color::White => 18..=23,
            Color::Black => 0..=5,
        }
    }

    /// Standard starting layout as `(point, checker count)` pairs.
    #[must_use]
    pub const fn starting_positions(self) -> [(u8, u8); 4] {
        match self {
            Color::White => [(23, 2), (12, 5), (7, 3), (5, 5)],
            Color::Black => [(0, 2), (11, 5), (16, 3), (18, 5)],
        }
    }

    pub(crate) const fn home_range_label(self) -> &'static str {
        match self {
            Color::White => "0-5",
            Color::Black => "18-23",
        }
    }

    pub(crate) const fn entry_range_label(self) -> &'static str {
        match self {
            Color::White => "18-23",
            Color::Black => "0-5",
        }
    }

    /// Signed pip distance of a `from -> to` board move. Positive means the
    /// move runs in this color's direction; zero or negative is backwards.
    #[must_use]
    pub const fn move_distance(self, from: u8, to: u8) -> i16 {
        match self {
            Color::White => from as i16 - to as i16,
            Color::Black => to as i16 - from as i16,
        }
    }

    /// Pip distance consumed by entering from the bar onto `to`.
    #[must_use]
    pub const fn entry_distance(self, to: u8) -> u8 {
        match self {
            Color::White => 24 - to,
            Color::Black => to + 1,
        }
    }

    /// The entry point reached from the bar with a given die.
    #[must_use]
    pub const fn entry_point(self, die: u8) -> u8 {
        match self {
            Color::White => 24 - die,
            Color::Black => die - 1,
        }
    }

    /// Exact pip distance required to bear off from `from`.
    #[must_use]
    pub const fn bear_off_distance(self, from: u8) -> u8 {
        match self {
            Color::White => from + 1,
            Color::Black => 24 - from,
        }
    }

    /// Destination of a board move by `die` pips, if it stays on the board.
    #[must_use]
    pub const fn step(self, from: u8, die: u8) -> Option<u8> {
        match self {
            Color::White => {
                if from >= die {
                    Some(from - die)
                } else {
                    None
                }
            }
            Color::Black => {
                if from + die <= 23 {
                    Some(from + die)
                } else {
                    None
                }
            }
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
        }
    }
}

/// Per-player storage with O(1) access, serialized as `{"1": .., "2": ..}`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlayerTable<T> {
    data: [T; 2],
}

impl<T> PlayerTable<T> {
    /// Create a table from player 1's and player 2's values.
    #[must_use]
    pub fn new(one: T, two: T) -> Self {
        Self { data: [one, two] }
    }

    /// Create a table with both entries set to the same value.
    #[must_use]
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self {
            data: [value.clone(), value],
        }
    }

    #[must_use]
    pub fn get(&self, player: PlayerId) -> &T {
        &self.data[player.index()]
    }

    pub fn get_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.data[player.index()]
    }

    /// Iterate over `(PlayerId, &T)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        PlayerId::both().into_iter().zip(self.data.iter())
    }
}

impl<T> Index<PlayerId> for PlayerTable<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        self.get(player)
    }
}

impl<T> IndexMut<PlayerId> for PlayerTable<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        self.get_mut(player)
    }
}

impl<T: Serialize> Serialize for PlayerTable<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(&1u8, &self.data[0])?;
        map.serialize_entry(&2u8, &self.data[1])?;
        map.end()
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for PlayerTable<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut map = std::collections::BTreeMap::<u8, T>::deserialize(deserializer)?;
        let one = map
            .remove(&1)
            .ok_or_else(|| D::Error::custom("missing entry for player 1"))?;
        let two = map
            .remove(&2)
            .ok_or_else(|| D::Error::custom("missing entry for player 2"))?;
        if let Some((&key, _)) = map.iter().next() {
            return Err(D::Error::custom(format!("unexpected player key {key}")));
        }
        Ok(PlayerTable::new(one, two))
    }
}

/// Number of checkers each player owns.
pub const CHECKERS_PER_PLAYER: usize = 15;

/// A backgammon player: identity, turn state, pip pool, and checker mirrors.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    name: String,
    color: Color,
    is_turn: bool,
    remaining_moves: u8,
    available_moves: SmallVec<[u8; 4]>,
    checkers: Vec<Checker>,
}

impl Player {
    /// Create a player with 15 unplaced checkers of the given color.
    #[must_use]
    pub fn new(name: impl Into<String>, color: Color) -> Self {
        Self {
            name: name.into(),
            color,
            is_turn: false,
            remaining_moves: 0,
            available_moves: SmallVec::new(),
            checkers: (0..CHECKERS_PER_PLAYER)
                .map(|_| Checker::new(color))
                .collect(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }

    /// Player number for board interactions (1 for white, 2 for black).
    #[must_use]
    pub fn id(&self) -> PlayerId {
        self.color.player_id()
    }

    #[must_use]
    pub fn is_turn(&self) -> bool {
        self.is_turn
    }

    /// Unconsumed dice units for the current turn.
    #[must_use]
    pub fn remaining_moves(&self) -> u8 {
        self.remaining_moves
    }

    /// Dice pip-values still usable this turn.
    #[must_use]
    pub fn available_moves(&self) -> &[u8] {
        &self.available_moves
    }

    #[must_use]
    pub fn checkers(&self) -> &[Checker] {
        &self.checkers
    }

    /// Standard starting layout for this player's color, as
    /// `(point, checker count)` pairs.
    #[must_use]
    pub fn starting_positions(&self) -> [(u8, u8); 4] {
        self.color.starting_positions()
    }

    /// Begin a turn with the rolled pip pool (2 values, or 4 on doubles).
    pub fn start_turn(&mut self, pool: &[u8]) {
        self.is_turn = true;
        self.available_moves = SmallVec::from_slice(pool);
        self.remaining_moves = pool.len() as u8;
    }

    /// End the turn, clearing the pool and the counter.
    pub fn end_turn(&mut self) {
        self.is_turn = false;
        self.remaining_moves = 0;
        self.available_moves.clear();
    }

    /// Replace the pip pool directly. Scenario setup and external restores
    /// use this; normal play goes through [`Player::start_turn`].
    pub fn set_available_moves(&mut self, pool: &[u8]) {
        self.available_moves = SmallVec::from_slice(pool);
        self.remaining_moves = pool.len() as u8;
    }

    /// Consume one move unit without touching the pool.
    pub fn use_move(&mut self) -> GameResult<()> {
        if self.remaining_moves == 0 {
            return Err(GameError::NoMovesRemaining(self.name.clone()));
        }
        self.remaining_moves -= 1;
        Ok(())
    }

    /// Whether some sub-multiset of the pool sums exactly to `distance`.
    #[must_use]
    pub fn can_use_dice_for_move(&self, distance: u8) -> bool {
        self.combination_for(distance).is_some()
    }

    /// Remove the first sub-multiset of the pool summing to `distance` and
    /// decrement the move counter by its size. Returns false if no
    /// combination exists.
    pub fn use_dice_for_move(&mut self, distance: u8) -> bool {
        let Some(indices) = self.combination_for(distance) else {
            return false;
        };
        // Indices are ascending; remove from the back to keep them valid.
        for &i in indices.iter().rev() {
            self.available_moves.remove(i);
        }
        self.remaining_moves -= indices.len() as u8;
        true
    }

    /// Find pool indices summing to `distance`: single die first, then pairs,
    /// then triples (only reachable on doubles), then the full set of four.
    /// Existence-based, not optimal: the first match in iteration order wins.
    fn combination_for(&self, distance: u8) -> Option<SmallVec<[usize; 4]>> {
        let pool = &self.available_moves;
        let target = u16::from(distance);

        for (i, &die) in pool.iter().enumerate() {
            if u16::from(die) == target {
                return Some(SmallVec::from_slice(&[i]));
            }
        }

        for i in 0..pool.len() {
            for j in (i + 1)..pool.len() {
                if u16::from(pool[i]) + u16::from(pool[j]) == target {
                    return Some(SmallVec::from_slice(&[i, j]));
                }
            }
        }

        if pool.len() >= 3 {
            for i in 0..pool.len() {
                for j in (i + 1)..pool.len() {
                    for k in (j + 1)..pool.len() {
                        let sum =
                            u16::from(pool[i]) + u16::from(pool[j]) + u16::from(pool[k]);
                        if sum == target {
                            return Some(SmallVec::from_slice(&[i, j, k]));
                        }
                    }
                }
            }
        }

        if pool.len() >= 4 {
            let total: u16 = pool.iter().map(|&d| u16::from(d)).sum();
            if total == target {
                return Some(SmallVec::from_slice(&[0, 1, 2, 3]));
            }
        }

        None
    }

    /// All checkers currently in `state`.
    pub fn checkers_in_state(&self, state: CheckerState) -> impl Iterator<Item = &Checker> {
        self.checkers.iter().filter(move |c| c.state() == state)
    }

    /// How many checkers are in `state`.
    #[must_use]
    pub fn count_in_state(&self, state: CheckerState) -> usize {
        self.checkers_in_state(state).count()
    }

    #[must_use]
    pub fn has_checkers_on_bar(&self) -> bool {
        self.checkers.iter().any(|c| c.state() == CheckerState::OnBar)
    }

    /// Whether every checker has been borne off.
    #[must_use]
    pub fn has_won(&self) -> bool {
        self.checkers
            .iter()
            .all(|c| c.state() == CheckerState::BorneOff)
    }

    /// Reconcile the checker mirrors from board-derived facts.
    ///
    /// Deterministic sweep: the last `borne_off` slots become borne off, the
    /// first `on_bar` remaining slots go to the bar, and the rest take the
    /// board positions in ascending point order.
    pub(crate) fn sync_checkers(&mut self, borne_off: u8, on_bar: u8, positions: &[u8]) {
        for checker in &mut self.checkers {
            checker.sync_to(CheckerState::OnBoard, None);
        }

        let split = self.checkers.len().saturating_sub(borne_off as usize);
        for checker in &mut self.checkers[split..] {
            checker.sync_to(CheckerState::BorneOff, None);
        }

        for checker in self.checkers[..split].iter_mut().take(on_bar as usize) {
            checker.sync_to(CheckerState::OnBar, None);
        }

        let mut positions = positions.iter();
        for checker in &mut self.checkers[..split] {
            if checker.state() != CheckerState::OnBoard {
                continue;
            }
            match positions.next() {
                Some(&p) => checker.sync_to(CheckerState::OnBoard, Some(p)),
                None => break,
            }
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let on_board = self.count_in_state(CheckerState::OnBoard);
        let on_bar = self.count_in_state(CheckerState::OnBar);
        let borne_off = self.count_in_state(CheckerState::BorneOff);
        write!(
            f,
            "{} ({}): {on_board} on board, {on_bar} on bar, {borne_off} borne off",
            self.name, self.color
        )
    }
}
