//! Game orchestration: the turn state machine and high-level legality.
//!
//! [`Game`] wires one [`Board`], one [`Dice`] pair, and two [`Player`]s, and
//! is the only surface external layers call. The lifecycle is:
//!
//! 1. [`Game::setup_game`] lays out the standard start,
//! 2. [`Game::initial_roll_until_decided`] picks the first mover,
//! 3. turns alternate via [`Game::start_turn`] / [`Game::apply_move`] /
//!    [`Game::apply_bear_off_move`], with the turn ending automatically when
//!    the pip pool is exhausted or no legal destination remains,
//! 4. the game is over once a player's home count reaches 15.
//!
//! Queries read board and player state; mutations go through the board, then
//! the checker mirrors are re-derived from it.

use tracing::{debug, trace};

use crate::board::{Board, MoveOutcome};
use crate::dice::Dice;
use crate::error::{GameError, GameResult};
use crate::player::{Color, Player, PlayerId};
use crate::rng::GameRng;
use crate::snapshot::GameSnapshot;

/// Source of a move: a board point or the bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveFrom {
    /// Re-entry from the bar (`"bar"` on the wire).
    Bar,
    /// A board point, 0-23.
    Point(u8),
}

impl std::fmt::Display for MoveFrom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MoveFrom::Bar => write!(f, "bar"),
            MoveFrom::Point(p) => write!(f, "{p}"),
        }
    }
}

impl std::str::FromStr for MoveFrom {
    type Err = GameError;

    fn from_str(s: &str) -> GameResult<Self> {
        if s == "bar" {
            return Ok(MoveFrom::Bar);
        }
        s.parse::<u8>()
            .map(MoveFrom::Point)
            .map_err(|_| GameError::invalid_move(s, "?", "unrecognized move source"))
    }
}

impl serde::Serialize for MoveFrom {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MoveFrom::Bar => serializer.serialize_str("bar"),
            MoveFrom::Point(p) => serializer.serialize_u8(*p),
        }
    }
}

/// Destination of a candidate move: a board point or the bear-off tray.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MoveTarget {
    /// A board point, 0-23.
    Point(u8),
    /// Bear the checker off (`"bear_off"` on the wire).
    BearOff,
}

impl std::fmt::Display for MoveTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MoveTarget::Point(p) => write!(f, "{p}"),
            MoveTarget::BearOff => write!(f, "bear_off"),
        }
    }
}

impl serde::Serialize for MoveTarget {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MoveTarget::Point(p) => serializer.serialize_u8(*p),
            MoveTarget::BearOff => serializer.serialize_str("bear_off"),
        }
    }
}

/// Consecutive skipped turns tolerated by [`Game::roll_dice_for_turn`]
/// before the engine reports an invariant violation instead of looping.
pub const AUTO_SKIP_LIMIT: u32 = 64;

/// A complete backgammon game: board, dice, players, and turn state.
#[derive(Debug)]
pub struct Game {
    board: Board,
    dice: Dice,
    players: [Player; 2],
    current: Option<PlayerId>,
    initialized: bool,
    turn_was_skipped: bool,
    rng: GameRng,
}

impl Game {
    /// Create a game with an entropy-seeded dice source.
    #[must_use]
    pub fn new(player1_name: impl Into<String>, player2_name: impl Into<String>) -> Self {
        Self::with_rng(player1_name, player2_name, GameRng::from_entropy())
    }

    /// Create a game with a fixed dice seed; same seed, same game.
    #[must_use]
    pub fn with_seed(
        player1_name: impl Into<String>,
        player2_name: impl Into<String>,
        seed: u64,
    ) -> Self {
        Self::with_rng(player1_name, player2_name, GameRng::new(seed))
    }

    fn with_rng(
        player1_name: impl Into<String>,
        player2_name: impl Into<String>,
        rng: GameRng,
    ) -> Self {
        Self {
            board: Board::new(),
            dice: Dice::new(),
            players: [
                Player::new(player1_name, Color::White),
                Player::new(player2_name, Color::Black),
            ],
            current: None,
            initialized: false,
            turn_was_skipped: false,
            rng,
        }
    }

    // === Accessors ===

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Mutable board access for scenario setup and state restoration.
    /// Call [`Game::sync_checkers`] after direct edits.
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    #[must_use]
    pub fn dice(&self) -> &Dice {
        &self.dice
    }

    #[must_use]
    pub fn player1(&self) -> &Player {
        &self.players[0]
    }

    #[must_use]
    pub fn player2(&self) -> &Player {
        &self.players[1]
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id.index()]
    }

    /// The player whose turn it is, once the initial roll has decided one.
    #[must_use]
    pub fn current_player(&self) -> Option<&Player> {
        self.current.map(|id| self.player(id))
    }

    /// The player waiting for their turn.
    #[must_use]
    pub fn other_player(&self) -> Option<&Player> {
        self.current.map(|id| self.player(id.opponent()))
    }

    /// Whether the last [`Game::roll_dice_for_turn`] skipped at least one
    /// turn for lack of legal moves.
    #[must_use]
    pub fn turn_was_skipped(&self) -> bool {
        self.turn_was_skipped
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    // === Lifecycle ===

    /// Lay out the standard starting position and sync the checker mirrors.
    pub fn setup_game(&mut self) {
        self.board.setup_starting_positions();
        self.sync_checkers();
        self.initialized = true;
        debug!("game set up at standard starting position");
    }

    /// Roll one die per player, re–rolling ties, until a first mover is
    /// decided. Sets the current player and returns their id.
    pub fn initial_roll_until_decided(&mut self) -> GameResult<PlayerId> {
        self.ensure_initialized("the initial roll")?;
        loop {
            let (one, two) = self.dice.initial_roll(&mut self.rng);
            if let Some(winner) = self.dice.highest_roller() {
                debug!(rolls = ?(one, two), winner = %winner, "initial roll decided");
                self.current = Some(winner);
                return Ok(winner);
            }
            trace!(rolls = ?(one, two), "initial roll tied, re-rolling");
        }
    }

    /// Roll the dice and hand the pip pool to the current player.
    pub fn start_turn(&mut self) -> GameResult<()> {
        self.ensure_initialized("starting turns")?;
        let id = self.current.ok_or_else(|| {
            GameError::InvalidPlayerTurn(
                "no current player set; decide the initial roll first".into(),
            )
        })?;
        self.ensure_not_over("start a turn")?;

        let values = self.dice.roll(&mut self.rng);
        let pool = self.dice.moves()?;
        self.players[id.index()].start_turn(&pool);
        debug!(player = %id, dice = ?values, moves = pool.len(), "turn started");
        Ok(())
    }

    /// Swap the current and waiting players.
    pub fn switch_players(&mut self) -> GameResult<()> {
        self.ensure_initialized("switching players")?;
        if let Some(id) = self.current {
            self.current = Some(id.opponent());
        }
        Ok(())
    }

    /// Whether a player has borne off all 15 checkers.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.board.check_winner().is_some()
    }

    /// The winning player, if the game is over.
    #[must_use]
    pub fn get_winner(&self) -> Option<&Player> {
        self.board.check_winner().map(|id| self.player(id))
    }

    // === Moves ===

    /// Apply a move for the current player.
    ///
    /// Returns `Ok(false)` when the proposal is merely illegal (wrong
    /// distance for the pool, blocked destination, backwards direction) so
    /// interactive callers can retry. Precondition violations and bar-entry
    /// failures are errors.
    pub fn apply_move(&mut self, from: MoveFrom, to: u8) -> GameResult<bool> {
        self.ensure_initialized("making moves")?;
        let id = self
            .current
            .ok_or_else(|| GameError::InvalidPlayerTurn("no current player set".into()))?;
        self.ensure_not_over("make moves")?;
        self.ensure_moves_remaining(id)?;
        if to > 23 {
            return Err(GameError::PointOutOfRange(to));
        }

        match from {
            MoveFrom::Bar => self.apply_bar_entry(id, to),
            MoveFrom::Point(from) => self.apply_board_move(id, from, to),
        }
    }

    fn apply_bar_entry(&mut self, id: PlayerId, to: u8) -> GameResult<bool> {
        if self.board.bar(id) == 0 {
            return Err(GameError::invalid_move(
                MoveFrom::Bar,
                to,
                "player has no checkers on the bar",
            ));
        }

        let distance = id.color().entry_distance(to);
        if !self.player(id).can_use_dice_for_move(distance) {
            return Err(GameError::invalid_move(
                MoveFrom::Bar,
                to,
                "no available dice for this move",
            ));
        }

        let entered = self
            .board
            .enter_from_bar(id, to)
            .map_err(|e| GameError::invalid_move(MoveFrom::Bar, to, e.to_string()))?;
        if !entered {
            return Err(GameError::invalid_move(
                MoveFrom::Bar,
                to,
                "board rejected the entry from the bar",
            ));
        }

        self.consume_dice(id, distance, MoveFrom::Bar, to)?;
        trace!(player = %id, to, distance, "entered from bar");
        self.sync_checkers();
        self.finish_move(id)?;
        Ok(true)
    }

    fn apply_board_move(&mut self, id: PlayerId, from: u8, to: u8) -> GameResult<bool> {
        let distance = match id.color().move_distance(from, to) {
            d if d > 0 => d as u8,
            // Wrong direction is rejected before the board is consulted.
            _ => return Ok(false),
        };

        if !self.player(id).can_use_dice_for_move(distance) {
            return Ok(false);
        }

        let outcome: MoveOutcome = self
            .board
            .move_checker(id, from, to)
            .map_err(|e| GameError::invalid_move(from, to, e.to_string()))?;
        if !outcome.moved {
            return Ok(false);
        }

        self.consume_dice(id, distance, MoveFrom::Point(from), to)?;
        trace!(player = %id, from, to, hit = outcome.hit, "move applied");
        self.sync_checkers();
        self.finish_move(id)?;
        Ok(true)
    }

    /// Bear off the current player's checker from `from`.
    ///
    /// Requires every checker in the home board, and either an exact die or
    /// a larger one under the highest-checker exception.
    pub fn apply_bear_off_move(&mut self, from: u8) -> GameResult<bool> {
        self.ensure_initialized("making moves")?;
        let id = self
            .current
            .ok_or_else(|| GameError::InvalidPlayerTurn("no current player set".into()))?;
        self.ensure_not_over("make moves")?;
        self.ensure_moves_remaining(id)?;
        if from > 23 {
            return Err(GameError::PointOutOfRange(from));
        }

        if !self.board.all_checkers_in_home_board(id) {
            return Err(GameError::invalid_move(
                from,
                "off",
                "not all checkers are in the home board",
            ));
        }

        let Some(die) = self.bear_off_die(id, from) else {
            return Err(GameError::invalid_move(
                from,
                "off",
                "no valid dice available for bearing off",
            ));
        };

        let borne_off = self
            .board
            .bear_off(id, from)
            .map_err(|e| GameError::invalid_move(from, "off", e.to_string()))?;
        if !borne_off {
            return Err(GameError::invalid_move(
                from,
                "off",
                "board rejected the bear off",
            ));
        }

        if !self.players[id.index()].use_dice_for_move(die) {
            return Err(GameError::invalid_move(
                from,
                "off",
                "failed to consume dice values",
            ));
        }
        trace!(player = %id, from, die, "checker borne off");
        self.sync_checkers();
        self.finish_move(id)?;
        Ok(true)
    }

    /// The die that pays a bear-off from `from`: the exact distance when the
    /// pool can pay it, otherwise the smallest larger die, but only when no
    /// checker of the mover sits farther from the edge than `from`.
    fn bear_off_die(&self, id: PlayerId, from: u8) -> Option<u8> {
        let required = id.color().bear_off_distance(from);
        let player = self.player(id);

        if player.can_use_dice_for_move(required) {
            return Some(required);
        }

        let overage = player
            .available_moves()
            .iter()
            .copied()
            .filter(|&d| d > required)
            .min()?;
        if self.is_highest_checker(id, from) {
            Some(overage)
        } else {
            None
        }
    }

    /// Whether no checker of `id` sits strictly farther from the bear-off
    /// edge than `from`.
    fn is_highest_checker(&self, id: PlayerId, from: u8) -> bool {
        let points = self.board.points();
        let mut farther = match id.color() {
            Color::White => (from + 1)..6,
            Color::Black => 18..from,
        };
        farther.all(|p| points[p as usize].owner() != Some(id))
    }

    fn consume_dice(&mut self, id: PlayerId, distance: u8, from: MoveFrom, to: u8) -> GameResult<()> {
        if !self.players[id.index()].use_dice_for_move(distance) {
            // can_use_dice_for_move was checked; reaching this is a bug.
            return Err(GameError::invalid_move(
                from,
                to,
                "failed to consume dice values",
            ));
        }
        Ok(())
    }

    /// End the turn when the pool is exhausted or nothing legal remains.
    fn finish_move(&mut self, id: PlayerId) -> GameResult<()> {
        let done = self.players[id.index()].remaining_moves() == 0 || !self.has_any_valid_moves();
        if done {
            self.players[id.index()].end_turn();
            self.switch_players()?;
            trace!(player = %id, "turn ended");
        }
        Ok(())
    }

    // === Legality queries ===

    /// Candidate destinations for a checker at `from` with the current pool,
    /// including the bear-off sentinel when it applies. Empty when no player
    /// is current or the pool is empty.
    #[must_use]
    pub fn get_valid_moves(&self, from: MoveFrom) -> Vec<MoveTarget> {
        let Some(id) = self.current else {
            return Vec::new();
        };
        let player = self.player(id);
        if player.available_moves().is_empty() {
            return Vec::new();
        }

        let mut dice: Vec<u8> = player.available_moves().to_vec();
        dice.sort_unstable();
        dice.dedup();

        let mut targets = match from {
            MoveFrom::Bar => self.bar_entry_targets(id, &dice),
            MoveFrom::Point(from) => self.board_move_targets(id, from, &dice),
        };
        targets.sort_unstable();
        targets.dedup();
        targets
    }

    fn bar_entry_targets(&self, id: PlayerId, dice: &[u8]) -> Vec<MoveTarget> {
        if self.board.bar(id) == 0 {
            return Vec::new();
        }
        let points = self.board.points();
        dice.iter()
            .map(|&die| id.color().entry_point(die))
            .filter(|&to| !points[to as usize].is_blocked_for(id))
            .map(MoveTarget::Point)
            .collect()
    }

    fn board_move_targets(&self, id: PlayerId, from: u8, dice: &[u8]) -> Vec<MoveTarget> {
        if from > 23 || self.board.bar(id) > 0 {
            return Vec::new();
        }
        if self.board.points()[from as usize].owner() != Some(id) {
            return Vec::new();
        }

        let color = id.color();
        let all_home = self.board.all_checkers_in_home_board(id);
        let mut targets = Vec::new();

        for &die in dice {
            let Some(to) = color.step(from, die) else {
                continue;
            };
            if !self.board.is_valid_move(id, from, to).unwrap_or(false) {
                continue;
            }
            // Once everything is home, moves stay inside the home board.
            if all_home && !color.home_range().contains(&to) {
                continue;
            }
            targets.push(MoveTarget::Point(to));
        }

        if all_home && color.home_range().contains(&from) && self.bear_off_die(id, from).is_some() {
            targets.push(MoveTarget::BearOff);
        }

        targets
    }

    /// Whether the current player has any legal action with the current
    /// pool: a bar entry, a board move, or a bear-off.
    #[must_use]
    pub fn has_any_valid_moves(&self) -> bool {
        let Some(id) = self.current else {
            return false;
        };

        if self.board.bar(id) > 0 {
            return !self.get_valid_moves(MoveFrom::Bar).is_empty();
        }

        let points = self.board.points();
        (0..24u8).any(|p| {
            points[p as usize].owner() == Some(id)
                && !self.get_valid_moves(MoveFrom::Point(p)).is_empty()
        })
    }

    /// Roll for the current player, skipping turns automatically while no
    /// legal move exists. Used by callers without an interactive prompt.
    ///
    /// Sets the [`Game::turn_was_skipped`] flag whenever at least one turn
    /// was skipped. The loop is capped; exceeding the cap means the board
    /// reached a state the rules cannot produce.
    pub fn roll_dice_for_turn(&mut self) -> GameResult<()> {
        self.turn_was_skipped = false;

        for _ in 0..AUTO_SKIP_LIMIT {
            self.start_turn()?;
            if self.has_any_valid_moves() {
                return Ok(());
            }

            let id = self.current.unwrap_or(PlayerId::ONE);
            debug!(player = %id, dice = ?self.dice.values(), "no legal moves, skipping turn");
            self.players[id.index()].end_turn();
            self.switch_players()?;
            self.turn_was_skipped = true;
        }

        Err(GameError::AutoSkipLimitExceeded(AUTO_SKIP_LIMIT))
    }

    // === Checker reconciliation ===

    /// Re-derive both players' checker mirrors from the board.
    ///
    /// Deterministic: home-count slots become borne off from the end,
    /// bar-count slots go to the bar from the front, and the rest take board
    /// positions in ascending point order.
    pub fn sync_checkers(&mut self) {
        for id in PlayerId::both() {
            let mut positions = Vec::with_capacity(15);
            for (idx, point) in self.board.points().iter().enumerate() {
                if point.owner() == Some(id) {
                    for _ in 0..point.count() {
                        positions.push(idx as u8);
                    }
                }
            }
            let borne_off = self.board.home(id);
            let on_bar = self.board.bar(id);
            self.players[id.index()].sync_checkers(borne_off, on_bar, &positions);
        }
    }

    // === Serialization ===

    /// Export the full state contract, with the winner recomputed.
    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            board: self.board.clone(),
            dice: self.dice.clone(),
            player1: self.players[0].clone(),
            player2: self.players[1].clone(),
            current_player: self.current,
            winner: self.get_winner().cloned(),
        }
    }

    /// Rebuild a game from a snapshot with an entropy-seeded dice source.
    ///
    /// The stored `winner` field is ignored; it is derived state.
    #[must_use]
    pub fn from_snapshot(snapshot: GameSnapshot) -> Self {
        Self::from_snapshot_with_rng(snapshot, GameRng::from_entropy())
    }

    /// Rebuild a game from a snapshot with a fixed dice seed.
    #[must_use]
    pub fn from_snapshot_seeded(snapshot: GameSnapshot, seed: u64) -> Self {
        Self::from_snapshot_with_rng(snapshot, GameRng::new(seed))
    }

    fn from_snapshot_with_rng(snapshot: GameSnapshot, rng: GameRng) -> Self {
        Self {
            board: snapshot.board,
            dice: snapshot.dice,
            players: [snapshot.player1, snapshot.player2],
            current: snapshot.current_player,
            initialized: true,
            turn_was_skipped: false,
            rng,
        }
    }

    // === Preconditions ===

    fn ensure_initialized(&self, action: &'static str) -> GameResult<()> {
        if !self.initialized {
            return Err(GameError::GameNotInitialized(action));
        }
        Ok(())
    }

    fn ensure_not_over(&self, action: &'static str) -> GameResult<()> {
        if self.is_game_over() {
            return Err(GameError::GameAlreadyOver(action));
        }
        Ok(())
    }

    fn ensure_moves_remaining(&self, id: PlayerId) -> GameResult<()> {
        let player = self.player(id);
        if player.remaining_moves() == 0 {
            return Err(GameError::InvalidPlayerTurn(format!(
                "player {} has no remaining moves",
                player.name()
            )));
        }
        Ok(())
    }

    /// Force the current player and hand them a pip pool directly.
    /// Scenario setup for tests and restored sessions.
    pub fn force_turn(&mut self, id: PlayerId, pool: &[u8]) {
        self.current = Some(id);
        self.players[id.index()].start_turn(pool);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::CheckerState;
    use crate::player::PlayerId;

    const WHITE: PlayerId = PlayerId::ONE;
    const BLACK: PlayerId = PlayerId::TWO;

    fn started_game(seed: u64) -> Game {
        let mut game = Game::with_seed("White", "Black", seed);
        game.setup_game();
        game
    }

    #[test]
    fn test_preconditions_require_setup() {
        let mut game = Game::with_seed("White", "Black", 1);

        assert!(matches!(
            game.start_turn(),
            Err(GameError::GameNotInitialized(_))
        ));
        assert!(matches!(
            game.apply_move(MoveFrom::Point(23), 20),
            Err(GameError::GameNotInitialized(_))
        ));
        assert!(matches!(
            game.switch_players(),
            Err(GameError::GameNotInitialized(_))
        ));
        assert!(matches!(
            game.initial_roll_until_decided(),
            Err(GameError::GameNotInitialized(_))
        ));
    }

    #[test]
    fn test_setup_game_syncs_mirrors() {
        let game = started_game(1);

        assert!(game.is_initialized());
        for player in [game.player1(), game.player2()] {
            assert_eq!(player.count_in_state(CheckerState::OnBoard), 15);
            assert_eq!(player.count_in_state(CheckerState::OnBar), 0);
            assert_eq!(player.count_in_state(CheckerState::BorneOff), 0);
        }
        // Positions ascend: white's first mirror sits on its lowest point.
        assert_eq!(game.player1().checkers()[0].position(), Some(5));
        assert_eq!(game.player2().checkers()[0].position(), Some(0));
    }

    #[test]
    fn test_initial_roll_decides_a_mover() {
        let mut game = started_game(7);
        let winner = game.initial_roll_until_decided().unwrap();

        assert_eq!(game.current_player().map(Player::id), Some(winner));
        assert_eq!(
            game.other_player().map(Player::id),
            Some(winner.opponent())
        );
        assert!(!game.dice().is_initial_tie());
    }

    #[test]
    fn test_start_turn_requires_current_player() {
        let mut game = started_game(1);
        assert!(matches!(
            game.start_turn(),
            Err(GameError::InvalidPlayerTurn(_))
        ));

        game.initial_roll_until_decided().unwrap();
        game.start_turn().unwrap();
        let current = game.current_player().unwrap();
        assert!(current.is_turn());
        assert!(current.remaining_moves() >= 2);
    }

    #[test]
    fn test_apply_move_without_remaining_moves() {
        let mut game = started_game(1);
        game.initial_roll_until_decided().unwrap();

        assert!(matches!(
            game.apply_move(MoveFrom::Point(23), 20),
            Err(GameError::InvalidPlayerTurn(_))
        ));
    }

    #[test]
    fn test_apply_move_wrong_direction_is_rejected_as_false() {
        let mut game = started_game(1);
        game.force_turn(WHITE, &[3, 5]);

        // White may not increase its index.
        assert_eq!(game.apply_move(MoveFrom::Point(5), 8), Ok(false));
        assert_eq!(game.player1().remaining_moves(), 2);
    }

    #[test]
    fn test_apply_move_distance_must_match_pool() {
        let mut game = started_game(1);
        game.force_turn(WHITE, &[3, 5]);

        // 23 -> 22 needs a 1, which the pool cannot pay.
        assert_eq!(game.apply_move(MoveFrom::Point(23), 22), Ok(false));
        assert_eq!(game.player1().remaining_moves(), 2);
    }

    #[test]
    fn test_apply_move_consumes_dice_and_moves_checker() {
        let mut game = started_game(1);
        game.force_turn(WHITE, &[3, 5]);

        assert_eq!(game.apply_move(MoveFrom::Point(23), 20), Ok(true));
        assert_eq!(game.board().point_owner(20).unwrap(), Some(WHITE));
        assert_eq!(game.player1().remaining_moves(), 1);
        assert_eq!(game.player1().available_moves(), &[5]);
        // Turn continues: a 5 is still playable.
        assert_eq!(game.current_player().map(Player::id), Some(WHITE));
    }

    #[test]
    fn test_hit_sends_lone_blot_to_bar() {
        // Lone white at 10, lone black at 7; white plays 10 -> 7 with a 3.
        let mut game = started_game(1);
        let board = game.board_mut();
        *board = Board::empty();
        board.set_checkers(10, WHITE, 1).unwrap();
        board.set_checkers(0, WHITE, 14).unwrap();
        board.set_checkers(7, BLACK, 1).unwrap();
        board.set_checkers(18, BLACK, 14).unwrap();
        game.sync_checkers();
        game.force_turn(WHITE, &[3, 6]);

        assert_eq!(game.apply_move(MoveFrom::Point(10), 7), Ok(true));
        assert_eq!(game.board().point_owner(7).unwrap(), Some(WHITE));
        assert_eq!(game.board().point_count(7).unwrap(), 1);
        assert_eq!(game.board().bar(BLACK), 1);
        assert_eq!(game.player2().count_in_state(CheckerState::OnBar), 1);
    }

    #[test]
    fn test_bar_entry_with_exact_die() {
        // White on the bar with a 5: entering on 19 costs exactly 5.
        let mut game = started_game(1);
        let board = game.board_mut();
        *board = Board::empty();
        board.set_checkers(0, WHITE, 14).unwrap();
        board.set_bar(WHITE, 1);
        board.set_checkers(12, BLACK, 15).unwrap();
        game.sync_checkers();
        game.force_turn(WHITE, &[5]);

        assert_eq!(game.apply_move(MoveFrom::Bar, 19), Ok(true));
        assert_eq!(game.board().bar(WHITE), 0);
        assert_eq!(game.board().point_owner(19).unwrap(), Some(WHITE));
    }

    #[test]
    fn test_bar_entry_failures_are_hard_errors() {
        let mut game = started_game(1);
        game.force_turn(WHITE, &[5, 3]);

        // No checkers on the bar.
        assert!(matches!(
            game.apply_move(MoveFrom::Bar, 19),
            Err(GameError::InvalidMove { .. })
        ));

        game.board_mut().set_bar(WHITE, 1);
        game.sync_checkers();
        // Entry on 18 needs a 6 the pool cannot pay.
        assert!(matches!(
            game.apply_move(MoveFrom::Bar, 18),
            Err(GameError::InvalidMove { .. })
        ));
    }

    #[test]
    fn test_bar_must_enter_before_board_moves() {
        let mut game = started_game(1);
        game.board_mut().set_bar(WHITE, 1);
        game.sync_checkers();
        game.force_turn(WHITE, &[3, 5]);

        assert_eq!(game.apply_move(MoveFrom::Point(23), 20), Ok(false));
        assert_eq!(game.get_valid_moves(MoveFrom::Point(23)), Vec::new());
    }

    #[test]
    fn test_bear_off_exact_die() {
        let mut game = started_game(1);
        let board = game.board_mut();
        *board = Board::empty();
        board.set_checkers(2, WHITE, 15).unwrap();
        board.set_checkers(20, BLACK, 15).unwrap();
        game.sync_checkers();
        game.force_turn(WHITE, &[3, 6]);

        // Point 2 bears off with an exact 3.
        assert_eq!(game.apply_bear_off_move(2), Ok(true));
        assert_eq!(game.board().home(WHITE), 1);
        assert_eq!(game.player1().count_in_state(CheckerState::BorneOff), 1);
    }

    #[test]
    fn test_bear_off_overage_for_lone_highest_checker() {
        // 14 white at 0 and 1 at 2; die [4] bears off the checker at 2
        // because no white checker sits farther from the edge.
        let mut game = started_game(1);
        let board = game.board_mut();
        *board = Board::empty();
        board.set_checkers(0, WHITE, 14).unwrap();
        board.set_checkers(2, WHITE, 1).unwrap();
        board.set_checkers(20, BLACK, 15).unwrap();
        game.sync_checkers();
        game.force_turn(WHITE, &[4]);

        assert_eq!(game.apply_bear_off_move(2), Ok(true));
        assert_eq!(game.board().home(WHITE), 1);
    }

    #[test]
    fn test_bear_off_overage_blocked_by_higher_checker() {
        // A checker at 4 sits farther out than 2, so the 5 cannot be spent
        // on the nearer point.
        let mut game = started_game(1);
        let board = game.board_mut();
        *board = Board::empty();
        board.set_checkers(0, WHITE, 13).unwrap();
        board.set_checkers(2, WHITE, 1).unwrap();
        board.set_checkers(4, WHITE, 1).unwrap();
        board.set_checkers(20, BLACK, 15).unwrap();
        game.sync_checkers();
        game.force_turn(WHITE, &[5]);

        assert!(matches!(
            game.apply_bear_off_move(2),
            Err(GameError::InvalidMove { .. })
        ));
        // The highest checker itself may use the overage die.
        assert_eq!(game.apply_bear_off_move(4), Ok(true));
    }

    #[test]
    fn test_bear_off_requires_all_home() {
        let mut game = started_game(1);
        game.force_turn(WHITE, &[6, 1]);

        assert!(matches!(
            game.apply_bear_off_move(5),
            Err(GameError::InvalidMove { .. })
        ));
    }

    #[test]
    fn test_black_bear_off_distances() {
        let mut game = started_game(1);
        let board = game.board_mut();
        *board = Board::empty();
        board.set_checkers(21, BLACK, 15).unwrap();
        board.set_checkers(2, WHITE, 15).unwrap();
        game.sync_checkers();
        game.force_turn(BLACK, &[3, 3, 3, 3]);

        // 24 - 21 = 3, an exact match.
        assert_eq!(game.apply_bear_off_move(21), Ok(true));
        assert_eq!(game.board().home(BLACK), 1);
    }

    #[test]
    fn test_get_valid_moves_standard_start() {
        let mut game = started_game(1);
        game.force_turn(WHITE, &[3, 5]);

        // 23 - 5 = 18 is walled by black; only the 3 plays.
        let moves = game.get_valid_moves(MoveFrom::Point(23));
        assert_eq!(moves, vec![MoveTarget::Point(20)]);

        // 12 - 5 = 7 is white-owned (stack) and 12 - 3 = 9 is open.
        let moves = game.get_valid_moves(MoveFrom::Point(12));
        assert_eq!(moves, vec![MoveTarget::Point(7), MoveTarget::Point(9)]);

        // Not the mover's point.
        assert!(game.get_valid_moves(MoveFrom::Point(0)).is_empty());
    }

    #[test]
    fn test_get_valid_moves_bar() {
        let mut game = started_game(1);
        let board = game.board_mut();
        *board = Board::empty();
        board.set_bar(WHITE, 1);
        board.set_checkers(0, WHITE, 14).unwrap();
        board.set_checkers(19, BLACK, 2).unwrap();
        board.set_checkers(12, BLACK, 13).unwrap();
        game.sync_checkers();
        game.force_turn(WHITE, &[5, 3]);

        // Die 5 enters on 19 (blocked), die 3 on 21 (open).
        let moves = game.get_valid_moves(MoveFrom::Bar);
        assert_eq!(moves, vec![MoveTarget::Point(21)]);
    }

    #[test]
    fn test_get_valid_moves_includes_bear_off_sentinel() {
        let mut game = started_game(1);
        let board = game.board_mut();
        *board = Board::empty();
        board.set_checkers(0, WHITE, 14).unwrap();
        board.set_checkers(2, WHITE, 1).unwrap();
        board.set_checkers(20, BLACK, 15).unwrap();
        game.sync_checkers();
        game.force_turn(WHITE, &[4]);

        let moves = game.get_valid_moves(MoveFrom::Point(2));
        assert!(moves.contains(&MoveTarget::BearOff));
    }

    #[test]
    fn test_boxed_in_player_has_no_valid_moves() {
        // 15 black checkers on point 0, dice [6, 5], both destinations
        // blocked by white walls.
        let mut game = started_game(1);
        let board = game.board_mut();
        *board = Board::empty();
        board.set_checkers(0, BLACK, 15).unwrap();
        board.set_checkers(5, WHITE, 7).unwrap();
        board.set_checkers(6, WHITE, 8).unwrap();
        game.sync_checkers();
        game.force_turn(BLACK, &[6, 5]);

        assert!(!game.has_any_valid_moves());
    }

    #[test]
    fn test_auto_turn_end_when_no_moves_left() {
        let mut game = started_game(1);
        game.force_turn(WHITE, &[3]);

        assert_eq!(game.apply_move(MoveFrom::Point(23), 20), Ok(true));
        // Pool exhausted: the turn passed to black.
        assert_eq!(game.current_player().map(Player::id), Some(BLACK));
        assert!(!game.player1().is_turn());
    }

    #[test]
    fn test_game_over_blocks_further_play() {
        let mut game = started_game(1);
        game.board_mut().set_home(WHITE, 15);
        game.sync_checkers();
        game.force_turn(BLACK, &[3, 5]);

        assert!(game.is_game_over());
        assert_eq!(game.get_winner().map(Player::id), Some(WHITE));
        assert!(game.player1().has_won());
        assert!(matches!(
            game.apply_move(MoveFrom::Point(0), 3),
            Err(GameError::GameAlreadyOver(_))
        ));
        assert!(matches!(
            game.start_turn(),
            Err(GameError::GameAlreadyOver(_))
        ));
    }

    #[test]
    fn test_move_from_parsing_and_display() {
        assert_eq!("bar".parse::<MoveFrom>().unwrap(), MoveFrom::Bar);
        assert_eq!("17".parse::<MoveFrom>().unwrap(), MoveFrom::Point(17));
        assert!("off".parse::<MoveFrom>().is_err());

        assert_eq!(MoveFrom::Bar.to_string(), "bar");
        assert_eq!(MoveTarget::BearOff.to_string(), "bear_off");
        assert_eq!(MoveTarget::Point(7).to_string(), "7");
    }

    #[test]
    fn test_valid_moves_serialize_with_sentinel() {
        let targets = vec![MoveTarget::Point(3), MoveTarget::BearOff];
        let json = serde_json::to_value(&targets).unwrap();
        assert_eq!(json, serde_json::json!([3, "bear_off"]));
        assert_eq!(
            serde_json::to_value(MoveFrom::Bar).unwrap(),
            serde_json::json!("bar")
        );
    }
}
