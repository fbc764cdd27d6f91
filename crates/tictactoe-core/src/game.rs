//! Core game state machine.
//!
//! This module contains the main `Game` struct and all game logic:
//! move validation, turn order, win/draw detection, and reset.
//!
//! The engine is pure and synchronous. It never panics and it never
//! returns an error: a refused move comes back as `false` with the
//! rejection flag set, and the board is left untouched. Callers that
//! need the reason for a rejection re-derive it by inspecting state
//! (game over first, then occupancy, then turn), which is what the
//! web layer does.

use crate::board::{Board, Symbol};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default display name for the X player
pub const DEFAULT_X_NAME: &str = "Player X";

/// Default display name for the O player
pub const DEFAULT_O_NAME: &str = "Player O";

/// Derived game phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    /// Moves are still being accepted
    InProgress,
    /// The given symbol completed a line
    Won(Symbol),
    /// Board filled with no winner
    Draw,
}

/// A single tic-tac-toe game.
///
/// One instance per game. Mutation happens only through the move
/// operations and [`Game::reset`]; the surrounding store is expected to
/// serialize access per game id, so there is no internal locking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    /// Unique handle for this game, assigned at creation
    id: Uuid,
    /// The 3x3 board
    board: Board,
    /// Whose turn it is
    current_player: Symbol,
    /// Display name bound to X at creation
    player_x_name: String,
    /// Display name bound to O at creation
    player_o_name: String,
    /// Derived phase, only changed by move evaluation or reset
    status: Status,
    /// Whether the most recent move attempt was refused
    last_move_rejected: bool,
}

impl Game {
    /// Create a game with default player names.
    pub fn new() -> Self {
        Self::with_players(DEFAULT_X_NAME, DEFAULT_O_NAME)
    }

    /// Create a game with custom player names. Never fails.
    ///
    /// X always moves first in a fresh game.
    pub fn with_players(player_x_name: impl Into<String>, player_o_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            board: Board::new(),
            current_player: Symbol::X,
            player_x_name: player_x_name.into(),
            player_o_name: player_o_name.into(),
            status: Status::InProgress,
            last_move_rejected: false,
        }
    }

    /// Attempt a move for whichever symbol is on turn.
    ///
    /// Returns `true` if the move was applied, `false` if rejected.
    pub fn make_move(&mut self, row: usize, col: usize) -> bool {
        self.make_move_as(row, col, self.current_player)
    }

    /// Attempt a move, asserting which symbol is moving.
    ///
    /// Preconditions are checked in order and the first failure wins:
    /// game already over, coordinates out of bounds, cell occupied,
    /// asserted symbol not on turn. Any failure returns `false`, sets
    /// the rejection flag, and leaves the game unchanged.
    pub fn make_move_as(&mut self, row: usize, col: usize, player: Symbol) -> bool {
        self.last_move_rejected = false;

        if self.status != Status::InProgress {
            self.last_move_rejected = true;
            return false;
        }

        if !Board::in_bounds(row, col) {
            self.last_move_rejected = true;
            return false;
        }

        if self.board.get(row, col).is_some() {
            self.last_move_rejected = true;
            return false;
        }

        if player != self.current_player {
            self.last_move_rejected = true;
            return false;
        }

        self.board.set(row, col, self.current_player);

        // Win is evaluated only for the symbol that just moved.
        if self.board.line_won_by(self.current_player) {
            self.status = Status::Won(self.current_player);
        } else if self.board.is_full() {
            self.status = Status::Draw;
        } else {
            self.current_player = self.current_player.opponent();
        }

        true
    }

    /// Attempt a move identified by player name instead of symbol.
    ///
    /// The name must exactly match one of the two registered names;
    /// anything else is rejected without touching the board.
    pub fn make_move_by_name(&mut self, row: usize, col: usize, player_name: &str) -> bool {
        let symbol = if player_name == self.player_x_name {
            Symbol::X
        } else if player_name == self.player_o_name {
            Symbol::O
        } else {
            self.last_move_rejected = true;
            return false;
        };

        self.make_move_as(row, col, symbol)
    }

    /// Restore board, turn, and status to construction-time defaults.
    ///
    /// The game id and both player names survive a reset.
    pub fn reset(&mut self) {
        self.board.clear();
        self.current_player = Symbol::X;
        self.status = Status::InProgress;
        self.last_move_rejected = false;
    }

    // ==================== Accessors ====================

    /// Unique game id
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Snapshot of the board (a copy, not a live reference)
    pub fn board(&self) -> Board {
        self.board
    }

    /// Value at a position; `None` for empty or out-of-range
    pub fn cell(&self, row: usize, col: usize) -> Option<Symbol> {
        self.board.get(row, col)
    }

    /// Symbol whose turn it is
    pub fn current_player(&self) -> Symbol {
        self.current_player
    }

    /// Display name of the player on turn
    pub fn current_player_name(&self) -> &str {
        self.player_name(self.current_player)
    }

    /// Display name bound to a symbol
    pub fn player_name(&self, symbol: Symbol) -> &str {
        match symbol {
            Symbol::X => &self.player_x_name,
            Symbol::O => &self.player_o_name,
        }
    }

    /// Name bound to X
    pub fn player_x_name(&self) -> &str {
        &self.player_x_name
    }

    /// Name bound to O
    pub fn player_o_name(&self) -> &str {
        &self.player_o_name
    }

    /// Current derived phase
    pub fn status(&self) -> Status {
        self.status
    }

    /// Winning symbol, if the game has been won
    pub fn winner(&self) -> Option<Symbol> {
        match self.status {
            Status::Won(symbol) => Some(symbol),
            _ => None,
        }
    }

    /// Winning player's display name, if the game has been won
    pub fn winner_name(&self) -> Option<&str> {
        self.winner().map(|symbol| self.player_name(symbol))
    }

    /// Whether the game ended in a draw
    pub fn is_draw(&self) -> bool {
        self.status == Status::Draw
    }

    /// Whether the game is over (won or drawn)
    pub fn is_over(&self) -> bool {
        self.status != Status::InProgress
    }

    /// Whether the most recent move attempt was refused
    pub fn last_move_rejected(&self) -> bool {
        self.last_move_rejected
    }

    /// Number of moves placed so far
    pub fn moves_made(&self) -> usize {
        self.board.occupied_count()
    }

    // ==================== Test/setup mutators ====================

    /// Write symbols directly into cells, for constructing arbitrary
    /// board states. Out-of-range entries are silently skipped.
    ///
    /// Raw state poke: no win or draw evaluation runs. A winning line
    /// placed this way is only noticed by the next successful
    /// `make_move`, and then only for the symbol that moved.
    pub fn set_cells(&mut self, cells: &[(usize, usize, Symbol)]) {
        for &(row, col, symbol) in cells {
            self.board.set(row, col, symbol);
        }
    }

    /// Override whose turn it is. Raw state poke, no evaluation.
    pub fn set_current_player(&mut self, player: Symbol) {
        self.current_player = player;
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
