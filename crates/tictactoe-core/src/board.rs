//! Game board representation.
//!
//! This module contains:
//! - Player symbols (X and O)
//! - The 3x3 grid of cells
//! - Win-line and full-board queries

use serde::{Deserialize, Serialize};
use std::fmt;

/// The mark a player places on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbol {
    X,
    O,
}

impl Symbol {
    /// Both symbols, in move order (X always moves first)
    pub const ALL: [Symbol; 2] = [Symbol::X, Symbol::O];

    /// The other symbol
    pub fn opponent(&self) -> Symbol {
        match self {
            Symbol::X => Symbol::O,
            Symbol::O => Symbol::X,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::X => write!(f, "X"),
            Symbol::O => write!(f, "O"),
        }
    }
}

/// Board dimension (rows and columns)
pub const BOARD_SIZE: usize = 3;

/// The 8 winning lines: 3 rows, 3 columns, 2 diagonals
const LINES: [[(usize, usize); 3]; 8] = [
    [(0, 0), (0, 1), (0, 2)],
    [(1, 0), (1, 1), (1, 2)],
    [(2, 0), (2, 1), (2, 2)],
    [(0, 0), (1, 0), (2, 0)],
    [(0, 1), (1, 1), (2, 1)],
    [(0, 2), (1, 2), (2, 2)],
    [(0, 0), (1, 1), (2, 2)],
    [(0, 2), (1, 1), (2, 0)],
];

/// The 3x3 game board.
///
/// Cells are row-major and zero-indexed. An empty cell is `None`.
/// Serializes as a 3x3 array of `"X"`/`"O"`/`null`, which is the shape
/// the web layer sends to clients.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    cells: [[Option<Symbol>; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    /// Create an empty board
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the coordinates fall inside the grid
    pub fn in_bounds(row: usize, col: usize) -> bool {
        row < BOARD_SIZE && col < BOARD_SIZE
    }

    /// Value at a position.
    ///
    /// Returns `None` for an empty cell and also for out-of-range
    /// coordinates; callers that care about the difference check
    /// [`Board::in_bounds`] first.
    pub fn get(&self, row: usize, col: usize) -> Option<Symbol> {
        if Self::in_bounds(row, col) {
            self.cells[row][col]
        } else {
            None
        }
    }

    /// Write a symbol into a cell. Out-of-range coordinates are ignored.
    ///
    /// This is a raw write: no occupancy check, no win evaluation.
    pub fn set(&mut self, row: usize, col: usize, symbol: Symbol) {
        if Self::in_bounds(row, col) {
            self.cells[row][col] = Some(symbol);
        }
    }

    /// Clear every cell
    pub fn clear(&mut self) {
        self.cells = Default::default();
    }

    /// True iff some winning line is fully occupied by `symbol`.
    ///
    /// Only ever evaluated for the symbol that just moved; the board
    /// does not try to determine "the" winner on its own.
    pub fn line_won_by(&self, symbol: Symbol) -> bool {
        LINES.iter().any(|line| {
            line.iter()
                .all(|&(row, col)| self.cells[row][col] == Some(symbol))
        })
    }

    /// True iff no cell is empty
    pub fn is_full(&self) -> bool {
        self.cells
            .iter()
            .all(|row| row.iter().all(|cell| cell.is_some()))
    }

    /// Number of occupied cells
    pub fn occupied_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|cell| cell.is_some())
            .count()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.cells.iter().enumerate() {
            if i > 0 {
                write!(f, "\n---------\n")?;
            }
            let rendered: Vec<&str> = row
                .iter()
                .map(|cell| match cell {
                    Some(Symbol::X) => "X",
                    Some(Symbol::O) => "O",
                    None => " ",
                })
                .collect();
            write!(f, "{}", rendered.join(" | "))?;
        }
        Ok(())
    }
}
