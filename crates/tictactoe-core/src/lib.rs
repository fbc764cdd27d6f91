//! Tic-tac-toe game engine.
//!
//! This crate provides the core game logic: the board, move validation,
//! turn order, win/draw detection, and reset semantics. It is pure and
//! synchronous with no I/O, so it can sit behind any front end — the
//! REST server in this workspace, a CLI, or tests driving it directly.
//!
//! # Modules
//!
//! - [`board`]: symbols, the 3x3 grid, and line queries
//! - [`game`]: the [`Game`] state machine

pub mod board;
pub mod game;

// Re-export commonly used types
pub use board::{Board, Symbol, BOARD_SIZE};
pub use game::{Game, Status, DEFAULT_O_NAME, DEFAULT_X_NAME};
