//! Rule engine for the session controller.
//!
//! This crate provides:
//! - [`Position`] - Full board state including castling rights and en passant
//! - [`RuleSet`] - Trait for the rules of the game, implemented by [`StandardChess`]
//! - [`Game`] - Game management with undo history and a move log
//! - [`SaveSlot`] - Single-slot persistence for games
//!
//! # Example
//!
//! ```
//! use chess_engine::{Game, MemorySlot, load_game, save_game};
//!
//! let mut game = Game::new();
//! game.make_move_uci("e2e4").unwrap();
//! game.make_move_uci("e7e5").unwrap();
//!
//! let mut slot = MemorySlot::new();
//! save_game(&mut slot, &game).unwrap();
//! let restored = load_game(&slot).unwrap();
//! assert_eq!(restored.to_fen(), game.to_fen());
//! ```

pub mod fen;
mod game;
pub mod movegen;
pub mod persist;
mod position;
pub mod rules;

pub use fen::FenError;
pub use game::{Game, GameError};
pub use movegen::{generate_moves, is_king_attacked, is_square_attacked, make_move};
pub use persist::{load_game, save_game, FileSlot, MemorySlot, SaveError, SaveSlot, SavedGame};
pub use position::{CastlingRights, Position};
pub use rules::{DrawReason, GameResult, RuleSet, StandardChess};
