//! Core types for chess.
//!
//! This crate provides the fundamental value types shared by the rule engine,
//! the search and the session controller:
//! - [`Piece`], [`ColoredPiece`] and [`Color`] for piece representation
//! - [`Square`] for board coordinates in screen (row, column) order
//! - [`Move`] and [`MoveFlag`] for fully described moves

mod color;
mod mov;
mod piece;
mod square;

pub use color::Color;
pub use mov::{Move, MoveFlag};
pub use piece::{ColoredPiece, Piece};
pub use square::{Square, BOARD_DIMENSION};
