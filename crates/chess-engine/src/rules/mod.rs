//! Rule set abstraction.
//!
//! This module provides the [`RuleSet`] trait, the seam between the session
//! controller and the rules of the game. The controller only ever asks the
//! active rule set for moves, successor positions and results.

mod standard;

pub use standard::StandardChess;

use crate::Position;
use chess_core::{Color, Move};
use std::fmt;

/// Result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    /// White wins by checkmate.
    WhiteWins,
    /// Black wins by checkmate.
    BlackWins,
    /// Draw with a specific reason.
    Draw(DrawReason),
}

impl GameResult {
    /// Result of a checkmate delivered against `mated`.
    pub const fn checkmate_against(mated: Color) -> Self {
        match mated {
            Color::White => GameResult::BlackWins,
            Color::Black => GameResult::WhiteWins,
        }
    }

    pub const fn is_checkmate(self) -> bool {
        matches!(self, GameResult::WhiteWins | GameResult::BlackWins)
    }

    pub const fn is_stalemate(self) -> bool {
        matches!(self, GameResult::Draw(DrawReason::Stalemate))
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameResult::WhiteWins => write!(f, "White wins by checkmate"),
            GameResult::BlackWins => write!(f, "Black wins by checkmate"),
            GameResult::Draw(DrawReason::Stalemate) => write!(f, "Stalemate"),
            GameResult::Draw(DrawReason::InsufficientMaterial) => {
                write!(f, "Draw by insufficient material")
            }
            GameResult::Draw(DrawReason::SeventyFiveMoveRule) => write!(f, "Draw by 75-move rule"),
        }
    }
}

/// Reason for a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawReason {
    /// No legal moves but not in check.
    Stalemate,
    /// Neither side can possibly deliver mate.
    InsufficientMaterial,
    /// 150 half-moves without pawn move or capture.
    SeventyFiveMoveRule,
}

/// Trait for the rules of the game.
///
/// # Example
///
/// ```
/// use chess_engine::{Position, StandardChess};
/// use chess_engine::rules::RuleSet;
///
/// let position = StandardChess.initial_position();
/// let moves = StandardChess.generate_moves(&position);
/// assert_eq!(moves.len(), 20);
/// ```
pub trait RuleSet {
    /// Returns the initial position.
    fn initial_position(&self) -> Position;

    /// Generates all legal moves for the given position.
    fn generate_moves(&self, position: &Position) -> Vec<Move>;

    /// Returns true if the given move is legal in the position.
    fn is_legal(&self, position: &Position, m: Move) -> bool {
        self.generate_moves(position).contains(&m)
    }

    /// Makes a move on the position, returning the new position.
    ///
    /// The move must be legal; use [`try_make_move`](RuleSet::try_make_move)
    /// for unchecked input.
    fn make_move(&self, position: &Position, m: Move) -> Position;

    /// Attempts to make a move, returning `None` if illegal.
    fn try_make_move(&self, position: &Position, m: Move) -> Option<Position> {
        if self.is_legal(position, m) {
            Some(self.make_move(position, m))
        } else {
            None
        }
    }

    /// Returns true if the side to move is in check.
    fn is_check(&self, position: &Position) -> bool;

    /// Returns the game result if the game is over, otherwise `None`.
    fn game_result(&self, position: &Position) -> Option<GameResult>;

    /// Returns true if the game is over.
    fn is_game_over(&self, position: &Position) -> bool {
        self.game_result(position).is_some()
    }

    /// Returns true if the side to move is checkmated.
    fn is_checkmate(&self, position: &Position) -> bool {
        self.game_result(position).is_some_and(GameResult::is_checkmate)
    }

    /// Returns true if the side to move is stalemated.
    fn is_stalemate(&self, position: &Position) -> bool {
        self.game_result(position).is_some_and(GameResult::is_stalemate)
    }
}
