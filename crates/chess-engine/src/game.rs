//! Full game management with history tracking.
//!
//! The [`Game`] struct is the stateful face of the rule engine used by the
//! session controller: it owns the current position, a stack of previous
//! positions for undo, and the move log shown next to the board.

use crate::fen::FenError;
use crate::rules::{GameResult, RuleSet, StandardChess};
use crate::Position;
use chess_core::{Color, Move, Piece, Square};
use thiserror::Error;

/// Error type for game operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// The move is not legal in the current position.
    #[error("illegal move: {0}")]
    IllegalMove(String),
    /// The UCI string could not be parsed.
    #[error("invalid UCI move: {0}")]
    InvalidUci(String),
    /// The starting position could not be parsed.
    #[error(transparent)]
    Fen(#[from] FenError),
}

/// A complete game with history tracking.
#[derive(Debug, Clone)]
pub struct Game {
    /// Current position.
    position: Position,
    /// Positions before each move in `moves`, for undo.
    history: Vec<Position>,
    /// Moves played since `start_pos`.
    moves: Vec<Move>,
    /// Starting position.
    start_pos: Position,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Creates a new game with the standard starting position.
    pub fn new() -> Self {
        Self::from_position(StandardChess.initial_position())
    }

    /// Creates a game from a custom starting position.
    pub fn from_position(position: Position) -> Self {
        Game {
            position: position.clone(),
            history: Vec::new(),
            moves: Vec::new(),
            start_pos: position,
        }
    }

    /// Creates a game from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, GameError> {
        Ok(Self::from_position(Position::from_fen(fen)?))
    }

    /// Returns a reference to the current position.
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Returns the starting position.
    pub fn start_position(&self) -> &Position {
        &self.start_pos
    }

    /// Returns the side to move.
    pub fn side_to_move(&self) -> Color {
        self.position.side_to_move
    }

    /// Returns all legal moves in the current position.
    pub fn legal_moves(&self) -> Vec<Move> {
        StandardChess.generate_moves(&self.position)
    }

    /// Returns true if the side to move is in check.
    pub fn is_check(&self) -> bool {
        StandardChess.is_check(&self.position)
    }

    /// Returns the game result if the game is over.
    pub fn result(&self) -> Option<GameResult> {
        StandardChess.game_result(&self.position)
    }

    pub fn is_checkmate(&self) -> bool {
        StandardChess.is_checkmate(&self.position)
    }

    pub fn is_stalemate(&self) -> bool {
        StandardChess.is_stalemate(&self.position)
    }

    /// Returns the move history.
    pub fn move_log(&self) -> &[Move] {
        &self.moves
    }

    /// Returns the most recent move, if any.
    pub fn last_move(&self) -> Option<&Move> {
        self.moves.last()
    }

    /// Returns the number of half-moves (plies) played.
    pub fn ply_count(&self) -> usize {
        self.moves.len()
    }

    /// Makes a move.
    ///
    /// The move must be one of [`legal_moves`](Self::legal_moves); anything
    /// else is rejected and the game is left untouched.
    pub fn make_move(&mut self, m: Move) -> Result<(), GameError> {
        if !StandardChess.is_legal(&self.position, m) {
            return Err(GameError::IllegalMove(m.to_uci()));
        }
        self.apply_move(m);
        Ok(())
    }

    /// Makes a move given in UCI notation.
    pub fn make_move_uci(&mut self, uci: &str) -> Result<Move, GameError> {
        let (from, to, promotion) =
            parse_uci(uci).ok_or_else(|| GameError::InvalidUci(uci.to_string()))?;

        // Find the matching legal move (to get correct flags)
        let legal = self
            .legal_moves()
            .into_iter()
            .find(|m| m.matches(from, to, promotion))
            .ok_or_else(|| GameError::IllegalMove(uci.to_string()))?;

        self.apply_move(legal);
        Ok(legal)
    }

    /// Reverts the last move, returning it. `None` at the starting position.
    pub fn undo_move(&mut self) -> Option<Move> {
        let previous = self.history.pop()?;
        self.position = previous;
        self.moves.pop()
    }

    /// Returns the current position as a FEN string.
    pub fn to_fen(&self) -> String {
        self.position.to_fen()
    }

    fn apply_move(&mut self, m: Move) {
        let next = StandardChess.make_move(&self.position, m);
        self.history.push(std::mem::replace(&mut self.position, next));
        self.moves.push(m);
    }
}

/// Splits a UCI move string into origin, destination and promotion choice.
fn parse_uci(s: &str) -> Option<(Square, Square, Option<Piece>)> {
    if !s.is_ascii() || s.len() < 4 || s.len() > 5 {
        return None;
    }
    let from = Square::from_algebraic(&s[0..2])?;
    let to = Square::from_algebraic(&s[2..4])?;
    let promotion = match s[4..].chars().next() {
        Some(c) => match Piece::from_letter(c)? {
            Piece::Pawn | Piece::King => return None,
            piece => Some(piece),
        },
        None => None,
    };
    Some((from, to, promotion))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::DrawReason;
    use chess_core::MoveFlag;
    use proptest::prelude::*;

    #[test]
    fn new_game() {
        let game = Game::new();
        assert_eq!(game.ply_count(), 0);
        assert_eq!(game.result(), None);
        assert!(!game.is_check());
        assert_eq!(game.legal_moves().len(), 20);
    }

    #[test]
    fn make_move_uci() {
        let mut game = Game::new();
        let m = game.make_move_uci("e2e4").unwrap();
        assert_eq!(m.flag, MoveFlag::DoublePush);
        assert_eq!(game.ply_count(), 1);
        assert_eq!(game.move_log()[0].to_string(), "e4");
        assert_eq!(game.side_to_move(), Color::Black);
    }

    #[test]
    fn illegal_move_leaves_game_untouched() {
        let mut game = Game::new();
        let before = game.to_fen();
        assert!(matches!(game.make_move_uci("e2e5"), Err(GameError::IllegalMove(_))));
        assert!(matches!(game.make_move_uci("zz"), Err(GameError::InvalidUci(_))));
        assert_eq!(game.to_fen(), before);
        assert_eq!(game.ply_count(), 0);
    }

    #[test]
    fn make_move_rejects_foreign_move() {
        let mut game = Game::new();
        let mut other = Game::from_fen("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1").unwrap();
        let m = other.make_move_uci("e1d1").unwrap();
        assert!(matches!(game.make_move(m), Err(GameError::IllegalMove(_))));
    }

    #[test]
    fn checkmate_fools_mate() {
        let mut game = Game::new();
        for uci in ["f2f3", "e7e5", "g2g4", "d8h4"] {
            game.make_move_uci(uci).unwrap();
        }
        assert!(game.is_checkmate());
        assert_eq!(game.result(), Some(GameResult::BlackWins));
        assert!(game.legal_moves().is_empty());
    }

    #[test]
    fn stalemate() {
        let game = Game::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert!(game.is_stalemate());
        assert_eq!(game.result(), Some(GameResult::Draw(DrawReason::Stalemate)));
    }

    #[test]
    fn undo_restores_position_and_moves() {
        let mut game = Game::new();
        let start_moves = game.legal_moves();
        let m = game.make_move_uci("g1f3").unwrap();

        assert_eq!(game.undo_move(), Some(m));
        assert_eq!(game.position(), &Position::startpos());
        assert_eq!(game.legal_moves(), start_moves);
        assert_eq!(game.undo_move(), None);
    }

    #[test]
    fn apply_undo_apply_gives_same_moves() {
        let mut game = Game::new();
        game.make_move_uci("e2e4").unwrap();
        let m = game.make_move_uci("c7c5").unwrap();
        let after = game.legal_moves();

        game.undo_move();
        game.make_move(m).unwrap();
        assert_eq!(game.legal_moves(), after);
    }

    #[test]
    fn promotion_uci() {
        let mut game = Game::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let m = game.make_move_uci("a7a8n").unwrap();
        assert_eq!(m.flag, MoveFlag::Promote(Piece::Knight));
        assert!(matches!(game.make_move_uci("e8e7k"), Err(GameError::InvalidUci(_))));
    }

    proptest! {
        #[test]
        fn undoing_every_move_returns_to_start(choices in proptest::collection::vec(0usize..64, 0..24)) {
            let mut game = Game::new();
            for choice in choices {
                let moves = game.legal_moves();
                if moves.is_empty() {
                    break;
                }
                game.make_move(moves[choice % moves.len()]).unwrap();
            }
            while game.undo_move().is_some() {}
            prop_assert_eq!(game.position(), &Position::startpos());
            prop_assert_eq!(game.ply_count(), 0);
        }
    }
}
