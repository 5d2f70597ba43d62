//! Standard chess rules implementation.

use super::{DrawReason, GameResult, RuleSet};
use crate::movegen::{generate_moves, is_king_attacked, make_move};
use crate::Position;
use chess_core::{Move, Piece};

/// Standard chess rules.
///
/// - Standard piece movement, castling, en passant and promotion
/// - Checkmate and stalemate detection
/// - Automatic draws by insufficient material and the 75-move rule
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardChess;

impl StandardChess {
    /// Returns true if neither side has enough material to checkmate.
    pub fn is_insufficient_material(&self, position: &Position) -> bool {
        let mut minors = Vec::new();
        for (sq, piece) in position.pieces() {
            match piece.kind {
                Piece::King => {}
                Piece::Knight | Piece::Bishop => minors.push((sq, piece)),
                Piece::Pawn | Piece::Rook | Piece::Queen => return false,
            }
        }

        match minors.as_slice() {
            [] | [_] => true,
            // Opposing bishops on the same square color
            [(a, pa), (b, pb)] => {
                pa.kind == Piece::Bishop
                    && pb.kind == Piece::Bishop
                    && pa.color != pb.color
                    && a.is_light() == b.is_light()
            }
            _ => false,
        }
    }
}

impl RuleSet for StandardChess {
    fn initial_position(&self) -> Position {
        Position::startpos()
    }

    fn generate_moves(&self, position: &Position) -> Vec<Move> {
        generate_moves(position)
    }

    fn make_move(&self, position: &Position, m: Move) -> Position {
        make_move(position, m)
    }

    fn is_check(&self, position: &Position) -> bool {
        is_king_attacked(position, position.side_to_move)
    }

    fn game_result(&self, position: &Position) -> Option<GameResult> {
        if generate_moves(position).is_empty() {
            return Some(if self.is_check(position) {
                GameResult::checkmate_against(position.side_to_move)
            } else {
                GameResult::Draw(DrawReason::Stalemate)
            });
        }

        if position.halfmove_clock >= 150 {
            return Some(GameResult::Draw(DrawReason::SeventyFiveMoveRule));
        }

        if self.is_insufficient_material(position) {
            return Some(GameResult::Draw(DrawReason::InsufficientMaterial));
        }

        None
    }
}
