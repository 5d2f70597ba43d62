//! Minimax search with alpha-beta pruning.
//!
//! Material plus piece-square evaluation, searched to a fixed depth with
//! iterative deepening. The cancel token is checked at every node.

use crate::{CancelToken, MoveSearch};
use chess_core::{Color, Move, Piece, Square};
use chess_engine::rules::RuleSet;
use chess_engine::{is_king_attacked, Position, StandardChess};
use tracing::debug;

/// Piece values in centipawns
const PAWN_VALUE: i32 = 100;
const KNIGHT_VALUE: i32 = 320;
const BISHOP_VALUE: i32 = 330;
const ROOK_VALUE: i32 = 500;
const QUEEN_VALUE: i32 = 900;

const MATE_SCORE: i32 = 100_000;

// Piece-square tables from White's side of the board, first entry a8, last h1.
const PAWN_PST: [i32; 64] = [
    0, 0, 0, 0, 0, 0, 0, 0, //
    50, 50, 50, 50, 50, 50, 50, 50, //
    10, 10, 20, 30, 30, 20, 10, 10, //
    5, 5, 10, 25, 25, 10, 5, 5, //
    0, 0, 0, 20, 20, 0, 0, 0, //
    5, -5, -10, 0, 0, -10, -5, 5, //
    5, 10, 10, -20, -20, 10, 10, 5, //
    0, 0, 0, 0, 0, 0, 0, 0,
];

const KNIGHT_PST: [i32; 64] = [
    -50, -40, -30, -30, -30, -30, -40, -50, //
    -40, -20, 0, 0, 0, 0, -20, -40, //
    -30, 0, 10, 15, 15, 10, 0, -30, //
    -30, 5, 15, 20, 20, 15, 5, -30, //
    -30, 0, 15, 20, 20, 15, 0, -30, //
    -30, 5, 10, 15, 15, 10, 5, -30, //
    -40, -20, 0, 5, 5, 0, -20, -40, //
    -50, -40, -30, -30, -30, -30, -40, -50,
];

const BISHOP_PST: [i32; 64] = [
    -20, -10, -10, -10, -10, -10, -10, -20, //
    -10, 0, 0, 0, 0, 0, 0, -10, //
    -10, 0, 5, 10, 10, 5, 0, -10, //
    -10, 5, 5, 10, 10, 5, 5, -10, //
    -10, 0, 10, 10, 10, 10, 0, -10, //
    -10, 10, 10, 10, 10, 10, 10, -10, //
    -10, 5, 0, 0, 0, 0, 5, -10, //
    -20, -10, -10, -10, -10, -10, -10, -20,
];

const ROOK_PST: [i32; 64] = [
    0, 0, 0, 0, 0, 0, 0, 0, //
    5, 10, 10, 10, 10, 10, 10, 5, //
    -5, 0, 0, 0, 0, 0, 0, -5, //
    -5, 0, 0, 0, 0, 0, 0, -5, //
    -5, 0, 0, 0, 0, 0, 0, -5, //
    -5, 0, 0, 0, 0, 0, 0, -5, //
    -5, 0, 0, 0, 0, 0, 0, -5, //
    0, 0, 0, 5, 5, 0, 0, 0,
];

const QUEEN_PST: [i32; 64] = [
    -20, -10, -10, -5, -5, -10, -10, -20, //
    -10, 0, 0, 0, 0, 0, 0, -10, //
    -10, 0, 5, 5, 5, 5, 0, -10, //
    -5, 0, 5, 5, 5, 5, 0, -5, //
    0, 0, 5, 5, 5, 5, 0, -5, //
    -10, 5, 5, 5, 5, 5, 0, -10, //
    -10, 0, 5, 0, 0, 0, 0, -10, //
    -20, -10, -10, -5, -5, -10, -10, -20,
];

const KING_MIDDLEGAME_PST: [i32; 64] = [
    -30, -40, -40, -50, -50, -40, -40, -30, //
    -30, -40, -40, -50, -50, -40, -40, -30, //
    -30, -40, -40, -50, -50, -40, -40, -30, //
    -30, -40, -40, -50, -50, -40, -40, -30, //
    -20, -30, -30, -40, -40, -30, -30, -20, //
    -10, -20, -20, -20, -20, -20, -20, -10, //
    20, 20, 0, 0, 0, 0, 20, 20, //
    20, 30, 10, 0, 0, 10, 30, 20,
];

/// Table index for a piece of `color` on `sq`. Black reads the table mirrored.
fn table_index(sq: Square, color: Color) -> usize {
    let row = match color {
        Color::White => sq.row(),
        Color::Black => 7 - sq.row(),
    };
    row as usize * 8 + sq.col() as usize
}

fn piece_score(kind: Piece, idx: usize) -> i32 {
    match kind {
        Piece::Pawn => PAWN_VALUE + PAWN_PST[idx],
        Piece::Knight => KNIGHT_VALUE + KNIGHT_PST[idx],
        Piece::Bishop => BISHOP_VALUE + BISHOP_PST[idx],
        Piece::Rook => ROOK_VALUE + ROOK_PST[idx],
        Piece::Queen => QUEEN_VALUE + QUEEN_PST[idx],
        Piece::King => KING_MIDDLEGAME_PST[idx],
    }
}

/// Evaluates the position from the side to move's perspective.
pub fn evaluate(position: &Position) -> i32 {
    let score: i32 = position
        .pieces()
        .map(|(sq, piece)| {
            let value = piece_score(piece.kind, table_index(sq, piece.color));
            match piece.color {
                Color::White => value,
                Color::Black => -value,
            }
        })
        .sum();

    match position.side_to_move {
        Color::White => score,
        Color::Black => -score,
    }
}

/// Per-search bookkeeping.
struct Searcher<'a> {
    nodes: u64,
    cancel: &'a CancelToken,
    stopped: bool,
}

impl Searcher<'_> {
    fn check_cancel(&mut self) {
        if self.cancel.is_cancelled() {
            self.stopped = true;
        }
    }

    fn alpha_beta(&mut self, position: &Position, depth: u8, mut alpha: i32, beta: i32) -> i32 {
        self.nodes += 1;
        self.check_cancel();
        if self.stopped {
            return 0;
        }

        if depth == 0 {
            return evaluate(position);
        }

        let moves = StandardChess.generate_moves(position);
        if moves.is_empty() {
            return if is_king_attacked(position, position.side_to_move) {
                // Prefer faster mates
                -MATE_SCORE + (100 - depth as i32)
            } else {
                0
            };
        }

        for mv in moves {
            let next = StandardChess.make_move(position, mv);
            let score = -self.alpha_beta(&next, depth - 1, -beta, -alpha);
            if self.stopped {
                return 0;
            }
            if score >= beta {
                return beta;
            }
            if score > alpha {
                alpha = score;
            }
        }

        alpha
    }
}

/// Fixed-depth alpha-beta searcher.
#[derive(Debug, Clone, Copy)]
pub struct Minimax {
    depth: u8,
}

impl Minimax {
    /// Creates a searcher. A depth of zero is treated as one.
    pub fn new(depth: u8) -> Self {
        Minimax {
            depth: depth.max(1),
        }
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }
}

impl Default for Minimax {
    fn default() -> Self {
        Minimax::new(2)
    }
}

impl MoveSearch for Minimax {
    fn find_best_move(&self, position: &Position, moves: &[Move], cancel: &CancelToken) -> Option<Move> {
        let mut searcher = Searcher {
            nodes: 0,
            cancel,
            stopped: false,
        };
        let mut best_move = None;

        for depth in 1..=self.depth {
            let mut current_best = None;
            let mut current_score = i32::MIN;
            let mut alpha = i32::MIN + 1;
            let beta = i32::MAX;

            for &mv in moves {
                let next = StandardChess.make_move(position, mv);
                let score = -searcher.alpha_beta(&next, depth - 1, -beta, -alpha);
                if searcher.stopped {
                    break;
                }
                if score > current_score {
                    current_score = score;
                    current_best = Some(mv);
                    alpha = alpha.max(score);
                }
            }

            if searcher.stopped {
                debug!(depth, nodes = searcher.nodes, "search cancelled");
                return None;
            }

            if let Some(mv) = current_best {
                debug!(depth, score = current_score, nodes = searcher.nodes, best = %mv.to_uci(), "depth complete");
                best_move = Some(mv);
            }
        }

        best_move
    }

    fn name(&self) -> &str {
        "minimax"
    }
}
