//! Move generation.
//!
//! Mailbox move generation: pseudo-legal moves are produced per piece by
//! walking offset tables, then filtered by making each move and rejecting
//! those that leave the mover's king attacked.

use crate::Position;
use chess_core::{Color, ColoredPiece, Move, MoveFlag, Piece, Square};

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

const DIAGONALS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
const ORTHOGONALS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Generates all legal moves for the given position.
pub fn generate_moves(position: &Position) -> Vec<Move> {
    let mut moves = Vec::with_capacity(48);
    let us = position.side_to_move;

    for (from, piece) in position.pieces_of_color(us) {
        match piece.kind {
            Piece::Pawn => generate_pawn_moves(position, from, piece, &mut moves),
            Piece::Knight => generate_steps(position, from, piece, &KNIGHT_OFFSETS, &mut moves),
            Piece::Bishop => generate_slides(position, from, piece, &DIAGONALS, &mut moves),
            Piece::Rook => generate_slides(position, from, piece, &ORTHOGONALS, &mut moves),
            Piece::Queen => {
                generate_slides(position, from, piece, &DIAGONALS, &mut moves);
                generate_slides(position, from, piece, &ORTHOGONALS, &mut moves);
            }
            Piece::King => {
                generate_steps(position, from, piece, &KING_OFFSETS, &mut moves);
                generate_castling_moves(position, from, piece, &mut moves);
            }
        }
    }

    // Filter out moves that leave king in check
    moves.retain(|m| !is_king_attacked(&make_move(position, *m), us));
    moves
}

fn push_pawn_move(
    from: Square,
    to: Square,
    piece: ColoredPiece,
    captured: Option<ColoredPiece>,
    moves: &mut Vec<Move>,
) {
    if to.row() == piece.color.promotion_row() {
        for promo in Piece::PROMOTIONS {
            moves.push(Move::new(from, to, piece, captured, MoveFlag::Promote(promo)));
        }
    } else {
        moves.push(Move::new(from, to, piece, captured, MoveFlag::Normal));
    }
}

/// Generates pseudo-legal pawn moves.
fn generate_pawn_moves(position: &Position, from: Square, piece: ColoredPiece, moves: &mut Vec<Move>) {
    let us = piece.color;
    let dir = us.pawn_direction();

    // Pushes
    if let Some(one) = from.offset(dir, 0) {
        if position.piece_at(one).is_none() {
            push_pawn_move(from, one, piece, None, moves);

            if from.row() == us.pawn_row() {
                if let Some(two) = one.offset(dir, 0) {
                    if position.piece_at(two).is_none() {
                        moves.push(Move::new(from, two, piece, None, MoveFlag::DoublePush));
                    }
                }
            }
        }
    }

    // Captures (left and right)
    for dc in [-1, 1] {
        let Some(to) = from.offset(dir, dc) else {
            continue;
        };
        match position.piece_at(to) {
            Some(target) if target.color != us => {
                push_pawn_move(from, to, piece, Some(target), moves);
            }
            None if position.en_passant == Some(to) => {
                let victim = ColoredPiece::new(us.opposite(), Piece::Pawn);
                moves.push(Move::new(from, to, piece, Some(victim), MoveFlag::EnPassant));
            }
            _ => {}
        }
    }
}

/// Generates pseudo-legal single-step moves (knight and king).
fn generate_steps(
    position: &Position,
    from: Square,
    piece: ColoredPiece,
    offsets: &[(i8, i8)],
    moves: &mut Vec<Move>,
) {
    for &(dr, dc) in offsets {
        let Some(to) = from.offset(dr, dc) else {
            continue;
        };
        match position.piece_at(to) {
            Some(target) if target.color == piece.color => {}
            target => moves.push(Move::new(from, to, piece, target, MoveFlag::Normal)),
        }
    }
}

/// Generates pseudo-legal sliding moves along the given rays.
fn generate_slides(
    position: &Position,
    from: Square,
    piece: ColoredPiece,
    rays: &[(i8, i8)],
    moves: &mut Vec<Move>,
) {
    for &(dr, dc) in rays {
        let mut cursor = from;
        while let Some(to) = cursor.offset(dr, dc) {
            match position.piece_at(to) {
                None => moves.push(Move::new(from, to, piece, None, MoveFlag::Normal)),
                Some(target) => {
                    if target.color != piece.color {
                        moves.push(Move::new(from, to, piece, Some(target), MoveFlag::Normal));
                    }
                    break;
                }
            }
            cursor = to;
        }
    }
}

/// Generates castling moves if legal.
///
/// The destination square is validated by the legality filter, so only the
/// king's start and pass-through squares are checked here.
fn generate_castling_moves(
    position: &Position,
    from: Square,
    king: ColoredPiece,
    moves: &mut Vec<Move>,
) {
    let us = king.color;
    let row = us.back_row();
    if from.row() != row || from.col() != 4 {
        return;
    }

    // Can't castle if in check
    if is_square_attacked(position, from, us.opposite()) {
        return;
    }

    let rook = ColoredPiece::new(us, Piece::Rook);
    let empty = |cols: &[u8]| {
        cols.iter()
            .all(|&c| Square::new(row, c).is_some_and(|sq| position.piece_at(sq).is_none()))
    };
    let rook_home = |col: u8| Square::new(row, col).and_then(|sq| position.piece_at(sq)) == Some(rook);
    let safe = |col: u8| {
        Square::new(row, col).is_some_and(|sq| !is_square_attacked(position, sq, us.opposite()))
    };

    if position.castling.can_castle_kingside(us) && rook_home(7) && empty(&[5, 6]) && safe(5) {
        if let Some(to) = Square::new(row, 6) {
            moves.push(Move::new(from, to, king, None, MoveFlag::CastleKingside));
        }
    }

    if position.castling.can_castle_queenside(us) && rook_home(0) && empty(&[1, 2, 3]) && safe(3) {
        if let Some(to) = Square::new(row, 2) {
            moves.push(Move::new(from, to, king, None, MoveFlag::CastleQueenside));
        }
    }
}

/// Returns true if the given square is attacked by the given color.
pub fn is_square_attacked(position: &Position, sq: Square, by_color: Color) -> bool {
    let holds = |target: Option<Square>, kinds: &[Piece]| {
        target
            .and_then(|t| position.piece_at(t))
            .is_some_and(|p| p.color == by_color && kinds.contains(&p.kind))
    };

    // Pawn attacks: an attacking pawn stands one step "behind" the square
    // from its own point of view.
    let back = -by_color.pawn_direction();
    if holds(sq.offset(back, -1), &[Piece::Pawn]) || holds(sq.offset(back, 1), &[Piece::Pawn]) {
        return true;
    }

    if KNIGHT_OFFSETS
        .iter()
        .any(|&(dr, dc)| holds(sq.offset(dr, dc), &[Piece::Knight]))
    {
        return true;
    }

    if KING_OFFSETS
        .iter()
        .any(|&(dr, dc)| holds(sq.offset(dr, dc), &[Piece::King]))
    {
        return true;
    }

    let ray_hits = |rays: &[(i8, i8)], kinds: &[Piece]| {
        rays.iter().any(|&(dr, dc)| {
            let mut cursor = sq;
            while let Some(next) = cursor.offset(dr, dc) {
                if position.piece_at(next).is_some() {
                    return holds(Some(next), kinds);
                }
                cursor = next;
            }
            false
        })
    };

    ray_hits(&DIAGONALS, &[Piece::Bishop, Piece::Queen])
        || ray_hits(&ORTHOGONALS, &[Piece::Rook, Piece::Queen])
}

/// Returns true if the king of the given color is in check.
pub fn is_king_attacked(position: &Position, king_color: Color) -> bool {
    match position.king_square(king_color) {
        Some(sq) => is_square_attacked(position, sq, king_color.opposite()),
        None => false,
    }
}

/// Makes a move and returns the new position.
///
/// The move is expected to come from [`generate_moves`] for this position;
/// its recorded piece is what lands on the destination square.
pub fn make_move(position: &Position, m: Move) -> Position {
    let mut new_pos = position.clone();
    let us = m.color();

    new_pos.take_piece(m.from);
    if let Some(sq) = m.capture_square() {
        new_pos.take_piece(sq);
    }

    let landed = match m.flag.promotion_piece() {
        Some(kind) => ColoredPiece::new(us, kind),
        None => m.piece,
    };
    new_pos.set_piece(m.to, Some(landed));

    // Move the rook alongside a castling king
    let rook_hop = match m.flag {
        MoveFlag::CastleKingside => Some((7, 5)),
        MoveFlag::CastleQueenside => Some((0, 3)),
        _ => None,
    };
    if let Some((from_col, to_col)) = rook_hop {
        let row = us.back_row();
        if let (Some(rook_from), Some(rook_to)) = (Square::new(row, from_col), Square::new(row, to_col)) {
            let rook = new_pos.take_piece(rook_from);
            new_pos.set_piece(rook_to, rook);
        }
    }

    // Castling rights
    if m.piece.kind == Piece::King {
        new_pos.castling.remove_color(us);
    }
    new_pos.castling.remove_for_corner(m.from);
    new_pos.castling.remove_for_corner(m.to);

    // En passant target
    new_pos.en_passant = match m.flag {
        MoveFlag::DoublePush => m.from.offset(us.pawn_direction(), 0),
        _ => None,
    };

    // Clocks
    if m.piece.kind == Piece::Pawn || m.is_capture() {
        new_pos.halfmove_clock = 0;
    } else {
        new_pos.halfmove_clock += 1;
    }
    if us == Color::Black {
        new_pos.fullmove_number += 1;
    }
    new_pos.side_to_move = us.opposite();

    new_pos
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn find(moves: &[Move], from: &str, to: &str) -> Option<Move> {
        moves
            .iter()
            .copied()
            .find(|m| m.from == sq(from) && m.to == sq(to))
    }

    /// Counts leaf nodes to a fixed depth.
    fn perft(position: &Position, depth: u32) -> u64 {
        if depth == 0 {
            return 1;
        }
        generate_moves(position)
            .into_iter()
            .map(|m| perft(&make_move(position, m), depth - 1))
            .sum()
    }

    #[test]
    fn startpos_move_count() {
        let moves = generate_moves(&Position::startpos());
        assert_eq!(moves.len(), 20);
        let push = find(&moves, "e2", "e4").unwrap();
        assert_eq!(push.flag, MoveFlag::DoublePush);
    }

    #[test]
    fn perft_startpos() {
        let pos = Position::startpos();
        assert_eq!(perft(&pos, 1), 20);
        assert_eq!(perft(&pos, 2), 400);
        assert_eq!(perft(&pos, 3), 8902);
    }

    #[test]
    fn perft_kiwipete() {
        // Exercises castling, en passant and promotions together.
        let pos = Position::from_fen(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        )
        .unwrap();
        assert_eq!(perft(&pos, 1), 48);
        assert_eq!(perft(&pos, 2), 2039);
    }

    #[test]
    fn en_passant_is_generated_and_applied() {
        let pos = Position::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
        let moves = generate_moves(&pos);
        let ep = find(&moves, "e5", "d6").unwrap();
        assert_eq!(ep.flag, MoveFlag::EnPassant);
        assert_eq!(ep.captured, Some(ColoredPiece::new(Color::Black, Piece::Pawn)));

        let after = make_move(&pos, ep);
        assert_eq!(after.piece_at(sq("d5")), None);
        assert_eq!(after.piece_at(sq("d6")), Some(ColoredPiece::new(Color::White, Piece::Pawn)));
    }

    #[test]
    fn castling_moves_rook_and_clears_rights() {
        let pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let moves = generate_moves(&pos);
        let castle = find(&moves, "e1", "g1").unwrap();
        assert_eq!(castle.flag, MoveFlag::CastleKingside);
        assert!(find(&moves, "e1", "c1").is_some());

        let after = make_move(&pos, castle);
        assert_eq!(after.piece_at(sq("f1")), Some(ColoredPiece::new(Color::White, Piece::Rook)));
        assert_eq!(after.piece_at(sq("h1")), None);
        assert!(!after.castling.can_castle_kingside(Color::White));
        assert!(!after.castling.can_castle_queenside(Color::White));
        assert!(after.castling.can_castle_kingside(Color::Black));
    }

    #[test]
    fn cannot_castle_through_attack() {
        // Black rook on f8 covers f1.
        let pos = Position::from_fen("4kr2/8/8/8/8/8/8/4K2R w K - 0 1").unwrap();
        let moves = generate_moves(&pos);
        assert!(find(&moves, "e1", "g1").is_none());
    }

    #[test]
    fn promotions_offer_four_choices() {
        let pos = Position::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let moves = generate_moves(&pos);
        let promos: Vec<_> = moves.iter().filter(|m| m.from == sq("a7")).collect();
        assert_eq!(promos.len(), 4);
        let queen = promos
            .iter()
            .find(|m| m.flag == MoveFlag::Promote(Piece::Queen))
            .unwrap();
        let after = make_move(&pos, **queen);
        assert_eq!(after.piece_at(sq("a8")), Some(ColoredPiece::new(Color::White, Piece::Queen)));
    }

    #[test]
    fn pinned_piece_cannot_move() {
        // Knight on e2 is pinned by the rook on e8.
        let pos = Position::from_fen("4r1k1/8/8/8/8/8/4N3/4K3 w - - 0 1").unwrap();
        let moves = generate_moves(&pos);
        assert!(moves.iter().all(|m| m.from != sq("e2")));
    }

    #[test]
    fn pawn_attacks_follow_direction() {
        let pos = Position::from_fen("4k3/8/8/3p4/8/8/8/4K3 w - - 0 1").unwrap();
        assert!(is_square_attacked(&pos, sq("e4"), Color::Black));
        assert!(is_square_attacked(&pos, sq("c4"), Color::Black));
        assert!(!is_square_attacked(&pos, sq("e6"), Color::Black));
    }
}
