//! Chess position representation.

use chess_core::{Color, ColoredPiece, Piece, Square};
use std::fmt;

use crate::fen::{self, FenError};

/// Castling rights flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const WHITE_KINGSIDE: u8 = 0b0001;
    pub const WHITE_QUEENSIDE: u8 = 0b0010;
    pub const BLACK_KINGSIDE: u8 = 0b0100;
    pub const BLACK_QUEENSIDE: u8 = 0b1000;
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    /// Creates new castling rights from flags.
    #[inline]
    pub const fn new(flags: u8) -> Self {
        CastlingRights(flags & 0b1111)
    }

    const fn kingside_flag(color: Color) -> u8 {
        match color {
            Color::White => Self::WHITE_KINGSIDE,
            Color::Black => Self::BLACK_KINGSIDE,
        }
    }

    const fn queenside_flag(color: Color) -> u8 {
        match color {
            Color::White => Self::WHITE_QUEENSIDE,
            Color::Black => Self::BLACK_QUEENSIDE,
        }
    }

    #[inline]
    pub const fn can_castle_kingside(self, color: Color) -> bool {
        (self.0 & Self::kingside_flag(color)) != 0
    }

    #[inline]
    pub const fn can_castle_queenside(self, color: Color) -> bool {
        (self.0 & Self::queenside_flag(color)) != 0
    }

    /// Removes both castling rights of a color.
    #[inline]
    pub fn remove_color(&mut self, color: Color) {
        self.0 &= !(Self::kingside_flag(color) | Self::queenside_flag(color));
    }

    /// Removes the right tied to a rook's home corner, if `sq` is one.
    ///
    /// Called for both the origin and the destination of every move, which
    /// covers a rook moving away and a rook being captured at home.
    pub fn remove_for_corner(&mut self, sq: Square) {
        for color in Color::BOTH {
            if sq.row() != color.back_row() {
                continue;
            }
            match sq.col() {
                0 => self.0 &= !Self::queenside_flag(color),
                7 => self.0 &= !Self::kingside_flag(color),
                _ => {}
            }
        }
    }

    /// Returns the raw flags.
    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }
}

/// Complete chess position state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    /// Mailbox board indexed `[row][col]`, row 0 at the top.
    board: [[Option<ColoredPiece>; 8]; 8],

    /// The side to move.
    pub side_to_move: Color,

    /// Castling rights.
    pub castling: CastlingRights,

    /// En passant target square (if any).
    pub en_passant: Option<Square>,

    /// Halfmove clock for the 50/75-move rules.
    pub halfmove_clock: u32,

    /// Fullmove number (starts at 1, increments after Black's move).
    pub fullmove_number: u32,
}

const BACK_ROW: [Piece; 8] = [
    Piece::Rook,
    Piece::Knight,
    Piece::Bishop,
    Piece::Queen,
    Piece::King,
    Piece::Bishop,
    Piece::Knight,
    Piece::Rook,
];

impl Position {
    /// Creates an empty position with White to move.
    pub fn empty() -> Self {
        Position {
            board: [[None; 8]; 8],
            side_to_move: Color::White,
            castling: CastlingRights::NONE,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Creates the standard starting position.
    pub fn startpos() -> Self {
        let mut position = Position::empty();
        for color in Color::BOTH {
            for (col, kind) in BACK_ROW.iter().enumerate() {
                position.board[color.back_row() as usize][col] = Some(ColoredPiece::new(color, *kind));
                position.board[color.pawn_row() as usize][col] =
                    Some(ColoredPiece::new(color, Piece::Pawn));
            }
        }
        position.castling = CastlingRights::ALL;
        position
    }

    /// Creates a position from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        fen::parse(fen)
    }

    /// Converts the position to a FEN string.
    pub fn to_fen(&self) -> String {
        fen::render(self)
    }

    /// Returns the piece on a square.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<ColoredPiece> {
        self.board[sq.row() as usize][sq.col() as usize]
    }

    /// Places (or clears) a piece on a square.
    #[inline]
    pub fn set_piece(&mut self, sq: Square, piece: Option<ColoredPiece>) {
        self.board[sq.row() as usize][sq.col() as usize] = piece;
    }

    /// Removes and returns the piece on a square.
    #[inline]
    pub fn take_piece(&mut self, sq: Square) -> Option<ColoredPiece> {
        self.board[sq.row() as usize][sq.col() as usize].take()
    }

    /// Iterates over all occupied squares.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, ColoredPiece)> + '_ {
        Square::all().filter_map(move |sq| self.piece_at(sq).map(|p| (sq, p)))
    }

    /// Iterates over the squares holding pieces of one color.
    pub fn pieces_of_color(&self, color: Color) -> impl Iterator<Item = (Square, ColoredPiece)> + '_ {
        self.pieces().filter(move |(_, p)| p.color == color)
    }

    /// Returns the king square of a color, if the king is on the board.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces_of_color(color)
            .find(|(_, p)| p.kind == Piece::King)
            .map(|(sq, _)| sq)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}

impl fmt::Display for Position {
    /// Renders the board as eight text rows, White pieces uppercase.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..8u8 {
            for col in 0..8u8 {
                let c = Square::new(row, col)
                    .and_then(|sq| self.piece_at(sq))
                    .map_or('.', |p| p.to_fen_char());
                if col > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", c)?;
            }
            writeln!(f, "  {}", 8 - row)?;
        }
        write!(f, "a b c d e f g h")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn startpos_layout() {
        let pos = Position::startpos();
        assert_eq!(pos.piece_at(sq("e1")), Some(ColoredPiece::new(Color::White, Piece::King)));
        assert_eq!(pos.piece_at(sq("d8")), Some(ColoredPiece::new(Color::Black, Piece::Queen)));
        assert_eq!(pos.piece_at(sq("e2")), Some(ColoredPiece::new(Color::White, Piece::Pawn)));
        assert_eq!(pos.piece_at(sq("e4")), None);
        assert_eq!(pos.pieces().count(), 32);
        assert_eq!(pos.king_square(Color::Black), Some(sq("e8")));
    }

    #[test]
    fn startpos_matches_fen() {
        assert_eq!(Position::startpos().to_fen(), fen::STARTPOS);
    }

    #[test]
    fn corner_rights() {
        let mut rights = CastlingRights::ALL;
        rights.remove_for_corner(sq("h1"));
        assert!(!rights.can_castle_kingside(Color::White));
        assert!(rights.can_castle_queenside(Color::White));
        rights.remove_for_corner(sq("a8"));
        assert!(!rights.can_castle_queenside(Color::Black));
        assert!(rights.can_castle_kingside(Color::Black));
        rights.remove_for_corner(sq("e4"));
        assert_eq!(rights.raw(), CastlingRights::BLACK_KINGSIDE | CastlingRights::WHITE_QUEENSIDE);
    }

    #[test]
    fn display_board() {
        let text = Position::startpos().to_string();
        assert!(text.starts_with("r n b q k b n r  8"));
        assert!(text.ends_with("a b c d e f g h"));
    }
}
