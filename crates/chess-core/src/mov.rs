//! Move representation.

use crate::{Color, ColoredPiece, Piece, Square};
use std::fmt;

/// Special-move metadata carried by a legal move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveFlag {
    /// Normal move (no special action).
    Normal,
    /// Pawn double push from its starting row.
    DoublePush,
    /// Kingside castling (O-O).
    CastleKingside,
    /// Queenside castling (O-O-O).
    CastleQueenside,
    /// En passant capture.
    EnPassant,
    /// Pawn promotion to the given kind.
    Promote(Piece),
}

impl MoveFlag {
    /// Returns the promotion piece if this is a promotion move.
    #[inline]
    pub const fn promotion_piece(self) -> Option<Piece> {
        match self {
            MoveFlag::Promote(piece) => Some(piece),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_castling(self) -> bool {
        matches!(self, MoveFlag::CastleKingside | MoveFlag::CastleQueenside)
    }
}

/// A fully described move.
///
/// Moves produced by the rule engine carry everything needed to replay,
/// reverse and animate them: the moving piece, the captured piece (if any)
/// and the special-move flag. Equality is structural over all of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub piece: ColoredPiece,
    pub captured: Option<ColoredPiece>,
    pub flag: MoveFlag,
}

impl Move {
    pub const fn new(
        from: Square,
        to: Square,
        piece: ColoredPiece,
        captured: Option<ColoredPiece>,
        flag: MoveFlag,
    ) -> Self {
        Move {
            from,
            to,
            piece,
            captured,
            flag,
        }
    }

    /// Side making the move.
    #[inline]
    pub const fn color(&self) -> Color {
        self.piece.color
    }

    #[inline]
    pub const fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    #[inline]
    pub const fn is_en_passant(&self) -> bool {
        matches!(self.flag, MoveFlag::EnPassant)
    }

    /// Square the captured piece stood on.
    ///
    /// Identical to `to` except for en passant, where the captured pawn sits
    /// one row behind the destination from the capturer's point of view.
    pub fn capture_square(&self) -> Option<Square> {
        let captured = self.captured?;
        if self.is_en_passant() {
            // A black victim sits below the destination, a white one above.
            let dr = match captured.color {
                Color::Black => 1,
                Color::White => -1,
            };
            self.to.offset(dr, 0)
        } else {
            Some(self.to)
        }
    }

    /// Returns true if this move goes `from` -> `to` and, for promotions,
    /// promotes to `promotion`.
    ///
    /// Castling and en passant are fully determined by origin and destination,
    /// so only the promotion choice needs to be compared explicitly.
    pub fn matches(&self, from: Square, to: Square, promotion: Option<Piece>) -> bool {
        if self.from != from || self.to != to {
            return false;
        }
        match self.flag.promotion_piece() {
            Some(piece) => promotion == Some(piece),
            None => true,
        }
    }

    /// Returns the UCI notation for this move (e.g. "e2e4", "e7e8q").
    pub fn to_uci(&self) -> String {
        match self.flag.promotion_piece() {
            Some(piece) => format!("{}{}{}", self.from, self.to, piece.letter()),
            None => format!("{}{}", self.from, self.to),
        }
    }

    /// Short algebraic notation without check markers, as shown in the move log.
    pub fn to_log_string(&self) -> String {
        match self.flag {
            MoveFlag::CastleKingside => return "O-O".to_string(),
            MoveFlag::CastleQueenside => return "O-O-O".to_string(),
            _ => {}
        }
        let mut out = String::new();
        match self.piece.kind.san_letter() {
            Some(letter) => out.push(letter),
            None if self.is_capture() => out.push(self.from.file_char()),
            None => {}
        }
        if self.is_capture() {
            out.push('x');
        }
        out.push_str(&self.to.to_algebraic());
        if let Some(piece) = self.flag.promotion_piece() {
            out.push('=');
            out.push(piece.letter().to_ascii_uppercase());
        }
        out
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_log_string())
    }
}
