//! Board square representation.
//!
//! Squares are addressed the way the board is drawn on screen: row 0 is the
//! top row (Black's back rank, rank 8) and column 0 is the a-file. The
//! square under a pointer is therefore `(y / size, x / size)`.

use std::fmt;

/// Number of rows and columns on the board.
pub const BOARD_DIMENSION: u8 = 8;

/// A square on the board.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    row: u8,
    col: u8,
}

impl Square {
    /// Creates a square, returning `None` outside the 8x8 board.
    #[inline]
    pub const fn new(row: u8, col: u8) -> Option<Self> {
        if row < BOARD_DIMENSION && col < BOARD_DIMENSION {
            Some(Square { row, col })
        } else {
            None
        }
    }

    /// Creates a square from signed coordinates, as produced by offsets or
    /// pointer arithmetic.
    #[inline]
    pub const fn from_coords(row: i32, col: i32) -> Option<Self> {
        if row < 0 || col < 0 {
            return None;
        }
        Self::new(row as u8, col as u8)
    }

    /// Creates a square from index (0-63, row-major from the top-left).
    #[inline]
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < 64 {
            Some(Square {
                row: index / 8,
                col: index % 8,
            })
        } else {
            None
        }
    }

    /// Parses a square from algebraic notation (e.g. "e4").
    pub fn from_algebraic(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        let file = bytes[0].to_ascii_lowercase();
        let rank = bytes[1];
        if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
            return None;
        }
        Self::new(b'8' - rank, file - b'a')
    }

    #[inline]
    pub const fn row(self) -> u8 {
        self.row
    }

    #[inline]
    pub const fn col(self) -> u8 {
        self.col
    }

    /// Returns the index (0-63, row-major from the top-left).
    #[inline]
    pub const fn index(self) -> usize {
        self.row as usize * 8 + self.col as usize
    }

    /// Returns the square `(dr, dc)` away, if it is on the board.
    #[inline]
    pub const fn offset(self, dr: i8, dc: i8) -> Option<Self> {
        Self::from_coords(self.row as i32 + dr as i32, self.col as i32 + dc as i32)
    }

    /// Returns true for light squares. The top-left square is light.
    #[inline]
    pub const fn is_light(self) -> bool {
        (self.row + self.col) % 2 == 0
    }

    /// File letter ('a'-'h').
    #[inline]
    pub const fn file_char(self) -> char {
        (b'a' + self.col) as char
    }

    /// Rank digit ('1'-'8').
    #[inline]
    pub const fn rank_char(self) -> char {
        (b'8' - self.row) as char
    }

    /// Returns the algebraic notation for this square.
    pub fn to_algebraic(self) -> String {
        format!("{}{}", self.file_char(), self.rank_char())
    }

    /// Iterates over all 64 squares, row by row from the top-left.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..64u8).filter_map(Square::from_index)
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Square({}, r{}c{})", self.to_algebraic(), self.row, self.col)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_algebraic())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn square_new_rejects_off_board() {
        assert!(Square::new(7, 7).is_some());
        assert!(Square::new(8, 0).is_none());
        assert!(Square::new(0, 8).is_none());
        assert!(Square::from_coords(-1, 3).is_none());
    }

    #[test]
    fn algebraic_maps_to_screen_rows() {
        let e2 = Square::from_algebraic("e2").unwrap();
        assert_eq!((e2.row(), e2.col()), (6, 4));
        let a8 = Square::from_algebraic("a8").unwrap();
        assert_eq!((a8.row(), a8.col()), (0, 0));
        assert_eq!(Square::new(7, 7).unwrap().to_algebraic(), "h1");
        assert_eq!(Square::from_algebraic("i1"), None);
        assert_eq!(Square::from_algebraic("a9"), None);
        assert_eq!(Square::from_algebraic(""), None);
    }

    #[test]
    fn offset_stays_on_board() {
        let a1 = Square::from_algebraic("a1").unwrap();
        assert_eq!(a1.offset(-1, 0), Square::from_algebraic("a2"));
        assert_eq!(a1.offset(1, 0), None);
        assert_eq!(a1.offset(0, -1), None);
    }

    #[test]
    fn top_left_is_light() {
        assert!(Square::new(0, 0).unwrap().is_light());
        assert!(!Square::new(0, 1).unwrap().is_light());
    }

    #[test]
    fn all_squares() {
        assert_eq!(Square::all().count(), 64);
    }

    proptest! {
        #[test]
        fn algebraic_round_trips(index in 0u8..64) {
            let sq = Square::from_index(index).unwrap();
            prop_assert_eq!(Square::from_algebraic(&sq.to_algebraic()), Some(sq));
            prop_assert_eq!(sq.index(), index as usize);
        }
    }
}
