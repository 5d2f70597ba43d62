//! FEN (Forsyth-Edwards Notation) parsing and serialization.

use chess_core::{Color, ColoredPiece, Piece, Square};
use thiserror::Error;

use crate::position::{CastlingRights, Position};

/// The standard starting position FEN.
pub const STARTPOS: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Errors that can occur when parsing FEN strings.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("invalid FEN: expected 6 parts, got {0}")]
    InvalidPartCount(usize),

    #[error("invalid piece placement: {0}")]
    InvalidPiecePlacement(String),

    #[error("invalid active color: expected 'w' or 'b', got '{0}'")]
    InvalidActiveColor(String),

    #[error("invalid castling rights: {0}")]
    InvalidCastlingRights(String),

    #[error("invalid en passant square: {0}")]
    InvalidEnPassantSquare(String),

    #[error("invalid halfmove clock: {0}")]
    InvalidHalfmoveClock(String),

    #[error("invalid fullmove number: {0}")]
    InvalidFullmoveNumber(String),
}

/// Parses a FEN string into a position.
pub fn parse(fen: &str) -> Result<Position, FenError> {
    let parts: Vec<&str> = fen.split_whitespace().collect();
    if parts.len() != 6 {
        return Err(FenError::InvalidPartCount(parts.len()));
    }

    let mut position = Position::empty();
    parse_placement(parts[0], &mut position)?;

    position.side_to_move = match parts[1] {
        "w" => Color::White,
        "b" => Color::Black,
        other => return Err(FenError::InvalidActiveColor(other.to_string())),
    };

    position.castling = parse_castling(parts[2])?;
    position.en_passant = parse_en_passant(parts[3])?;

    position.halfmove_clock = parts[4]
        .parse::<u32>()
        .map_err(|_| FenError::InvalidHalfmoveClock(parts[4].to_string()))?;
    position.fullmove_number = parts[5]
        .parse::<u32>()
        .map_err(|_| FenError::InvalidFullmoveNumber(parts[5].to_string()))?;

    Ok(position)
}

fn parse_placement(placement: &str, position: &mut Position) -> Result<(), FenError> {
    let rows: Vec<&str> = placement.split('/').collect();
    if rows.len() != 8 {
        return Err(FenError::InvalidPiecePlacement(format!(
            "expected 8 ranks, got {}",
            rows.len()
        )));
    }

    // FEN lists rank 8 first, which is screen row 0.
    for (row, text) in rows.iter().enumerate() {
        let mut col = 0u32;
        for c in text.chars() {
            if let Some(skip) = c.to_digit(10) {
                col += skip;
                continue;
            }
            let piece = ColoredPiece::from_fen_char(c).ok_or_else(|| {
                FenError::InvalidPiecePlacement(format!(
                    "invalid character '{}' in rank {}",
                    c,
                    8 - row
                ))
            })?;
            let sq = Square::from_coords(row as i32, col as i32).ok_or_else(|| {
                FenError::InvalidPiecePlacement(format!("rank {} overflows", 8 - row))
            })?;
            position.set_piece(sq, Some(piece));
            col += 1;
        }
        if col != 8 {
            return Err(FenError::InvalidPiecePlacement(format!(
                "rank {} has {} squares, expected 8",
                8 - row,
                col
            )));
        }
    }

    for color in Color::BOTH {
        let kings = position
            .pieces_of_color(color)
            .filter(|(_, p)| p.kind == Piece::King)
            .count();
        if kings != 1 {
            return Err(FenError::InvalidPiecePlacement(format!(
                "{} has {} kings",
                color, kings
            )));
        }
    }

    Ok(())
}

fn parse_castling(castling: &str) -> Result<CastlingRights, FenError> {
    if castling == "-" {
        return Ok(CastlingRights::NONE);
    }
    let mut flags = 0u8;
    for c in castling.chars() {
        flags |= match c {
            'K' => CastlingRights::WHITE_KINGSIDE,
            'Q' => CastlingRights::WHITE_QUEENSIDE,
            'k' => CastlingRights::BLACK_KINGSIDE,
            'q' => CastlingRights::BLACK_QUEENSIDE,
            _ => {
                return Err(FenError::InvalidCastlingRights(format!(
                    "invalid character '{}'",
                    c
                )))
            }
        };
    }
    Ok(CastlingRights::new(flags))
}

fn parse_en_passant(ep: &str) -> Result<Option<Square>, FenError> {
    if ep == "-" {
        return Ok(None);
    }
    match Square::from_algebraic(ep) {
        Some(sq) if sq.rank_char() == '3' || sq.rank_char() == '6' => Ok(Some(sq)),
        _ => Err(FenError::InvalidEnPassantSquare(ep.to_string())),
    }
}

/// Renders a position as a FEN string.
pub fn render(position: &Position) -> String {
    let mut fen = String::new();

    for row in 0..8u8 {
        let mut empty = 0;
        for col in 0..8u8 {
            match Square::new(row, col).and_then(|sq| position.piece_at(sq)) {
                Some(piece) => {
                    if empty > 0 {
                        fen.push_str(&empty.to_string());
                        empty = 0;
                    }
                    fen.push(piece.to_fen_char());
                }
                None => empty += 1,
            }
        }
        if empty > 0 {
            fen.push_str(&empty.to_string());
        }
        if row < 7 {
            fen.push('/');
        }
    }

    fen.push(' ');
    fen.push(match position.side_to_move {
        Color::White => 'w',
        Color::Black => 'b',
    });

    fen.push(' ');
    let castling = position.castling;
    if castling.raw() == 0 {
        fen.push('-');
    } else {
        if castling.can_castle_kingside(Color::White) {
            fen.push('K');
        }
        if castling.can_castle_queenside(Color::White) {
            fen.push('Q');
        }
        if castling.can_castle_kingside(Color::Black) {
            fen.push('k');
        }
        if castling.can_castle_queenside(Color::Black) {
            fen.push('q');
        }
    }

    fen.push(' ');
    match position.en_passant {
        Some(sq) => fen.push_str(&sq.to_algebraic()),
        None => fen.push('-'),
    }

    fen.push_str(&format!(
        " {} {}",
        position.halfmove_clock, position.fullmove_number
    ));
    fen
}
