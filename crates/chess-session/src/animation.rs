//! Frame-counted move animation.
//!
//! An [`AnimationTask`] is created when a move is applied and is advanced by
//! exactly one frame per tick. Duration depends only on the Manhattan
//! distance travelled, so every square takes the same number of frames.

use crate::layout::{self, Rect, SQUARE_SIZE};
use chess_core::{ColoredPiece, Move, Square};

/// Frames per square travelled when nothing else is configured.
pub const DEFAULT_FRAMES_PER_SQUARE: u32 = 10;

/// The in-flight visualisation of one applied move.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationTask {
    mv: Move,
    origin: Square,
    dest: Square,
    captured: Option<ColoredPiece>,
    capture_square: Option<Square>,
    is_en_passant: bool,
    elapsed_frames: u32,
    total_frames: u32,
}

impl AnimationTask {
    /// Starts animating `mv`.
    pub fn start(mv: Move, frames_per_square: u32) -> Self {
        let d_row = (mv.to.row() as i32 - mv.from.row() as i32).unsigned_abs();
        let d_col = (mv.to.col() as i32 - mv.from.col() as i32).unsigned_abs();
        AnimationTask {
            mv,
            origin: mv.from,
            dest: mv.to,
            captured: mv.captured,
            capture_square: mv.capture_square(),
            is_en_passant: mv.is_en_passant(),
            elapsed_frames: 0,
            total_frames: (d_row + d_col) * frames_per_square,
        }
    }

    pub fn mv(&self) -> &Move {
        &self.mv
    }

    pub fn origin(&self) -> Square {
        self.origin
    }

    pub fn dest(&self) -> Square {
        self.dest
    }

    pub fn is_en_passant(&self) -> bool {
        self.is_en_passant
    }

    pub fn elapsed_frames(&self) -> u32 {
        self.elapsed_frames
    }

    pub fn total_frames(&self) -> u32 {
        self.total_frames
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed_frames >= self.total_frames
    }

    /// Advances one frame. Returns true while the animation is not finished.
    pub fn advance(&mut self) -> bool {
        self.advance_by(1)
    }

    /// Advances `frames` frames, stopping at the last one.
    pub fn advance_by(&mut self, frames: u32) -> bool {
        self.elapsed_frames = self.elapsed_frames.saturating_add(frames).min(self.total_frames);
        !self.is_finished()
    }

    /// Fraction of the way travelled, in `0.0..=1.0`.
    pub fn progress(&self) -> f32 {
        if self.total_frames == 0 {
            1.0
        } else {
            self.elapsed_frames as f32 / self.total_frames as f32
        }
    }

    /// Fractional (row, col) of the moving piece for the current frame.
    pub fn current_cell(&self) -> (f32, f32) {
        let t = self.progress();
        let lerp = |a: u8, b: u8| a as f32 + (b as f32 - a as f32) * t;
        (
            lerp(self.origin.row(), self.dest.row()),
            lerp(self.origin.col(), self.dest.col()),
        )
    }

    /// Pixel rectangle of the moving piece for the current frame.
    pub fn piece_rect(&self) -> Rect {
        let (row, col) = self.current_cell();
        Rect::new(
            (col * SQUARE_SIZE as f32).round() as i32,
            (row * SQUARE_SIZE as f32).round() as i32,
            SQUARE_SIZE,
            SQUARE_SIZE,
        )
    }

    /// The captured piece and the square it is drawn on until the mover
    /// arrives. For en passant that is one row off the destination.
    pub fn captured(&self) -> Option<(ColoredPiece, Square)> {
        Some((self.captured?, self.capture_square?))
    }

    /// Rectangle of the destination square, which is painted over while the
    /// moving piece travels.
    pub fn dest_rect(&self) -> Rect {
        layout::square_rect(self.dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::{Color, MoveFlag, Piece};
    use chess_engine::Game;
    use proptest::prelude::*;

    fn queen_move(from: (u8, u8), to: (u8, u8)) -> Move {
        Move::new(
            Square::new(from.0, from.1).unwrap(),
            Square::new(to.0, to.1).unwrap(),
            ColoredPiece::new(Color::White, Piece::Queen),
            None,
            MoveFlag::Normal,
        )
    }

    #[test]
    fn manhattan_duration() {
        let mut task = AnimationTask::start(queen_move((0, 0), (3, 4)), 10);
        assert_eq!(task.total_frames(), 70);

        for _ in 0..69 {
            assert!(task.advance());
        }
        assert!(!task.is_finished());
        assert!(!task.advance());
        assert!(task.is_finished());
        assert_eq!(task.elapsed_frames(), 70);

        // Further advances stay finished.
        assert!(!task.advance());
        assert_eq!(task.elapsed_frames(), 70);
    }

    #[test]
    fn interpolates_linearly() {
        let mut task = AnimationTask::start(queen_move((6, 4), (4, 4)), 10);
        assert_eq!(task.current_cell(), (6.0, 4.0));
        task.advance_by(10);
        assert_eq!(task.current_cell(), (5.0, 4.0));
        assert_eq!(task.piece_rect(), Rect::new(4 * 64, 5 * 64, 64, 64));
        task.advance_by(10);
        assert_eq!(task.current_cell(), (4.0, 4.0));
    }

    #[test]
    fn en_passant_victim_is_beside_the_destination() {
        let mut game = Game::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
        let mv = game.make_move_uci("e5d6").unwrap();
        let task = AnimationTask::start(mv, 10);

        assert!(task.is_en_passant());
        let (victim, square) = task.captured().unwrap();
        assert_eq!(victim, ColoredPiece::new(Color::Black, Piece::Pawn));
        assert_eq!(square, Square::from_algebraic("d5").unwrap());
        assert_ne!(square, task.dest());
    }

    #[test]
    fn plain_capture_victim_is_on_the_destination() {
        let mut game = Game::from_fen("4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1").unwrap();
        let mv = game.make_move_uci("e4d5").unwrap();
        let task = AnimationTask::start(mv, 10);
        assert_eq!(task.captured().map(|(_, sq)| sq), Some(task.dest()));
    }

    proptest! {
        #[test]
        fn finishes_after_exactly_total_frames(
            from in (0u8..8, 0u8..8),
            to in (0u8..8, 0u8..8),
            fps in 1u32..20,
        ) {
            prop_assume!(from != to);
            let mut task = AnimationTask::start(queen_move(from, to), fps);
            let distance = (from.0 as i32 - to.0 as i32).abs() + (from.1 as i32 - to.1 as i32).abs();
            prop_assert_eq!(task.total_frames(), distance as u32 * fps);

            for _ in 1..task.total_frames() {
                prop_assert!(task.advance());
            }
            prop_assert!(!task.advance());
        }
    }
}
