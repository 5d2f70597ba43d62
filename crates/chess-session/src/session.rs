//! The live game and everything the UI needs to show it.

use crate::animation::AnimationTask;
use crate::menu::Mode;
use crate::selection::{ClickOutcome, SelectionState};
use crate::turn::AiState;
use chess_core::{Move, Piece, Square};
use chess_engine::rules::GameResult;
use chess_engine::{Game, GameError, Position};
use tracing::{debug, info};

/// The root aggregate of a running game.
///
/// `legal_moves` and `outcome` are derived from the game and are refreshed
/// after every change to the position.
#[derive(Debug)]
pub struct Session {
    mode: Mode,
    game: Game,
    legal_moves: Vec<Move>,
    outcome: Option<GameResult>,
    selection: SelectionState,
    pub(crate) ai: AiState,
    animation: Option<AnimationTask>,
    status: Option<String>,
    just_unwound: bool,
    ai_stalled: bool,
    frames_per_square: u32,
    promotion: Piece,
}

impl Session {
    pub fn new(mode: Mode, frames_per_square: u32, promotion: Piece) -> Self {
        Self::with_game(mode, Game::new(), frames_per_square, promotion)
    }

    /// Starts a session from an existing game, e.g. a custom position.
    pub fn with_game(mode: Mode, game: Game, frames_per_square: u32, promotion: Piece) -> Self {
        let mut session = Session {
            mode,
            game,
            legal_moves: Vec::new(),
            outcome: None,
            selection: SelectionState::new(),
            ai: AiState::default(),
            animation: None,
            status: None,
            just_unwound: false,
            ai_stalled: false,
            frames_per_square,
            promotion,
        };
        session.refresh();
        session
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn position(&self) -> &Position {
        self.game.position()
    }

    pub fn legal_moves(&self) -> &[Move] {
        &self.legal_moves
    }

    pub fn outcome(&self) -> Option<GameResult> {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Banner text once the game has ended.
    pub fn outcome_text(&self) -> Option<String> {
        self.outcome.map(|result| result.to_string())
    }

    /// Returns true if a human moves for the side to move.
    pub fn human_turn(&self) -> bool {
        self.mode.human_controls(self.game.side_to_move())
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn animation(&self) -> Option<&AnimationTask> {
        self.animation.as_ref()
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    pub fn ai_busy(&self) -> bool {
        self.ai.is_busy()
    }

    /// True once the AI has given up on the current position.
    pub fn ai_stalled(&self) -> bool {
        self.ai_stalled
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }

    /// Handles a click on a board square (`None` off the board).
    ///
    /// Ignored once the game is over. Only resolves into a move on a human
    /// turn with no animation in flight. A pair that is not a legal move is
    /// reported on the status line.
    pub fn click(&mut self, target: Option<Square>) -> Option<Move> {
        if self.is_over() {
            return None;
        }
        let can_move = self.human_turn() && !self.is_animating();
        let mv = match self
            .selection
            .on_square_clicked(target, can_move, &self.legal_moves, self.promotion)
        {
            ClickOutcome::Moved(mv) => mv,
            ClickOutcome::Rejected { from, to } => {
                debug!(from = %from.to_algebraic(), to = %to.to_algebraic(), "illegal click pair");
                self.set_status(format!("Illegal move: {}{}", from.to_algebraic(), to.to_algebraic()));
                return None;
            }
            ClickOutcome::Selected | ClickOutcome::Cleared => return None,
        };
        match self.apply_move(mv) {
            Ok(()) => Some(mv),
            Err(e) => {
                self.set_status(e.to_string());
                None
            }
        }
    }

    /// Applies a move and starts animating it.
    ///
    /// On error the session is left exactly as it was.
    pub fn apply_move(&mut self, mv: Move) -> Result<(), GameError> {
        debug_assert!(!self.is_animating(), "a move is already in flight");
        self.game.make_move(mv)?;
        info!(mv = %mv.to_uci(), ply = self.game.ply_count(), "move applied");
        self.animation = Some(AnimationTask::start(mv, self.frames_per_square));
        self.status = None;
        self.refresh();
        if let Some(result) = self.outcome {
            info!(%result, "game over");
        }
        Ok(())
    }

    /// Advances the running animation by one frame, dropping it once done.
    /// Returns true while it is still running.
    pub fn advance_animation(&mut self) -> bool {
        let running = self.animation.as_mut().is_some_and(AnimationTask::advance);
        if !running {
            self.animation = None;
        }
        running
    }

    /// Reverts the last move, cancelling any search first.
    pub fn undo(&mut self) -> Option<Move> {
        self.cancel_ai();
        let undone = self.game.undo_move();
        self.unwind();
        if let Some(mv) = undone {
            info!(mv = %mv.to_uci(), "move undone");
        }
        undone
    }

    /// Starts over from the initial position under the same mode.
    pub fn reset(&mut self) {
        self.cancel_ai();
        self.game = Game::new();
        self.status = None;
        self.unwind();
        info!(mode = %self.mode, "session reset");
    }

    /// Replaces the game with a loaded one.
    pub fn replace_game(&mut self, game: Game) {
        self.cancel_ai();
        self.game = game;
        self.animation = None;
        self.selection.clear();
        self.ai_stalled = false;
        self.refresh();
        info!(ply = self.game.ply_count(), "game loaded");
    }

    pub fn cancel_ai(&mut self) {
        self.ai.cancel();
    }

    pub(crate) fn mark_ai_stalled(&mut self, reason: &str) {
        self.ai_stalled = true;
        self.set_status(reason);
    }

    /// Consumes the marker left by undo and reset. The AI sits out the tick
    /// in which either happened.
    pub(crate) fn take_just_unwound(&mut self) -> bool {
        std::mem::take(&mut self.just_unwound)
    }

    fn unwind(&mut self) {
        self.animation = None;
        self.selection.clear();
        self.ai_stalled = false;
        self.just_unwound = true;
        self.refresh();
    }

    fn refresh(&mut self) {
        self.legal_moves = self.game.legal_moves();
        self.outcome = self.game.result();
        debug!(moves = self.legal_moves.len(), over = self.outcome.is_some(), "position refreshed");
    }
}
