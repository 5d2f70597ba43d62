//! AI turns.
//!
//! The [`TurnOrchestrator`] runs once per tick when no animation is in
//! flight. On an AI turn it either starts a search, polls the running one,
//! or applies its result. A search that was cancelled by undo, reset, load
//! or exit is dropped together with its channel, so its result can never be
//! applied.

use crate::config::AiConfig;
use crate::session::Session;
use chess_ai::{find_random_move, CancelToken, MoveSearch, SearchPoll, SearchTask};
use chess_core::Move;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The search currently running for a session, if any.
///
/// Busy means a task is held. Cancelling flips the task's [`CancelToken`]
/// and drops the task, so a cancel request never outlives the search it
/// was meant for.
#[derive(Debug, Default)]
pub struct AiState {
    task: Option<SearchTask>,
}

impl AiState {
    pub fn is_busy(&self) -> bool {
        self.task.is_some()
    }

    fn start(&mut self, task: SearchTask) {
        self.task = Some(task);
    }

    /// Polls the running search. The task is released once it reports.
    fn poll(&mut self) -> Option<SearchPoll> {
        let poll = self.task.as_ref()?.poll();
        if poll != SearchPoll::Pending {
            self.task = None;
        }
        Some(poll)
    }

    /// Cancels the running search without waiting for it.
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.cancel();
            info!("AI search cancelled");
        }
    }
}

/// What a turn step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnStep {
    /// Nothing for the AI to do: human turn, game over or animating.
    Idle,
    /// Undo or reset happened this tick; the AI sits it out.
    Skipped,
    /// A background search is running.
    Searching,
    /// A move was applied.
    Applied(Move),
    /// The AI produced nothing usable and no fallback is allowed.
    Stalled,
}

/// Drives non-human turns.
pub struct TurnOrchestrator {
    searcher: Arc<dyn MoveSearch>,
    rng: StdRng,
    background: bool,
    random_fallback: bool,
}

impl std::fmt::Debug for TurnOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TurnOrchestrator")
            .field("searcher", &self.searcher.name())
            .field("background", &self.background)
            .field("random_fallback", &self.random_fallback)
            .finish()
    }
}

impl TurnOrchestrator {
    pub fn new(searcher: Arc<dyn MoveSearch>, config: &AiConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        TurnOrchestrator {
            searcher,
            rng,
            background: config.background,
            random_fallback: config.random_fallback,
        }
    }

    /// Runs one turn step for `session`.
    pub fn step(&mut self, session: &mut Session) -> TurnStep {
        if session.take_just_unwound() {
            return TurnStep::Skipped;
        }
        if session.is_over() || session.is_animating() || session.human_turn() || session.ai_stalled() {
            return TurnStep::Idle;
        }

        let found = match session.ai.poll() {
            Some(SearchPoll::Pending) => return TurnStep::Searching,
            Some(SearchPoll::Finished(found)) => found,
            Some(SearchPoll::Lost) => None,
            None if self.background => {
                match SearchTask::spawn(
                    Arc::clone(&self.searcher),
                    session.position().clone(),
                    session.legal_moves().to_vec(),
                ) {
                    Ok(task) => {
                        debug!(searcher = self.searcher.name(), "AI search started");
                        session.ai.start(task);
                        return TurnStep::Searching;
                    }
                    Err(e) => {
                        warn!(error = %e, "searching inline instead");
                        self.search_inline(session)
                    }
                }
            }
            None => self.search_inline(session),
        };

        self.finish_turn(session, found)
    }

    /// Runs the search on this thread. A panicking searcher counts as having
    /// found nothing, like a lost background task.
    fn search_inline(&self, session: &Session) -> Option<Move> {
        let search = || {
            self.searcher
                .find_best_move(session.position(), session.legal_moves(), &CancelToken::new())
        };
        match panic::catch_unwind(AssertUnwindSafe(search)) {
            Ok(found) => found,
            Err(_) => {
                warn!(searcher = self.searcher.name(), "AI search panicked");
                None
            }
        }
    }

    fn finish_turn(&mut self, session: &mut Session, found: Option<Move>) -> TurnStep {
        let chosen = match found {
            Some(mv) if session.legal_moves().contains(&mv) => Some(mv),
            Some(mv) => {
                warn!(mv = %mv.to_uci(), "AI returned a move that is not legal here");
                None
            }
            None => None,
        };

        let chosen = match chosen {
            Some(mv) => Some(mv),
            None if self.random_fallback => {
                debug!("falling back to a random move");
                find_random_move(session.legal_moves(), &mut self.rng)
            }
            None => None,
        };

        let Some(mv) = chosen else {
            warn!("AI found no move");
            session.mark_ai_stalled("AI found no move");
            return TurnStep::Stalled;
        };

        match session.apply_move(mv) {
            Ok(()) => TurnStep::Applied(mv),
            Err(e) => {
                warn!(error = %e, "AI move rejected");
                session.mark_ai_stalled(&e.to_string());
                TurnStep::Stalled
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::Mode;
    use chess_ai::RandomSearch;
    use chess_core::{Piece, Square};
    use chess_engine::{Game, Position};

    /// Always answers with the same canned result.
    struct Canned(Option<Move>);

    impl MoveSearch for Canned {
        fn find_best_move(&self, _: &Position, _: &[Move], _: &CancelToken) -> Option<Move> {
            self.0
        }

        fn name(&self) -> &str {
            "canned"
        }
    }

    struct Panicking;

    impl MoveSearch for Panicking {
        fn find_best_move(&self, _: &Position, _: &[Move], _: &CancelToken) -> Option<Move> {
            panic!("evaluation blew up");
        }

        fn name(&self) -> &str {
            "panicking"
        }
    }

    fn inline(searcher: impl MoveSearch + 'static, random_fallback: bool) -> TurnOrchestrator {
        let config = AiConfig {
            background: false,
            random_fallback,
            seed: Some(5),
            ..AiConfig::default()
        };
        TurnOrchestrator::new(Arc::new(searcher), &config)
    }

    fn bots() -> Session {
        Session::new(Mode::BotVsBot, 10, Piece::Queen)
    }

    #[test]
    fn human_turn_is_idle() {
        let mut turns = inline(RandomSearch::seeded(1), true);
        let mut session = Session::new(Mode::Single, 10, Piece::Queen);
        assert_eq!(turns.step(&mut session), TurnStep::Idle);
    }

    #[test]
    fn inline_search_applies_a_move() {
        let mut turns = inline(RandomSearch::seeded(1), true);
        let mut session = bots();
        match turns.step(&mut session) {
            TurnStep::Applied(mv) => assert_eq!(session.game().last_move(), Some(&mv)),
            other => panic!("unexpected step {other:?}"),
        }
        assert!(session.is_animating());
        assert_eq!(turns.step(&mut session), TurnStep::Idle);
    }

    #[test]
    fn empty_result_falls_back_to_random() {
        let mut turns = inline(Canned(None), true);
        let mut session = bots();
        assert!(matches!(turns.step(&mut session), TurnStep::Applied(_)));
    }

    #[test]
    fn panicking_search_falls_back_to_random() {
        let mut turns = inline(Panicking, true);
        let mut session = bots();
        match turns.step(&mut session) {
            TurnStep::Applied(mv) => assert!(Game::new().legal_moves().contains(&mv)),
            other => panic!("unexpected step {other:?}"),
        }
        assert_eq!(session.game().ply_count(), 1);
    }

    #[test]
    fn panicking_search_without_fallback_stalls() {
        let mut turns = inline(Panicking, false);
        let mut session = bots();
        assert_eq!(turns.step(&mut session), TurnStep::Stalled);
        assert_eq!(session.game().ply_count(), 0);
        assert_eq!(session.legal_moves().len(), 20);
    }

    #[test]
    fn empty_result_without_fallback_stalls() {
        let mut turns = inline(Canned(None), false);
        let mut session = bots();
        assert_eq!(turns.step(&mut session), TurnStep::Stalled);
        assert_eq!(session.status(), Some("AI found no move"));
        assert_eq!(turns.step(&mut session), TurnStep::Idle);

        session.reset();
        assert_eq!(turns.step(&mut session), TurnStep::Skipped);
        assert_eq!(turns.step(&mut session), TurnStep::Stalled);
    }

    #[test]
    fn illegal_result_is_replaced() {
        let e2 = Square::from_algebraic("e2").unwrap();
        let e5 = Square::from_algebraic("e5").unwrap();
        let bogus = Move::new(
            e2,
            e5,
            chess_core::ColoredPiece::new(chess_core::Color::White, Piece::Pawn),
            None,
            chess_core::MoveFlag::Normal,
        );
        let mut turns = inline(Canned(Some(bogus)), true);
        let mut session = bots();
        match turns.step(&mut session) {
            TurnStep::Applied(mv) => assert_ne!(mv, bogus),
            other => panic!("unexpected step {other:?}"),
        }
    }

    #[test]
    fn background_search_is_polled() {
        let config = AiConfig {
            seed: Some(9),
            ..AiConfig::default()
        };
        let mut turns = TurnOrchestrator::new(Arc::new(RandomSearch::seeded(2)), &config);
        let mut session = bots();

        assert_eq!(turns.step(&mut session), TurnStep::Searching);
        assert!(session.ai_busy());

        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(10);
        loop {
            match turns.step(&mut session) {
                TurnStep::Searching if std::time::Instant::now() < deadline => {
                    std::thread::sleep(std::time::Duration::from_millis(1))
                }
                TurnStep::Applied(_) => break,
                other => panic!("unexpected step {other:?}"),
            }
        }
        assert!(!session.ai_busy());
        assert_eq!(session.game().ply_count(), 1);
    }
}
