//! Background search on a worker thread.
//!
//! The controller never blocks on a [`SearchTask`]: it polls once per tick
//! and drops the task to cancel it. A cancelled worker may still be running
//! for a while, but its result has nowhere to go.

use crate::{CancelToken, MoveSearch};
use chess_core::Move;
use chess_engine::Position;
use std::io;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors starting a background search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("failed to spawn search thread: {0}")]
    Spawn(#[from] io::Error),
}

/// Outcome of polling a [`SearchTask`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPoll {
    /// The worker is still searching.
    Pending,
    /// The worker finished. `None` means the searcher found no move.
    Finished(Option<Move>),
    /// The worker went away without reporting (it panicked).
    Lost,
}

/// Handle to a search running on its own thread.
#[derive(Debug)]
pub struct SearchTask {
    token: CancelToken,
    receiver: Receiver<Option<Move>>,
}

impl SearchTask {
    /// Starts searching `position` on a new thread.
    ///
    /// The worker owns its copies of the position and moves.
    pub fn spawn(
        searcher: Arc<dyn MoveSearch>,
        position: Position,
        moves: Vec<Move>,
    ) -> Result<Self, SearchError> {
        let token = CancelToken::new();
        let worker_token = token.clone();
        let (sender, receiver) = mpsc::channel();

        thread::Builder::new()
            .name(format!("search-{}", searcher.name()))
            .spawn(move || {
                let result = searcher.find_best_move(&position, &moves, &worker_token);
                if worker_token.is_cancelled() {
                    debug!("discarding result of cancelled search");
                    return;
                }
                // The receiver may already be gone; nothing to do then.
                let _ = sender.send(result);
            })?;

        Ok(SearchTask { token, receiver })
    }

    /// Checks for a result without blocking.
    pub fn poll(&self) -> SearchPoll {
        match self.receiver.try_recv() {
            Ok(result) => SearchPoll::Finished(result),
            Err(TryRecvError::Empty) => SearchPoll::Pending,
            Err(TryRecvError::Disconnected) => {
                warn!("search worker exited without a result");
                SearchPoll::Lost
            }
        }
    }

    /// Requests cancellation and detaches from the worker.
    pub fn cancel(self) {
        debug!("cancelling search");
        drop(self);
    }
}

impl Drop for SearchTask {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Minimax, RandomSearch};
    use chess_engine::Game;
    use std::time::{Duration, Instant};

    /// Spins until cancelled, never producing a move.
    struct Stubborn;

    impl MoveSearch for Stubborn {
        fn find_best_move(&self, _: &Position, _: &[Move], cancel: &CancelToken) -> Option<Move> {
            while !cancel.is_cancelled() {
                thread::sleep(Duration::from_millis(1));
            }
            None
        }

        fn name(&self) -> &str {
            "stubborn"
        }
    }

    struct Panicking;

    impl MoveSearch for Panicking {
        fn find_best_move(&self, _: &Position, _: &[Move], _: &CancelToken) -> Option<Move> {
            panic!("search blew up");
        }

        fn name(&self) -> &str {
            "panicking"
        }
    }

    fn wait(task: &SearchTask) -> SearchPoll {
        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            match task.poll() {
                SearchPoll::Pending if Instant::now() < deadline => {
                    thread::sleep(Duration::from_millis(1))
                }
                other => return other,
            }
        }
    }

    #[test]
    fn finishes_with_a_legal_move() {
        let game = Game::new();
        let moves = game.legal_moves();
        let task = SearchTask::spawn(Arc::new(Minimax::new(1)), game.position().clone(), moves.clone()).unwrap();
        match wait(&task) {
            SearchPoll::Finished(Some(mv)) => assert!(moves.contains(&mv)),
            other => panic!("unexpected poll result {other:?}"),
        }
    }

    #[test]
    fn no_moves_finishes_empty() {
        let task = SearchTask::spawn(Arc::new(RandomSearch::seeded(3)), Position::startpos(), Vec::new()).unwrap();
        assert_eq!(wait(&task), SearchPoll::Finished(None));
    }

    #[test]
    fn pending_until_cancelled() {
        let game = Game::new();
        let task = SearchTask::spawn(Arc::new(Stubborn), game.position().clone(), game.legal_moves()).unwrap();
        assert_eq!(task.poll(), SearchPoll::Pending);

        let started = Instant::now();
        task.cancel();
        assert!(started.elapsed() < Duration::from_millis(500));
    }

    #[test]
    fn panicking_worker_is_lost() {
        let task = SearchTask::spawn(Arc::new(Panicking), Position::startpos(), Vec::new()).unwrap();
        assert_eq!(wait(&task), SearchPoll::Lost);
    }
}
