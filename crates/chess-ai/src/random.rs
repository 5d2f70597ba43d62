//! Uniformly random move selection.

use crate::{CancelToken, MoveSearch};
use chess_core::Move;
use chess_engine::Position;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// Picks a uniformly random move. `None` only when `moves` is empty.
pub fn find_random_move<R: Rng + ?Sized>(moves: &[Move], rng: &mut R) -> Option<Move> {
    moves.choose(rng).copied()
}

/// A searcher that plays random legal moves.
#[derive(Debug)]
pub struct RandomSearch {
    rng: Mutex<StdRng>,
}

impl RandomSearch {
    pub fn new() -> Self {
        RandomSearch {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        RandomSearch {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for RandomSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveSearch for RandomSearch {
    fn find_best_move(&self, _position: &Position, moves: &[Move], cancel: &CancelToken) -> Option<Move> {
        if cancel.is_cancelled() {
            return None;
        }
        let mut rng = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        find_random_move(moves, &mut *rng)
    }

    fn name(&self) -> &str {
        "random"
    }
}
