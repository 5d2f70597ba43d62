//! Move search for the session controller.
//!
//! Searchers implement [`MoveSearch`] and are handed a copy of the position
//! together with its legal moves. Long searches run on a worker thread via
//! [`SearchTask`], which the controller polls once per tick and may cancel at
//! any time without waiting for the worker.
//!
//! # Example
//!
//! ```
//! use chess_ai::{CancelToken, Minimax, MoveSearch};
//! use chess_engine::Game;
//!
//! let game = Game::new();
//! let best = Minimax::new(1).find_best_move(game.position(), &game.legal_moves(), &CancelToken::new());
//! assert!(best.is_some());
//! ```

mod cancel;
mod minimax;
mod random;
mod task;

pub use cancel::CancelToken;
pub use minimax::{evaluate, Minimax};
pub use random::{find_random_move, RandomSearch};
pub use task::{SearchError, SearchPoll, SearchTask};

use chess_core::Move;
use chess_engine::Position;

/// A move-search strategy.
///
/// Implementations must treat `position` and `moves` as read-only input and
/// should poll `cancel` often enough that a cancelled search winds down
/// promptly. A cancelled search returns `None`.
pub trait MoveSearch: Send + Sync {
    /// Picks one of `moves` for the side to move in `position`.
    fn find_best_move(&self, position: &Position, moves: &[Move], cancel: &CancelToken) -> Option<Move>;

    /// Short name used in logs.
    fn name(&self) -> &str;
}
