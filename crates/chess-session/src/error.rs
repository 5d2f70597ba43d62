//! Terminal error types.
//!
//! Recoverable problems (illegal click pairs, a load with nothing saved, a
//! failed save) never surface here; they end up in the session's status text.

use crate::render::RenderError;
use thiserror::Error;

/// Errors that end the session loop.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Drawing a frame failed.
    #[error("render failed: {0}")]
    Render(#[from] RenderError),
}
