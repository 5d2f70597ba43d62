//! Interactive chess session controller.
//!
//! A [`Controller`] owns the running [`Session`] and is driven one tick at a
//! time: it drains input events, services lifecycle requests (save, load,
//! undo, reset, exit-to-menu), advances move animations frame by frame,
//! runs AI turns on a cancellable worker and renders through a
//! [`DrawSurface`].
//!
//! # Example
//!
//! ```
//! use chess_session::{layout, Controller, InputEvent, Mode, Phase, RecordingSurface, SessionConfig};
//! use chess_ai::RandomSearch;
//! use chess_engine::MemorySlot;
//! use std::sync::Arc;
//!
//! let mut controller = Controller::new(
//!     SessionConfig::default(),
//!     Arc::new(RandomSearch::seeded(1)),
//!     Box::new(MemorySlot::new()),
//! );
//! let mut surface = RecordingSurface::new();
//!
//! let (x, y) = layout::menu_region(Mode::Multiplayer).center();
//! controller.tick(&[InputEvent::PointerPress { x, y }], &mut surface).unwrap();
//! assert_eq!(controller.phase(), Phase::InGame);
//! ```

pub mod animation;
pub mod config;
pub mod controller;
pub mod error;
pub mod input;
pub mod layout;
pub mod lifecycle;
pub mod menu;
pub mod render;
pub mod selection;
pub mod session;
pub mod turn;

pub use animation::AnimationTask;
pub use config::{AiConfig, ConfigError, PromotionChoice, SessionConfig};
pub use controller::{Controller, Flow, Phase, RunOptions, RunSummary, StopReason};
pub use error::SessionError;
pub use input::{InputEvent, InputSource, Key, ScriptedInput};
pub use lifecycle::{ActionOutcome, LifecycleAction, LifecycleFlags, LifecycleReport};
pub use menu::{MenuOutcome, Mode, ModeSelector};
pub use render::{DrawSurface, FrameRenderer, RecordingSurface, RenderContext, RenderError};
pub use selection::{ClickOutcome, SelectionState};
pub use session::Session;
pub use turn::{AiState, TurnOrchestrator, TurnStep};
