//! Pre-game mode menu.
//!
//! The menu does not block. [`ModeSelector`] is fed events tick by tick and
//! reports a mode as soon as a press lands inside one of the three entries.

use crate::input::InputEvent;
use crate::layout;
use chess_core::Color;
use std::fmt;
use tracing::info;

/// Who controls which side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Mode {
    /// Human plays White against the AI.
    Single,
    /// Two humans share the board.
    Multiplayer,
    /// The AI plays both sides.
    BotVsBot,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Single, Mode::Multiplayer, Mode::BotVsBot];

    /// Returns true if a human moves the pieces of `color`.
    pub const fn human_controls(self, color: Color) -> bool {
        match (self, color) {
            (Mode::Single, Color::White) => true,
            (Mode::Single, Color::Black) => false,
            (Mode::Multiplayer, _) => true,
            (Mode::BotVsBot, _) => false,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Mode::Single => "Singleplayer",
            Mode::Multiplayer => "Multiplayer",
            Mode::BotVsBot => "Bot vs Bot",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of feeding events to the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOutcome {
    /// Nothing chosen yet; keep showing the menu.
    Waiting,
    Selected(Mode),
    /// The user closed the window.
    Quit,
}

/// Mode selection state machine.
#[derive(Debug, Default, Clone)]
pub struct ModeSelector {
    entries: usize,
}

impl ModeSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times a mode has been picked since startup.
    pub fn selections(&self) -> usize {
        self.entries
    }

    /// Handles one event. The controller calls this for every event that
    /// arrives while no session is running.
    pub fn on_event(&mut self, event: InputEvent) -> MenuOutcome {
        match event {
            InputEvent::Quit => MenuOutcome::Quit,
            InputEvent::PointerPress { x, y } => match layout::menu_hit(x, y) {
                Some(mode) => {
                    self.entries += 1;
                    info!(%mode, "mode selected");
                    MenuOutcome::Selected(mode)
                }
                None => MenuOutcome::Waiting,
            },
            InputEvent::KeyPress(_) => MenuOutcome::Waiting,
        }
    }
}
