//! Session-level requests: save, load, undo, reset and exit-to-menu.
//!
//! Keyboard shortcuts and on-screen buttons both end up in
//! [`LifecycleFlags::request`]. The controller drains the flags once per tick
//! in [`LifecycleAction::SERVICE_ORDER`], clearing each flag before its
//! action runs.

use crate::input::Key;
use std::fmt;

/// One structural session action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleAction {
    Save,
    Load,
    Undo,
    Reset,
    ExitToMenu,
}

impl LifecycleAction {
    /// Persistence first, destructive actions last.
    pub const SERVICE_ORDER: [LifecycleAction; 5] = [
        LifecycleAction::Save,
        LifecycleAction::Load,
        LifecycleAction::Undo,
        LifecycleAction::Reset,
        LifecycleAction::ExitToMenu,
    ];

    /// On-screen buttons, from the bottom of the stack upwards.
    pub const BUTTON_ORDER: [LifecycleAction; 5] = [
        LifecycleAction::Undo,
        LifecycleAction::Load,
        LifecycleAction::Save,
        LifecycleAction::ExitToMenu,
        LifecycleAction::Reset,
    ];

    /// Keyboard shortcut mapping.
    pub const fn for_key(key: Key) -> Option<LifecycleAction> {
        match key {
            Key::S => Some(LifecycleAction::Save),
            Key::L => Some(LifecycleAction::Load),
            Key::Z | Key::U => Some(LifecycleAction::Undo),
            Key::R => Some(LifecycleAction::Reset),
            Key::E => Some(LifecycleAction::ExitToMenu),
            Key::Other(_) => None,
        }
    }

    /// Button caption.
    pub const fn label(self) -> &'static str {
        match self {
            LifecycleAction::Save => "S: Save",
            LifecycleAction::Load => "L: Load",
            LifecycleAction::Undo => "U: Undo",
            LifecycleAction::Reset => "R: Reset",
            LifecycleAction::ExitToMenu => "E: Exit",
        }
    }
}

impl fmt::Display for LifecycleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleAction::Save => "save",
            LifecycleAction::Load => "load",
            LifecycleAction::Undo => "undo",
            LifecycleAction::Reset => "reset",
            LifecycleAction::ExitToMenu => "exit-to-menu",
        };
        f.write_str(name)
    }
}

/// Pending lifecycle requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LifecycleFlags {
    pub save_requested: bool,
    pub load_requested: bool,
    pub undo_requested: bool,
    pub reset_requested: bool,
    pub exit_to_menu_requested: bool,
}

impl LifecycleFlags {
    pub fn new() -> Self {
        Self::default()
    }

    fn flag_mut(&mut self, action: LifecycleAction) -> &mut bool {
        match action {
            LifecycleAction::Save => &mut self.save_requested,
            LifecycleAction::Load => &mut self.load_requested,
            LifecycleAction::Undo => &mut self.undo_requested,
            LifecycleAction::Reset => &mut self.reset_requested,
            LifecycleAction::ExitToMenu => &mut self.exit_to_menu_requested,
        }
    }

    /// Requests `action`. Requesting twice is the same as once.
    pub fn request(&mut self, action: LifecycleAction) {
        *self.flag_mut(action) = true;
    }

    pub fn is_requested(&self, action: LifecycleAction) -> bool {
        match action {
            LifecycleAction::Save => self.save_requested,
            LifecycleAction::Load => self.load_requested,
            LifecycleAction::Undo => self.undo_requested,
            LifecycleAction::Reset => self.reset_requested,
            LifecycleAction::ExitToMenu => self.exit_to_menu_requested,
        }
    }

    /// Clears the flag for `action`, returning whether it was set.
    pub fn take(&mut self, action: LifecycleAction) -> bool {
        std::mem::take(self.flag_mut(action))
    }

    pub fn any(&self) -> bool {
        LifecycleAction::SERVICE_ORDER
            .iter()
            .any(|&action| self.is_requested(action))
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// How a serviced action went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The action changed the session (or the save slot).
    Applied,
    /// Nothing to do, e.g. undo with no moves played.
    Nothing,
    /// A recoverable failure, reported through the status line.
    Failed(String),
}

/// One serviced action, in the order it ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleReport {
    pub action: LifecycleAction,
    pub outcome: ActionOutcome,
}
