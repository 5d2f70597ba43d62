//! Input boundary: discrete events polled once per tick.

use std::collections::VecDeque;

/// Keys the session reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    S,
    L,
    Z,
    U,
    R,
    E,
    /// Any other key, ignored.
    Other(char),
}

impl Key {
    /// Maps a typed character to a key, case-insensitively.
    pub fn from_char(c: char) -> Key {
        match c.to_ascii_lowercase() {
            's' => Key::S,
            'l' => Key::L,
            'z' => Key::Z,
            'u' => Key::U,
            'r' => Key::R,
            'e' => Key::E,
            other => Key::Other(other),
        }
    }
}

/// A single input event, in window pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// The window was closed. Ends the process.
    Quit,
    PointerPress { x: i32, y: i32 },
    KeyPress(Key),
}

/// A poll-based event source.
pub trait InputSource {
    /// Returns every event that arrived since the last poll, oldest first.
    fn poll(&mut self) -> Vec<InputEvent>;
}

/// Replays a fixed script, one batch per poll. Empty once exhausted.
#[derive(Debug, Default, Clone)]
pub struct ScriptedInput {
    batches: VecDeque<Vec<InputEvent>>,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a batch to be returned by a later poll.
    pub fn push_batch(&mut self, events: Vec<InputEvent>) -> &mut Self {
        self.batches.push_back(events);
        self
    }

    /// Queues `ticks` empty polls.
    pub fn idle(&mut self, ticks: usize) -> &mut Self {
        for _ in 0..ticks {
            self.batches.push_back(Vec::new());
        }
        self
    }

    pub fn is_exhausted(&self) -> bool {
        self.batches.is_empty()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> Vec<InputEvent> {
        self.batches.pop_front().unwrap_or_default()
    }
}
