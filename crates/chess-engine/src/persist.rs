//! Single-slot game persistence.
//!
//! A saved game is the starting FEN plus the moves played, in UCI notation,
//! encoded as JSON. Loading replays the moves, so the undo history survives
//! a save/load cycle. Where the bytes live is up to a [`SaveSlot`].

use crate::{Game, Position};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Current save format version.
pub const SAVE_VERSION: u32 = 1;

/// Errors that can occur while saving or loading.
#[derive(Debug, Error)]
pub enum SaveError {
    /// Nothing has been saved to the slot yet.
    #[error("no saved game found")]
    NotFound,
    /// The slot could not be read or written.
    #[error("save slot I/O failed: {0}")]
    Io(#[from] io::Error),
    /// The slot contents are not a valid saved game.
    #[error("saved game is corrupt: {0}")]
    Corrupt(String),
    /// The slot was written by a newer format.
    #[error("unsupported save version {0}")]
    UnsupportedVersion(u32),
}

impl From<serde_json::Error> for SaveError {
    fn from(e: serde_json::Error) -> Self {
        SaveError::Corrupt(e.to_string())
    }
}

/// On-disk layout of a saved game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedGame {
    pub version: u32,
    pub start_fen: String,
    #[serde(default)]
    pub moves: Vec<String>,
}

impl Game {
    /// Serializes the game for a save slot.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SaveError> {
        let saved = SavedGame {
            version: SAVE_VERSION,
            start_fen: self.start_position().to_fen(),
            moves: self.move_log().iter().map(|m| m.to_uci()).collect(),
        };
        Ok(serde_json::to_vec_pretty(&saved)?)
    }

    /// Restores a game from save slot bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SaveError> {
        let saved: SavedGame = serde_json::from_slice(bytes)?;
        if saved.version > SAVE_VERSION {
            return Err(SaveError::UnsupportedVersion(saved.version));
        }

        let start = Position::from_fen(&saved.start_fen)
            .map_err(|e| SaveError::Corrupt(e.to_string()))?;
        let mut game = Game::from_position(start);
        for uci in &saved.moves {
            game.make_move_uci(uci)
                .map_err(|e| SaveError::Corrupt(e.to_string()))?;
        }
        Ok(game)
    }
}

/// Storage for exactly one saved game. Storing overwrites.
pub trait SaveSlot {
    /// Overwrites the slot with `bytes`.
    fn store(&mut self, bytes: &[u8]) -> Result<(), SaveError>;

    /// Reads the slot, failing with [`SaveError::NotFound`] when empty.
    fn fetch(&self) -> Result<Vec<u8>, SaveError>;
}

/// A save slot backed by a single file.
#[derive(Debug, Clone)]
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileSlot { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SaveSlot for FileSlot {
    fn store(&mut self, bytes: &[u8]) -> Result<(), SaveError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, bytes)?;
        Ok(())
    }

    fn fetch(&self) -> Result<Vec<u8>, SaveError> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(SaveError::NotFound),
            Err(e) => Err(SaveError::Io(e)),
        }
    }
}

/// An in-memory save slot.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    data: Option<Vec<u8>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true once something has been stored.
    pub fn is_filled(&self) -> bool {
        self.data.is_some()
    }
}

impl SaveSlot for MemorySlot {
    fn store(&mut self, bytes: &[u8]) -> Result<(), SaveError> {
        self.data = Some(bytes.to_vec());
        Ok(())
    }

    fn fetch(&self) -> Result<Vec<u8>, SaveError> {
        self.data.clone().ok_or(SaveError::NotFound)
    }
}

/// Saves a game into a slot.
pub fn save_game(slot: &mut dyn SaveSlot, game: &Game) -> Result<(), SaveError> {
    let bytes = game.to_bytes()?;
    slot.store(&bytes)
}

/// Loads the game held by a slot.
pub fn load_game(slot: &dyn SaveSlot) -> Result<Game, SaveError> {
    Game::from_bytes(&slot.fetch()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn played() -> Game {
        let mut game = Game::new();
        for uci in ["e2e4", "e7e5", "g1f3", "b8c6"] {
            game.make_move_uci(uci).unwrap();
        }
        game
    }

    #[test]
    fn memory_slot_round_trip_keeps_history() {
        let mut slot = MemorySlot::new();
        assert!(matches!(load_game(&slot), Err(SaveError::NotFound)));

        let game = played();
        save_game(&mut slot, &game).unwrap();
        assert!(slot.is_filled());

        let mut loaded = load_game(&slot).unwrap();
        assert_eq!(loaded.to_fen(), game.to_fen());
        assert_eq!(loaded.move_log(), game.move_log());
        assert!(loaded.undo_move().is_some());
        assert_eq!(loaded.ply_count(), 3);
    }

    #[test]
    fn file_slot_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let slot = FileSlot::new(dir.path().join("nothing.json"));
        assert!(matches!(slot.fetch(), Err(SaveError::NotFound)));
    }

    #[test]
    fn file_slot_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let mut slot = FileSlot::new(dir.path().join("saves").join("slot.json"));

        save_game(&mut slot, &played()).unwrap();
        save_game(&mut slot, &Game::new()).unwrap();

        let loaded = load_game(&slot).unwrap();
        assert_eq!(loaded.ply_count(), 0);
    }

    #[test]
    fn corrupt_bytes_are_rejected() {
        assert!(matches!(Game::from_bytes(b"not json"), Err(SaveError::Corrupt(_))));

        let bad_move = br#"{"version":1,"start_fen":"rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1","moves":["e2e5"]}"#;
        assert!(matches!(Game::from_bytes(bad_move), Err(SaveError::Corrupt(_))));

        let future = br#"{"version":99,"start_fen":"x","moves":[]}"#;
        assert!(matches!(Game::from_bytes(future), Err(SaveError::UnsupportedVersion(99))));
    }

    #[test]
    fn saved_layout() {
        let bytes = played().to_bytes().unwrap();
        let saved: SavedGame = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(saved.version, SAVE_VERSION);
        assert_eq!(saved.moves, vec!["e2e4", "e7e5", "g1f3", "b8c6"]);
    }
}
