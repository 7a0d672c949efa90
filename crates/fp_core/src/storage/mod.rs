//! Saved formation storage
//!
//! The board writes a snapshot of the field under one well-known key. It is
//! write-only from the board's side; the CLI reads it back to export a saved
//! line-up.

pub mod file_store;

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::{CardId, CardImage, FieldPosition, FormationBoard, PlacedCard, Substats};
use crate::formation::FormationName;

pub use file_store::FileStore;

/// Key the formation snapshot is stored under.
pub const STORAGE_KEY: &str = "fifa_formation";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Corrupted store file: {path}")]
    Corrupted { path: String },

    #[error("Nothing stored under {key}")]
    Missing { key: String },
}

impl StoreError {
    pub fn is_recoverable(&self) -> bool {
        match self {
            StoreError::Io(_) => true,
            StoreError::Missing { .. } => true,
            StoreError::Serialization(_) => false,
            StoreError::Corrupted { .. } => false,
        }
    }
}

/// String key/value persistence, shaped like browser local storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// In-process store. Forgets everything on drop.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

// ============================================================================
// Formation snapshot
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedPlayer {
    pub id: CardId,
    pub name: Option<String>,
    pub position: String,
    pub overall: u8,
    pub substats: Substats,
    pub x: f64,
    pub y: f64,
    pub image: CardImage,
}

impl From<&PlacedCard> for SavedPlayer {
    fn from(card: &PlacedCard) -> Self {
        Self {
            id: card.id,
            name: card.name.clone(),
            position: card.position_label.clone(),
            overall: card.overall,
            substats: card.substats,
            x: card.position.x,
            y: card.position.y,
            image: card.image.clone(),
        }
    }
}

impl SavedPlayer {
    /// Rebuild a field card from the snapshot. Metadata is not kept.
    pub fn to_placed_card(&self) -> PlacedCard {
        PlacedCard {
            id: self.id,
            image: self.image.clone(),
            name: self.name.clone(),
            overall: self.overall,
            position_label: self.position.clone(),
            substats: self.substats,
            position: FieldPosition::new(self.x, self.y),
            metadata: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedFormation {
    pub formation: FormationName,
    pub players: Vec<SavedPlayer>,
    pub timestamp: DateTime<Utc>,
}

impl SavedFormation {
    pub fn capture(board: &FormationBoard) -> Self {
        Self {
            formation: board.formation(),
            players: board.cards().iter().map(SavedPlayer::from).collect(),
            timestamp: Utc::now(),
        }
    }

    pub fn placed_cards(&self) -> Vec<PlacedCard> {
        self.players.iter().map(SavedPlayer::to_placed_card).collect()
    }
}

/// Write the board snapshot under [`STORAGE_KEY`].
pub fn save_formation(
    store: &mut dyn KeyValueStore,
    board: &FormationBoard,
) -> Result<SavedFormation, StoreError> {
    let snapshot = SavedFormation::capture(board);
    let json = serde_json::to_string(&snapshot)?;
    store.set(STORAGE_KEY, &json)?;
    log::info!("Formation {} saved with {} players", snapshot.formation, snapshot.players.len());
    Ok(snapshot)
}

pub fn load_saved_formation(store: &dyn KeyValueStore) -> Result<SavedFormation, StoreError> {
    let json = store
        .get(STORAGE_KEY)?
        .ok_or_else(|| StoreError::Missing { key: STORAGE_KEY.to_string() })?;
    Ok(serde_json::from_str(&json)?)
}
