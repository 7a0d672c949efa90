//! Drag/drop session handling
//!
//! A drag carries its payload the way a browser does: a bag of string keys.
//! Sidebar drags carry the card image and its metadata as JSON text; field
//! drags carry a repositioning flag and the card id. The controller tracks
//! which element is being dragged so a drop can tell a move from a new card.

use std::collections::HashMap;

use tracing::{debug, error, warn};

use super::card::{CardId, CardImage, CardMetadata};
use super::field::FieldPosition;
use super::state::FormationBoard;
use super::BoardError;
use crate::formation::SnapOutcome;

pub const KEY_CARD_IMAGE: &str = "cardImage";
pub const KEY_METADATA: &str = "metadata";
pub const KEY_REPOSITIONING: &str = "isRepositioning";
pub const KEY_CARD_ID: &str = "cardId";

/// String-keyed drag payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataTransfer {
    data: HashMap<String, String>,
}

impl DataTransfer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_data(&mut self, key: &str, value: impl Into<String>) {
        self.data.insert(key.to_string(), value.into());
    }

    /// Empty string for a missing key, as browsers do.
    pub fn get_data(&self, key: &str) -> &str {
        self.data.get(key).map(String::as_str).unwrap_or("")
    }

    pub fn is_empty(&self) -> bool {
        self.data.values().all(String::is_empty)
    }
}

/// Where the element being dragged came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragSource {
    Sidebar { index: usize },
    Field { card_id: CardId },
}

/// What a drop did to the board.
#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome {
    /// No usable payload.
    Ignored,
    Repositioned { card_id: CardId, snap: SnapOutcome },
    /// `metadata_unreadable` is set when metadata was present but failed to
    /// parse and the card went down anonymous.
    Placed { card_id: CardId, snap: SnapOutcome, metadata_unreadable: bool },
    Rejected { name: String },
}

#[derive(Debug, Clone, Default)]
pub struct DragController {
    dragging: Option<DragSource>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dragging(&self) -> Option<DragSource> {
        self.dragging
    }

    pub fn is_idle(&self) -> bool {
        self.dragging.is_none()
    }

    /// Start dragging a card from the sidebar.
    ///
    /// Refused when the card's player is already on the field. Unreadable
    /// metadata does not block the drag; the drop decides what to do with it.
    pub fn begin_sidebar_drag(
        &mut self,
        board: &FormationBoard,
        index: usize,
        image: &CardImage,
        metadata_json: Option<&str>,
    ) -> Result<DataTransfer, BoardError> {
        if let Some(raw) = metadata_json {
            match CardMetadata::from_json(raw) {
                Ok(meta) => {
                    if let Some(name) = meta.player_name() {
                        if board.is_player_on_field(name) {
                            debug!(player = name, "drag refused, player already on field");
                            return Err(BoardError::DuplicatePlayer { name: name.to_string() });
                        }
                    }
                }
                Err(err) => error!(%err, "could not check sidebar card for duplicates"),
            }
        }

        let mut transfer = DataTransfer::new();
        transfer.set_data(KEY_CARD_IMAGE, image.as_str());
        if let Some(raw) = metadata_json {
            transfer.set_data(KEY_METADATA, raw);
        }

        self.dragging = Some(DragSource::Sidebar { index });
        Ok(transfer)
    }

    /// Start dragging a card already on the field.
    pub fn begin_field_drag(
        &mut self,
        board: &FormationBoard,
        card_id: CardId,
    ) -> Result<DataTransfer, BoardError> {
        let card = board.card(card_id).ok_or(BoardError::UnknownCard(card_id))?;

        let mut transfer = DataTransfer::new();
        transfer.set_data(KEY_REPOSITIONING, "true");
        transfer.set_data(KEY_CARD_ID, card_id.to_string());
        if let Some(meta) = card.metadata.as_ref() {
            match meta.to_json() {
                Ok(raw) => transfer.set_data(KEY_METADATA, raw),
                Err(err) => warn!(%err, card = %card_id, "metadata left out of field drag"),
            }
        }

        self.dragging = Some(DragSource::Field { card_id });
        Ok(transfer)
    }

    /// Drag ended without a drop, or the drop already ran.
    pub fn end(&mut self) {
        self.dragging = None;
    }

    /// Handle a drop at `drop` (already in field percentages).
    pub fn drop(
        &mut self,
        board: &mut FormationBoard,
        transfer: &DataTransfer,
        drop: FieldPosition,
    ) -> DropOutcome {
        let source = self.dragging.take();

        if transfer.get_data(KEY_REPOSITIONING) == "true" {
            if let Some(DragSource::Field { card_id }) = source {
                match board.reposition(card_id, drop) {
                    Ok(snap) => return DropOutcome::Repositioned { card_id, snap },
                    Err(err) => warn!(%err, "repositioning drop for a card that left the field"),
                }
            }
        }

        let image = transfer.get_data(KEY_CARD_IMAGE);
        if image.is_empty() {
            return DropOutcome::Ignored;
        }

        let raw = transfer.get_data(KEY_METADATA);
        let (metadata, metadata_unreadable) = if raw.is_empty() {
            (None, false)
        } else {
            match CardMetadata::from_json(raw) {
                Ok(meta) => (Some(meta), false),
                Err(err) => {
                    error!(%err, "error parsing dropped card metadata");
                    (None, true)
                }
            }
        };

        match board.place_card(CardImage::new(image), metadata, drop) {
            Ok(placement) => DropOutcome::Placed {
                card_id: placement.card_id,
                snap: placement.snap,
                metadata_unreadable,
            },
            Err(BoardError::DuplicatePlayer { name }) => DropOutcome::Rejected { name },
            Err(err) => {
                // place_card only reports duplicates
                warn!(%err, "unexpected placement failure");
                DropOutcome::Ignored
            }
        }
    }
}
