//! Live placement list for the field
//!
//! `FormationBoard` is the single owner of every card on the field. All
//! placement rules live here: snapping on drop, the one-name-per-field rule,
//! and the ordinal remap on formation change.

use tracing::{debug, info};

use super::card::{CardId, CardImage, CardMetadata, PlacedCard};
use super::field::FieldPosition;
use super::BoardError;
use crate::formation::{FormationName, SlotSnapper, SnapOutcome};
use crate::ratings::TeamRatings;

/// Result of a successful placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub card_id: CardId,
    pub snap: SnapOutcome,
}

#[derive(Debug, Clone, Default)]
pub struct FormationBoard {
    formation: FormationName,
    cards: Vec<PlacedCard>,
    snapper: SlotSnapper,
}

impl FormationBoard {
    pub fn new(formation: FormationName) -> Self {
        Self { formation, cards: Vec::new(), snapper: SlotSnapper::default() }
    }

    pub fn formation(&self) -> FormationName {
        self.formation
    }

    /// Cards in placement order.
    pub fn cards(&self) -> &[PlacedCard] {
        &self.cards
    }

    pub fn card(&self, id: CardId) -> Option<&PlacedCard> {
        self.cards.iter().find(|c| c.id == id)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn is_player_on_field(&self, name: &str) -> bool {
        let name = name.trim();
        !name.is_empty() && self.cards.iter().any(|c| c.name.as_deref() == Some(name))
    }

    /// Positions of every card except `except`.
    pub fn occupied_positions(&self, except: Option<CardId>) -> Vec<FieldPosition> {
        self.cards.iter().filter(|c| Some(c.id) != except).map(|c| c.position).collect()
    }

    /// Resolve a drop against the active formation.
    pub fn snap(&self, drop: FieldPosition, except: Option<CardId>) -> SnapOutcome {
        let occupied = self.occupied_positions(except);
        self.snapper.resolve(drop, self.formation.slots(), &occupied)
    }

    /// Place a new card at a drop coordinate, snapping to a free slot in range.
    ///
    /// When the drop snaps, the slot label replaces the metadata position.
    pub fn place_card(
        &mut self,
        image: CardImage,
        metadata: Option<CardMetadata>,
        drop: FieldPosition,
    ) -> Result<Placement, BoardError> {
        self.ensure_not_on_field(metadata.as_ref())?;

        let snap = self.snap(drop, None);
        let mut card = PlacedCard::new(image, metadata, snap.position());
        if let Some(label) = snap.label() {
            debug!(slot = label, "snapped new card");
            card.set_position_label(label);
        }

        let card_id = card.id;
        info!(card = %card_id, player = card.display_name(), "card placed");
        self.cards.push(card);
        Ok(Placement { card_id, snap })
    }

    /// Place a new card at an exact coordinate, without snapping.
    pub fn place_at(
        &mut self,
        image: CardImage,
        metadata: Option<CardMetadata>,
        position: FieldPosition,
    ) -> Result<CardId, BoardError> {
        self.ensure_not_on_field(metadata.as_ref())?;

        let card = PlacedCard::new(image, metadata, position);
        let card_id = card.id;
        self.cards.push(card);
        Ok(card_id)
    }

    /// Move an existing card. The label changes only when the drop snaps.
    pub fn reposition(&mut self, id: CardId, drop: FieldPosition) -> Result<SnapOutcome, BoardError> {
        let snap = self.snap(drop, Some(id));
        let card = self.cards.iter_mut().find(|c| c.id == id).ok_or(BoardError::UnknownCard(id))?;

        card.position = snap.position();
        if let Some(label) = snap.label() {
            card.set_position_label(label);
        }
        debug!(card = %id, x = card.position.x, y = card.position.y, "card repositioned");
        Ok(snap)
    }

    pub fn remove(&mut self, id: CardId) -> Option<PlacedCard> {
        let index = self.cards.iter().position(|c| c.id == id)?;
        let card = self.cards.remove(index);
        info!(card = %id, player = card.display_name(), "card removed");
        Some(card)
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }

    /// Switch formation and move cards onto the new slots by index.
    ///
    /// The n-th placed card goes to the n-th slot whatever its role was; a
    /// striker can end up in goal. Labels are left as they were. Cards past
    /// the last slot keep their position. Returns how many cards moved.
    pub fn set_formation(&mut self, formation: FormationName) -> usize {
        self.formation = formation;
        let slots = formation.slots();

        let mut moved = 0;
        for (card, slot) in self.cards.iter_mut().zip(slots) {
            card.position = slot.position();
            moved += 1;
        }

        info!(formation = %formation, moved, "formation changed");
        moved
    }

    pub fn ratings(&self) -> TeamRatings {
        TeamRatings::from_cards(&self.cards)
    }

    fn ensure_not_on_field(&self, metadata: Option<&CardMetadata>) -> Result<(), BoardError> {
        if let Some(name) = metadata.and_then(CardMetadata::player_name) {
            if self.is_player_on_field(name) {
                return Err(BoardError::DuplicatePlayer { name: name.to_string() });
            }
        }
        Ok(())
    }
}
