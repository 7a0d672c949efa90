//! Slot snapping
//!
//! A drop near a formation slot lands exactly on it, provided nobody else
//! is standing there. Everything here is pure: the caller passes in the
//! positions of the cards currently on the field.

use super::FormationSlot;
use crate::board::FieldPosition;

/// Snapping radius, in percentage units.
pub const SNAP_RADIUS: f64 = 15.0;

/// Per-axis distance under which a card counts as standing on a slot.
pub const OCCUPANCY_TOLERANCE: f64 = 1.0;

/// Result of resolving a raw drop coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SnapOutcome {
    /// Drop landed on a free slot.
    Snapped { slot_index: usize, label: &'static str, position: FieldPosition },
    /// No free slot in range; the raw coordinate stands.
    Free(FieldPosition),
}

impl SnapOutcome {
    /// Final coordinate for the card.
    pub fn position(&self) -> FieldPosition {
        match self {
            SnapOutcome::Snapped { position, .. } => *position,
            SnapOutcome::Free(position) => *position,
        }
    }

    pub fn label(&self) -> Option<&'static str> {
        match self {
            SnapOutcome::Snapped { label, .. } => Some(*label),
            SnapOutcome::Free(_) => None,
        }
    }

    pub fn is_snapped(&self) -> bool {
        matches!(self, SnapOutcome::Snapped { .. })
    }
}

/// Nearest-free-slot resolver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotSnapper {
    pub radius: f64,
    pub tolerance: f64,
}

impl Default for SlotSnapper {
    fn default() -> Self {
        Self { radius: SNAP_RADIUS, tolerance: OCCUPANCY_TOLERANCE }
    }
}

impl SlotSnapper {
    /// Resolve `drop` against `slots`.
    ///
    /// `occupied` holds the positions of every other card on the field (the
    /// card being dragged must already be left out). A slot only replaces the
    /// current best when strictly closer, so the first slot in list order wins
    /// a tie.
    pub fn resolve(
        &self,
        drop: FieldPosition,
        slots: &[FormationSlot],
        occupied: &[FieldPosition],
    ) -> SnapOutcome {
        let mut best: Option<(usize, &FormationSlot)> = None;
        let mut shortest = self.radius;

        for (index, slot) in slots.iter().enumerate() {
            let distance = slot.position().distance_to(drop);
            if distance < shortest && !self.is_occupied(slot, occupied) {
                shortest = distance;
                best = Some((index, slot));
            }
        }

        match best {
            Some((slot_index, slot)) => SnapOutcome::Snapped {
                slot_index,
                label: slot.label,
                position: slot.position(),
            },
            None => SnapOutcome::Free(drop),
        }
    }

    /// Proximity check, not identity: any card within the tolerance on both
    /// axes blocks the slot.
    pub fn is_occupied(&self, slot: &FormationSlot, occupied: &[FieldPosition]) -> bool {
        occupied.iter().any(|pos| {
            (pos.x - slot.x).abs() < self.tolerance && (pos.y - slot.y).abs() < self.tolerance
        })
    }
}
