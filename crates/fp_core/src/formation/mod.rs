//! Formation table
//!
//! Every formation places six players on a pitch drawn in percentage space:
//! `x` runs left to right, `y` runs from the opponent's goal (0) down to the
//! keeper (100). Slots are compiled in and never change at runtime; a slot is
//! identified by its index within the formation.

pub mod snapping;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::board::FieldPosition;
use crate::error::PlannerError;

pub use snapping::{SlotSnapper, SnapOutcome, OCCUPANCY_TOLERANCE, SNAP_RADIUS};

/// Number of players a full field holds. Chemistry is measured against this.
pub const FIELD_CAPACITY: usize = 6;

/// One position within a formation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormationSlot {
    pub label: &'static str,
    pub x: f64,
    pub y: f64,
    /// Placeholder rating shown on an empty slot
    pub default_rating: u8,
    /// Placeholder name shown on an empty slot
    pub default_name: &'static str,
}

impl FormationSlot {
    const fn new(
        label: &'static str,
        x: f64,
        y: f64,
        default_rating: u8,
        default_name: &'static str,
    ) -> Self {
        Self { label, x, y, default_rating, default_name }
    }

    pub fn position(&self) -> FieldPosition {
        FieldPosition::new(self.x, self.y)
    }
}

/// Named formations offered by the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FormationName {
    #[default]
    OneTwoTwoOne,
    OneThreeOneOne,
    OneOneThreeOne,
    OneTwoOneTwo,
    OneOneTwoTwo,
}

impl FormationName {
    pub const ALL: [FormationName; 5] = [
        FormationName::OneTwoTwoOne,
        FormationName::OneThreeOneOne,
        FormationName::OneOneThreeOne,
        FormationName::OneTwoOneTwo,
        FormationName::OneOneTwoTwo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FormationName::OneTwoTwoOne => "1-2-2-1",
            FormationName::OneThreeOneOne => "1-3-1-1",
            FormationName::OneOneThreeOne => "1-1-3-1",
            FormationName::OneTwoOneTwo => "1-2-1-2",
            FormationName::OneOneTwoTwo => "1-1-2-2",
        }
    }

    /// Slot list for this formation, in placement order.
    pub fn slots(&self) -> &'static [FormationSlot] {
        match self {
            FormationName::OneTwoTwoOne => &ONE_TWO_TWO_ONE,
            FormationName::OneThreeOneOne => &ONE_THREE_ONE_ONE,
            FormationName::OneOneThreeOne => &ONE_ONE_THREE_ONE,
            FormationName::OneTwoOneTwo => &ONE_TWO_ONE_TWO,
            FormationName::OneOneTwoTwo => &ONE_ONE_TWO_TWO,
        }
    }

    pub fn slot(&self, index: usize) -> Option<&'static FormationSlot> {
        self.slots().get(index)
    }
}

impl fmt::Display for FormationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormationName {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        FormationName::ALL
            .iter()
            .copied()
            .find(|name| name.as_str() == trimmed)
            .ok_or_else(|| PlannerError::UnknownFormation(trimmed.to_string()))
    }
}

impl Serialize for FormationName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FormationName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Formation Definitions
// ============================================================================

const ONE_TWO_TWO_ONE: [FormationSlot; 6] = [
    FormationSlot::new("GK", 50.0, 72.0, 85, "KEEPER"),
    FormationSlot::new("LB", 25.0, 55.0, 82, "DEFENDER 1"),
    FormationSlot::new("RB", 75.0, 55.0, 83, "DEFENDER 2"),
    FormationSlot::new("LM", 28.0, 38.0, 84, "MIDFIELDER 1"),
    FormationSlot::new("RM", 72.0, 38.0, 85, "MIDFIELDER 2"),
    FormationSlot::new("ST", 50.0, 20.0, 88, "STRIKER"),
];

const ONE_THREE_ONE_ONE: [FormationSlot; 6] = [
    FormationSlot::new("GK", 50.0, 72.0, 85, "KEEPER"),
    FormationSlot::new("LB", 22.0, 55.0, 82, "DEFENDER 1"),
    FormationSlot::new("CB", 50.0, 58.0, 84, "DEFENDER 2"),
    FormationSlot::new("RB", 78.0, 55.0, 83, "DEFENDER 3"),
    FormationSlot::new("CM", 50.0, 38.0, 85, "MIDFIELDER"),
    FormationSlot::new("ST", 50.0, 20.0, 88, "STRIKER"),
];

const ONE_ONE_THREE_ONE: [FormationSlot; 6] = [
    FormationSlot::new("GK", 50.0, 72.0, 85, "KEEPER"),
    FormationSlot::new("CB", 50.0, 55.0, 84, "DEFENDER"),
    FormationSlot::new("LM", 25.0, 38.0, 83, "MIDFIELDER 1"),
    FormationSlot::new("CM", 50.0, 42.0, 85, "MIDFIELDER 2"),
    FormationSlot::new("RM", 75.0, 38.0, 84, "MIDFIELDER 3"),
    FormationSlot::new("ST", 50.0, 20.0, 88, "STRIKER"),
];

const ONE_TWO_ONE_TWO: [FormationSlot; 6] = [
    FormationSlot::new("GK", 50.0, 72.0, 85, "KEEPER"),
    FormationSlot::new("LB", 25.0, 55.0, 82, "DEFENDER 1"),
    FormationSlot::new("RB", 75.0, 55.0, 83, "DEFENDER 2"),
    FormationSlot::new("CM", 50.0, 38.0, 85, "MIDFIELDER"),
    FormationSlot::new("LW", 32.0, 20.0, 86, "WINGER 1"),
    FormationSlot::new("RW", 68.0, 20.0, 87, "WINGER 2"),
];

const ONE_ONE_TWO_TWO: [FormationSlot; 6] = [
    FormationSlot::new("GK", 50.0, 72.0, 85, "KEEPER"),
    FormationSlot::new("CB", 50.0, 55.0, 84, "DEFENDER"),
    FormationSlot::new("LM", 30.0, 42.0, 83, "MIDFIELDER 1"),
    FormationSlot::new("RM", 70.0, 42.0, 84, "MIDFIELDER 2"),
    FormationSlot::new("LS", 35.0, 20.0, 87, "STRIKER 1"),
    FormationSlot::new("RS", 65.0, 20.0, 88, "STRIKER 2"),
];
