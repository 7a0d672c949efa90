//! Team rating summary
//!
//! Recomputed from scratch after every change to the field. Only rated cards
//! (overall above zero) count; anonymous cards stand on the field but do not
//! move the averages.

use serde::{Deserialize, Serialize};

use crate::board::PlacedCard;
use crate::formation::FIELD_CAPACITY;

/// Text shown for a metric when nothing is rated.
pub const PLACEHOLDER: &str = "--";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingSummary {
    pub overall: u32,
    pub attack: u32,
    pub defense: u32,
    pub midfield: u32,
    pub pace: u32,
    pub chemistry: u32,
    /// Number of rated cards the averages cover
    pub rated_cards: usize,
}

/// Either "nothing to rate" or a computed summary. Kept apart so an empty
/// field never reads as a team rated zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TeamRatings {
    Empty,
    Rated(RatingSummary),
}

impl TeamRatings {
    pub fn from_cards(cards: &[PlacedCard]) -> Self {
        let rated: Vec<&PlacedCard> = cards.iter().filter(|c| c.overall > 0).collect();
        let n = rated.len();
        if n == 0 {
            return TeamRatings::Empty;
        }

        let sum = |f: fn(&PlacedCard) -> u32| -> u32 { rated.iter().map(|c| f(c)).sum() };

        let overall = sum(|c| c.overall as u32);
        let pace = sum(|c| c.substats.pace as u32);
        let shooting = sum(|c| c.substats.shooting as u32);
        let passing = sum(|c| c.substats.passing as u32);
        let dribbling = sum(|c| c.substats.dribbling as u32);
        let defense = sum(|c| c.substats.defense as u32);
        let physical = sum(|c| c.substats.physical as u32);

        TeamRatings::Rated(RatingSummary {
            overall: rounded_ratio(overall, n),
            attack: rounded_ratio(pace + shooting + dribbling, n * 3),
            defense: rounded_ratio(defense + physical, n * 2),
            midfield: rounded_ratio(passing + dribbling, n * 2),
            pace: rounded_ratio(pace, n),
            chemistry: rounded_ratio(n as u32 * 100, FIELD_CAPACITY),
            rated_cards: n,
        })
    }

    pub fn summary(&self) -> Option<&RatingSummary> {
        match self {
            TeamRatings::Empty => None,
            TeamRatings::Rated(summary) => Some(summary),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, TeamRatings::Empty)
    }

    /// Display strings in panel order: overall, attack, defense, midfield,
    /// pace, chemistry.
    pub fn display_values(&self) -> [String; 6] {
        match self {
            TeamRatings::Empty => std::array::from_fn(|_| PLACEHOLDER.to_string()),
            TeamRatings::Rated(s) => [
                s.overall.to_string(),
                s.attack.to_string(),
                s.defense.to_string(),
                s.midfield.to_string(),
                s.pace.to_string(),
                s.chemistry.to_string(),
            ],
        }
    }

    /// Bar widths in percent for attack, defense, midfield, pace and chemistry.
    pub fn bar_widths(&self) -> [u32; 5] {
        match self {
            TeamRatings::Empty => [0; 5],
            TeamRatings::Rated(s) => {
                [s.attack, s.defense, s.midfield, s.pace, s.chemistry].map(|v| v.min(100))
            }
        }
    }
}

/// "3/6" style counter shown under the field.
pub fn player_count_label(cards_on_field: usize) -> String {
    format!("{}/{}", cards_on_field, FIELD_CAPACITY)
}

/// Round half up, matching the panel's integer display.
fn rounded_ratio(total: u32, count: usize) -> u32 {
    (total as f64 / count as f64).round() as u32
}
