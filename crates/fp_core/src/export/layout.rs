//! Export canvas geometry
//!
//! All numbers here are in unscaled canvas pixels. The rasterizer multiplies
//! them by the render scale.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::board::{CardImage, FieldPosition, PlacedCard};
use crate::error::PlannerError;
use crate::formation::FormationName;
use crate::ratings::{player_count_label, TeamRatings};

/// Pixel rectangle on the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub(crate) fn with_height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }
}

/// Which export composition to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportCanvas {
    /// 1200×800 stadium poster with header, framed pitch and footer
    #[default]
    Standard,
    /// 800×600 pitch only
    Compact,
}

impl ExportCanvas {
    pub fn size(&self) -> (u32, u32) {
        match self {
            ExportCanvas::Standard => (1200, 800),
            ExportCanvas::Compact => (800, 600),
        }
    }

    /// Pitch area cards are positioned against.
    pub fn pitch(&self) -> PixelRect {
        match self {
            ExportCanvas::Standard => STANDARD_PITCH,
            ExportCanvas::Compact => PixelRect::new(0.0, 0.0, 800.0, 600.0),
        }
    }

    pub fn card_width(&self) -> f64 {
        match self {
            ExportCanvas::Standard => 100.0,
            ExportCanvas::Compact => 110.0,
        }
    }

    /// Top-left corner of a card on the canvas.
    pub fn card_origin(&self, position: FieldPosition) -> (f64, f64) {
        let pitch = self.pitch();
        match self {
            ExportCanvas::Standard => {
                let x = position.x / 100.0 * pitch.width - STANDARD_CARD_W / 2.0;
                let y = position.y / 100.0 * pitch.height - STANDARD_CARD_H / 2.0;
                let x = x.clamp(CARD_MARGIN, pitch.width - STANDARD_CARD_W - CARD_MARGIN);
                let y = y.clamp(CARD_MARGIN, pitch.height - STANDARD_CARD_H - CARD_MARGIN);
                (pitch.x + x, pitch.y + y)
            }
            ExportCanvas::Compact => {
                let half = self.card_width() / 2.0;
                (
                    position.x / 100.0 * pitch.width - half,
                    position.y / 100.0 * pitch.height - half,
                )
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportCanvas::Standard => "standard",
            ExportCanvas::Compact => "compact",
        }
    }
}

impl fmt::Display for ExportCanvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportCanvas {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(ExportCanvas::Standard),
            "compact" => Ok(ExportCanvas::Compact),
            other => Err(PlannerError::Config(format!(
                "unknown export canvas '{other}', expected standard or compact"
            ))),
        }
    }
}

// ============================================================================
// Standard canvas parts
// ============================================================================

pub const STANDARD_HEADER: PixelRect = PixelRect::new(0.0, 0.0, 1200.0, 90.0);
pub const STANDARD_FIELD_CONTAINER: PixelRect = PixelRect::new(50.0, 100.0, 1100.0, 640.0);
/// 900×600 pitch centred in the field container
pub const STANDARD_PITCH: PixelRect = PixelRect::new(150.0, 120.0, 900.0, 600.0);
pub const STANDARD_FOOTER: PixelRect = PixelRect::new(50.0, 725.0, 1100.0, 60.0);

const STANDARD_CARD_W: f64 = 100.0;
const STANDARD_CARD_H: f64 = 140.0;
const CARD_MARGIN: f64 = 10.0;

// ============================================================================
// Scene
// ============================================================================

/// A card as it will be drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneCard {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub image: CardImage,
    pub name: String,
}

/// Everything the rasterizer draws, already laid out.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportScene {
    pub canvas: ExportCanvas,
    pub formation: FormationName,
    pub cards: Vec<SceneCard>,
    /// "n/6" shown in the footer
    pub player_count: String,
    pub overall: Option<u32>,
}

impl ExportScene {
    pub fn build(canvas: ExportCanvas, formation: FormationName, cards: &[PlacedCard]) -> Self {
        let width = canvas.card_width();
        let scene_cards = cards
            .iter()
            .map(|card| {
                let (x, y) = canvas.card_origin(card.position);
                SceneCard {
                    x,
                    y,
                    width,
                    image: card.image.clone(),
                    name: card.display_name().to_string(),
                }
            })
            .collect();

        Self {
            canvas,
            formation,
            cards: scene_cards,
            player_count: player_count_label(cards.len()),
            overall: TeamRatings::from_cards(cards).summary().map(|s| s.overall),
        }
    }
}
