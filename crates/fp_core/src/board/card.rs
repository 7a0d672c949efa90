// Player card data carried by the sidebar list and the field
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::field::FieldPosition;

/// Label shown for a card without metadata.
pub const SUBSTITUTE_LABEL: &str = "SUB";

/// Opaque identity of a card on the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardId(Uuid);

impl CardId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CardId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fifa_{}", self.0.simple())
    }
}

impl FromStr for CardId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let raw = raw.strip_prefix("fifa_").unwrap_or(raw);
        Uuid::parse_str(raw).map(CardId)
    }
}

/// Card artwork: a `data:` URI as served by the card API, or a URL/path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardImage(String);

impl CardImage {
    pub fn new(source: impl Into<String>) -> Self {
        Self(source.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_data_uri(&self) -> bool {
        self.0.starts_with("data:")
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The six face attributes printed on a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Substats {
    pub pace: u8,
    pub shooting: u8,
    pub passing: u8,
    pub dribbling: u8,
    pub defense: u8,
    pub physical: u8,
}

/// Player metadata as stored next to each generated card.
///
/// Field names follow the card API's JSON (`pac`, `sho`, `cardType`, ...).
/// Only `name` is needed to identify a player; everything else defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CardMetadata {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub overall: u8,
    #[serde(default)]
    pub pac: u8,
    #[serde(default)]
    pub sho: u8,
    #[serde(default)]
    pub pas: u8,
    #[serde(default)]
    pub dri: u8,
    #[serde(default)]
    pub def: u8,
    #[serde(default)]
    pub phy: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub club: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, rename = "cardType", skip_serializing_if = "Option::is_none")]
    pub card_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(default, rename = "hasImage", skip_serializing_if = "Option::is_none")]
    pub has_image: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl CardMetadata {
    pub fn substats(&self) -> Substats {
        Substats {
            pace: self.pac,
            shooting: self.sho,
            passing: self.pas,
            dribbling: self.dri,
            defense: self.def,
            physical: self.phy,
        }
    }

    /// Player name, or `None` when blank. Blank names never collide.
    pub fn player_name(&self) -> Option<&str> {
        let name = self.name.trim();
        (!name.is_empty()).then_some(name)
    }

    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// A card standing on the field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedCard {
    pub id: CardId,
    pub image: CardImage,
    /// `None` for a card dropped without readable metadata
    pub name: Option<String>,
    pub overall: u8,
    pub position_label: String,
    pub substats: Substats,
    pub position: FieldPosition,
    /// Metadata as dropped, with the snapped label applied
    pub metadata: Option<CardMetadata>,
}

impl PlacedCard {
    /// Build a card from an optional metadata record.
    ///
    /// Without metadata the card is anonymous: label `SUB`, every stat zero.
    pub fn new(image: CardImage, metadata: Option<CardMetadata>, position: FieldPosition) -> Self {
        match metadata {
            Some(meta) => {
                let position_label = if meta.position.trim().is_empty() {
                    SUBSTITUTE_LABEL.to_string()
                } else {
                    meta.position.clone()
                };
                Self {
                    id: CardId::new(),
                    image,
                    name: meta.player_name().map(str::to_string),
                    overall: meta.overall,
                    position_label,
                    substats: meta.substats(),
                    position,
                    metadata: Some(meta),
                }
            }
            None => Self {
                id: CardId::new(),
                image,
                name: None,
                overall: 0,
                position_label: SUBSTITUTE_LABEL.to_string(),
                substats: Substats::default(),
                position,
                metadata: None,
            },
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unknown")
    }

    /// Update the slot label, keeping the carried metadata in step.
    pub fn set_position_label(&mut self, label: &str) {
        self.position_label = label.to_string();
        if let Some(meta) = self.metadata.as_mut() {
            meta.position = label.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_wire_names() {
        let raw = r#"{
            "name": "SALAH", "position": "RW", "overall": 90,
            "pac": 93, "dri": 90, "sho": 87, "def": 45, "pas": 81, "phy": 75,
            "club": "10", "country": "eg", "cardType": "TOTY", "hasImage": false
        }"#;
        let meta = CardMetadata::from_json(raw).unwrap();
        assert_eq!(meta.player_name(), Some("SALAH"));
        assert_eq!(meta.card_type.as_deref(), Some("TOTY"));
        assert_eq!(
            meta.substats(),
            Substats {
                pace: 93,
                shooting: 87,
                passing: 81,
                dribbling: 90,
                defense: 45,
                physical: 75
            }
        );

        let back: serde_json::Value = serde_json::from_str(&meta.to_json().unwrap()).unwrap();
        assert_eq!(back["cardType"], "TOTY");
        assert_eq!(back["pac"], 93);
    }

    #[test]
    fn test_partial_metadata_defaults() {
        let meta = CardMetadata::from_json(r#"{"name": "MESSI"}"#).unwrap();
        assert_eq!(meta.overall, 0);
        assert_eq!(meta.substats(), Substats::default());
    }

    #[test]
    fn test_anonymous_card() {
        let card = PlacedCard::new(CardImage::new("data:,"), None, FieldPosition::new(10.0, 10.0));
        assert_eq!(card.name, None);
        assert_eq!(card.display_name(), "Unknown");
        assert_eq!(card.position_label, SUBSTITUTE_LABEL);
        assert_eq!(card.overall, 0);
        assert_eq!(card.substats, Substats::default());
    }

    #[test]
    fn test_blank_name_is_anonymous() {
        let meta = CardMetadata { name: "   ".to_string(), ..Default::default() };
        assert_eq!(meta.player_name(), None);
    }

    #[test]
    fn test_set_label_updates_metadata() {
        let meta = CardMetadata { name: "MESSI".into(), position: "RW".into(), ..Default::default() };
        let mut card = PlacedCard::new(CardImage::new("x"), Some(meta), FieldPosition::default());
        card.set_position_label("ST");
        assert_eq!(card.position_label, "ST");
        assert_eq!(card.metadata.unwrap().position, "ST");
    }

    #[test]
    fn test_card_id_parse() {
        let id = CardId::new();
        let text = id.to_string();
        assert!(text.starts_with("fifa_"));
        assert_eq!(text.parse::<CardId>().unwrap(), id);
        assert!("fifa_nope".parse::<CardId>().is_err());
    }
}
