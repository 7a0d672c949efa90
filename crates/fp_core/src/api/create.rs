//! Card creation request
//!
//! What the card creator form submits to `create-card`, plus the checks the
//! form runs before sending and the three built-in presets.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest name that fits on the card face.
pub const MAX_NAME_LEN: usize = 12;

/// Largest accepted player photo.
pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

pub const ACCEPTED_IMAGE_TYPES: [&str; 4] = ["image/png", "image/jpeg", "image/jpg", "image/webp"];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CardValidationError {
    #[error("Name must be 1 to {MAX_NAME_LEN} characters")]
    BadName,

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("{stat} must be between 0 and 99 (got {value})")]
    StatOutOfRange { stat: &'static str, value: i32 },

    #[error("Unsupported image type {0}, use PNG, JPG or WEBP")]
    UnsupportedImageType(String),

    #[error("Image is {0} bytes, the limit is 5 MB")]
    ImageTooLarge(u64),
}

/// Body of `POST create-card`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCardRequest {
    pub name: String,
    pub position: String,
    pub club: String,
    pub country: String,
    pub overall: i32,
    pub pac: i32,
    pub dri: i32,
    pub sho: i32,
    pub def: i32,
    pub pas: i32,
    pub phy: i32,
    #[serde(rename = "cardType")]
    pub card_type: String,
    /// Player photo as a data URI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl CreateCardRequest {
    /// Uppercase the name the way the form does before submitting.
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_uppercase();
        self
    }

    pub fn validate(&self) -> Result<(), CardValidationError> {
        let name_len = self.name.chars().count();
        if name_len == 0 || name_len > MAX_NAME_LEN {
            return Err(CardValidationError::BadName);
        }

        for (field, value) in [
            ("position", &self.position),
            ("club", &self.club),
            ("country", &self.country),
            ("cardType", &self.card_type),
        ] {
            if value.trim().is_empty() {
                return Err(CardValidationError::MissingField(field));
            }
        }

        for (stat, value) in self.stats() {
            if !(0..=99).contains(&value) {
                return Err(CardValidationError::StatOutOfRange { stat, value });
            }
        }
        Ok(())
    }

    fn stats(&self) -> [(&'static str, i32); 7] {
        [
            ("overall", self.overall),
            ("pac", self.pac),
            ("dri", self.dri),
            ("sho", self.sho),
            ("def", self.def),
            ("pas", self.pas),
            ("phy", self.phy),
        ]
    }
}

/// Check a photo before it is attached to a request.
pub fn validate_upload(mime_type: &str, size_bytes: u64) -> Result<(), CardValidationError> {
    if !ACCEPTED_IMAGE_TYPES.contains(&mime_type) {
        return Err(CardValidationError::UnsupportedImageType(mime_type.to_string()));
    }
    if size_bytes > MAX_UPLOAD_BYTES {
        return Err(CardValidationError::ImageTooLarge(size_bytes));
    }
    Ok(())
}

/// Colour of a stat slider for a value.
pub fn stat_color(value: i32) -> &'static str {
    match value {
        v if v >= 80 => "#4cd137",
        v if v >= 70 => "#fbc531",
        v if v >= 60 => "#e67e22",
        _ => "#e84118",
    }
}

// ============================================================================
// Presets
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Salah,
    Ronaldo,
    Messi,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Salah, Preset::Ronaldo, Preset::Messi];

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "salah" => Some(Preset::Salah),
            "ronaldo" => Some(Preset::Ronaldo),
            "messi" => Some(Preset::Messi),
            _ => None,
        }
    }

    pub fn request(&self) -> CreateCardRequest {
        let (name, position, club, country, overall, [pac, dri, sho, def, pas, phy], card_type) =
            match self {
                Preset::Salah => ("SALAH", "RW", "10", "eg", 90, [93, 90, 87, 45, 81, 75], "TOTY"),
                Preset::Ronaldo => {
                    ("RONALDO", "ST", "112883", "pt", 99, [91, 89, 95, 35, 82, 78], "ICON")
                }
                Preset::Messi => ("MESSI", "RW", "241", "ar", 94, [92, 95, 88, 24, 86, 62], "TOTY"),
            };
        CreateCardRequest {
            name: name.to_string(),
            position: position.to_string(),
            club: club.to_string(),
            country: country.to_string(),
            overall,
            pac,
            dri,
            sho,
            def,
            pas,
            phy,
            card_type: card_type.to_string(),
            image: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        for preset in Preset::ALL {
            assert_eq!(preset.request().validate(), Ok(()), "{preset:?}");
        }
        let ronaldo = Preset::Ronaldo.request();
        assert_eq!(ronaldo.overall, 99);
        assert_eq!(ronaldo.sho, 95);
        assert_eq!(ronaldo.card_type, "ICON");
    }

    #[test]
    fn test_wire_names() {
        let json = serde_json::to_value(Preset::Salah.request()).unwrap();
        assert_eq!(json["cardType"], "TOTY");
        assert_eq!(json["def"], 45);
        assert!(json.get("image").is_none());
    }

    #[test]
    fn test_name_rules() {
        let mut req = Preset::Messi.request();
        req.name = "  lionel andres ".to_string();
        let req = req.normalized();
        assert_eq!(req.name, "LIONEL ANDRES");
        assert_eq!(req.validate(), Err(CardValidationError::BadName));

        let mut req = Preset::Messi.request();
        req.name = "ABCDEFGHIJKL".to_string();
        assert!(req.validate().is_ok());
        req.name.clear();
        assert_eq!(req.validate(), Err(CardValidationError::BadName));
    }

    #[test]
    fn test_stat_range() {
        let mut req = Preset::Salah.request();
        req.phy = 100;
        assert_eq!(
            req.validate(),
            Err(CardValidationError::StatOutOfRange { stat: "phy", value: 100 })
        );
        req.phy = -1;
        assert!(req.validate().is_err());
        req.phy = 0;
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_missing_text_field() {
        let mut req = Preset::Salah.request();
        req.club = " ".to_string();
        assert_eq!(req.validate(), Err(CardValidationError::MissingField("club")));
    }

    #[test]
    fn test_upload_rules() {
        assert!(validate_upload("image/webp", 1024).is_ok());
        assert!(validate_upload("image/jpg", MAX_UPLOAD_BYTES).is_ok());
        assert!(matches!(
            validate_upload("image/gif", 10),
            Err(CardValidationError::UnsupportedImageType(_))
        ));
        assert_eq!(
            validate_upload("image/png", MAX_UPLOAD_BYTES + 1),
            Err(CardValidationError::ImageTooLarge(MAX_UPLOAD_BYTES + 1))
        );
    }

    #[test]
    fn test_stat_colors() {
        assert_eq!(stat_color(99), "#4cd137");
        assert_eq!(stat_color(80), "#4cd137");
        assert_eq!(stat_color(79), "#fbc531");
        assert_eq!(stat_color(60), "#e67e22");
        assert_eq!(stat_color(59), "#e84118");
    }

    #[test]
    fn test_preset_lookup() {
        assert_eq!(Preset::from_name(" Messi "), Some(Preset::Messi));
        assert_eq!(Preset::from_name("pele"), None);
    }
}
