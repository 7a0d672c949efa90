//! # fp_core - Formation Board for Player Cards
//!
//! This library provides the board behind the card creator's formation page:
//! a six-a-side pitch that player cards are dragged onto, snapped into
//! formation slots and rated as a team.
//!
//! ## Features
//! - Five fixed formations with slot snapping on drop
//! - One card per player name on the field
//! - Team ratings recomputed on every change
//! - PNG export of the field on two canvas layouts
//! - Blocking client for the card generator service

// Clippy lints kept quiet for the drawing code
#![allow(clippy::too_many_arguments)]
#![allow(clippy::type_complexity)]

pub mod api;
pub mod app;
pub mod board;
pub mod config;
pub mod data_uri;
pub mod error;
pub mod export;
pub mod formation;
pub mod ratings;
pub mod storage;

// Re-export the board model
pub use board::{
    BoardError, CardId, CardImage, CardMetadata, DataTransfer, DragController, DropOutcome,
    FieldPosition, FieldRect, FormationBoard, PlacedCard, Substats,
};
pub use formation::{FormationName, FormationSlot, SlotSnapper, SnapOutcome, FIELD_CAPACITY};
pub use ratings::{RatingSummary, TeamRatings};

// Re-export the controller and its collaborators
pub use api::{ApiError, CardApi, CardEntry, CreateCardRequest, HttpCardApi};
pub use app::{KeyChord, PlannerApp, Shortcut, Sound, UiEffect};
pub use config::PlannerConfig;
pub use error::{PlannerError, Result};
pub use export::{ExportCanvas, ExportError, ExportedImage, FormationExporter};
pub use storage::{FileStore, KeyValueStore, MemoryStore, SavedFormation, StoreError};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errors_convert_into_planner_error() {
        let err: PlannerError = BoardError::DuplicatePlayer { name: "MESSI".into() }.into();
        assert_eq!(err.to_string(), "MESSI is already on the field!");
        assert!(err.is_recoverable());

        let err: PlannerError = "9-9-9".parse::<FormationName>().unwrap_err();
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_board_to_ratings() {
        let mut board = FormationBoard::new(FormationName::OneThreeOneOne);
        let meta = CardMetadata { name: "RONALDO".into(), overall: 99, pac: 91, ..Default::default() };
        board.place_card(CardImage::new("x"), Some(meta), FieldPosition::new(50.0, 21.0)).unwrap();

        let summary = *board.ratings().summary().unwrap();
        assert_eq!(summary.overall, 99);
        assert_eq!(summary.pace, 91);
        assert_eq!(summary.chemistry, 17);
    }

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
