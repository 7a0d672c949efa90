//! Field board: card entities, placement state and drag/drop handling.

pub mod card;
pub mod drag;
pub mod field;
pub mod state;

use thiserror::Error;

pub use card::{CardId, CardImage, CardMetadata, PlacedCard, Substats, SUBSTITUTE_LABEL};
pub use drag::{DataTransfer, DragController, DragSource, DropOutcome};
pub use field::{FieldPosition, FieldRect};
pub use state::{FormationBoard, Placement};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BoardError {
    #[error("{name} is already on the field!")]
    DuplicatePlayer { name: String },

    #[error("No card {0} on the field")]
    UnknownCard(CardId),
}
