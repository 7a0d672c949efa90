// Sidebar card list and its loading state
use tracing::{error, info};

use crate::api::{ApiError, CardEntry};
use crate::board::{CardImage, CardMetadata, FormationBoard};

/// Text shown in the sidebar when the card service cannot be reached.
pub const CONNECTION_ERROR: &str = "Connection Error: Make sure the server is running.";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SidebarStatus {
    #[default]
    Loading,
    Ready,
    /// The service answered but has no cards yet
    Empty,
    /// Offer a retry
    Error { message: String },
}

/// One draggable card in the sidebar.
#[derive(Debug, Clone, PartialEq)]
pub struct SidebarCard {
    pub image: CardImage,
    /// Metadata exactly as served, carried as JSON text in the drag payload
    pub metadata_json: Option<String>,
    pub filename: Option<String>,
    /// Set while this card's player stands on the field
    pub on_field: bool,
}

impl SidebarCard {
    pub fn from_entry(entry: CardEntry) -> Self {
        Self {
            metadata_json: entry.metadata_json(),
            image: entry.image_data,
            filename: entry.filename,
            on_field: false,
        }
    }

    pub fn metadata(&self) -> Option<CardMetadata> {
        self.metadata_json.as_deref().and_then(|raw| CardMetadata::from_json(raw).ok())
    }

    pub fn player_name(&self) -> Option<String> {
        self.metadata().and_then(|m| m.player_name().map(str::to_string))
    }
}

#[derive(Debug, Clone, Default)]
pub struct Sidebar {
    cards: Vec<SidebarCard>,
    status: SidebarStatus,
}

impl Sidebar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cards(&self) -> &[SidebarCard] {
        &self.cards
    }

    pub fn card(&self, index: usize) -> Option<&SidebarCard> {
        self.cards.get(index)
    }

    pub fn status(&self) -> &SidebarStatus {
        &self.status
    }

    pub fn begin_loading(&mut self) {
        self.status = SidebarStatus::Loading;
    }

    /// Replace the list with a fetch result.
    pub fn apply(&mut self, result: Result<Vec<CardEntry>, ApiError>, board: &FormationBoard) {
        match result {
            Ok(entries) if entries.is_empty() => {
                self.cards.clear();
                self.status = SidebarStatus::Empty;
            }
            Ok(entries) => {
                self.cards = entries.into_iter().map(SidebarCard::from_entry).collect();
                self.status = SidebarStatus::Ready;
                self.refresh(board);
                info!(count = self.cards.len(), "sidebar loaded");
            }
            Err(err) => {
                error!(%err, "error loading cards");
                self.cards.clear();
                self.status = SidebarStatus::Error { message: CONNECTION_ERROR.to_string() };
            }
        }
    }

    /// Recompute `on_field` for every card.
    pub fn refresh(&mut self, board: &FormationBoard) {
        for card in &mut self.cards {
            card.on_field = card.player_name().is_some_and(|name| board.is_player_on_field(&name));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::FieldPosition;

    fn entry(metadata: Option<serde_json::Value>) -> CardEntry {
        CardEntry {
            image_data: CardImage::new("data:image/png;base64,AA"),
            metadata,
            filename: None,
            timestamp: None,
        }
    }

    #[test]
    fn test_states() {
        let board = FormationBoard::default();
        let mut sidebar = Sidebar::new();
        assert_eq!(sidebar.status(), &SidebarStatus::Loading);

        sidebar.apply(Ok(vec![]), &board);
        assert_eq!(sidebar.status(), &SidebarStatus::Empty);

        sidebar.apply(Err(ApiError::Rejected("down".into())), &board);
        assert!(matches!(sidebar.status(), SidebarStatus::Error { .. }));

        sidebar.apply(Ok(vec![entry(None)]), &board);
        assert_eq!(sidebar.status(), &SidebarStatus::Ready);
        assert_eq!(sidebar.cards().len(), 1);
    }

    #[test]
    fn test_on_field_flags() {
        let mut board = FormationBoard::default();
        let mut sidebar = Sidebar::new();
        sidebar.apply(
            Ok(vec![
                entry(Some(serde_json::json!({"name": "SALAH", "overall": 90}))),
                entry(Some(serde_json::json!({"name": "MESSI", "overall": 94}))),
                entry(None),
            ]),
            &board,
        );
        assert!(sidebar.cards().iter().all(|c| !c.on_field));

        let salah = sidebar.card(0).unwrap();
        board
            .place_card(salah.image.clone(), salah.metadata(), FieldPosition::new(50.0, 20.0))
            .unwrap();
        sidebar.refresh(&board);

        let flags: Vec<bool> = sidebar.cards().iter().map(|c| c.on_field).collect();
        assert_eq!(flags, vec![true, false, false]);
    }
}
