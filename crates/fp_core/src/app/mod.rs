//! Formation planner controller
//!
//! `PlannerApp` owns everything the board page needs: the field, the drag
//! session, the sidebar list, the card service client, the store and the
//! export settings. Every user action is a `&mut self` method that returns
//! the UI effects it produced; nothing here is fatal.

pub mod shortcuts;
pub mod sidebar;

use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::api::CardApi;
use crate::board::{
    CardId, DataTransfer, DragController, DropOutcome, FieldPosition, FieldRect, FormationBoard,
};
use crate::config::PlannerConfig;
use crate::export::{ExportError, FormationExporter};
use crate::formation::FormationName;
use crate::ratings::TeamRatings;
use crate::storage::{self, KeyValueStore};

pub use shortcuts::{KeyChord, Shortcut};
pub use sidebar::{Sidebar, SidebarCard, SidebarStatus};

pub const RESET_PROMPT: &str = "Are you sure you want to reset the formation?";
pub const SAVED_MESSAGE: &str = "Formation saved successfully!";
pub const EXPORT_FAILED_MESSAGE: &str = "Error exporting formation. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sound {
    Drop,
    Remove,
    Hover,
    Success,
    Error,
}

/// Something the front end should show or play.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEffect {
    Sound(Sound),
    /// Blocking message box
    Alert(String),
    /// Short-lived notification
    Toast(String),
    /// Shake a sidebar card that cannot be dragged
    Shake { index: usize },
    RatingsChanged { ratings: TeamRatings, player_count: usize },
    SidebarChanged,
    Exported { path: PathBuf },
}

/// Yes/no prompt shown before destructive actions.
pub trait Confirm {
    fn confirm(&mut self, message: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, message: &str) -> bool {
        self(message)
    }
}

pub struct PlannerApp<A: CardApi, S: KeyValueStore> {
    config: PlannerConfig,
    board: FormationBoard,
    drag: DragController,
    /// Payload of the drag in progress
    transfer: Option<DataTransfer>,
    sidebar: Sidebar,
    api: A,
    store: S,
    exporter: FormationExporter,
}

impl<A: CardApi, S: KeyValueStore> PlannerApp<A, S> {
    pub fn new(config: PlannerConfig, api: A, store: S) -> Self {
        let exporter = FormationExporter::new(config.export_canvas, config.export_scale);
        Self {
            config,
            board: FormationBoard::default(),
            drag: DragController::new(),
            transfer: None,
            sidebar: Sidebar::new(),
            api,
            store,
            exporter,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn board(&self) -> &FormationBoard {
        &self.board
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    pub fn sidebar(&self) -> &Sidebar {
        &self.sidebar
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn ratings(&self) -> TeamRatings {
        self.board.ratings()
    }

    fn ratings_effect(&self) -> UiEffect {
        UiEffect::RatingsChanged { ratings: self.board.ratings(), player_count: self.board.len() }
    }

    /// Effects after any change to who is on the field.
    fn field_changed(&mut self, effects: &mut Vec<UiEffect>) {
        self.sidebar.refresh(&self.board);
        effects.push(self.ratings_effect());
        effects.push(UiEffect::SidebarChanged);
    }

    // ========================================================================
    // Board lifecycle
    // ========================================================================

    /// Clear the field and fill it with random stored players, one per slot.
    ///
    /// Only players with metadata are placed. A failed fetch leaves the field
    /// empty and is only logged.
    pub fn initialize(&mut self) -> Vec<UiEffect> {
        self.board.clear();
        self.drag.end();
        self.transfer = None;

        match self.api.random_players(self.config.random_player_count) {
            Ok(entries) => {
                let slots = self.board.formation().slots();
                let mut placed = 0;
                for (entry, slot) in entries.iter().zip(slots) {
                    let Some(meta) = entry.parsed_metadata() else {
                        continue;
                    };
                    match self.board.place_at(entry.image_data.clone(), Some(meta), slot.position()) {
                        Ok(_) => placed += 1,
                        Err(err) => debug!(%err, slot = slot.label, "skipping random player"),
                    }
                }
                info!(placed, "random players placed on field");
            }
            Err(err) => info!(%err, "could not load random players"),
        }

        let mut effects = Vec::new();
        self.field_changed(&mut effects);
        effects
    }

    /// Re-initialize after the user confirms.
    pub fn reset(&mut self, confirm: &mut dyn Confirm) -> Vec<UiEffect> {
        if confirm.confirm(RESET_PROMPT) {
            self.initialize()
        } else {
            Vec::new()
        }
    }

    /// Fetch the sidebar list. Also serves as retry after an error.
    pub fn load_player_cards(&mut self) -> Vec<UiEffect> {
        self.sidebar.begin_loading();
        let result = self.api.get_cards();
        self.sidebar.apply(result, &self.board);
        vec![UiEffect::SidebarChanged]
    }

    pub fn change_formation(&mut self, formation: FormationName) -> Vec<UiEffect> {
        self.board.set_formation(formation);
        let mut effects = vec![UiEffect::Sound(Sound::Success)];
        if !self.board.is_empty() {
            effects.push(UiEffect::Toast(format!("Players repositioned to {formation}!")));
        }
        effects
    }

    // ========================================================================
    // Drag and drop
    // ========================================================================

    pub fn begin_sidebar_drag(&mut self, index: usize) -> Vec<UiEffect> {
        let Some(card) = self.sidebar.card(index) else {
            warn!(index, "drag from unknown sidebar slot");
            return Vec::new();
        };

        match self.drag.begin_sidebar_drag(
            &self.board,
            index,
            &card.image,
            card.metadata_json.as_deref(),
        ) {
            Ok(transfer) => {
                self.transfer = Some(transfer);
                Vec::new()
            }
            Err(err) => {
                debug!(%err, index, "sidebar drag refused");
                vec![UiEffect::Shake { index }]
            }
        }
    }

    pub fn begin_field_drag(&mut self, card_id: CardId) -> Vec<UiEffect> {
        match self.drag.begin_field_drag(&self.board, card_id) {
            Ok(transfer) => self.transfer = Some(transfer),
            Err(err) => warn!(%err, "field drag refused"),
        }
        Vec::new()
    }

    /// Drop the drag in progress at a field position.
    pub fn drop_at(&mut self, position: FieldPosition) -> Vec<UiEffect> {
        let transfer = self.transfer.take().unwrap_or_default();
        self.drop_transfer(&transfer, position)
    }

    /// Drop at a pointer position, converting through the field's rectangle.
    pub fn drop_at_pointer(&mut self, rect: FieldRect, client_x: f64, client_y: f64) -> Vec<UiEffect> {
        match rect.to_field_position(client_x, client_y) {
            Some(position) => self.drop_at(position),
            None => {
                warn!("drop on a field with no size");
                self.end_drag();
                Vec::new()
            }
        }
    }

    /// Drop an arbitrary payload, for drags that did not start in this app.
    pub fn drop_transfer(&mut self, transfer: &DataTransfer, position: FieldPosition) -> Vec<UiEffect> {
        let outcome = self.drag.drop(&mut self.board, transfer, position);
        self.transfer = None;

        let mut effects = Vec::new();
        match outcome {
            DropOutcome::Ignored => {}
            DropOutcome::Repositioned { .. } => {
                effects.push(UiEffect::Sound(Sound::Success));
                effects.push(UiEffect::Toast("Player repositioned!".to_string()));
                effects.push(self.ratings_effect());
            }
            DropOutcome::Placed { .. } => {
                effects.push(UiEffect::Sound(Sound::Drop));
                self.field_changed(&mut effects);
            }
            DropOutcome::Rejected { name } => {
                effects.push(UiEffect::Sound(Sound::Error));
                effects.push(UiEffect::Alert(format!("{name} is already on the field!")));
            }
        }
        effects
    }

    /// Drag finished without a drop.
    pub fn end_drag(&mut self) {
        self.drag.end();
        self.transfer = None;
    }

    pub fn hover_card(&self, card_id: CardId) -> Vec<UiEffect> {
        if self.board.card(card_id).is_some() {
            vec![UiEffect::Sound(Sound::Hover)]
        } else {
            Vec::new()
        }
    }

    pub fn remove_card(&mut self, card_id: CardId) -> Vec<UiEffect> {
        if self.board.remove(card_id).is_none() {
            return Vec::new();
        }
        let mut effects = vec![UiEffect::Sound(Sound::Remove)];
        self.field_changed(&mut effects);
        effects
    }

    // ========================================================================
    // Save / export
    // ========================================================================

    pub fn save_formation(&mut self) -> Vec<UiEffect> {
        match storage::save_formation(&mut self.store, &self.board) {
            Ok(_) => vec![UiEffect::Sound(Sound::Success), UiEffect::Alert(SAVED_MESSAGE.to_string())],
            Err(err) => {
                warn!(%err, "saving formation failed");
                vec![UiEffect::Sound(Sound::Error), UiEffect::Alert(format!("Could not save formation: {err}"))]
            }
        }
    }

    /// Render the field and write the image to the export directory.
    pub fn export_formation(&mut self) -> Vec<UiEffect> {
        let mut effects = vec![UiEffect::Sound(Sound::Success)];

        let written = self
            .exporter
            .export_board(&self.board)
            .and_then(|image| image.write_to_dir(&self.config.export_dir));

        match written {
            Ok(path) => {
                effects.push(UiEffect::Toast("Formation image downloaded!".to_string()));
                effects.push(UiEffect::Exported { path });
            }
            Err(ExportError::NothingToExport) => {
                effects.push(UiEffect::Alert(ExportError::NothingToExport.to_string()));
            }
            Err(err) => {
                warn!(%err, "export failed");
                effects.push(UiEffect::Alert(EXPORT_FAILED_MESSAGE.to_string()));
            }
        }
        effects
    }

    // ========================================================================
    // Keyboard
    // ========================================================================

    pub fn handle_key(&mut self, chord: KeyChord, confirm: &mut dyn Confirm) -> Vec<UiEffect> {
        match Shortcut::from_chord(chord) {
            Some(Shortcut::Save) => self.save_formation(),
            Some(Shortcut::Reset) => self.reset(confirm),
            Some(Shortcut::ReloadCards) => self.load_player_cards(),
            Some(Shortcut::Export) => self.export_formation(),
            None => Vec::new(),
        }
    }
}
