//! Full board session against a scripted card service.

use std::cell::RefCell;

use fp_core::api::{CardEntry, CreatedCard, HealthResponse};
use fp_core::app::SidebarStatus;
use fp_core::data_uri::DataUri;
use fp_core::storage::{load_saved_formation, STORAGE_KEY};
use fp_core::{
    ApiError, CardApi, CardImage, CreateCardRequest, FieldPosition, FieldRect, FormationName,
    KeyChord, KeyValueStore, MemoryStore, PlannerApp, PlannerConfig, Sound, TeamRatings,
    UiEffect,
};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;
use tempfile::TempDir;

/// Card service double: fixed card list, optional outage, records calls.
struct ScriptedApi {
    cards: Vec<CardEntry>,
    offline: RefCell<bool>,
    calls: RefCell<Vec<String>>,
}

impl ScriptedApi {
    fn new(cards: Vec<CardEntry>) -> Self {
        Self { cards, offline: RefCell::new(false), calls: RefCell::new(Vec::new()) }
    }

    fn check(&self, call: &str) -> Result<(), ApiError> {
        self.calls.borrow_mut().push(call.to_string());
        if *self.offline.borrow() {
            Err(ApiError::Status { status: 503, message: "unavailable".into() })
        } else {
            Ok(())
        }
    }
}

impl CardApi for ScriptedApi {
    fn get_cards(&self) -> Result<Vec<CardEntry>, ApiError> {
        self.check("get-cards")?;
        Ok(self.cards.clone())
    }

    fn random_players(&self, count: usize) -> Result<Vec<CardEntry>, ApiError> {
        self.check(&format!("random-players?count={count}"))?;
        Ok(self.cards.iter().rev().take(count).cloned().collect())
    }

    fn create_card(&self, request: &CreateCardRequest) -> Result<CreatedCard, ApiError> {
        self.check("create-card")?;
        request.validate()?;
        Ok(CreatedCard { image: card_art(), filename: format!("web_{}.png", request.name) })
    }

    fn health(&self) -> Result<HealthResponse, ApiError> {
        self.check("health")?;
        Ok(HealthResponse { success: true, message: "ok".into(), version: "1.0.0".into() })
    }
}

fn card_art() -> CardImage {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(20, 28, Rgba([200, 160, 40, 255])))
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    CardImage::new(DataUri::encode("image/png", &bytes))
}

fn entry(name: &str, overall: u8, stat: u8) -> CardEntry {
    CardEntry {
        image_data: card_art(),
        metadata: Some(serde_json::json!({
            "name": name, "position": "CM", "overall": overall,
            "pac": stat, "sho": stat, "pas": stat, "dri": stat, "def": stat, "phy": stat,
            "cardType": "GOLD"
        })),
        filename: Some(format!("web_{name}.png")),
        timestamp: None,
    }
}

fn squad() -> Vec<CardEntry> {
    vec![
        entry("KEEPER", 80, 80),
        entry("LEFT", 80, 80),
        entry("RIGHT", 80, 80),
        entry("MID", 80, 80),
        entry("WIDE", 80, 80),
        entry("NINE", 80, 80),
        entry("BENCH", 70, 70),
    ]
}

fn planner(dir: &TempDir) -> PlannerApp<ScriptedApi, MemoryStore> {
    let config = PlannerConfig {
        export_dir: dir.path().to_path_buf(),
        export_scale: 1,
        ..Default::default()
    };
    PlannerApp::new(config, ScriptedApi::new(squad()), MemoryStore::new())
}

fn rect() -> FieldRect {
    FieldRect::new(0.0, 0.0, 1000.0, 1000.0)
}

#[test]
fn test_fill_the_field_from_the_sidebar() {
    let dir = TempDir::new().unwrap();
    let mut app = planner(&dir);

    app.load_player_cards();
    assert_eq!(app.sidebar().status(), &SidebarStatus::Ready);
    assert_eq!(app.sidebar().cards().len(), 7);

    // Drop each of the first six cards near a different slot.
    let slots = app.board().formation().slots();
    for (index, slot) in slots.iter().enumerate() {
        app.begin_sidebar_drag(index);
        let effects = app.drop_at_pointer(rect(), slot.x * 10.0 + 30.0, slot.y * 10.0 - 30.0);
        assert_eq!(effects[0], UiEffect::Sound(Sound::Drop), "slot {}", slot.label);
    }

    let board = app.board();
    assert_eq!(board.len(), 6);
    for (card, slot) in board.cards().iter().zip(slots) {
        assert_eq!(card.position, slot.position());
        assert_eq!(card.position_label, slot.label);
    }

    let summary = *app.ratings().summary().unwrap();
    assert_eq!(summary.overall, 80);
    assert_eq!(summary.chemistry, 100);
    assert_eq!(fp_core::ratings::player_count_label(app.board().len()), "6/6");

    // Seventh card has nowhere to snap; it lands where it was dropped.
    app.begin_sidebar_drag(6);
    app.drop_at(FieldPosition::new(5.0, 95.0));
    let bench = app.board().cards().last().unwrap();
    assert_eq!(bench.position, FieldPosition::new(5.0, 95.0));
    assert_eq!(bench.position_label, "CM");
    assert!(app.sidebar().cards().iter().all(|c| c.on_field));
}

#[test]
fn test_duplicate_drop_is_rejected_with_alert() {
    let dir = TempDir::new().unwrap();
    let mut app = planner(&dir);
    app.load_player_cards();

    app.begin_sidebar_drag(0);
    app.drop_at(FieldPosition::new(50.0, 72.0));

    // Bypass the drag guard by dropping a raw payload for the same player.
    let mut transfer = fp_core::DataTransfer::new();
    transfer.set_data("cardImage", card_art().as_str());
    transfer.set_data("metadata", r#"{"name":"KEEPER","overall":80}"#);
    let effects = app.drop_transfer(&transfer, FieldPosition::new(25.0, 55.0));

    assert_eq!(
        effects,
        vec![
            UiEffect::Sound(Sound::Error),
            UiEffect::Alert("KEEPER is already on the field!".into())
        ]
    );
    assert_eq!(app.board().len(), 1);
}

#[test]
fn test_formation_switch_save_and_export() {
    let dir = TempDir::new().unwrap();
    let mut app = planner(&dir);

    app.initialize();
    assert_eq!(app.board().len(), 6);
    assert!(app.api().calls.borrow().contains(&"random-players?count=6".to_string()));

    let effects = app.change_formation(FormationName::OneOneTwoTwo);
    assert!(effects.contains(&UiEffect::Toast("Players repositioned to 1-1-2-2!".into())));
    let slots = FormationName::OneOneTwoTwo.slots();
    for (card, slot) in app.board().cards().iter().zip(slots) {
        assert_eq!(card.position, slot.position());
    }

    let mut never = |_: &str| -> bool { panic!("save must not ask") };
    app.handle_key(KeyChord::ctrl('s'), &mut never);
    let saved = load_saved_formation(app.store()).unwrap();
    assert_eq!(saved.formation, FormationName::OneOneTwoTwo);
    assert_eq!(saved.players.len(), 6);
    assert!(app.store().get(STORAGE_KEY).unwrap().unwrap().contains("\"timestamp\""));

    let effects = app.export_formation();
    let path = effects
        .iter()
        .find_map(|e| match e {
            UiEffect::Exported { path } => Some(path.clone()),
            _ => None,
        })
        .expect("export should write a file");
    let name = path.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("FIFA-Formation-1-1-2-2-"), "{name}");
    assert!(name.ends_with(".png"));

    let png = image::open(&path).unwrap();
    assert_eq!((png.width(), png.height()), (1200, 800));
}

#[test]
fn test_outage_shows_error_then_retry_recovers() {
    let dir = TempDir::new().unwrap();
    let mut app = planner(&dir);

    *app.api().offline.borrow_mut() = true;
    app.load_player_cards();
    assert!(matches!(app.sidebar().status(), SidebarStatus::Error { .. }));

    let effects = app.initialize();
    assert!(app.board().is_empty());
    assert!(effects.contains(&UiEffect::RatingsChanged { ratings: TeamRatings::Empty, player_count: 0 }));

    *app.api().offline.borrow_mut() = false;
    let mut no = |_: &str| false;
    app.handle_key(KeyChord::ctrl('L'), &mut no);
    assert_eq!(app.sidebar().status(), &SidebarStatus::Ready);
}

#[test]
fn test_repositioning_onto_taken_slot_stays_free() {
    let dir = TempDir::new().unwrap();
    let mut app = planner(&dir);
    app.load_player_cards();

    app.begin_sidebar_drag(0);
    app.drop_at(FieldPosition::new(50.0, 20.0));
    app.begin_sidebar_drag(1);
    app.drop_at(FieldPosition::new(50.0, 72.0));

    let keeper = app.board().cards()[1].id;
    app.begin_field_drag(keeper);
    let effects = app.drop_at(FieldPosition::new(51.0, 22.0));
    assert!(effects.contains(&UiEffect::Toast("Player repositioned!".into())));

    let card = app.board().card(keeper).unwrap();
    assert_eq!(card.position, FieldPosition::new(51.0, 22.0));
    assert_eq!(card.position_label, "GK");
}
