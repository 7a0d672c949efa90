// Text rendering of board state and effects
use fp_core::app::{Sidebar, SidebarStatus};
use fp_core::ratings::player_count_label;
use fp_core::{FormationBoard, FormationName, Sound, TeamRatings, UiEffect};

pub fn describe_effect(effect: &UiEffect) -> String {
    match effect {
        UiEffect::Sound(sound) => format!("🔊 {}", sound_name(*sound)),
        UiEffect::Alert(message) => format!("⚠️  {message}"),
        UiEffect::Toast(message) => format!("💬 {message}"),
        UiEffect::Shake { index } => format!("📳 sidebar card #{index} is already on the field"),
        UiEffect::RatingsChanged { ratings, player_count } => {
            format!("📊 {}", ratings_line(ratings, *player_count))
        }
        UiEffect::SidebarChanged => "📋 sidebar updated".to_string(),
        UiEffect::Exported { path } => format!("🖼️  saved {}", path.display()),
    }
}

fn sound_name(sound: Sound) -> &'static str {
    match sound {
        Sound::Drop => "drop",
        Sound::Remove => "remove",
        Sound::Hover => "hover",
        Sound::Success => "success",
        Sound::Error => "error",
    }
}

/// One line in panel order, `--` for every metric when nothing is rated.
pub fn ratings_line(ratings: &TeamRatings, player_count: usize) -> String {
    let [overall, attack, defense, midfield, pace, chemistry] = ratings.display_values();
    format!(
        "OVR {overall} | ATT {attack} | DEF {defense} | MID {midfield} | PAC {pace} | CHEM {chemistry} | Players {}",
        player_count_label(player_count)
    )
}

pub fn board_lines(board: &FormationBoard) -> Vec<String> {
    let mut lines = vec![format!("Formation {} ({} on field)", board.formation(), board.len())];
    for (index, card) in board.cards().iter().enumerate() {
        lines.push(format!(
            "  #{index} {:<4} {:<12} {:>3}  ({:.1}, {:.1})",
            card.position_label,
            card.display_name(),
            card.overall,
            card.position.x,
            card.position.y
        ));
    }
    lines
}

pub fn sidebar_lines(sidebar: &Sidebar) -> Vec<String> {
    match sidebar.status() {
        SidebarStatus::Loading => vec!["Loading cards...".to_string()],
        SidebarStatus::Empty => vec!["No cards available yet. Create some cards first.".to_string()],
        SidebarStatus::Error { message } => vec![format!("❌ {message}")],
        SidebarStatus::Ready => sidebar
            .cards()
            .iter()
            .enumerate()
            .map(|(index, card)| {
                let meta = card.metadata();
                let name = card.player_name().unwrap_or_else(|| "Unknown".to_string());
                let overall = meta.as_ref().map(|m| m.overall).unwrap_or(0);
                let position = meta.map(|m| m.position).unwrap_or_default();
                let marker = if card.on_field { " (on field)" } else { "" };
                format!("  [{index}] {name:<12} {position:<4} {overall:>3}{marker}")
            })
            .collect(),
    }
}

pub fn formation_lines(formation: FormationName) -> Vec<String> {
    let mut lines = vec![format!("{formation}")];
    for slot in formation.slots() {
        lines.push(format!(
            "  {:<4} ({:>4.1}, {:>4.1})  {} {}",
            slot.label, slot.x, slot.y, slot.default_name, slot.default_rating
        ));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use fp_core::{CardImage, CardMetadata, FieldPosition};

    #[test]
    fn test_empty_ratings_show_placeholders() {
        let line = ratings_line(&TeamRatings::Empty, 0);
        assert_eq!(
            line,
            "OVR -- | ATT -- | DEF -- | MID -- | PAC -- | CHEM -- | Players 0/6"
        );
    }

    #[test]
    fn test_board_lines_list_cards_in_order() {
        let mut board = FormationBoard::new(FormationName::OneTwoTwoOne);
        let meta = CardMetadata { name: "SALAH".into(), position: "RW".into(), overall: 90, ..Default::default() };
        board.place_card(CardImage::new("x"), Some(meta), FieldPosition::new(50.0, 72.0)).unwrap();

        let lines = board_lines(&board);
        assert_eq!(lines[0], "Formation 1-2-2-1 (1 on field)");
        assert!(lines[1].contains("SALAH"), "{}", lines[1]);
        assert!(lines[1].contains("GK"), "{}", lines[1]);
    }

    #[test]
    fn test_formation_lines_cover_every_slot() {
        for formation in FormationName::ALL {
            assert_eq!(formation_lines(formation).len(), formation.slots().len() + 1);
        }
    }

    #[test]
    fn test_effect_text() {
        assert_eq!(describe_effect(&UiEffect::Sound(Sound::Drop)), "🔊 drop");
        assert_eq!(
            describe_effect(&UiEffect::Toast("Player repositioned!".into())),
            "💬 Player repositioned!"
        );
    }
}
