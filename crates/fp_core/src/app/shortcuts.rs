use std::fmt;
use std::str::FromStr;

/// A key press with its Ctrl state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyChord {
    pub ctrl: bool,
    pub key: char,
}

impl KeyChord {
    pub fn ctrl(key: char) -> Self {
        Self { ctrl: true, key }
    }

    pub fn plain(key: char) -> Self {
        Self { ctrl: false, key }
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl {
            write!(f, "ctrl+{}", self.key)
        } else {
            write!(f, "{}", self.key)
        }
    }
}

impl FromStr for KeyChord {
    type Err = String;

    /// Parses `ctrl+s`, `Ctrl+S` or a bare key like `s`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (ctrl, key) = match s.split_once('+') {
            Some((modifier, key)) if modifier.eq_ignore_ascii_case("ctrl") => (true, key),
            Some(_) => return Err(format!("unsupported modifier in '{s}'")),
            None => (false, s),
        };
        let mut chars = key.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(Self { ctrl, key: c }),
            _ => Err(format!("expected a single key in '{s}'")),
        }
    }
}

/// Board actions bound to Ctrl shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    Save,
    Reset,
    ReloadCards,
    Export,
}

impl Shortcut {
    /// Ctrl is required; the letter is case-insensitive.
    pub fn from_chord(chord: KeyChord) -> Option<Self> {
        if !chord.ctrl {
            return None;
        }
        match chord.key.to_ascii_lowercase() {
            's' => Some(Shortcut::Save),
            'r' => Some(Shortcut::Reset),
            'l' => Some(Shortcut::ReloadCards),
            'e' => Some(Shortcut::Export),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bindings() {
        assert_eq!(Shortcut::from_chord(KeyChord::ctrl('s')), Some(Shortcut::Save));
        assert_eq!(Shortcut::from_chord(KeyChord::ctrl('R')), Some(Shortcut::Reset));
        assert_eq!(Shortcut::from_chord(KeyChord::ctrl('l')), Some(Shortcut::ReloadCards));
        assert_eq!(Shortcut::from_chord(KeyChord::ctrl('E')), Some(Shortcut::Export));
    }

    #[test]
    fn test_ctrl_required() {
        assert_eq!(Shortcut::from_chord(KeyChord::plain('s')), None);
        assert_eq!(Shortcut::from_chord(KeyChord::ctrl('x')), None);
    }

    #[test]
    fn test_parse_chord() {
        assert_eq!("Ctrl+S".parse::<KeyChord>().unwrap(), KeyChord::ctrl('S'));
        assert_eq!("e".parse::<KeyChord>().unwrap(), KeyChord::plain('e'));
        assert!("alt+s".parse::<KeyChord>().is_err());
        assert!("ctrl+ss".parse::<KeyChord>().is_err());
        assert_eq!(KeyChord::ctrl('s').to_string(), "ctrl+s");
    }
}
