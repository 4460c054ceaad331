//! Key names and chords
//!
//! Widgets work with held-key lists where modifiers are keys in their own
//! right (`KeyCode::Modifier`). These helpers build such lists from chord
//! strings like `"ctrl+v"` and from crossterm modifier flags.

use crossterm::event::{KeyCode, KeyModifiers, ModifierKeyCode};

/// Parse a single key name (`"a"`, `"enter"`, `"space"`, `"lshift"`, ...)
pub fn parse_key_name(name: &str) -> Option<KeyCode> {
    let name = name.trim().to_lowercase();
    let code = match name.as_str() {
        "" => return None,
        "esc" | "escape" => KeyCode::Esc,
        "enter" | "return" => KeyCode::Enter,
        "tab" => KeyCode::Tab,
        "backspace" => KeyCode::Backspace,
        "delete" | "del" => KeyCode::Delete,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "space" => KeyCode::Char(' '),
        "period" => KeyCode::Char('.'),
        "shift" | "lshift" => KeyCode::Modifier(ModifierKeyCode::LeftShift),
        "rshift" => KeyCode::Modifier(ModifierKeyCode::RightShift),
        "ctrl" | "control" | "lctrl" => KeyCode::Modifier(ModifierKeyCode::LeftControl),
        "rctrl" => KeyCode::Modifier(ModifierKeyCode::RightControl),
        "alt" | "lalt" => KeyCode::Modifier(ModifierKeyCode::LeftAlt),
        "ralt" => KeyCode::Modifier(ModifierKeyCode::RightAlt),
        other => {
            if let Some(n) = other.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
                if (1..=12).contains(&n) {
                    return Some(KeyCode::F(n));
                }
            }
            let mut chars = other.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => return None,
            }
        }
    };
    Some(code)
}

/// Parse a chord such as `"ctrl+shift+v"` into the keys held for it, in
/// order.
pub fn parse_chord(chord: &str) -> Option<Vec<KeyCode>> {
    let chord = chord.trim();
    if chord.is_empty() {
        return None;
    }
    // a bare "+" is the plus key
    if chord == "+" {
        return Some(vec![KeyCode::Char('+')]);
    }
    chord.split('+').map(parse_key_name).collect()
}

/// Modifier keys implied by crossterm's modifier flags
pub fn modifier_keys(modifiers: KeyModifiers) -> Vec<KeyCode> {
    let mut keys = Vec::new();
    if modifiers.contains(KeyModifiers::CONTROL) {
        keys.push(KeyCode::Modifier(ModifierKeyCode::LeftControl));
    }
    if modifiers.contains(KeyModifiers::SHIFT) {
        keys.push(KeyCode::Modifier(ModifierKeyCode::LeftShift));
    }
    if modifiers.contains(KeyModifiers::ALT) {
        keys.push(KeyCode::Modifier(ModifierKeyCode::LeftAlt));
    }
    keys
}

/// Human readable key name
pub fn format_key(key: KeyCode) -> String {
    match key {
        KeyCode::Char(' ') => "Space".into(),
        KeyCode::Char(c) => c.to_uppercase().to_string(),
        KeyCode::Modifier(ModifierKeyCode::LeftControl | ModifierKeyCode::RightControl) => {
            "Ctrl".into()
        }
        KeyCode::Modifier(ModifierKeyCode::LeftShift | ModifierKeyCode::RightShift) => {
            "Shift".into()
        }
        KeyCode::Modifier(ModifierKeyCode::LeftAlt | ModifierKeyCode::RightAlt) => "Alt".into(),
        KeyCode::Esc => "Esc".into(),
        KeyCode::Enter => "Enter".into(),
        KeyCode::Backspace => "Backspace".into(),
        KeyCode::Delete => "Del".into(),
        KeyCode::F(n) => format!("F{}", n),
        other => format!("{:?}", other),
    }
}

/// Format a held-key list as `Ctrl+V`
pub fn format_chord(keys: &[KeyCode]) -> String {
    keys.iter()
        .map(|k| format_key(*k))
        .collect::<Vec<_>>()
        .join("+")
}
