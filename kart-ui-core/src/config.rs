//! UI configuration: timings, sizes, fonts and the color theme

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::color::Rgba;
use crate::error::ConfigError;
use crate::font::Font;
use crate::geometry::{Point, Size};

/// Background / foreground / hover / pressed-or-active colors of a widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetColors {
    pub background: Rgba,
    pub foreground: Rgba,
    pub highlight: Rgba,
    pub active: Rgba,
}

impl WidgetColors {
    pub const fn new(background: Rgba, foreground: Rgba, highlight: Rgba, active: Rgba) -> Self {
        Self {
            background,
            foreground,
            highlight,
            active,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    /// Wash drawn over the whole viewport while a modal is open
    pub modal_dim: Rgba,
    /// Default stack panel background
    pub panel_background: Rgba,
    pub text_box: WidgetColors,
    /// Text boxes restyled by `create_dialog`
    pub dialog_text_box: WidgetColors,
    pub dialog_ok: WidgetColors,
    pub dialog_cancel: WidgetColors,
    pub title: Rgba,
}

impl Default for Theme {
    fn default() -> Self {
        let faint = Rgba::WHITE.scaled(0.2);
        Self {
            modal_dim: Rgba::BLACK.scaled(0.5),
            panel_background: Rgba::BLACK.scaled(0.75),
            text_box: WidgetColors::new(
                Rgba::BLACK.scaled(0.75),
                Rgba::WHITE,
                Rgba::GRAY.scaled(0.75),
                Rgba::GRAY,
            ),
            dialog_text_box: WidgetColors::new(
                faint,
                Rgba::WHITE,
                Rgba::WHITE.scaled(0.5),
                Rgba::WHITE.scaled(0.6),
            ),
            dialog_ok: WidgetColors::new(
                faint,
                Rgba::WHITE,
                Rgba::GREEN.scaled(0.5),
                Rgba::GREEN.scaled(0.8),
            ),
            dialog_cancel: WidgetColors::new(
                faint,
                Rgba::WHITE,
                Rgba::RED.scaled(0.5),
                Rgba::RED.scaled(0.8),
            ),
            title: Rgba::WHITE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogConfig {
    pub ok_label: String,
    pub cancel_label: String,
    pub button_size: Size,
    /// Height given to text boxes restyled by `create_dialog`
    pub text_box_height: i32,
    /// Initial placement of the title, captured as its padding
    pub title_padding: Point,
    /// Placement of restyled text boxes, captured as their padding
    pub text_box_padding: Point,
    pub ok_padding: Point,
    pub cancel_padding: Point,
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            ok_label: "OK".into(),
            cancel_label: "Cancel".into(),
            button_size: Size::new(135, 35),
            text_box_height: 40,
            title_padding: Point::new(20, 20),
            text_box_padding: Point::new(10, 10),
            ok_padding: Point::new(0, 10),
            cancel_padding: Point::new(0, 5),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Caret visibility toggle interval
    #[serde(with = "duration_ms")]
    pub caret_blink: Duration,
    /// Hold interval gating repeated Backspace/Delete/arrow handling
    #[serde(with = "duration_ms")]
    pub key_repeat: Duration,
    /// Upper bound on a clipboard read
    #[serde(with = "duration_ms")]
    pub clipboard_timeout: Duration,
    pub default_font_size: f32,
    pub title_font: Font,
    pub notification_font: Font,
    pub notification_padding: Point,
    pub dialog: DialogConfig,
    pub theme: Theme,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            caret_blink: Duration::from_millis(700),
            key_repeat: Duration::from_millis(70),
            clipboard_timeout: Duration::from_millis(250),
            default_font_size: 12.0,
            title_font: Font::bold(14.0),
            notification_font: Font::bold(14.0),
            notification_padding: Point::new(30, 20),
            dialog: DialogConfig::default(),
            theme: Theme::default(),
        }
    }
}

impl UiConfig {
    /// Parse a JSON config; absent fields keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Apply the fields present in a JSON document on top of this config.
    ///
    /// Unlike [`from_json_str`](Self::from_json_str), absent fields keep
    /// this config's values rather than the defaults.
    pub fn overlay_json_str(&self, json: &str) -> Result<Self, ConfigError> {
        let mut merged = serde_json::to_value(self)?;
        let overrides: Value = serde_json::from_str(json)?;
        merge(&mut merged, overrides);
        Ok(serde_json::from_value(merged)?)
    }

    /// [`overlay_json_str`](Self::overlay_json_str) with a file's contents
    pub fn overlay_file(&self, path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        self.overlay_json_str(&text)
    }
}

fn merge(base: &mut Value, overrides: Value) {
    match (base, overrides) {
        (Value::Object(base), Value::Object(overrides)) => {
            for (key, value) in overrides {
                merge(base.entry(key).or_insert(Value::Null), value);
            }
        }
        (base, value) => *base = value,
    }
}

/// Durations as integer milliseconds
mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = UiConfig::default();
        assert_eq!(config.caret_blink, Duration::from_millis(700));
        assert_eq!(config.key_repeat, Duration::from_millis(70));
        assert_eq!(config.dialog.button_size, Size::new(135, 35));
        assert_eq!(config.dialog.ok_label, "OK");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            UiConfig::from_json_str(r##"{ "caret_blink": 500, "dialog": { "ok_label": "Yes" } }"##)
                .unwrap();
        assert_eq!(config.caret_blink, Duration::from_millis(500));
        assert_eq!(config.key_repeat, Duration::from_millis(70));
        assert_eq!(config.dialog.ok_label, "Yes");
        assert_eq!(config.dialog.cancel_label, "Cancel");
    }

    #[test]
    fn test_theme_colors_from_hex() {
        let config =
            UiConfig::from_json_str(r##"{ "theme": { "modal_dim": "#00000040" } }"##).unwrap();
        assert_eq!(config.theme.modal_dim, Rgba::new(0, 0, 0, 0x40));
        assert_eq!(config.theme.panel_background, Theme::default().panel_background);
    }

    #[test]
    fn test_round_trip_json() {
        let config = UiConfig::default();
        let json = config.to_json_pretty().unwrap();
        assert_eq!(UiConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_overlay_keeps_base_values() {
        let mut base = UiConfig::default();
        base.dialog.button_size = Size::new(10, 1);
        base.dialog.text_box_height = 1;

        let config = base
            .overlay_json_str(r#"{ "dialog": { "cancel_label": "Back" }, "key_repeat": 50 }"#)
            .unwrap();
        assert_eq!(config.dialog.button_size, Size::new(10, 1));
        assert_eq!(config.dialog.text_box_height, 1);
        assert_eq!(config.dialog.cancel_label, "Back");
        assert_eq!(config.key_repeat, Duration::from_millis(50));
    }

    #[test]
    fn test_overlay_rejects_bad_values() {
        let err = UiConfig::default()
            .overlay_json_str(r#"{ "caret_blink": "slow" }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let err = UiConfig::from_json_str("{ caret_blink: }").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
