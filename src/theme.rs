//! Light and dark palettes shared by the widgets

use clap::ValueEnum;
use ratatui::style::Color;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

/// Theme colors for the UI
#[derive(Debug, Clone)]
pub struct Theme {
    pub accent: Color,       // Focused borders, sort markers, spinner
    pub danger: Color,       // Invalid borders and error text
    pub text: Color,         // Primary text
    pub text_dim: Color,     // Placeholders, helper text, disabled fields
    pub bg: Color,           // Page background
    pub bg_field: Color,     // Filled input background
    pub bg_selected: Color,  // Checked rows
    pub bg_cursor: Color,    // Keyboard cursor row
    pub inactive: Color,     // Unfocused borders
    pub header: Color,       // Table header text
}

impl Default for Theme {
    fn default() -> Self {
        Self::for_mode(ThemeMode::default())
    }
}

impl Theme {
    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Light => Self {
                accent: Color::Rgb(37, 99, 235),
                danger: Color::Rgb(220, 38, 38),
                text: Color::Rgb(31, 41, 55),
                text_dim: Color::Rgb(107, 114, 128),
                bg: Color::Rgb(243, 244, 246),
                bg_field: Color::Rgb(229, 231, 235),
                bg_selected: Color::Rgb(219, 234, 254),
                bg_cursor: Color::Rgb(209, 213, 219),
                inactive: Color::Rgb(156, 163, 175),
                header: Color::Rgb(55, 65, 81),
            },
            // Catppuccin-inspired
            ThemeMode::Dark => Self {
                accent: Color::Rgb(137, 180, 250),
                danger: Color::Rgb(243, 139, 168),
                text: Color::Rgb(205, 214, 244),
                text_dim: Color::Rgb(147, 153, 178),
                bg: Color::Rgb(30, 30, 46),
                bg_field: Color::Rgb(49, 50, 68),
                bg_selected: Color::Rgb(69, 71, 90),
                bg_cursor: Color::Rgb(88, 91, 112),
                inactive: Color::Rgb(108, 112, 134),
                header: Color::Rgb(250, 179, 135),
            },
        }
    }

    /// Replace the accent with a `#RRGGBB`/`#RGB` color; invalid strings are ignored
    pub fn with_accent(mut self, hex: Option<&str>) -> Self {
        match hex.map(Self::parse_hex_color) {
            Some(Some(color)) => self.accent = color,
            Some(None) => tracing::warn!("Ignoring invalid accent color: {:?}", hex),
            None => {}
        }
        self
    }

    /// Parse a hex color string (#RRGGBB or #RGB)
    fn parse_hex_color(s: &str) -> Option<Color> {
        let s = s.trim().trim_start_matches('#');
        // Byte slicing below needs single-byte chars
        if !s.is_ascii() {
            return None;
        }

        if s.len() == 6 {
            let r = u8::from_str_radix(&s[0..2], 16).ok()?;
            let g = u8::from_str_radix(&s[2..4], 16).ok()?;
            let b = u8::from_str_radix(&s[4..6], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        } else if s.len() == 3 {
            let r = u8::from_str_radix(&s[0..1], 16).ok()? * 17;
            let g = u8::from_str_radix(&s[1..2], 16).ok()? * 17;
            let b = u8::from_str_radix(&s[2..3], 16).ok()? * 17;
            Some(Color::Rgb(r, g, b))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(Theme::parse_hex_color("#FFC107"), Some(Color::Rgb(255, 193, 7)));
        assert_eq!(Theme::parse_hex_color("#fff"), Some(Color::Rgb(255, 255, 255)));
        assert_eq!(Theme::parse_hex_color("nope"), None);
        assert_eq!(Theme::parse_hex_color("#12345"), None);
        assert_eq!(Theme::parse_hex_color("#€abc"), None);
        assert_eq!(Theme::parse_hex_color("#ab€"), None);
    }

    #[test]
    fn test_accent_override() {
        let theme = Theme::for_mode(ThemeMode::Dark).with_accent(Some("#000000"));
        assert_eq!(theme.accent, Color::Rgb(0, 0, 0));

        let untouched = Theme::for_mode(ThemeMode::Dark).with_accent(Some("bogus"));
        assert_eq!(untouched.accent, Theme::for_mode(ThemeMode::Dark).accent);

        let multibyte = Theme::for_mode(ThemeMode::Light).with_accent(Some("#€abc"));
        assert_eq!(multibyte.accent, Theme::for_mode(ThemeMode::Light).accent);
    }
}
