//! Theme system for the console
//!
//! Provides:
//! - Theme struct with all UI colors
//! - Built-in presets (console, catppuccin, nord, gruvbox)
//! - Hex color parsing for config overrides
//! - Table styles derived from a theme

use ratatui::style::{Color, Modifier, Style};
use thiserror::Error;

use crate::table::widget::TableStyle;

/// Theme colors for the UI
#[derive(Debug, Clone)]
pub struct Theme {
    /// Main background color
    pub background: Color,
    /// Primary text color
    pub foreground: Color,
    /// Background for the selected row
    pub selection_bg: Color,
    /// Text color for the selected row
    pub selection_fg: Color,
    /// Accent color (borders, active tab)
    pub accent: Color,
    /// Table header text
    pub header: Color,
    /// Dimmed text (secondary info, action hints)
    pub dimmed: Color,
    /// Won deals, delivered orders
    pub positive: Color,
    /// Lost deals, cancelled orders
    pub negative: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::console()
    }
}

impl Theme {
    /// Default theme
    pub fn console() -> Self {
        Self {
            background: Color::Rgb(13, 17, 22),      // #0d1116
            foreground: Color::Rgb(229, 234, 241),   // #e5eaf1
            selection_bg: Color::Rgb(20, 28, 42),    // #141c2a
            selection_fg: Color::Rgb(229, 234, 241), // #e5eaf1
            accent: Color::Rgb(180, 83, 9),          // #b45309 (amber)
            header: Color::Rgb(251, 191, 36),        // #fbbf24
            dimmed: Color::Rgb(107, 114, 128),       // #6b7280
            positive: Color::Rgb(34, 197, 94),       // #22c55e
            negative: Color::Rgb(239, 68, 68),       // #ef4444
        }
    }

    /// Catppuccin Mocha theme
    pub fn catppuccin_mocha() -> Self {
        Self {
            background: Color::Rgb(30, 30, 46),      // #1e1e2e (base)
            foreground: Color::Rgb(205, 214, 244),   // #cdd6f4 (text)
            selection_bg: Color::Rgb(49, 50, 68),    // #313244 (surface0)
            selection_fg: Color::Rgb(205, 214, 244), // #cdd6f4 (text)
            accent: Color::Rgb(137, 180, 250),       // #89b4fa (blue)
            header: Color::Rgb(249, 226, 175),       // #f9e2af (yellow)
            dimmed: Color::Rgb(147, 153, 178),       // #9399b2 (overlay2)
            positive: Color::Rgb(166, 227, 161),     // #a6e3a1 (green)
            negative: Color::Rgb(243, 139, 168),     // #f38ba8 (red)
        }
    }

    /// Nord theme
    pub fn nord() -> Self {
        Self {
            background: Color::Rgb(46, 52, 64),      // #2e3440 (nord0)
            foreground: Color::Rgb(236, 239, 244),   // #eceff4 (nord6)
            selection_bg: Color::Rgb(67, 76, 94),    // #434c5e (nord2)
            selection_fg: Color::Rgb(236, 239, 244), // #eceff4 (nord6)
            accent: Color::Rgb(136, 192, 208),       // #88c0d0 (nord8)
            header: Color::Rgb(235, 203, 139),       // #ebcb8b (nord13)
            dimmed: Color::Rgb(76, 86, 106),         // #4c566a (nord3)
            positive: Color::Rgb(163, 190, 140),     // #a3be8c (nord14)
            negative: Color::Rgb(191, 97, 106),      // #bf616a (nord11)
        }
    }

    /// Gruvbox dark theme
    pub fn gruvbox() -> Self {
        Self {
            background: Color::Rgb(40, 40, 40),      // #282828 (bg)
            foreground: Color::Rgb(235, 219, 178),   // #ebdbb2 (fg)
            selection_bg: Color::Rgb(60, 56, 54),    // #3c3836 (bg1)
            selection_fg: Color::Rgb(235, 219, 178), // #ebdbb2 (fg)
            accent: Color::Rgb(215, 153, 33),        // #d79921 (yellow)
            header: Color::Rgb(250, 189, 47),        // #fabd2f (bright yellow)
            dimmed: Color::Rgb(146, 131, 116),       // #928374 (gray)
            positive: Color::Rgb(152, 151, 26),      // #98971a (green)
            negative: Color::Rgb(204, 36, 29),       // #cc241d (red)
        }
    }

    /// Load theme from preset name
    pub fn from_preset(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "console" | "default" => Some(Self::console()),
            "catppuccin-mocha" | "catppuccin_mocha" | "catppuccin" => {
                Some(Self::catppuccin_mocha())
            }
            "nord" => Some(Self::nord()),
            "gruvbox" | "gruvbox-dark" | "gruvbox_dark" => Some(Self::gruvbox()),
            _ => None,
        }
    }

    /// Styles for the data table, using the configured sort indicators
    pub fn table_style(&self, ascending: &str, descending: &str) -> TableStyle {
        let header = Style::default()
            .fg(self.header)
            .bg(self.background)
            .add_modifier(Modifier::BOLD);
        TableStyle {
            header,
            header_sortable: header.add_modifier(Modifier::UNDERLINED),
            row: Style::default().fg(self.foreground).bg(self.background),
            selected: Style::default()
                .fg(self.selection_fg)
                .bg(self.selection_bg)
                .add_modifier(Modifier::BOLD),
            actions: Style::default().fg(self.dimmed).bg(self.background),
            ascending: ascending.to_string(),
            descending: descending.to_string(),
        }
    }
}

/// Parse hex color string to Color
/// Supports: #rrggbb, #rgb, rrggbb, rgb
pub fn parse_hex_color(s: &str) -> Result<Color, ColorError> {
    let s = s.trim().trim_start_matches('#');
    let channel = |range: std::ops::Range<usize>| {
        s.get(range)
            .and_then(|h| u8::from_str_radix(h, 16).ok())
            .ok_or(ColorError::InvalidHex)
    };

    match s.len() {
        // #rgb -> #rrggbb
        3 => Ok(Color::Rgb(channel(0..1)? * 17, channel(1..2)? * 17, channel(2..3)? * 17)),
        6 => Ok(Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
        _ => Err(ColorError::InvalidLength),
    }
}

/// Color parsing error
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ColorError {
    #[error("invalid color length (expected 3 or 6 hex chars)")]
    InvalidLength,
    #[error("invalid hex character")]
    InvalidHex,
}
