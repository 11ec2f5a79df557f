use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::views::View;
use crate::table::SortSpec;
use crate::ui::theme::{parse_hex_color, Theme};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub appearance: AppearanceConfig,
    pub behavior: BehaviorConfig,
    pub sort: SortConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppearanceConfig {
    /// Theme preset: "console", "catppuccin", "nord", "gruvbox"
    pub theme: String,
    pub ascending_indicator: String,
    pub descending_indicator: String,
    pub prompt: String,
    /// Hex overrides applied on top of the preset
    pub colors: ColorOverrides,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorOverrides {
    pub accent: Option<String>,
    pub header: Option<String>,
    pub selection_bg: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// View shown on startup: "leads", "orders", "inbox"
    pub default_view: View,
    /// Click headers to sort, click rows to select
    pub mouse: bool,
    /// Show the pipeline/revenue summary bar
    pub show_summary: bool,
}

/// Initial sort per view, as `key[:asc|desc]`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SortConfig {
    pub leads: Option<String>,
    pub orders: Option<String>,
    pub inbox: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log file for interactive mode; defaults to the cache directory
    pub file: Option<PathBuf>,
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        Self {
            theme: "console".to_string(),
            ascending_indicator: "▲".to_string(),
            descending_indicator: "▼".to_string(),
            prompt: "❯ ".to_string(),
            colors: ColorOverrides::default(),
        }
    }
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            default_view: View::Leads,
            mouse: true,
            show_summary: true,
        }
    }
}

impl SortConfig {
    /// Parsed initial sort for `view`; malformed entries are logged and ignored
    pub fn for_view(&self, view: View) -> Option<SortSpec> {
        let raw = match view {
            View::Leads => self.leads.as_deref(),
            View::Orders => self.orders.as_deref(),
            View::Inbox => self.inbox.as_deref(),
        }?;
        match raw.parse() {
            Ok(spec) => Some(spec),
            Err(e) => {
                tracing::warn!("Ignoring sort setting {raw:?} for {view}: {e}");
                None
            }
        }
    }
}

impl LoggingConfig {
    pub fn resolved_file(&self) -> PathBuf {
        self.file.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("crm-console")
                .join("crm.log")
        })
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let expanded = shellexpand::tilde(path);
        let path = Path::new(expanded.as_ref());

        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            Self::parse(&content)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            tracing::info!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Theme preset with color overrides applied.
    ///
    /// Unknown presets and bad hex values fall back to defaults with a warning.
    pub fn resolve_theme(&self) -> Theme {
        let appearance = &self.appearance;
        let mut theme = Theme::from_preset(&appearance.theme).unwrap_or_else(|| {
            tracing::warn!("Unknown theme {:?}, using default", appearance.theme);
            Theme::default()
        });

        let overrides = [
            (&appearance.colors.accent, &mut theme.accent),
            (&appearance.colors.header, &mut theme.header),
            (&appearance.colors.selection_bg, &mut theme.selection_bg),
        ];
        for (value, slot) in overrides {
            let Some(hex) = value else { continue };
            match parse_hex_color(hex) {
                Ok(color) => *slot = color,
                Err(e) => tracing::warn!("Ignoring color {hex:?}: {e}"),
            }
        }
        theme
    }
}
