//! Game settings and preferences
//!
//! Persisted separately from game state in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::sim::{EvolutionLadder, Grid};
use crate::tuning::Tuning;

/// Board layout presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GridPreset {
    #[default]
    Desktop,
    /// Narrow board for portrait phones
    Mobile,
}

impl GridPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            GridPreset::Desktop => "Desktop",
            GridPreset::Mobile => "Mobile",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "desktop" | "wide" => Some(GridPreset::Desktop),
            "mobile" | "narrow" => Some(GridPreset::Mobile),
            _ => None,
        }
    }

    /// Pick a preset from the viewport width
    pub fn for_viewport(width_px: f64) -> Self {
        if width_px < 768.0 {
            GridPreset::Mobile
        } else {
            GridPreset::Desktop
        }
    }

    pub fn grid(&self) -> Grid {
        match self {
            GridPreset::Desktop => Grid::DESKTOP,
            GridPreset::Mobile => Grid::MOBILE,
        }
    }
}

/// Which evolution ladder to play with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LadderKind {
    /// Four stages, up to Quantum
    Basic,
    #[default]
    Extended,
}

impl LadderKind {
    pub fn ladder(&self) -> EvolutionLadder {
        match self {
            LadderKind::Basic => EvolutionLadder::basic(),
            LadderKind::Extended => EvolutionLadder::extended(),
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub grid: GridPreset,
    pub ladder: LadderKind,
    /// Fixed run seed (replays); random when unset
    pub seed: Option<u64>,
}

impl Settings {
    /// Tuning with this profile's ladder
    pub fn tuning(&self) -> Tuning {
        Tuning::default().with_ladder(self.ladder.ladder())
    }

    pub fn grid(&self) -> Grid {
        self.grid.grid()
    }

    /// Same profile with the grid preset picked for this viewport width
    pub fn with_viewport(self, width_px: f64) -> Self {
        Self {
            grid: GridPreset::for_viewport(width_px),
            ..self
        }
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "neon_snake_settings";

    #[cfg(target_arch = "wasm32")]
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }

    /// Stored profile, or defaults when missing or unreadable
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let stored = Self::storage().and_then(|s| s.get_item(Self::STORAGE_KEY).ok().flatten());
        let Some(json) = stored else {
            log::info!("No stored settings, using defaults");
            return Self::default();
        };
        serde_json::from_str(&json).unwrap_or_else(|e| {
            log::warn!("Ignoring stored settings: {}", e);
            Self::default()
        })
    }

    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let Some(storage) = Self::storage() else {
            log::warn!("LocalStorage unavailable, settings not saved");
            return;
        };
        match serde_json::to_string(self) {
            Ok(json) => match storage.set_item(Self::STORAGE_KEY, &json) {
                Ok(()) => log::info!(
                    "Settings saved: {} grid, {:?} ladder",
                    self.grid.as_str(),
                    self.ladder
                ),
                Err(_) => log::warn!("LocalStorage rejected settings"),
            },
            Err(e) => log::warn!("Failed to encode settings: {}", e),
        }
    }

    /// Native builds keep no profile
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        log::debug!("Settings persistence is browser-only, skipping save");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert_eq!(GridPreset::for_viewport(400.0), GridPreset::Mobile);
        assert_eq!(GridPreset::for_viewport(1280.0), GridPreset::Desktop);
        assert_eq!(GridPreset::parse("MOBILE"), Some(GridPreset::Mobile));
        assert_eq!(GridPreset::parse("huge"), None);
        let grid = GridPreset::Mobile.grid();
        assert!(Grid::new(grid.width(), grid.height()).is_ok());
        assert_eq!(GridPreset::Desktop.grid(), Grid::default());
    }

    #[test]
    fn test_viewport_overrides_grid_only() {
        let settings = Settings {
            ladder: LadderKind::Basic,
            seed: Some(9),
            ..Default::default()
        }
        .with_viewport(390.0);
        assert_eq!(settings.grid, GridPreset::Mobile);
        assert_eq!(settings.ladder, LadderKind::Basic);
        assert_eq!(settings.seed, Some(9));
        assert_eq!(settings.grid().width(), 15);
        assert_eq!(settings.with_viewport(1440.0).grid, GridPreset::Desktop);
    }

    #[test]
    fn test_ladder_choice_flows_into_tuning() {
        let settings = Settings {
            ladder: LadderKind::Basic,
            ..Default::default()
        };
        assert_eq!(settings.tuning().ladder.max_stage(), 3);
        assert_eq!(Settings::default().tuning().ladder.max_stage(), 8);
    }

    #[test]
    fn test_settings_json_defaults() {
        let settings: Settings = serde_json::from_str(r#"{ "grid": "Mobile" }"#).unwrap();
        assert_eq!(settings.grid, GridPreset::Mobile);
        assert_eq!(settings.ladder, LadderKind::Extended);
        assert_eq!(settings.seed, None);
    }
}
