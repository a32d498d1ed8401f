//! Effect settings
//!
//! Persisted in LocalStorage on the web; on native the binary reads an
//! optional JSON file. Every field has a default, so partial JSON is fine.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::consts::*;
use crate::error::{EffectError, Result};

/// How the blood stain body is filled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FillStyle {
    /// Radial gradient, followed by droplets and speckles
    #[default]
    Gradient,
    /// Flat colour, no decoration
    Flat,
}

impl FillStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            FillStyle::Gradient => "gradient",
            FillStyle::Flat => "flat",
        }
    }

    /// Whether droplets and speckles are drawn after growth
    pub fn decorates(&self) -> bool {
        matches!(self, FillStyle::Gradient)
    }
}

/// Blood splatter tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BloodSettings {
    /// Growth animation duration (ms)
    pub growth_ms: f64,
    /// Fill style of the stain body
    pub style: FillStyle,
    /// Number of speckle dots attempted by the decoration pass
    pub speckle_count: usize,
    /// Base radius as a fraction of the surface width
    pub base_radius_ratio: f32,
}

impl Default for BloodSettings {
    fn default() -> Self {
        Self {
            growth_ms: GROWTH_DURATION_MS,
            style: FillStyle::Gradient,
            speckle_count: SPECKLE_COUNT,
            base_radius_ratio: BASE_RADIUS_RATIO,
        }
    }
}

/// Heal particle tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealSettings {
    /// Total spawning time (ms); 0 runs until stopped
    pub duration_ms: u64,
    /// Spawn timer period (ms)
    pub spawn_interval_ms: u32,
    /// Particles created per timer tick
    pub burst_size: usize,
    /// Opacity lost per frame
    pub fade_per_frame: f32,
    /// Spawn jitter around the surface center (px)
    pub spawn_spread: f32,
}

impl Default for HealSettings {
    fn default() -> Self {
        Self {
            duration_ms: 0,
            spawn_interval_ms: HEAL_SPAWN_INTERVAL_MS,
            burst_size: HEAL_BURST_SIZE,
            fade_per_frame: HEAL_FADE_PER_FRAME,
            spawn_spread: HEAL_SPAWN_SPREAD,
        }
    }
}

impl HealSettings {
    /// Bounded run of `duration_ms`
    pub fn with_duration(duration_ms: u64) -> Self {
        Self {
            duration_ms,
            ..Self::default()
        }
    }
}

/// All effect settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base RNG seed; `None` picks one at start-up
    pub seed: Option<u64>,
    pub blood: BloodSettings,
    pub heal: HealSettings,
}

fn invalid(name: &'static str, reason: impl Into<String>) -> EffectError {
    EffectError::InvalidSetting {
        name,
        reason: reason.into(),
    }
}

impl BloodSettings {
    pub fn validate(&self) -> Result<()> {
        if !self.growth_ms.is_finite() || self.growth_ms <= 0.0 {
            return Err(invalid("blood.growth_ms", format!("must be positive, got {}", self.growth_ms)));
        }
        if !self.base_radius_ratio.is_finite()
            || self.base_radius_ratio <= 0.0
            || self.base_radius_ratio > 0.5
        {
            return Err(invalid(
                "blood.base_radius_ratio",
                format!("must be in (0, 0.5], got {}", self.base_radius_ratio),
            ));
        }
        Ok(())
    }
}

impl HealSettings {
    pub fn validate(&self) -> Result<()> {
        if self.spawn_interval_ms == 0 {
            return Err(invalid("heal.spawn_interval_ms", "must be positive"));
        }
        if !self.fade_per_frame.is_finite() || self.fade_per_frame <= 0.0 || self.fade_per_frame > 1.0 {
            return Err(invalid(
                "heal.fade_per_frame",
                format!("must be in (0, 1], got {}", self.fade_per_frame),
            ));
        }
        if !self.spawn_spread.is_finite() || self.spawn_spread < 0.0 {
            return Err(invalid(
                "heal.spawn_spread",
                format!("must be non-negative, got {}", self.spawn_spread),
            ));
        }
        Ok(())
    }
}

impl Settings {
    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "splatter_fx_settings";

    pub fn validate(&self) -> Result<()> {
        self.blood.validate()?;
        self.heal.validate()
    }

    /// Parse and validate settings JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read settings from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            match self.to_json() {
                Ok(json) => {
                    let _ = storage.set_item(Self::STORAGE_KEY, &json);
                    log::info!("Settings saved");
                }
                Err(e) => log::warn!("Failed to save settings: {}", e),
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
