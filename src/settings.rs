//! Game settings and preferences
//!
//! Effects quality and feedback toggles. Stored as JSON next to the binary
//! on native targets; the browser shell hands the JSON over directly.

#[cfg(not(target_arch = "wasm32"))]
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Multiplier applied to every particle pool capacity
    pub fn pool_scale(&self) -> f32 {
        match self {
            QualityPreset::Low => 0.5,
            QualityPreset::Medium => 1.0,
            QualityPreset::High => 1.5,
        }
    }

    /// Scale a nominal pool capacity, keeping at least one slot
    pub fn scale_capacity(&self, nominal: usize) -> usize {
        ((nominal as f32 * self.pool_scale()).round() as usize).max(1)
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Effects quality preset
    pub quality: QualityPreset,

    // === Visual Effects ===
    /// Screen shake on balloon pops
    pub screen_shake: bool,
    /// Impact particle effects
    pub particles: bool,

    // === Flow ===
    /// Advance to the next level automatically after a clear
    pub auto_advance: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,

            // Visual effects - all on by default
            screen_shake: true,
            particles: true,

            auto_advance: true,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset (applies preset defaults)
    pub fn from_preset(preset: QualityPreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a quality preset (updates quality-dependent settings)
    pub fn apply_preset(&mut self, preset: QualityPreset) {
        self.quality = preset;

        // Low preset drops the camera shake as well
        if preset == QualityPreset::Low {
            self.screen_shake = false;
        }
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("invalid settings JSON")
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        serde_json::to_string_pretty(self).context("failed to encode settings")
    }

    /// Load settings from a JSON file, falling back to defaults when it is missing
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file {}", path.display()))?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings as pretty JSON
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?)
            .with_context(|| format!("failed to write settings file {}", path.display()))?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_parse() {
        assert_eq!(QualityPreset::from_str("MED"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::from_str("ultra"), None);
        assert_eq!(QualityPreset::High.as_str(), "High");
    }

    #[test]
    fn test_scale_capacity() {
        assert_eq!(QualityPreset::Low.scale_capacity(5), 3);
        assert_eq!(QualityPreset::Medium.scale_capacity(20), 20);
        assert_eq!(QualityPreset::High.scale_capacity(12), 18);
        assert_eq!(QualityPreset::Low.scale_capacity(1), 1);
    }

    #[test]
    fn test_low_preset_disables_shake() {
        let s = Settings::from_preset(QualityPreset::Low);
        assert!(!s.screen_shake);
        assert!(s.particles);
    }

    #[test]
    fn test_json_roundtrip_with_missing_fields() {
        let s = Settings::from_json(r#"{ "quality": "High" }"#).unwrap();
        assert_eq!(s.quality, QualityPreset::High);
        assert!(s.auto_advance);
    }

    #[test]
    fn test_file_save_and_load() {
        let path = std::env::temp_dir().join(format!("sonar_archer_settings_{}.json", std::process::id()));
        let mut s = Settings::default();
        s.particles = false;
        s.save_file(&path).unwrap();
        let loaded = Settings::load_file(&path).unwrap();
        assert!(!loaded.particles);
        let _ = std::fs::remove_file(&path);
    }
}
