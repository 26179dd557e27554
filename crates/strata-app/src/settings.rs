// Settings persistence: engine tuning stored as JSON in the platform config dir,
// e.g. ~/.config/strata/settings.json on Linux.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use strata_input::{AutoScrollConfig, EngineConfig, TargetingConfig};
use strata_tree::MIN_RATIO;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrataSettings {
    /// Pointer offset (px) into a list block past which a drop nests.
    #[serde(default = "default_indent_band")]
    pub indent_band: f32,
    #[serde(default = "default_drag_threshold")]
    pub drag_threshold: f32,
    #[serde(default = "default_column_edge_fraction")]
    pub column_edge_fraction: f32,
    #[serde(default = "default_split_fraction")]
    pub split_fraction: f32,
    #[serde(default = "default_scroll_band")]
    pub scroll_band: f32,
    #[serde(default = "default_scroll_step_divisor")]
    pub scroll_step_divisor: f32,
    /// Narrowest share a column keeps when its divider is dragged.
    #[serde(default = "default_min_column_ratio")]
    pub min_column_ratio: f64,
}

fn default_indent_band() -> f32 {
    TargetingConfig::default().indent_band
}

fn default_drag_threshold() -> f32 {
    TargetingConfig::default().drag_threshold
}

fn default_column_edge_fraction() -> f32 {
    TargetingConfig::default().column_edge_fraction
}

fn default_split_fraction() -> f32 {
    TargetingConfig::default().split_fraction
}

fn default_scroll_band() -> f32 {
    AutoScrollConfig::default().band
}

fn default_scroll_step_divisor() -> f32 {
    AutoScrollConfig::default().step_divisor
}

fn default_min_column_ratio() -> f64 {
    MIN_RATIO
}

impl Default for StrataSettings {
    fn default() -> Self {
        Self {
            indent_band: default_indent_band(),
            drag_threshold: default_drag_threshold(),
            column_edge_fraction: default_column_edge_fraction(),
            split_fraction: default_split_fraction(),
            scroll_band: default_scroll_band(),
            scroll_step_divisor: default_scroll_step_divisor(),
            min_column_ratio: default_min_column_ratio(),
        }
    }
}

impl StrataSettings {
    /// Replace out-of-range values with their defaults.
    pub fn sanitized(self) -> Self {
        let d = Self::default();
        Self {
            indent_band: checked("indent_band", self.indent_band, d.indent_band, |v| v >= 0.0),
            drag_threshold: checked("drag_threshold", self.drag_threshold, d.drag_threshold, |v| v >= 0.0),
            column_edge_fraction: checked(
                "column_edge_fraction",
                self.column_edge_fraction,
                d.column_edge_fraction,
                |v| v > 0.0 && v < 0.5,
            ),
            split_fraction: checked("split_fraction", self.split_fraction, d.split_fraction, |v| {
                v > 0.0 && v < 1.0
            }),
            scroll_band: checked("scroll_band", self.scroll_band, d.scroll_band, |v| v >= 0.0),
            scroll_step_divisor: checked(
                "scroll_step_divisor",
                self.scroll_step_divisor,
                d.scroll_step_divisor,
                |v| v >= 1.0,
            ),
            min_column_ratio: if self.min_column_ratio > 0.0 && self.min_column_ratio < 0.5 {
                self.min_column_ratio
            } else {
                log::warn!("min_column_ratio {} out of range, using default", self.min_column_ratio);
                d.min_column_ratio
            },
        }
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            targeting: TargetingConfig {
                drag_threshold: self.drag_threshold,
                indent_band: self.indent_band,
                split_fraction: self.split_fraction,
                column_edge_fraction: self.column_edge_fraction,
            },
            scroll: AutoScrollConfig {
                band: self.scroll_band,
                step_divisor: self.scroll_step_divisor,
            },
        }
    }
}

fn checked(name: &str, value: f32, default: f32, valid: impl Fn(f32) -> bool) -> f32 {
    if value.is_finite() && valid(value) {
        value
    } else {
        log::warn!("{} {} out of range, using default", name, value);
        default
    }
}

pub fn settings_path() -> Option<PathBuf> {
    let config_dir = dirs::config_dir()?;
    Some(config_dir.join("strata").join("settings.json"))
}

pub fn load_settings() -> StrataSettings {
    match settings_path() {
        Some(path) => load_settings_from(&path),
        None => StrataSettings::default(),
    }
}

/// Missing files yield defaults silently; unreadable ones with a warning.
pub fn load_settings_from(path: &Path) -> StrataSettings {
    match std::fs::read_to_string(path) {
        Ok(data) => match serde_json::from_str::<StrataSettings>(&data) {
            Ok(settings) => settings.sanitized(),
            Err(e) => {
                log::warn!("Failed to parse {}: {}", path.display(), e);
                StrataSettings::default()
            }
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => StrataSettings::default(),
        Err(e) => {
            log::warn!("Failed to read {}: {}", path.display(), e);
            StrataSettings::default()
        }
    }
}

pub fn save_settings(settings: &StrataSettings) -> Option<PathBuf> {
    let path = match settings_path() {
        Some(p) => p,
        None => {
            log::warn!("Cannot determine settings path");
            return None;
        }
    };
    save_settings_to(&path, settings).then_some(path)
}

pub fn save_settings_to(path: &Path, settings: &StrataSettings) -> bool {
    if let Some(parent) = path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            log::error!("Failed to create config dir {}: {}", parent.display(), e);
            return false;
        }
    }

    match serde_json::to_string_pretty(settings) {
        Ok(json) => match std::fs::write(path, json) {
            Ok(()) => true,
            Err(e) => {
                log::error!("Failed to write {}: {}", path.display(), e);
                false
            }
        },
        Err(e) => {
            log::error!("Failed to serialize settings: {}", e);
            false
        }
    }
}
