//! Runtime configuration
//!
//! [`RoomConfig`] collects every tunable of a session. Defaults come from
//! [`Default`]; `PARLOUR_*` environment variables override them at startup.

use thiserror::Error;

use crate::picking::{IdAllocator, MAX_ID};
use crate::room::Animation;

pub const ENV_BASE_ID: &str = "PARLOUR_BASE_ID";
pub const ENV_ANIMATION_FRAMES: &str = "PARLOUR_ANIMATION_FRAMES";
pub const ENV_NO_UI: &str = "PARLOUR_NO_UI";
pub const ENV_VSYNC: &str = "PARLOUR_VSYNC";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}={value:?} is not a valid {expected}")]
    Invalid {
        var: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("{var}={value} is out of range ({min}..={max})")]
    OutOfRange {
        var: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },
}

/// Session settings.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomConfig {
    /// First id handed out by the allocator
    pub base_id: u32,
    /// Frames an object takes to fully open or close
    pub animation_frames: u32,
    /// Initial window size in logical pixels
    pub window_size: (u32, u32),
    /// Clear colour of the real pass
    pub background: wgpu::Color,
    /// Pointer travel in pixels between press and release that still counts
    /// as a click rather than a drag
    pub click_tolerance: f64,
    pub show_ui: bool,
    pub vsync: bool,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            base_id: IdAllocator::DEFAULT_BASE,
            animation_frames: Animation::DEFAULT_FRAMES,
            window_size: (1200, 800),
            background: wgpu::Color {
                r: 0.02,
                g: 0.02,
                b: 0.03,
                a: 1.0,
            },
            click_tolerance: 4.0,
            show_ui: true,
            vsync: false,
        }
    }
}

impl RoomConfig {
    pub fn with_base_id(mut self, base_id: u32) -> Self {
        self.base_id = base_id;
        self
    }

    pub fn with_animation_frames(mut self, frames: u32) -> Self {
        self.animation_frames = frames;
        self
    }

    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_size = (width, height);
        self
    }

    pub fn with_background(mut self, background: wgpu::Color) -> Self {
        self.background = background;
        self
    }

    pub fn with_click_tolerance(mut self, pixels: f64) -> Self {
        self.click_tolerance = pixels.max(0.0);
        self
    }

    pub fn with_ui(mut self, show_ui: bool) -> Self {
        self.show_ui = show_ui;
        self
    }

    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().overlay(|var| std::env::var(var).ok())
    }

    /// Applies overrides looked up by variable name.
    pub fn overlay<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_BASE_ID) {
            self.base_id = parse_u32(ENV_BASE_ID, &value, 1, MAX_ID)?;
        }
        if let Some(value) = lookup(ENV_ANIMATION_FRAMES) {
            self.animation_frames = parse_u32(ENV_ANIMATION_FRAMES, &value, 1, 10_000)?;
        }
        if let Some(value) = lookup(ENV_NO_UI) {
            self.show_ui = !parse_flag(ENV_NO_UI, &value)?;
        }
        if let Some(value) = lookup(ENV_VSYNC) {
            self.vsync = parse_flag(ENV_VSYNC, &value)?;
        }
        Ok(self)
    }
}

fn parse_u32(var: &'static str, value: &str, min: u32, max: u32) -> Result<u32, ConfigError> {
    let parsed: u32 = value.trim().parse().map_err(|_| ConfigError::Invalid {
        var,
        value: value.to_string(),
        expected: "unsigned integer",
    })?;
    if !(min..=max).contains(&parsed) {
        return Err(ConfigError::OutOfRange {
            var,
            value: parsed,
            min,
            max,
        });
    }
    Ok(parsed)
}

fn parse_flag(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            var,
            value: value.to_string(),
            expected: "boolean flag",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn overlay(pairs: &[(&'static str, &str)]) -> Result<RoomConfig, ConfigError> {
        let env: HashMap<&'static str, String> =
            pairs.iter().map(|(k, v)| (*k, v.to_string())).collect();
        RoomConfig::default().overlay(|var| env.get(var).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = RoomConfig::default();
        assert_eq!(config.base_id, 1000);
        assert_eq!(config.animation_frames, 20);
        assert_eq!(config.window_size, (1200, 800));
        assert!(config.show_ui);
        assert!(!config.vsync);
    }

    #[test]
    fn test_empty_environment_keeps_defaults() {
        assert_eq!(overlay(&[]), Ok(RoomConfig::default()));
    }

    #[test]
    fn test_overrides_apply() {
        let config = overlay(&[
            (ENV_BASE_ID, "5000"),
            (ENV_ANIMATION_FRAMES, " 40 "),
            (ENV_NO_UI, "1"),
            (ENV_VSYNC, "true"),
        ])
        .unwrap();
        assert_eq!(config.base_id, 5000);
        assert_eq!(config.animation_frames, 40);
        assert!(!config.show_ui);
        assert!(config.vsync);
    }

    #[test]
    fn test_reserved_base_rejected() {
        assert_eq!(
            overlay(&[(ENV_BASE_ID, "0")]),
            Err(ConfigError::OutOfRange {
                var: ENV_BASE_ID,
                value: 0,
                min: 1,
                max: MAX_ID,
            })
        );
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(matches!(
            overlay(&[(ENV_ANIMATION_FRAMES, "fast")]),
            Err(ConfigError::Invalid { var: ENV_ANIMATION_FRAMES, .. })
        ));
        assert!(matches!(
            overlay(&[(ENV_VSYNC, "maybe")]),
            Err(ConfigError::Invalid { var: ENV_VSYNC, .. })
        ));
    }

    #[test]
    fn test_builders() {
        let config = RoomConfig::default()
            .with_base_id(42)
            .with_click_tolerance(-3.0)
            .with_window_size(640, 480);
        assert_eq!(config.base_id, 42);
        assert_eq!(config.click_tolerance, 0.0);
        assert_eq!(config.window_size, (640, 480));
    }
}
