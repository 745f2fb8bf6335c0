use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// DOM key codes the dispatcher listens for
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub previous: u32,
    pub next: u32,
    pub skip_forward: u32,
    pub dismiss: u32,
    pub reset_visited: u32,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            previous: 37,
            next: 39,
            skip_forward: 71,
            dismiss: 27,
            reset_visited: 67,
        }
    }
}

/// Tunables for the overlay and its feedback animations
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TourConfig {
    /// Space between the target's box and the hole edge, in px
    pub hole_padding: f32,
    /// Width of the round-joined stroke that softens the hole, in px
    pub hole_stroke: f32,
    /// Opacity of the dim layer
    pub dim_alpha: f32,
    /// Opacity repainted behind the navigation bar
    pub nav_dim_alpha: f32,
    pub scroll_duration_ms: u64,
    /// Where the target lands after scrolling, as a fraction of viewport height
    pub scroll_anchor: f32,
    /// Duration of one leg of the reminder nudge
    pub reminder_step_ms: u64,
    /// Horizontal reach of the reminder nudge, in vw
    pub reminder_amplitude_vw: f32,
    pub keys: KeyBindings,
}

impl TourConfig {
    pub const MAX_HOLE_PADDING: f32 = 64.0;
    pub const MAX_HOLE_STROKE: f32 = 128.0;
    pub const MAX_ANIMATION_MS: u64 = 5_000;

    /// Reads a JSON config file and sanitizes it
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let config: TourConfig = serde_json::from_str(text)?;
        Ok(config.sanitized())
    }

    /// Clamps every value into a range the renderer can use
    pub fn sanitized(mut self) -> Self {
        self.hole_padding = clamp_finite(self.hole_padding, 0.0, Self::MAX_HOLE_PADDING);
        self.hole_stroke = clamp_finite(self.hole_stroke, 0.0, Self::MAX_HOLE_STROKE);
        self.dim_alpha = clamp_finite(self.dim_alpha, 0.0, 1.0);
        self.nav_dim_alpha = clamp_finite(self.nav_dim_alpha, 0.0, 1.0);
        self.scroll_anchor = clamp_finite(self.scroll_anchor, 0.0, 1.0);
        self.reminder_amplitude_vw = clamp_finite(self.reminder_amplitude_vw, 0.0, 10.0);
        self.scroll_duration_ms = self.scroll_duration_ms.min(Self::MAX_ANIMATION_MS);
        self.reminder_step_ms = self.reminder_step_ms.min(Self::MAX_ANIMATION_MS);
        self
    }
}

impl Default for TourConfig {
    fn default() -> Self {
        Self {
            hole_padding: 6.0,
            hole_stroke: 20.0,
            dim_alpha: 0.5,
            nav_dim_alpha: 0.5,
            scroll_duration_ms: 600,
            scroll_anchor: 0.4,
            reminder_step_ms: 75,
            reminder_amplitude_vw: 1.0,
            keys: KeyBindings::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

fn clamp_finite(value: f32, min: f32, max: f32) -> f32 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = TourConfig::parse(r#"{ "hole_padding": 10, "keys": { "next": 13 } }"#).unwrap();
        assert_eq!(config.hole_padding, 10.0);
        assert_eq!(config.hole_stroke, 20.0);
        assert_eq!(config.keys.next, 13);
        assert_eq!(config.keys.previous, 37);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let config = TourConfig::parse(
            r#"{ "dim_alpha": 3.0, "hole_padding": -4, "scroll_duration_ms": 999999 }"#,
        )
        .unwrap();
        assert_eq!(config.dim_alpha, 1.0);
        assert_eq!(config.hole_padding, 0.0);
        assert_eq!(config.scroll_duration_ms, TourConfig::MAX_ANIMATION_MS);
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(matches!(TourConfig::parse("[1,"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let result = TourConfig::load(Path::new("/no/such/tour-config.json"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }
}
