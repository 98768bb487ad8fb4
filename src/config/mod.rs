//! Tunables read once at startup.
//!
//! Native builds look for `config/blessings_day.ron` next to the working
//! directory; anything missing from the file keeps its default. The browser
//! build always runs on defaults.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::shared::*;
use crate::world::trigger::Region;

pub const CONFIG_PATH: &str = "config/blessings_day.ron";

pub struct ConfigPlugin;

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        let config = GameConfig::load_or_default();
        app.insert_resource(config);
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed config: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Rectangle in layout coordinates (top-left origin, y down).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionConfig {
    pub center: (f32, f32),
    pub size: (f32, f32),
}

impl RegionConfig {
    /// World-space region on a map of the given height.
    pub fn to_region(&self, map_height: f32) -> Result<Region, SequenceError> {
        Region::new(
            screen_to_world(self.center.0, self.center.1, map_height),
            Vec2::new(self.size.0, self.size.1),
        )
    }
}

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub player_speed_world: f32,
    pub player_speed_indoor: f32,
    /// Fade-out before a scene switch, in seconds. Zero switches at once.
    pub fade_secs: f32,
    pub boot_secs: f32,
    pub celebration_intro_secs: f32,
    /// How close the player must be to a villager to talk.
    pub talk_range: f32,
    pub joystick_radius: f32,
    pub church_entrance: RegionConfig,
    pub altar: RegionConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player_speed_world: 120.0,
            player_speed_indoor: 100.0,
            fade_secs: 0.5,
            boot_secs: 1.0,
            celebration_intro_secs: 1.0,
            talk_range: 80.0,
            joystick_radius: 40.0,
            // The church sprite sits at (195, 80); its door is 60px lower.
            church_entrance: RegionConfig {
                center: (SCREEN_WIDTH / 2.0, 140.0),
                size: (200.0, 200.0),
            },
            altar: RegionConfig {
                center: (SCREEN_WIDTH / 2.0, 170.0),
                size: (200.0, 60.0),
            },
        }
    }
}

impl GameConfig {
    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("player_speed_world", self.player_speed_world),
            ("player_speed_indoor", self.player_speed_indoor),
            ("talk_range", self.talk_range),
            ("joystick_radius", self.joystick_radius),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::Invalid(format!("{name} must be positive")));
            }
        }
        for (name, value) in [
            ("fade_secs", self.fade_secs),
            ("boot_secs", self.boot_secs),
            ("celebration_intro_secs", self.celebration_intro_secs),
        ] {
            if !(value >= 0.0) {
                return Err(ConfigError::Invalid(format!("{name} must not be negative")));
            }
        }
        for (name, region) in [("church_entrance", &self.church_entrance), ("altar", &self.altar)] {
            region
                .to_region(SCREEN_HEIGHT)
                .map_err(|e| ConfigError::Invalid(format!("{name}: {e}")))?;
        }
        Ok(())
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_or_default() -> Self {
        let text = match std::fs::read_to_string(CONFIG_PATH) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                info!("[Config] {} not found, using defaults", CONFIG_PATH);
                return Self::default();
            }
            Err(err) => {
                warn!("[Config] {}", ConfigError::from(err));
                return Self::default();
            }
        };
        match Self::from_ron(&text) {
            Ok(config) => {
                info!("[Config] loaded {}", CONFIG_PATH);
                config
            }
            Err(err) => {
                warn!("[Config] {}; using defaults", err);
                Self::default()
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn load_or_default() -> Self {
        Self::default()
    }

    /// Config for headless tests: no fades, no waits.
    #[allow(dead_code)]
    pub fn instant() -> Self {
        Self {
            fade_secs: 0.0,
            boot_secs: 0.0,
            celebration_intro_secs: 0.0,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(GameConfig::default().validate().is_ok());
        assert!(GameConfig::instant().validate().is_ok());
    }

    #[test]
    fn test_partial_ron_keeps_defaults() {
        let config = GameConfig::from_ron("(player_speed_world: 200.0, fade_secs: 0.0)").unwrap();
        assert_eq!(config.player_speed_world, 200.0);
        assert_eq!(config.fade_secs, 0.0);
        assert_eq!(config.talk_range, GameConfig::default().talk_range);
    }

    #[test]
    fn test_malformed_ron_is_a_parse_error() {
        assert!(matches!(
            GameConfig::from_ron("(player_speed_world: )"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_zero_sized_altar_is_rejected() {
        let err = GameConfig::from_ron("(altar: (center: (195.0, 170.0), size: (0.0, 60.0)))")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_region_config_flips_to_world_space() {
        let region = GameConfig::default().altar.to_region(SCREEN_HEIGHT).unwrap();
        assert_eq!(region.center(), Vec2::new(195.0, SCREEN_HEIGHT - 170.0));
        assert_eq!(region.size(), Vec2::new(200.0, 60.0));
    }
}
