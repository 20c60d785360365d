//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`S3D_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env}};
use serde::{Serialize, Deserialize};
use std::path::Path;

use scene3d_core::CollisionSettings;
use scene3d_input::FreeFlySettings;

use crate::scene::{CameraSettings, GameSettings};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Window configuration
    #[serde(default)]
    pub window: WindowConfig,
    /// Camera configuration
    #[serde(default)]
    pub camera: CameraConfig,
    /// Free-fly input configuration
    #[serde(default)]
    pub input: InputConfig,
    /// Collision pass configuration
    #[serde(default)]
    pub physics: PhysicsConfig,
    /// Arena gameplay tuning
    #[serde(default)]
    pub game: GameConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`S3D_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // S3D_WINDOW__TITLE=Test -> window.title = "Test"
        figment = figment.merge(Env::prefixed("S3D_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }
}

/// Window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Initial inner width in pixels
    pub width: u32,
    /// Initial inner height in pixels
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "scene3d arena".to_string(),
            width: 800,
            height: 600,
        }
    }
}

/// Camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Height above the floor
    pub elevation: f32,
    /// Starting yaw in degrees
    pub yaw: f32,
    /// Starting pitch in degrees
    pub pitch: f32,
    /// Window pixels per world unit
    pub pixels_per_unit: f32,
    /// Shift the projection to follow the player
    pub follow_offset: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        let defaults = CameraSettings::default();
        Self {
            elevation: defaults.elevation,
            yaw: defaults.yaw,
            pitch: defaults.pitch,
            pixels_per_unit: defaults.pixels_per_unit,
            follow_offset: defaults.follow_offset,
        }
    }
}

impl CameraConfig {
    pub fn to_settings(&self) -> CameraSettings {
        CameraSettings {
            elevation: self.elevation,
            yaw: self.yaw,
            pitch: self.pitch,
            pixels_per_unit: self.pixels_per_unit,
            follow_offset: self.follow_offset,
        }
    }
}

/// Input configuration for the free-fly camera
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Movement speed (units per second)
    pub move_speed: f32,
    /// Speed multiplier while Left Shift is held
    pub sprint_multiplier: f32,
    /// Degrees of rotation per pixel of mouse movement
    pub mouse_sensitivity: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        let defaults = FreeFlySettings::default();
        Self {
            move_speed: defaults.move_speed,
            sprint_multiplier: defaults.sprint_multiplier,
            mouse_sensitivity: defaults.mouse_sensitivity,
        }
    }
}

impl InputConfig {
    pub fn to_free_fly(&self) -> FreeFlySettings {
        FreeFlySettings {
            move_speed: self.move_speed,
            sprint_multiplier: self.sprint_multiplier,
            mouse_sensitivity: self.mouse_sensitivity,
        }
    }
}

/// Collision pass configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Do not test two members of the same group against each other
    pub skip_same_group_pairs: bool,
}

impl PhysicsConfig {
    pub fn to_collision(&self) -> CollisionSettings {
        CollisionSettings {
            skip_same_group_pairs: self.skip_same_group_pairs,
        }
    }
}

/// Arena gameplay configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seconds before play starts
    pub start_delay: f32,
    pub player_acceleration: f32,
    pub bullet_speed: f32,
    /// Seconds between bullets
    pub bullet_interval: f32,
    pub bullet_push: f32,
    /// Edge speed in pixels per second when a bullet leaves through it
    pub border_push: f32,
    pub enemy_acceleration: f32,
    pub enemy_max_speed: f32,
    pub enemy_bounce: f32,
    /// Pixels per second each window edge moves inward
    pub window_shrink_rate: f32,
    pub window_min_width: u32,
    pub window_min_height: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        let d = GameSettings::default();
        Self {
            start_delay: d.start_delay,
            player_acceleration: d.player_acceleration,
            bullet_speed: d.bullet_speed,
            bullet_interval: d.bullet_interval,
            bullet_push: d.bullet_push,
            border_push: d.border_push,
            enemy_acceleration: d.enemy_acceleration,
            enemy_max_speed: d.enemy_max_speed,
            enemy_bounce: d.enemy_bounce,
            window_shrink_rate: d.window_shrink_rate,
            window_min_width: d.window_min_width,
            window_min_height: d.window_min_height,
        }
    }
}

impl GameConfig {
    pub fn to_settings(&self) -> GameSettings {
        GameSettings {
            start_delay: self.start_delay,
            player_acceleration: self.player_acceleration,
            bullet_speed: self.bullet_speed,
            // a zero interval would spawn a bullet every frame forever
            bullet_interval: self.bullet_interval.max(f32::EPSILON),
            bullet_push: self.bullet_push,
            border_push: self.border_push,
            enemy_acceleration: self.enemy_acceleration,
            enemy_max_speed: self.enemy_max_speed,
            enemy_bounce: self.enemy_bounce,
            window_shrink_rate: self.window_shrink_rate,
            window_min_width: self.window_min_width,
            window_min_height: self.window_min_height,
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace), used when RUST_LOG is unset
    pub log_level: String,
    /// Capture the pointer and start in the free-fly camera
    pub start_free_fly: bool,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            start_free_fly: false,
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}
