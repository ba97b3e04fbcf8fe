//! Configuration management (config.toml)
//!
//! Handles loading, saving, and providing defaults for the demo's tunables.
//! Settings are stored in TOML format in the platform-specific config directory.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::assets::AssetManifest;
use crate::controls::Control;

/// Game configuration.
///
/// Contains all user-configurable settings organized into sections.
/// Serialized to/from TOML format for persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GameConfig {
    /// Player kart handling
    #[serde(default)]
    pub vehicle: VehicleConfig,
    /// Ghost kart launch parameters
    #[serde(default)]
    pub ghosts: GhostConfig,
    /// Camera rig and projection
    #[serde(default)]
    pub camera: CameraConfig,
    /// Track layout
    #[serde(default)]
    pub race: RaceConfig,
    /// Key bindings
    #[serde(default)]
    pub keys: KeyBindings,
    /// Asset paths, relative to the asset root
    #[serde(default)]
    pub assets: AssetManifest,
}

/// Player kart handling constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleConfig {
    /// Top forward speed in units/s (reverse is capped at half of this)
    #[serde(default = "default_max_speed")]
    pub max_speed: f32,
    /// Speed gained or lost per second while accelerating or braking
    #[serde(default = "default_acceleration")]
    pub acceleration: f32,
    /// Heading change in degrees/s at full turn authority
    #[serde(default = "default_base_turn_rate")]
    pub base_turn_rate: f32,
    /// Turn authority multiplier while reversing
    #[serde(default = "default_reverse_turn_modifier")]
    pub reverse_turn_modifier: f32,
    /// Speed at which turn authority reaches 1.0
    #[serde(default = "default_min_turn_speed")]
    pub min_turn_speed: f32,
    /// Per-frame speed multiplier while coasting
    #[serde(default = "default_drag_factor")]
    pub drag_factor: f32,
    /// Coasting speeds below this snap to zero
    #[serde(default = "default_stop_threshold")]
    pub stop_threshold: f32,
}

/// Ghost kart launch parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GhostConfig {
    /// Lateral distance from the player at launch
    #[serde(default = "default_side_distance")]
    pub side_distance: f32,
    /// Ghost 1 cruising speed
    #[serde(default = "default_ghost1_speed")]
    pub ghost1_speed: f32,
    /// Ghost 2 cruising speed
    #[serde(default = "default_ghost2_speed")]
    pub ghost2_speed: f32,
    /// Ghost transparency (1.0 = opaque)
    #[serde(default = "default_ghost_alpha")]
    pub alpha: f32,
}

/// Camera rig and projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Degrees of yaw/pitch per pointer unit
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f32,
    /// Initial zoom (vertical FOV in degrees)
    #[serde(default = "default_zoom")]
    pub initial_zoom: f32,
    /// Initial orbit yaw in degrees (0 = directly behind the kart)
    #[serde(default)]
    pub initial_yaw: f32,
    #[serde(default = "default_near")]
    pub near: f32,
    #[serde(default = "default_far")]
    pub far: f32,
    /// Viewport aspect ratio (width / height)
    #[serde(default = "default_aspect_ratio")]
    pub aspect_ratio: f32,
    /// Third-person distance behind the kart
    #[serde(default = "default_follow_distance")]
    pub follow_distance: f32,
    /// Third-person height above the kart
    #[serde(default = "default_follow_height")]
    pub follow_height: f32,
    /// Distance ahead of the kart the third-person camera aims at
    #[serde(default = "default_look_ahead")]
    pub look_ahead: f32,
    /// Height of the third-person aim point
    #[serde(default = "default_eye_height")]
    pub look_height: f32,
    /// First-person offset ahead of the kart
    #[serde(default = "default_first_person_forward")]
    pub first_person_forward: f32,
    /// First-person eye height
    #[serde(default = "default_eye_height")]
    pub first_person_height: f32,
}

/// Track layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceConfig {
    /// Bodies finish once their z reaches this value
    #[serde(default = "default_finish_line_z")]
    pub finish_line_z: f32,
    /// Player spawn point
    #[serde(default = "default_player_start")]
    pub player_start: [f32; 3],
    /// Distance between the two landmarks
    #[serde(default = "default_landmark_spacing")]
    pub landmark_spacing: f32,
    /// Landmark distance past the finish line
    #[serde(default = "default_landmark_offset")]
    pub landmark_offset: f32,
}

/// Key names bound to each control.
///
/// Key names are free-form strings compared case-insensitively, so any
/// windowing backend can resolve them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyBindings {
    #[serde(default = "default_key_accelerate")]
    pub accelerate: String,
    #[serde(default = "default_key_brake")]
    pub brake: String,
    #[serde(default = "default_key_turn_left")]
    pub turn_left: String,
    #[serde(default = "default_key_turn_right")]
    pub turn_right: String,
    #[serde(default = "default_key_strafe_left")]
    pub strafe_left: String,
    #[serde(default = "default_key_strafe_right")]
    pub strafe_right: String,
    #[serde(default = "default_key_rise")]
    pub rise: String,
    #[serde(default = "default_key_fall")]
    pub fall: String,
    #[serde(default = "default_key_toggle_camera")]
    pub toggle_camera: String,
    #[serde(default = "default_key_toggle_day_night")]
    pub toggle_day_night: String,
    #[serde(default = "default_key_launch")]
    pub launch: String,
}

fn default_max_speed() -> f32 {
    9.0
}
fn default_acceleration() -> f32 {
    4.5
}
fn default_base_turn_rate() -> f32 {
    100.0
}
fn default_reverse_turn_modifier() -> f32 {
    0.7
}
fn default_min_turn_speed() -> f32 {
    1.0
}
fn default_drag_factor() -> f32 {
    0.65
}
fn default_stop_threshold() -> f32 {
    0.1
}

fn default_side_distance() -> f32 {
    3.0
}
fn default_ghost1_speed() -> f32 {
    15.0
}
fn default_ghost2_speed() -> f32 {
    6.0
}
fn default_ghost_alpha() -> f32 {
    0.5
}

fn default_sensitivity() -> f32 {
    0.05
}
fn default_zoom() -> f32 {
    45.0
}
fn default_near() -> f32 {
    0.1
}
fn default_far() -> f32 {
    100.0
}
fn default_aspect_ratio() -> f32 {
    800.0 / 600.0
}
fn default_follow_distance() -> f32 {
    7.0
}
fn default_follow_height() -> f32 {
    2.0
}
fn default_look_ahead() -> f32 {
    3.0
}
fn default_eye_height() -> f32 {
    0.5
}
fn default_first_person_forward() -> f32 {
    1.5
}

fn default_finish_line_z() -> f32 {
    40.0
}
fn default_player_start() -> [f32; 3] {
    [0.0, 0.05, -48.0]
}
fn default_landmark_spacing() -> f32 {
    15.0
}
fn default_landmark_offset() -> f32 {
    5.0
}

fn default_key_accelerate() -> String {
    "W".to_string()
}
fn default_key_brake() -> String {
    "S".to_string()
}
fn default_key_turn_left() -> String {
    "A".to_string()
}
fn default_key_turn_right() -> String {
    "D".to_string()
}
fn default_key_strafe_left() -> String {
    "Left".to_string()
}
fn default_key_strafe_right() -> String {
    "Right".to_string()
}
fn default_key_rise() -> String {
    "R".to_string()
}
fn default_key_fall() -> String {
    "LShift".to_string()
}
fn default_key_toggle_camera() -> String {
    "Z".to_string()
}
fn default_key_toggle_day_night() -> String {
    "Q".to_string()
}
fn default_key_launch() -> String {
    "Space".to_string()
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            max_speed: default_max_speed(),
            acceleration: default_acceleration(),
            base_turn_rate: default_base_turn_rate(),
            reverse_turn_modifier: default_reverse_turn_modifier(),
            min_turn_speed: default_min_turn_speed(),
            drag_factor: default_drag_factor(),
            stop_threshold: default_stop_threshold(),
        }
    }
}

impl Default for GhostConfig {
    fn default() -> Self {
        Self {
            side_distance: default_side_distance(),
            ghost1_speed: default_ghost1_speed(),
            ghost2_speed: default_ghost2_speed(),
            alpha: default_ghost_alpha(),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            sensitivity: default_sensitivity(),
            initial_zoom: default_zoom(),
            initial_yaw: 0.0,
            near: default_near(),
            far: default_far(),
            aspect_ratio: default_aspect_ratio(),
            follow_distance: default_follow_distance(),
            follow_height: default_follow_height(),
            look_ahead: default_look_ahead(),
            look_height: default_eye_height(),
            first_person_forward: default_first_person_forward(),
            first_person_height: default_eye_height(),
        }
    }
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            finish_line_z: default_finish_line_z(),
            player_start: default_player_start(),
            landmark_spacing: default_landmark_spacing(),
            landmark_offset: default_landmark_offset(),
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            accelerate: default_key_accelerate(),
            brake: default_key_brake(),
            turn_left: default_key_turn_left(),
            turn_right: default_key_turn_right(),
            strafe_left: default_key_strafe_left(),
            strafe_right: default_key_strafe_right(),
            rise: default_key_rise(),
            fall: default_key_fall(),
            toggle_camera: default_key_toggle_camera(),
            toggle_day_night: default_key_toggle_day_night(),
            launch: default_key_launch(),
        }
    }
}

impl KeyBindings {
    /// Key bound to a control
    pub fn key_for(&self, control: Control) -> &str {
        match control {
            Control::Accelerate => &self.accelerate,
            Control::Brake => &self.brake,
            Control::TurnLeft => &self.turn_left,
            Control::TurnRight => &self.turn_right,
            Control::StrafeLeft => &self.strafe_left,
            Control::StrafeRight => &self.strafe_right,
            Control::Rise => &self.rise,
            Control::Fall => &self.fall,
            Control::ToggleCamera => &self.toggle_camera,
            Control::ToggleDayNight => &self.toggle_day_night,
            Control::LaunchGhosts => &self.launch,
        }
    }

    /// Control bound to a key name, if any
    pub fn control_for_key(&self, key: &str) -> Option<Control> {
        let key = key.trim();
        Control::ALL
            .into_iter()
            .find(|c| self.key_for(*c).eq_ignore_ascii_case(key))
    }
}

/// Configuration persistence errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no home directory available for config storage")]
    NoConfigDir,
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("failed to write config: {0}")]
    Io(#[from] std::io::Error),
}

/// Returns the platform-specific configuration directory.
///
/// On Windows: `%APPDATA%\Ghostkart\config`
/// On macOS: `~/Library/Application Support/io.ghostkart.Ghostkart`
/// On Linux: `~/.config/Ghostkart`
///
/// Returns `None` if the home directory cannot be determined.
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("io.ghostkart", "", "Ghostkart")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Path of `config.toml`, if a config directory exists
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

/// Loads the configuration from disk.
///
/// Returns default values if the file doesn't exist or cannot be parsed.
pub fn load() -> GameConfig {
    config_path()
        .and_then(|path| std::fs::read_to_string(path).ok())
        .and_then(|content| toml::from_str(&content).ok())
        .unwrap_or_default()
}

/// Saves the configuration to `config.toml`, creating the directory if needed.
///
/// Returns the path written.
pub fn save(config: &GameConfig) -> Result<PathBuf, ConfigError> {
    let dir = config_dir().ok_or(ConfigError::NoConfigDir)?;
    save_to(config, &dir)
}

/// Saves the configuration into an explicit directory.
pub fn save_to(config: &GameConfig, dir: &std::path::Path) -> Result<PathBuf, ConfigError> {
    std::fs::create_dir_all(dir)?;
    let content = toml::to_string_pretty(config)?;
    let path = dir.join("config.toml");
    std::fs::write(&path, content)?;
    Ok(path)
}

/// Validate that no two controls share a key.
///
/// Returns a list of warning messages for any conflicts found.
pub fn validate_keybindings(config: &GameConfig) -> Vec<String> {
    let mut warnings = Vec::new();
    let mut used_keys: hashbrown::HashMap<String, Control> = hashbrown::HashMap::new();

    for control in Control::ALL {
        let key = config.keys.key_for(control);
        if key.trim().is_empty() {
            warnings.push(format!("keys.{} is unbound", control));
            continue;
        }
        if let Some(existing) = used_keys.insert(key.to_uppercase(), control) {
            warnings.push(format!(
                "keys.{} key '{}' conflicts with keys.{}",
                control, key, existing
            ));
        }
    }

    warnings
}
