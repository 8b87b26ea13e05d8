use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Fixed simulation step in seconds (60 Hz).
pub const DEFAULT_FIXED_DT: f32 = 1.0 / 60.0;

/// World size of one horizontal LEGO module; control speeds are in modules/s.
pub const LEGO_HORIZONTAL_MODULE: f32 = 0.8;

/// Which locomotion scheme drives an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ControlType {
    #[default]
    Hovercraft,
    Aircraft,
    Character,
}

/// How input axes map to movement and turning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum InputType {
    /// Turn relative to self: the horizontal axis turns, the vertical axis drives.
    Tank,
    /// Move relative to the camera and turn towards the direction of travel.
    #[default]
    Direct,
    /// Move relative to the camera and keep facing the camera's forward.
    Strafe,
}

impl InputType {
    /// Whether the input axes are read in camera space.
    pub fn camera_relative_movement(self) -> bool {
        !matches!(self, Self::Tank)
    }

    /// Whether the agent keeps facing the camera's forward.
    pub fn camera_aligned_rotation(self) -> bool {
        matches!(self, Self::Strafe)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlSettings {
    pub control_type: ControlType,
    pub input_type: InputType,
    /// Speed in LEGO modules per second, 1..=30.
    pub speed: u32,
    /// Turn rate in degrees per second, 0..=720.
    pub rotation_speed: u32,
    /// Other behaviours treat this agent as the player.
    pub is_player: bool,
    /// Always drift forward at half the top speed.
    pub always_moving_forward: bool,
    /// Smooth the input direction instead of applying it instantly.
    pub use_acceleration: bool,
    /// Time to go from rest to full input is `1 / normalized_acceleration` seconds.
    pub normalized_acceleration: f32,
    /// How long movement is held after bumping into something.
    pub bounce_duration: f32,
}

impl Default for ControlSettings {
    fn default() -> Self {
        Self {
            control_type: ControlType::default(),
            input_type: InputType::default(),
            speed: 20,
            rotation_speed: 360,
            is_player: true,
            always_moving_forward: false,
            use_acceleration: true,
            normalized_acceleration: 2.0,
            bounce_duration: 0.1,
        }
    }
}

impl ControlSettings {
    pub fn validate(&self) -> Result<()> {
        if !(1..=30).contains(&self.speed) {
            return Err(Error::InvalidConfig(format!(
                "control.speed must be within 1..=30, got {}",
                self.speed
            )));
        }
        if self.rotation_speed > 720 {
            return Err(Error::InvalidConfig(format!(
                "control.rotation_speed must be within 0..=720, got {}",
                self.rotation_speed
            )));
        }
        if self.normalized_acceleration <= 0.0 {
            return Err(Error::InvalidConfig(
                "control.normalized_acceleration must be positive".into(),
            ));
        }
        if self.bounce_duration < 0.0 {
            return Err(Error::InvalidConfig(
                "control.bounce_duration must not be negative".into(),
            ));
        }
        Ok(())
    }

    /// Top speed in world units per second.
    pub fn world_speed(&self) -> f32 {
        self.speed as f32 * LEGO_HORIZONTAL_MODULE
    }
}

/// Character locomotion constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterTuning {
    /// Launch speed before the body's half height is added.
    pub jump_speed: f32,
    pub jump_cooldown: f32,
    /// Height of the ground probes above the feet; also the tallest step.
    pub probe_height: f32,
    /// Extra ray length below the feet that still counts as ground.
    pub raycast_extension: f32,
    pub probe_radius: f32,
    /// How far ahead of the corners the probes look, per unit of input.
    pub lookahead: f32,
    pub gravity: Vec3,
    /// Added to the jump velocity every step while it is above gravity.
    pub jump_momentum: Vec3,
    /// Time off the ground before falling starts.
    pub in_air_threshold: f32,
    /// Minimum air time for a landing to squash.
    pub landing_threshold: f32,
    pub animation_duration: f32,
    pub rotation_multiplier: f32,
    /// Minimum `collision` normal Y that counts as standing on something.
    pub floor_normal_y: f32,
}

impl Default for CharacterTuning {
    fn default() -> Self {
        Self {
            jump_speed: 8.0,
            jump_cooldown: 1.0,
            probe_height: 1.2,
            raycast_extension: 0.2,
            probe_radius: 0.1,
            lookahead: 2.0,
            gravity: Vec3::new(0.0, -12.0, 0.0),
            jump_momentum: Vec3::new(0.0, -0.5, 0.0),
            in_air_threshold: 0.2,
            landing_threshold: 0.05,
            animation_duration: 0.4,
            rotation_multiplier: 7.0,
            floor_normal_y: 0.9,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HovercraftTuning {
    /// Deceleration of the bounce velocity in units/s².
    pub collision_acceleration: f32,
}

impl Default for HovercraftTuning {
    fn default() -> Self {
        Self {
            collision_acceleration: 25.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AircraftTuning {
    /// How far per second the up vector is pulled towards world up.
    pub roll_recovery: f32,
    pub roll_compensation: bool,
}

impl Default for AircraftTuning {
    fn default() -> Self {
        Self {
            roll_recovery: 40.0,
            roll_compensation: true,
        }
    }
}

/// What a look-at model turns towards.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookTarget {
    #[default]
    Player,
    Point(Option<Vec3>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookRotation {
    #[default]
    Horizontally,
    Vertically,
    Freely,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookAtSettings {
    pub target: LookTarget,
    pub rotate: LookRotation,
    /// Angular speed in degrees per second, at least 1.
    pub speed: f32,
    /// Duration of one look in seconds, at least 0.1.
    pub time: f32,
    /// Wait between looks in seconds.
    pub pause: f32,
    pub repeat: bool,
}

impl Default for LookAtSettings {
    fn default() -> Self {
        Self {
            target: LookTarget::Player,
            rotate: LookRotation::Horizontally,
            speed: 180.0,
            time: 1.0,
            pause: 0.0,
            repeat: true,
        }
    }
}

impl LookAtSettings {
    /// Raises speed and time to their minimums.
    pub fn sanitized(mut self) -> Self {
        self.speed = self.speed.max(1.0);
        self.time = self.time.max(0.1);
        self.pause = self.pause.max(0.0);
        self
    }
}

/// Every field has a default, so a config file only needs what it changes:
///
/// ```json
/// { "control": { "control_type": "hovercraft", "speed": 12 },
///   "hovercraft": { "collision_acceleration": 30.0 } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub fixed_dt: f32,
    pub control: ControlSettings,
    pub character: CharacterTuning,
    pub hovercraft: HovercraftTuning,
    pub aircraft: AircraftTuning,
    pub look_at: LookAtSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fixed_dt: DEFAULT_FIXED_DT,
            control: ControlSettings::default(),
            character: CharacterTuning::default(),
            hovercraft: HovercraftTuning::default(),
            aircraft: AircraftTuning::default(),
            look_at: LookAtSettings::default(),
        }
    }
}

impl Config {
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.fixed_dt > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "fixed_dt must be positive, got {}",
                self.fixed_dt
            )));
        }
        self.control.validate()?;
        if self.character.animation_duration <= 0.0 {
            return Err(Error::InvalidConfig(
                "character.animation_duration must be positive".into(),
            ));
        }
        if self.character.probe_height <= 0.0 {
            return Err(Error::InvalidConfig(
                "character.probe_height must be positive".into(),
            ));
        }
        if self.hovercraft.collision_acceleration < 0.0 {
            return Err(Error::InvalidConfig(
                "hovercraft.collision_acceleration must not be negative".into(),
            ));
        }
        Ok(())
    }
}
