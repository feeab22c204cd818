//! Tunables loaded from a JSON file. Every field has a default, so a partial
//! file (or no file at all) is valid.

use std::fs;
use std::path::Path;

use glam::Vec3;
use serde::Deserialize;

use crate::error::ConfigError;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub window: WindowConfig,
    pub controller: ControllerConfig,
    pub camera: CameraConfig,
    pub probe: ProbeConfig,
    /// Clip library handed to every character's animation mixer.
    pub clips: Vec<ClipSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// x: strafe, y: turn rate scale, z: forward/back.
    pub acceleration: Vec3,
    /// Per-axis decay rates. Negative; z decays fastest.
    pub deceleration: Vec3,
    pub sprint_multiplier: f32,
    /// Seconds for both the fade-out and the fade-in of a state change.
    pub crossfade: f32,
    pub idle_clip: String,
    pub walk_clip: String,
    pub spawn: Vec3,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub offset: Vec3,
    pub look_at: Vec3,
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub orbit_target: Vec3,
    pub orbit_min_distance: f32,
    pub orbit_max_distance: f32,
    pub orbit_damping: f32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    pub ground_min_distance: f32,
    pub ground_max_distance: f32,
    /// Height gained per tick when the down ray finds nothing.
    pub no_ground_drift: f32,
    pub obstacle_distance: f32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClipSpec {
    pub name: String,
    pub duration: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            controller: ControllerConfig::default(),
            camera: CameraConfig::default(),
            probe: ProbeConfig::default(),
            clips: vec![
                ClipSpec { name: "idle".into(), duration: 2.0 },
                ClipSpec { name: "walk".into(), duration: 1.0 },
            ],
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Tiny Cabin".into(),
            width: 1280,
            height: 720,
        }
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            acceleration: Vec3::new(1.0, 0.25, 50.0),
            deceleration: Vec3::new(-0.0005, -0.0001, -5.0),
            sprint_multiplier: 2.0,
            crossfade: 0.5,
            idle_clip: "idle".into(),
            walk_clip: "walk".into(),
            spawn: Vec3::new(0.0, 1.0, 0.0),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            offset: Vec3::new(0.0, 10.0, -25.0),
            look_at: Vec3::new(0.0, 0.0, 15.0),
            fov: 60.0,
            near: 1.0,
            far: 1000.0,
            orbit_target: Vec3::new(0.0, 10.0, 0.0),
            orbit_min_distance: 10.0,
            orbit_max_distance: 50.0,
            orbit_damping: 0.05,
        }
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            ground_min_distance: 1.0,
            ground_max_distance: 1.0,
            no_ground_drift: 0.1,
            obstacle_distance: 0.5,
        }
    }
}

impl GameConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.controller;
        if !(c.crossfade > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "controller.crossfade must be positive, got {}",
                c.crossfade
            )));
        }
        if c.deceleration.max_element() > 0.0 {
            return Err(ConfigError::Invalid(
                "controller.deceleration components must not be positive".into(),
            ));
        }
        let p = &self.probe;
        if p.ground_min_distance > p.ground_max_distance {
            return Err(ConfigError::Invalid(format!(
                "probe.ground_min_distance ({}) exceeds ground_max_distance ({})",
                p.ground_min_distance, p.ground_max_distance
            )));
        }
        let cam = &self.camera;
        if cam.orbit_min_distance > cam.orbit_max_distance {
            return Err(ConfigError::Invalid(
                "camera.orbit_min_distance exceeds orbit_max_distance".into(),
            ));
        }
        if let Some(clip) = self.clips.iter().find(|c| !(c.duration > 0.0)) {
            return Err(ConfigError::Invalid(format!(
                "clip `{}` has non-positive duration {}",
                clip.name, clip.duration
            )));
        }
        Ok(())
    }
}
