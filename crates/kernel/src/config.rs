use std::path::Path;

use boatclub_common::Rgb;
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::camera::{CameraState, Projection};
use crate::patrol::PatrolConfig;

/// Errors from loading or validating a scene configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid patrol {index}: {reason}")]
    InvalidPatrol { index: usize, reason: &'static str },
    #[error("invalid projection: {0}")]
    InvalidProjection(&'static str),
    #[error("invalid camera: {0}")]
    InvalidCamera(&'static str),
}

/// Step sizes applied by one key press.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    pub angle_step_degrees: f32,
    pub move_step: f32,
    pub height_step: f32,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            angle_step_degrees: 10.0,
            move_step: 0.5,
            height_step: 0.5,
        }
    }
}

/// Directional light plus ambient term.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lighting {
    pub color: Rgb,
    /// Direction toward the light; normalized before use.
    pub direction: Vec3,
    pub ambient: Rgb,
    /// Diffuse multiplier for textured surfaces.
    pub textured_boost: f32,
    pub clear_color: Rgb,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            color: Rgb::WHITE,
            // The light hangs at (0, 20, 0) above the scene origin.
            direction: Vec3::Y,
            ambient: Rgb::new(0.2, 0.2, 0.2),
            textured_boost: 1.2,
            clear_color: Rgb::new(0.6, 0.9, 0.9),
        }
    }
}

/// Complete scene configuration. `Default` reproduces the stock scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub camera: CameraState,
    pub controls: ControlConfig,
    pub projection: Projection,
    pub lighting: Lighting,
    pub patrols: Vec<PatrolConfig>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            camera: CameraState::default(),
            controls: ControlConfig::default(),
            projection: Projection::default(),
            lighting: Lighting::default(),
            patrols: vec![
                PatrolConfig::default(),
                PatrolConfig {
                    anchor: Vec3::new(7.0, -0.05, 6.5),
                    leg_length: 8.0,
                    speed: 0.04,
                    ..PatrolConfig::default()
                },
            ],
        }
    }
}

impl SceneConfig {
    /// Load a configuration from a YAML file and validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&text)
    }

    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        config.camera.turn(0.0);
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Reject values the scene cannot run with. Every number must be
    /// finite; NaN would otherwise slip past the range checks below.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.camera;
        if ![c.height, c.yaw, c.pitch, c.x, c.z].iter().all(|v| v.is_finite()) {
            return Err(ConfigError::InvalidCamera("camera values must be finite"));
        }
        let k = &self.controls;
        if ![k.angle_step_degrees, k.move_step, k.height_step]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err(ConfigError::InvalidCamera("control steps must be finite"));
        }

        let p = &self.projection;
        if ![p.fov_degrees, p.aspect, p.near, p.far].iter().all(|v| v.is_finite()) {
            return Err(ConfigError::InvalidProjection("values must be finite"));
        }
        if !(p.fov_degrees > 0.0 && p.fov_degrees < 180.0) {
            return Err(ConfigError::InvalidProjection("fov must be in (0, 180)"));
        }
        if !(p.near > 0.0 && p.far > p.near) {
            return Err(ConfigError::InvalidProjection("need 0 < near < far"));
        }
        if p.aspect <= 0.0 {
            return Err(ConfigError::InvalidProjection("aspect must be positive"));
        }

        for (index, patrol) in self.patrols.iter().enumerate() {
            let invalid = |reason| ConfigError::InvalidPatrol { index, reason };
            let scalars = [
                patrol.course_degrees,
                patrol.leg_length,
                patrol.speed,
                patrol.turn_delta_degrees,
                patrol.turn_angle_degrees,
                patrol.start_heading_degrees,
            ];
            if !patrol.anchor.is_finite() || !scalars.iter().all(|v| v.is_finite()) {
                return Err(invalid("values must be finite"));
            }
            if patrol.leg_length <= 0.0 {
                return Err(invalid("leg_length must be positive"));
            }
            if patrol.speed <= 0.0 {
                return Err(invalid("speed must be positive"));
            }
            // A zero pivot delta would park the actor forever.
            if patrol.turn_delta_degrees <= 0.0 {
                return Err(invalid("turn_delta_degrees must be positive"));
            }
            if patrol.turn_angle_degrees < 0.0 {
                return Err(invalid("turn_angle_degrees must not be negative"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn non_finite_values_are_rejected() {
        for yaml in [
            "patrols:\n  - speed: .nan\n",
            "patrols:\n  - leg_length: .inf\n",
            "patrols:\n  - anchor: [.nan, 0.0, 0.0]\n",
            "projection:\n  far: .inf\n",
            "projection:\n  fov_degrees: .nan\n",
            "camera:\n  height: .nan\n",
            "controls:\n  move_step: -.inf\n",
        ] {
            assert!(SceneConfig::from_yaml(yaml).is_err(), "accepted {yaml:?}");
        }
    }

    #[test]
    fn loaded_yaw_is_wrapped() {
        let config = SceneConfig::from_yaml("camera:\n  yaw: 400\n").unwrap();
        assert!((config.camera.yaw - 40.0).abs() < 1e-4);
        let config = SceneConfig::from_yaml("camera:\n  yaw: -30\n").unwrap();
        assert!((config.camera.yaw - 330.0).abs() < 1e-4);
    }

    #[test]
    fn default_config_is_valid() {
        let config = SceneConfig::default();
        config.validate().unwrap();
        assert_eq!(config.patrols.len(), 2);
        assert_eq!(config.controls.angle_step_degrees, 10.0);
        assert_eq!(config.lighting.textured_boost, 1.2);
    }

    #[test]
    fn yaml_roundtrip_keeps_values() {
        let config = SceneConfig::default();
        let text = config.to_yaml().unwrap();
        let back = SceneConfig::from_yaml(&text).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let config = SceneConfig::from_yaml("camera:\n  yaw: 10.0\n").unwrap();
        assert_eq!(config.camera.yaw, 10.0);
        assert_eq!(config.camera.height, 27.0);
        assert_eq!(config.projection, Projection::default());
    }

    #[test]
    fn zero_turn_delta_is_rejected() {
        let mut config = SceneConfig::default();
        config.patrols[1].turn_delta_degrees = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPatrol { index: 1, .. })
        ));
    }

    #[test]
    fn bad_projection_is_rejected() {
        let mut config = SceneConfig::default();
        config.projection.near = 200.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidProjection(_))
        ));
    }

    #[test]
    fn load_from_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp, "patrols:\n  - leg_length: 4.0\n    speed: 0.5").unwrap();
        let config = SceneConfig::load(tmp.path()).unwrap();
        assert_eq!(config.patrols.len(), 1);
        assert_eq!(config.patrols[0].leg_length, 4.0);
        assert_eq!(config.patrols[0].turn_delta_degrees, 30.0);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = SceneConfig::load("/nonexistent/boatclub.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
