use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Orbit camera parameters. Angles are in degrees.
///
/// Mutated only by discrete input; read once per frame to build the
/// view-projection transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraState {
    pub height: f32,
    /// Wraps within [0, 360).
    pub yaw: f32,
    /// Unbounded.
    pub pitch: f32,
    pub x: f32,
    pub z: f32,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            height: 27.0,
            yaw: 70.0,
            pitch: 45.0,
            x: 17.2,
            z: -23.4,
        }
    }
}

/// Perspective projection parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Projection {
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fov_degrees: 50.0,
            aspect: 1.0,
            near: 1.0,
            far: 100.0,
        }
    }
}

impl Projection {
    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }
}

impl CameraState {
    /// Turn the orbit by `degrees`, keeping yaw inside [0, 360).
    pub fn turn(&mut self, degrees: f32) {
        self.yaw = (self.yaw + degrees).rem_euclid(360.0);
        // rem_euclid can round up to exactly 360 for tiny negative inputs.
        if self.yaw >= 360.0 {
            self.yaw = 0.0;
        }
    }

    pub fn tilt(&mut self, degrees: f32) {
        self.pitch += degrees;
    }

    /// Move along the current yaw heading. Negative `step` moves backward.
    pub fn advance(&mut self, step: f32) {
        let (sin, cos) = self.yaw.to_radians().sin_cos();
        self.x -= step * sin;
        self.z += step * cos;
    }

    /// Move sideways relative to the current yaw. Positive `step` strafes left.
    pub fn strafe(&mut self, step: f32) {
        let (sin, cos) = self.yaw.to_radians().sin_cos();
        self.x += step * cos;
        self.z += step * sin;
    }

    pub fn raise(&mut self, amount: f32) {
        self.height += amount;
    }

    /// View transform: pitch, then yaw, then translation by (x, -height, z).
    ///
    /// Rotations precede the translation so the camera orbits the scene
    /// origin instead of spinning in place.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_x(self.pitch.to_radians())
            * Mat4::from_rotation_y(self.yaw.to_radians())
            * Mat4::from_translation(Vec3::new(self.x, -self.height, self.z))
    }

    pub fn view_projection(&self, projection: &Projection) -> Mat4 {
        projection.matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_camera_matches_scene_setup() {
        let cam = CameraState::default();
        assert_eq!(cam.height, 27.0);
        assert_eq!(cam.yaw, 70.0);
        assert_eq!(cam.pitch, 45.0);
        assert_eq!(cam.x, 17.2);
        assert_eq!(cam.z, -23.4);
    }

    #[test]
    fn yaw_wraps_upward_to_zero() {
        let mut cam = CameraState {
            yaw: 350.0,
            ..CameraState::default()
        };
        cam.turn(10.0);
        assert_eq!(cam.yaw, 0.0);
    }

    #[test]
    fn yaw_wraps_downward_to_350() {
        let mut cam = CameraState {
            yaw: 0.0,
            ..CameraState::default()
        };
        cam.turn(-10.0);
        assert_eq!(cam.yaw, 350.0);
    }

    #[test]
    fn full_turn_returns_to_start() {
        let mut cam = CameraState::default();
        for _ in 0..36 {
            cam.turn(10.0);
            assert!((0.0..360.0).contains(&cam.yaw));
        }
        assert_eq!(cam.yaw, 70.0);
    }

    #[test]
    fn pitch_is_unbounded() {
        let mut cam = CameraState::default();
        for _ in 0..40 {
            cam.tilt(10.0);
        }
        assert_eq!(cam.pitch, 445.0);
    }

    #[test]
    fn advance_and_strafe_follow_yaw() {
        let mut cam = CameraState {
            yaw: 0.0,
            x: 0.0,
            z: 0.0,
            ..CameraState::default()
        };
        cam.advance(0.5);
        assert!((cam.x).abs() < 1e-6);
        assert!((cam.z - 0.5).abs() < 1e-6);

        cam.strafe(0.5);
        assert!((cam.x - 0.5).abs() < 1e-6);
        assert!((cam.z - 0.5).abs() < 1e-6);

        cam.yaw = 90.0;
        cam.advance(-0.5);
        assert!((cam.x - 1.0).abs() < 1e-6);
    }

    #[test]
    fn view_translates_before_rotating() {
        let cam = CameraState {
            height: 10.0,
            yaw: 0.0,
            pitch: 0.0,
            x: 0.0,
            z: 0.0,
        };
        // With no rotation, a point at camera height ends at the eye's level.
        let p = cam.view_matrix().transform_point3(Vec3::new(0.0, 10.0, 0.0));
        assert!(p.length() < 1e-6);
    }

    #[test]
    fn view_projection_is_finite() {
        let vp = CameraState::default().view_projection(&Projection::default());
        assert!(vp.to_cols_array().iter().all(|v| v.is_finite()));
    }
}
