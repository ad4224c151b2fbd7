use boatclub_kernel::{CameraState, ControlConfig};

/// A discrete camera adjustment produced by one key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraAction {
    PitchUp,
    PitchDown,
    YawRight,
    YawLeft,
    Forward,
    Backward,
    StrafeLeft,
    StrafeRight,
    Raise,
    Lower,
}

impl CameraAction {
    /// Apply the action's delta to the camera using the configured step sizes.
    pub fn apply(self, camera: &mut CameraState, controls: &ControlConfig) {
        let angle = controls.angle_step_degrees;
        let step = controls.move_step;
        match self {
            Self::PitchUp => camera.tilt(-angle),
            Self::PitchDown => camera.tilt(angle),
            Self::YawRight => camera.turn(angle),
            Self::YawLeft => camera.turn(-angle),
            Self::Forward => camera.advance(step),
            Self::Backward => camera.advance(-step),
            Self::StrafeLeft => camera.strafe(step),
            Self::StrafeRight => camera.strafe(-step),
            Self::Raise => camera.raise(controls.height_step),
            Self::Lower => camera.raise(-controls.height_step),
        }
        tracing::trace!(action = ?self, ?camera, "camera action applied");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply_n(action: CameraAction, n: usize, camera: &mut CameraState) {
        let controls = ControlConfig::default();
        for _ in 0..n {
            action.apply(camera, &controls);
        }
    }

    #[test]
    fn right_arrow_36_times_is_a_full_turn() {
        let mut cam = CameraState::default();
        apply_n(CameraAction::YawRight, 36, &mut cam);
        assert_eq!(cam.yaw, 70.0);
    }

    #[test]
    fn yaw_left_wraps_below_zero() {
        let mut cam = CameraState {
            yaw: 0.0,
            ..CameraState::default()
        };
        apply_n(CameraAction::YawLeft, 1, &mut cam);
        assert_eq!(cam.yaw, 350.0);
    }

    #[test]
    fn pitch_keys_are_opposites() {
        let mut cam = CameraState::default();
        apply_n(CameraAction::PitchUp, 1, &mut cam);
        assert_eq!(cam.pitch, 35.0);
        apply_n(CameraAction::PitchDown, 2, &mut cam);
        assert_eq!(cam.pitch, 55.0);
    }

    #[test]
    fn height_steps_by_half_unit() {
        let mut cam = CameraState::default();
        apply_n(CameraAction::Raise, 3, &mut cam);
        assert_eq!(cam.height, 28.5);
        apply_n(CameraAction::Lower, 1, &mut cam);
        assert_eq!(cam.height, 28.0);
    }

    #[test]
    fn forward_then_backward_returns_home() {
        let start = CameraState::default();
        let mut cam = start;
        apply_n(CameraAction::Forward, 5, &mut cam);
        assert!((cam.x - start.x).abs() > 0.1 || (cam.z - start.z).abs() > 0.1);
        apply_n(CameraAction::Backward, 5, &mut cam);
        assert!((cam.x - start.x).abs() < 1e-4);
        assert!((cam.z - start.z).abs() < 1e-4);
    }

    #[test]
    fn strafe_is_perpendicular_to_forward() {
        let mut fwd = CameraState::default();
        let mut side = CameraState::default();
        apply_n(CameraAction::Forward, 1, &mut fwd);
        apply_n(CameraAction::StrafeLeft, 1, &mut side);
        let start = CameraState::default();
        let f = (fwd.x - start.x, fwd.z - start.z);
        let s = (side.x - start.x, side.z - start.z);
        assert!((f.0 * s.0 + f.1 * s.1).abs() < 1e-4);
    }
}
