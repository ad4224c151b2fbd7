use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Tunable constants of one patrolling actor.
///
/// The leg length and pivot increment are plain parameters; nothing in the
/// motion depends on their particular values beyond being positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatrolConfig {
    /// Mooring point the motion offset is added to, in the fleet frame.
    pub anchor: Vec3,
    /// Compass angle of the leg in degrees; displacement is `step * (sin, cos)`.
    pub course_degrees: f32,
    /// Distance travelled along a leg before turning.
    pub leg_length: f32,
    /// Distance moved per tick.
    pub speed: f32,
    /// Heading change per tick while pivoting.
    pub turn_delta_degrees: f32,
    /// Total heading change of one pivot.
    pub turn_angle_degrees: f32,
    /// Heading at the near end of the leg.
    pub start_heading_degrees: f32,
}

impl Default for PatrolConfig {
    fn default() -> Self {
        Self {
            anchor: Vec3::new(5.0, -0.05, 3.9),
            course_degrees: 90.0,
            leg_length: 10.0,
            speed: 0.05,
            turn_delta_degrees: 30.0,
            turn_angle_degrees: 180.0,
            start_heading_degrees: 0.0,
        }
    }
}

impl PatrolConfig {
    fn turned_heading(&self) -> f32 {
        self.start_heading_degrees + self.turn_angle_degrees
    }

    fn course_direction(&self) -> (f32, f32) {
        let (sin, cos) = self.course_degrees.to_radians().sin_cos();
        (sin, cos)
    }
}

/// Phase of the patrol cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatrolPhase {
    AdvancingForward,
    TurningAtFarEnd,
    AdvancingBackward,
    TurningAtNearEnd,
}

/// Per-actor motion state, advanced once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActorMotion {
    /// Planar displacement from the anchor (x, z).
    pub offset_x: f32,
    pub offset_z: f32,
    pub heading_degrees: f32,
    /// Signed distance per tick; zero while pivoting.
    pub step: f32,
    /// Distance travelled along the current leg.
    pub distance: f32,
    pub phase: PatrolPhase,
}

impl ActorMotion {
    /// Starting configuration: at the anchor, unturned, about to advance.
    pub fn new(config: &PatrolConfig) -> Self {
        Self {
            offset_x: 0.0,
            offset_z: 0.0,
            heading_degrees: config.start_heading_degrees,
            step: config.speed,
            distance: 0.0,
            phase: PatrolPhase::AdvancingForward,
        }
    }

    /// Position of the actor in the fleet frame.
    pub fn position(&self, config: &PatrolConfig) -> Vec3 {
        config.anchor + Vec3::new(self.offset_x, 0.0, self.offset_z)
    }

    /// Advance by one tick. Returns the previous phase when the phase changed.
    ///
    /// Past either bound the step is held at zero while the heading pivots by
    /// a fixed delta per tick; motion resumes, reversed, only once the pivot
    /// has completed.
    pub fn tick(&mut self, config: &PatrolConfig) -> Option<PatrolPhase> {
        let before = self.phase;

        if self.distance > config.leg_length {
            let turned = config.turned_heading();
            if self.heading_degrees >= turned {
                self.step = -config.speed;
                self.phase = PatrolPhase::AdvancingBackward;
            } else {
                self.step = 0.0;
                self.heading_degrees = (self.heading_degrees + config.turn_delta_degrees).min(turned);
                self.phase = PatrolPhase::TurningAtFarEnd;
            }
        } else if self.distance < 0.0 {
            let start = config.start_heading_degrees;
            if self.heading_degrees <= start {
                self.step = config.speed;
                self.phase = PatrolPhase::AdvancingForward;
            } else {
                self.step = 0.0;
                self.heading_degrees = (self.heading_degrees - config.turn_delta_degrees).max(start);
                self.phase = PatrolPhase::TurningAtNearEnd;
            }
        }

        if self.step != 0.0 {
            let (sin, cos) = config.course_direction();
            self.distance += self.step;
            self.offset_x += self.step * sin;
            self.offset_z += self.step * cos;
        }

        (self.phase != before).then_some(before)
    }
}
