use std::fmt;

use boatclub_kernel::{PatrolPhase, SceneState};

/// Scene inspector for developer tooling.
///
/// Read-only queries against scene state, used by the HUD and the CLI.
pub struct SceneInspector;

impl SceneInspector {
    /// Produce a summary of the scene state.
    pub fn summary(state: &SceneState) -> SceneSummary {
        SceneSummary {
            tick: state.tick(),
            camera: Self::camera(state),
            actors: (0..state.actors().len())
                .filter_map(|i| Self::inspect_actor(state, i))
                .collect(),
            pending_events: state.events().len(),
        }
    }

    pub fn camera(state: &SceneState) -> CameraInfo {
        let c = state.camera();
        CameraInfo {
            height: c.height,
            yaw: c.yaw,
            pitch: c.pitch,
            x: c.x,
            z: c.z,
        }
    }

    /// Position and phase of one patrolling actor.
    pub fn inspect_actor(state: &SceneState, index: usize) -> Option<ActorInfo> {
        state.actors().get(index).map(|actor| {
            let p = actor.motion.position(&actor.config);
            ActorInfo {
                index,
                position: [p.x, p.y, p.z],
                heading: actor.motion.heading_degrees,
                distance: actor.motion.distance,
                phase: actor.motion.phase,
            }
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraInfo {
    pub height: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub x: f32,
    pub z: f32,
}

impl fmt::Display for CameraInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Camera: height={:.1} yaw={:.0} pitch={:.0} x={:.2} z={:.2}",
            self.height, self.yaw, self.pitch, self.x, self.z
        )
    }
}

/// Summary of scene state for the inspector.
#[derive(Debug, Clone)]
pub struct SceneSummary {
    pub tick: u64,
    pub camera: CameraInfo,
    pub actors: Vec<ActorInfo>,
    pub pending_events: usize,
}

impl fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Scene: tick={} actors={} pending_events={}",
            self.tick,
            self.actors.len(),
            self.pending_events
        )?;
        writeln!(f, "{}", self.camera)?;
        for actor in &self.actors {
            writeln!(f, "  {actor}")?;
        }
        Ok(())
    }
}

/// Detailed info about a single patrolling actor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActorInfo {
    pub index: usize,
    pub position: [f32; 3],
    pub heading: f32,
    pub distance: f32,
    pub phase: PatrolPhase,
}

impl fmt::Display for ActorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Boat {} pos=({:.2}, {:.2}, {:.2}) heading={:.0} distance={:.2} {:?}",
            self.index,
            self.position[0],
            self.position[1],
            self.position[2],
            self.heading,
            self.distance,
            self.phase,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boatclub_kernel::SceneConfig;

    #[test]
    fn summary_default_scene() {
        let state = SceneState::new();
        let summary = SceneInspector::summary(&state);
        assert_eq!(summary.tick, 0);
        assert_eq!(summary.actors.len(), 2);
        assert_eq!(summary.camera.yaw, 70.0);
        assert_eq!(summary.camera.height, 27.0);
    }

    #[test]
    fn actor_info_tracks_motion() {
        let mut state = SceneState::new();
        for _ in 0..10 {
            state.step();
        }
        let info = SceneInspector::inspect_actor(&state, 0).unwrap();
        assert!((info.distance - 0.5).abs() < 1e-5);
        assert_eq!(info.phase, PatrolPhase::AdvancingForward);
        // Course 90 degrees moves along +x from the anchor.
        assert!((info.position[0] - 5.5).abs() < 1e-4);
        assert!((info.position[2] - 3.9).abs() < 1e-4);
    }

    #[test]
    fn inspect_missing_actor() {
        let mut config = SceneConfig::default();
        config.patrols.clear();
        let state = SceneState::from_config(&config).unwrap();
        assert!(SceneInspector::inspect_actor(&state, 0).is_none());
        assert!(SceneInspector::summary(&state).actors.is_empty());
    }

    #[test]
    fn summary_display() {
        let summary = SceneInspector::summary(&SceneState::new());
        let s = format!("{summary}");
        assert!(s.contains("tick=0"));
        assert!(s.contains("yaw=70"));
        assert!(s.contains("Boat 1"));
        assert!(s.contains("AdvancingForward"));
    }
}
