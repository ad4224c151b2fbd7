use glam::Mat4;
use serde::{Deserialize, Serialize};

use crate::camera::{CameraState, Projection};
use crate::config::{ConfigError, ControlConfig, Lighting, SceneConfig};
use crate::patrol::{ActorMotion, PatrolConfig, PatrolPhase};

/// A record produced whenever a patrolling actor changes phase.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatrolEvent {
    pub tick: u64,
    pub actor: usize,
    pub from: PatrolPhase,
    pub to: PatrolPhase,
}

/// One patrolling actor: its constants and its live motion state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Actor {
    pub config: PatrolConfig,
    pub motion: ActorMotion,
}

/// Most recent phase changes kept when nobody drains the log.
pub const EVENT_LOG_CAPACITY: usize = 256;

/// Camera and actor state of the scene, passed explicitly into update and draw.
///
/// All mutations go through explicit operations; nothing here is global.
#[derive(Debug, Clone)]
pub struct SceneState {
    camera: CameraState,
    projection: Projection,
    controls: ControlConfig,
    lighting: Lighting,
    actors: Vec<Actor>,
    tick: u64,
    /// Phase transitions since the last drain, newest last, at most
    /// `EVENT_LOG_CAPACITY` entries.
    events: Vec<PatrolEvent>,
}

impl Default for SceneState {
    fn default() -> Self {
        Self::from_valid_config(&SceneConfig::default())
    }
}

impl SceneState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the state from a configuration, rejecting invalid parameters.
    pub fn from_config(config: &SceneConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: &SceneConfig) -> Self {
        let actors = config
            .patrols
            .iter()
            .map(|p| Actor {
                config: *p,
                motion: ActorMotion::new(p),
            })
            .collect();
        let mut camera = config.camera;
        camera.turn(0.0);
        Self {
            camera,
            projection: config.projection,
            controls: config.controls,
            lighting: config.lighting,
            actors,
            tick: 0,
            events: Vec::new(),
        }
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut CameraState {
        &mut self.camera
    }

    pub fn controls(&self) -> &ControlConfig {
        &self.controls
    }

    pub fn lighting(&self) -> &Lighting {
        &self.lighting
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Update the projection aspect ratio, e.g. after a window resize.
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.projection.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub fn view_projection(&self) -> Mat4 {
        self.camera.view_projection(&self.projection)
    }

    /// Advance every actor by exactly one tick.
    ///
    /// The step is fixed per call, so animation speed follows the frame rate.
    pub fn step(&mut self) {
        self.tick += 1;
        for (index, actor) in self.actors.iter_mut().enumerate() {
            if let Some(from) = actor.motion.tick(&actor.config) {
                let event = PatrolEvent {
                    tick: self.tick,
                    actor: index,
                    from,
                    to: actor.motion.phase,
                };
                tracing::debug!(
                    actor = index,
                    tick = self.tick,
                    ?from,
                    to = ?event.to,
                    "patrol phase change"
                );
                self.events.push(event);
            }
        }
        if self.events.len() > EVENT_LOG_CAPACITY {
            let excess = self.events.len() - EVENT_LOG_CAPACITY;
            self.events.drain(..excess);
        }
    }

    /// Drain and return the phase-change log.
    pub fn drain_events(&mut self) -> Vec<PatrolEvent> {
        std::mem::take(&mut self.events)
    }

    /// Read-only access to the phase-change log.
    pub fn events(&self) -> &[PatrolEvent] {
        &self.events
    }
}
