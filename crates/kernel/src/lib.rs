//! Scene kernel: transform stack, orbit camera, patrolling actors.
//!
//! # Invariants
//! - Every transform stack push is an independent copy.
//! - Actor motion advances by a fixed step per tick, never by wall-clock time.
//! - All state mutations flow through explicit operations on `SceneState`.

pub mod camera;
pub mod config;
pub mod patrol;
pub mod scene;
pub mod transform;

pub use camera::{CameraState, Projection};
pub use config::{ConfigError, ControlConfig, Lighting, SceneConfig};
pub use patrol::{ActorMotion, PatrolConfig, PatrolPhase};
pub use scene::{Actor, EVENT_LOG_CAPACITY, PatrolEvent, SceneState};
pub use transform::{Transform, TransformError, TransformStack};
