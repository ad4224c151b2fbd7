//! Developer tooling: read-only scene inspection for the desktop HUD and the CLI.
//!
//! # Invariants
//! - Tools never mutate scene state.

mod inspector;

pub use inspector::{ActorInfo, CameraInfo, SceneInspector, SceneSummary};
