//! Renderer-agnostic frame production.
//!
//! # Invariants
//! - Draw sinks consume draw calls; they never mutate scene state.
//! - The transform stack is empty at the start and end of every frame.
//! - Every leaf of the hierarchy issues exactly one draw per frame.

mod error;
mod frame_loop;
pub mod lighting;
pub mod scene;
mod sink;
mod walk;

pub use error::RenderError;
pub use frame_loop::{FrameLoop, FrameScheduler, FrameTimer, ManualScheduler};
pub use lighting::{shade, transform_normal};
pub use scene::{SceneNode, SceneNodes, layout};
pub use sink::{DrawCall, DrawSink, RecordedFrame, RecordingSink};
pub use walk::{FrameStats, SceneWalker, draw_frame, draw_scene, walk_hierarchy};
