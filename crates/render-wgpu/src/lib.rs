//! wgpu backend for the boat club scene.
//!
//! `WgpuRenderer` owns uploaded meshes, textures and pipelines. Each frame
//! is produced through a `WgpuFrame`, which implements `DrawSink`.
//!
//! # Invariants
//! - The renderer never mutates scene state.
//! - Every draw references a mesh and texture uploaded at construction.

mod gpu;
mod shaders;

pub use gpu::{WgpuFrame, WgpuRenderer};
pub use shaders::SCENE_SHADER;
