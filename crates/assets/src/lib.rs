//! Scene assets: meshes and textures, addressed by handle.
//!
//! Meshes come either from JSON files on disk or from built-in primitives.
//! Textures load in parallel and are gated by a [`LoadBarrier`] so the
//! scene only starts once every image is available.

mod barrier;
mod bundle;
mod error;
mod library;
mod mesh;
mod texture;

pub use barrier::LoadBarrier;
pub use bundle::SceneAssets;
pub use error::AssetError;
pub use library::MeshLibrary;
pub use mesh::MeshData;
pub use texture::{
    BOATHOUSE_TEXTURE, FLOOR_TEXTURE, ImageFileLoader, SCENE_TEXTURES, SolidColorLoader,
    TREE_TEXTURE, TextureImage, TextureLoader, TextureSet, WATER_TEXTURE, load_all,
};
