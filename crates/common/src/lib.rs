//! Shared value types used by every boat club crate.

mod types;

pub use types::{Material, MeshHandle, MeshKind, Rgb, TextureHandle};
