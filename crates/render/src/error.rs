use boatclub_common::{MeshHandle, MeshKind, TextureHandle};
use boatclub_kernel::TransformError;

/// Errors that abort a frame. The frame is not presented.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("unknown mesh handle {0:?}")]
    UnknownMesh(MeshHandle),
    #[error("unknown texture handle {0:?}")]
    UnknownTexture(TextureHandle),
    #[error("mesh library has no {0:?} mesh")]
    MissingMesh(MeshKind),
    #[error("texture {0} was not loaded")]
    MissingTexture(String),
    #[error("{0:?} mesh is textured but has no texture coordinates")]
    MissingTexCoords(MeshKind),
    #[error(transparent)]
    Transform(#[from] TransformError),
    #[error("draw issued outside begin_frame/end_frame")]
    NoFrame,
    #[error("render backend error: {0}")]
    Backend(String),
}
