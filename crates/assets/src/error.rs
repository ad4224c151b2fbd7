use std::path::PathBuf;

/// Errors from asset operations. All of them abort startup.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("image error in {name}: {source}")]
    Image {
        name: String,
        #[source]
        source: image::ImageError,
    },
    #[error("malformed mesh {name}: {reason}")]
    MalformedMesh { name: String, reason: String },
    #[error("texture not found: {0}")]
    TextureNotFound(String),
    #[error("load slot {index} reported twice or out of range (expected {expected} loads)")]
    BarrierMisuse { index: usize, expected: usize },
    #[error("load of {name} never reported completion")]
    Incomplete { name: String },
}
