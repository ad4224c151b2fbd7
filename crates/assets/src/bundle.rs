use std::path::Path;

use crate::error::AssetError;
use crate::library::MeshLibrary;
use crate::texture::{ImageFileLoader, SCENE_TEXTURES, SolidColorLoader, TextureSet, load_all};

/// Everything the scene needs loaded before the first frame.
#[derive(Debug, Clone)]
pub struct SceneAssets {
    pub meshes: MeshLibrary,
    pub textures: TextureSet,
}

impl SceneAssets {
    /// Load meshes and textures from `dir`, or fall back to built-in meshes
    /// and generated textures when no directory is given.
    pub fn load(dir: Option<&Path>) -> Result<Self, AssetError> {
        match dir {
            Some(dir) => Self::load_dir(dir),
            None => Self::builtin(),
        }
    }

    /// `<mesh>.json` files and the scene's image files, side by side in `dir`.
    pub fn load_dir(dir: &Path) -> Result<Self, AssetError> {
        let meshes = MeshLibrary::load_dir(dir)?;
        let textures = load_all(&ImageFileLoader::new(dir), &SCENE_TEXTURES)?;
        Ok(Self { meshes, textures })
    }

    pub fn builtin() -> Result<Self, AssetError> {
        let meshes = MeshLibrary::builtin();
        let textures = load_all(&SolidColorLoader::default(), &SCENE_TEXTURES)?;
        Ok(Self { meshes, textures })
    }
}
