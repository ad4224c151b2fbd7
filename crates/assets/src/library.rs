use std::collections::BTreeMap;
use std::path::Path;

use boatclub_common::{MeshHandle, MeshKind};
use glam::Vec3;

use crate::error::AssetError;
use crate::mesh::MeshData;

/// The scene's meshes, one per `MeshKind`, addressed by handle.
///
/// The renderer consumes meshes by handle, never by file path.
#[derive(Debug, Clone, Default)]
pub struct MeshLibrary {
    meshes: BTreeMap<MeshHandle, MeshData>,
    kinds: BTreeMap<MeshKind, MeshHandle>,
}

impl MeshLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a mesh for `kind`, replacing any previous one. Returns its handle.
    pub fn insert(&mut self, kind: MeshKind, mesh: MeshData) -> MeshHandle {
        let handle = MeshHandle(kind as u32);
        self.meshes.insert(handle, mesh);
        self.kinds.insert(kind, handle);
        handle
    }

    /// Placeholder geometry for every kind: planes for ground and water,
    /// boxes for everything else.
    pub fn builtin() -> Self {
        let mut lib = Self::new();
        lib.insert(
            MeshKind::Terrain,
            MeshData::plane("floor", Vec3::new(0.0, -0.1, 0.0), 40.0, 40.0, 8.0),
        );
        lib.insert(
            MeshKind::Water,
            MeshData::plane("water", Vec3::new(6.0, 0.0, 0.0), 9.0, 40.0, 6.0),
        );
        lib.insert(
            MeshKind::Tree,
            MeshData::cuboid("tree", Vec3::new(-0.3, 0.0, -0.3), Vec3::new(0.3, 2.0, 0.3)),
        );
        lib.insert(
            MeshKind::Bridge,
            MeshData::cuboid("bridge", Vec3::new(-2.0, 0.5, -1.0), Vec3::new(2.0, 0.8, 1.0))
                .without_tex_coords(),
        );
        lib.insert(
            MeshKind::Boathouse,
            MeshData::cuboid("boatclub", Vec3::new(-3.0, 0.0, -2.0), Vec3::new(3.0, 3.0, 2.0)),
        );
        lib.insert(
            MeshKind::Boat,
            MeshData::cuboid("boat", Vec3::new(-0.8, 0.0, -0.15), Vec3::new(0.8, 0.2, 0.15))
                .without_tex_coords(),
        );
        lib
    }

    /// Load `<file_stem>.json` for every kind from `dir`. Any missing or
    /// malformed file is an error.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, AssetError> {
        let dir = dir.as_ref();
        let mut lib = Self::new();
        for kind in MeshKind::ALL {
            let path = dir.join(format!("{}.json", kind.file_stem()));
            let text = std::fs::read_to_string(&path).map_err(|source| AssetError::Io {
                path: path.clone(),
                source,
            })?;
            let mesh = MeshData::from_json_str(kind.file_stem(), &text)?;
            tracing::debug!(
                ?kind,
                vertices = mesh.vertex_count(),
                triangles = mesh.triangle_count(),
                "mesh loaded"
            );
            lib.insert(kind, mesh);
        }
        tracing::info!(meshes = lib.len(), dir = %dir.display(), "mesh library loaded");
        Ok(lib)
    }

    pub fn handle(&self, kind: MeshKind) -> Option<MeshHandle> {
        self.kinds.get(&kind).copied()
    }

    pub fn get(&self, handle: MeshHandle) -> Option<&MeshData> {
        self.meshes.get(&handle)
    }

    pub fn get_kind(&self, kind: MeshKind) -> Option<&MeshData> {
        self.handle(kind).and_then(|h| self.get(h))
    }

    /// All meshes in handle order.
    pub fn iter(&self) -> impl Iterator<Item = (MeshHandle, &MeshData)> {
        self.meshes.iter().map(|(h, m)| (*h, m))
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}
