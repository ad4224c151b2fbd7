use boatclub_assets::{
    BOATHOUSE_TEXTURE, FLOOR_TEXTURE, MeshLibrary, TREE_TEXTURE, TextureSet, WATER_TEXTURE,
};
use boatclub_common::{Material, MeshHandle, MeshKind, Rgb, TextureHandle};

use crate::error::RenderError;

/// Placement constants of the fixed hierarchy.
pub mod layout {
    use boatclub_common::Rgb;
    use glam::Vec3;

    pub const TREE_SCALE: f32 = 3.0;
    /// Tree positions in the scaled tree frame.
    pub const TREE_POSITIONS: [Vec3; 3] = [
        Vec3::new(-1.3, 0.0, 2.0),
        Vec3::new(-1.7, 0.0, 4.0),
        Vec3::new(-1.8, 0.0, 8.0),
    ];

    pub const BRIDGE_SEGMENTS: usize = 8;
    pub const BRIDGE_START: Vec3 = Vec3::new(-8.0, 0.0, 0.0);
    pub const BRIDGE_SPACING: Vec3 = Vec3::new(4.0, 0.0, 0.0);
    /// Compounding vertical scale per segment.
    pub const BRIDGE_RISE: f32 = 1.045;

    pub const BOATHOUSE_YAW_DEGREES: f32 = -20.0;
    pub const BOATHOUSE_POSITION: Vec3 = Vec3::new(16.0, 0.0, -2.0);
    pub const BOATHOUSE_COLOR: Rgb = Rgb::new(0.0, 0.2, 0.2);

    pub const MOORED_BOATS: usize = 10;
    pub const MOORED_SCALE: f32 = 2.0;
    /// First moored boat, in the scaled boathouse frame.
    pub const MOORED_START: Vec3 = Vec3::new(-1.0, -0.05, 3.0);
    pub const MOORED_SPACING: Vec3 = Vec3::new(0.0, 0.0, 0.5);

    /// Rotation of the frame patrolling boats move in.
    pub const FLEET_YAW_DEGREES: f32 = -85.0;

    pub const BOAT_COLOR: Rgb = Rgb::new(0.4, 0.1, 0.0);

    /// Draws per frame before patrolling boats: terrain, water, trees,
    /// bridge, boathouse, moored boats.
    pub const STATIC_DRAWS: usize =
        1 + 1 + TREE_POSITIONS.len() + BRIDGE_SEGMENTS + 1 + MOORED_BOATS;
}

/// An immutable leaf of the hierarchy: what to draw, not where.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneNode {
    pub mesh: MeshHandle,
    pub color: Rgb,
    pub texture: Option<TextureHandle>,
}

impl SceneNode {
    pub fn material(&self) -> Material {
        match self.texture {
            Some(t) => Material::Textured(t),
            None => Material::Flat(self.color),
        }
    }
}

/// Every node kind the hierarchy draws, resolved against loaded resources.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneNodes {
    pub terrain: SceneNode,
    pub water: SceneNode,
    pub tree: SceneNode,
    pub bridge: SceneNode,
    pub boathouse: SceneNode,
    pub boat: SceneNode,
}

impl SceneNodes {
    /// Bind mesh kinds and texture names to handles. Fails if anything the
    /// scene draws is missing, so a frame never meets an unresolved node.
    pub fn resolve(meshes: &MeshLibrary, textures: &TextureSet) -> Result<Self, RenderError> {
        let textured = |kind: MeshKind, color: Rgb, texture: &str| -> Result<SceneNode, RenderError> {
            let mesh = meshes
                .get_kind(kind)
                .ok_or(RenderError::MissingMesh(kind))?;
            if !mesh.has_tex_coords() {
                return Err(RenderError::MissingTexCoords(kind));
            }
            Ok(SceneNode {
                mesh: meshes.handle(kind).ok_or(RenderError::MissingMesh(kind))?,
                color,
                texture: Some(
                    textures
                        .handle(texture)
                        .ok_or_else(|| RenderError::MissingTexture(texture.to_string()))?,
                ),
            })
        };
        let flat = |kind: MeshKind, color: Rgb| -> Result<SceneNode, RenderError> {
            Ok(SceneNode {
                mesh: meshes.handle(kind).ok_or(RenderError::MissingMesh(kind))?,
                color,
                texture: None,
            })
        };

        Ok(Self {
            terrain: textured(MeshKind::Terrain, Rgb::WHITE, FLOOR_TEXTURE)?,
            water: textured(MeshKind::Water, Rgb::WHITE, WATER_TEXTURE)?,
            tree: textured(MeshKind::Tree, Rgb::WHITE, TREE_TEXTURE)?,
            bridge: flat(MeshKind::Bridge, Rgb::WHITE)?,
            boathouse: textured(MeshKind::Boathouse, layout::BOATHOUSE_COLOR, BOATHOUSE_TEXTURE)?,
            boat: flat(MeshKind::Boat, layout::BOAT_COLOR)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boatclub_assets::{MeshData, SCENE_TEXTURES, SolidColorLoader, load_all};
    use glam::Vec3;

    fn textures() -> TextureSet {
        load_all(&SolidColorLoader::default(), &SCENE_TEXTURES).unwrap()
    }

    #[test]
    fn resolves_builtin_scene() {
        let nodes = SceneNodes::resolve(&MeshLibrary::builtin(), &textures()).unwrap();
        assert!(nodes.terrain.material().is_textured());
        assert!(nodes.boathouse.material().is_textured());
        assert_eq!(nodes.boathouse.color, layout::BOATHOUSE_COLOR);
        assert_eq!(nodes.boat.material(), Material::Flat(layout::BOAT_COLOR));
        assert_eq!(nodes.bridge.material(), Material::Flat(Rgb::WHITE));
    }

    #[test]
    fn missing_texture_is_reported() {
        let partial = load_all(&SolidColorLoader::default(), &[WATER_TEXTURE]).unwrap();
        let err = SceneNodes::resolve(&MeshLibrary::builtin(), &partial).unwrap_err();
        assert!(matches!(err, RenderError::MissingTexture(name) if name == FLOOR_TEXTURE));
    }

    #[test]
    fn missing_mesh_is_reported() {
        let mut meshes = MeshLibrary::new();
        meshes.insert(
            MeshKind::Terrain,
            MeshData::plane("floor", Vec3::ZERO, 1.0, 1.0, 1.0),
        );
        let err = SceneNodes::resolve(&meshes, &textures()).unwrap_err();
        assert!(matches!(err, RenderError::MissingMesh(MeshKind::Water)));
    }

    #[test]
    fn textured_mesh_needs_tex_coords() {
        let mut meshes = MeshLibrary::builtin();
        meshes.insert(
            MeshKind::Tree,
            MeshData::cuboid("tree", Vec3::ZERO, Vec3::ONE).without_tex_coords(),
        );
        let err = SceneNodes::resolve(&meshes, &textures()).unwrap_err();
        assert!(matches!(err, RenderError::MissingTexCoords(MeshKind::Tree)));
    }

    #[test]
    fn static_draw_count() {
        assert_eq!(layout::STATIC_DRAWS, 24);
    }
}
