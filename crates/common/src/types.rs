use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Linear RGB color with channels in 0.0-1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.r, self.g, self.b)
    }

    pub fn from_vec3(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }

    /// RGBA array with an opaque alpha channel.
    pub fn to_rgba(self) -> [f32; 4] {
        [self.r, self.g, self.b, 1.0]
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::WHITE
    }
}

/// A handle referencing an uploaded mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MeshHandle(pub u32);

/// A handle referencing a loaded texture. Handles are assigned in load order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextureHandle(pub u32);

/// Surface material of a draw: a texture or a flat color, never both.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Material {
    Flat(Rgb),
    Textured(TextureHandle),
}

impl Material {
    pub fn is_textured(&self) -> bool {
        matches!(self, Self::Textured(_))
    }

    pub fn texture(&self) -> Option<TextureHandle> {
        match self {
            Self::Textured(t) => Some(*t),
            Self::Flat(_) => None,
        }
    }
}

/// The fixed set of meshes the scene is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MeshKind {
    Terrain,
    Water,
    Tree,
    Bridge,
    Boathouse,
    Boat,
}

impl MeshKind {
    pub const ALL: [MeshKind; 6] = [
        MeshKind::Terrain,
        MeshKind::Water,
        MeshKind::Tree,
        MeshKind::Bridge,
        MeshKind::Boathouse,
        MeshKind::Boat,
    ];

    /// File stem of the mesh's JSON file in an asset directory.
    pub fn file_stem(self) -> &'static str {
        match self {
            MeshKind::Terrain => "floor",
            MeshKind::Water => "water",
            MeshKind::Tree => "tree",
            MeshKind::Bridge => "bridge",
            MeshKind::Boathouse => "boatclub",
            MeshKind::Boat => "boat",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_default_is_white() {
        assert_eq!(Rgb::default(), Rgb::WHITE);
        assert_eq!(Rgb::WHITE.to_rgba(), [1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn rgb_vec3_roundtrip_keeps_channels() {
        let c = Rgb::new(0.4, 0.1, 0.0);
        assert_eq!(Rgb::from_vec3(c.to_vec3()), c);
    }

    #[test]
    fn material_texture_accessor() {
        let t = Material::Textured(TextureHandle(3));
        assert!(t.is_textured());
        assert_eq!(t.texture(), Some(TextureHandle(3)));

        let f = Material::Flat(Rgb::WHITE);
        assert!(!f.is_textured());
        assert_eq!(f.texture(), None);
    }

    #[test]
    fn mesh_kinds_have_distinct_file_stems() {
        let mut stems: Vec<&str> = MeshKind::ALL.iter().map(|k| k.file_stem()).collect();
        stems.sort();
        stems.dedup();
        assert_eq!(stems.len(), MeshKind::ALL.len());
    }
}
