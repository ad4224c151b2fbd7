use glam::Vec3;
use serde::Deserialize;

use crate::error::AssetError;

/// Indexed triangle mesh in object space.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    pub name: String,
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    /// Present only for meshes that can be textured.
    pub tex_coords: Option<Vec<[f32; 2]>>,
    pub indices: Vec<u32>,
}

/// A number list that may arrive flat or nested one level deep.
#[derive(Deserialize)]
#[serde(untagged)]
enum Numbers {
    Flat(Vec<f64>),
    Nested(Vec<Vec<f64>>),
}

impl Numbers {
    fn flatten(self) -> Vec<f64> {
        match self {
            Numbers::Flat(v) => v,
            Numbers::Nested(v) => v.into_iter().flatten().collect(),
        }
    }
}

/// The on-disk layout: an array whose first element holds the mesh.
#[derive(Deserialize)]
struct RawMesh {
    vertices: Numbers,
    normals: Numbers,
    faces: Numbers,
    #[serde(default)]
    texturecoords: Option<Numbers>,
}

impl MeshData {
    /// Parse the JSON mesh layout (`vertices`, `normals`, `faces`, optional
    /// `texturecoords`) and validate it.
    pub fn from_json_str(name: &str, text: &str) -> Result<Self, AssetError> {
        let mut raw: Vec<RawMesh> = serde_json::from_str(text)?;
        if raw.is_empty() {
            return Err(malformed(name, "file contains no mesh"));
        }
        let raw = raw.swap_remove(0);

        let positions = triples(name, "vertices", raw.vertices.flatten())?;
        let normals = triples(name, "normals", raw.normals.flatten())?;
        let indices = raw
            .faces
            .flatten()
            .into_iter()
            .map(|i| {
                if i < 0.0 || i.fract() != 0.0 || i > u32::MAX as f64 {
                    Err(malformed(name, format!("face index {i} is not a vertex index")))
                } else {
                    Ok(i as u32)
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        let tex_coords = match raw.texturecoords {
            Some(t) => {
                let flat = t.flatten();
                if flat.len() % 2 != 0 {
                    return Err(malformed(name, "texturecoords length is not a multiple of 2"));
                }
                Some(
                    flat.chunks_exact(2)
                        .map(|c| [c[0] as f32, c[1] as f32])
                        .collect(),
                )
            }
            None => None,
        };

        let mesh = Self {
            name: name.to_string(),
            positions,
            normals,
            tex_coords,
            indices,
        };
        mesh.validate()?;
        Ok(mesh)
    }

    /// Check attribute counts and index ranges.
    pub fn validate(&self) -> Result<(), AssetError> {
        let n = self.positions.len();
        if n == 0 {
            return Err(malformed(&self.name, "mesh has no vertices"));
        }
        if self.normals.len() != n {
            return Err(malformed(
                &self.name,
                format!("{} normals for {n} vertices", self.normals.len()),
            ));
        }
        if let Some(uv) = &self.tex_coords {
            if uv.len() != n {
                return Err(malformed(
                    &self.name,
                    format!("{} texture coordinates for {n} vertices", uv.len()),
                ));
            }
        }
        if self.indices.len() % 3 != 0 {
            return Err(malformed(&self.name, "index count is not a multiple of 3"));
        }
        if let Some(bad) = self.indices.iter().find(|&&i| i as usize >= n) {
            return Err(malformed(
                &self.name,
                format!("index {bad} out of range for {n} vertices"),
            ));
        }
        Ok(())
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn has_tex_coords(&self) -> bool {
        self.tex_coords.is_some()
    }

    /// Horizontal quad at height `y`, facing +Y, with UVs repeating `uv_repeat` times.
    pub fn plane(name: &str, center: Vec3, half_x: f32, half_z: f32, uv_repeat: f32) -> Self {
        let (cx, y, cz) = (center.x, center.y, center.z);
        let positions = vec![
            Vec3::new(cx - half_x, y, cz + half_z),
            Vec3::new(cx + half_x, y, cz + half_z),
            Vec3::new(cx + half_x, y, cz - half_z),
            Vec3::new(cx - half_x, y, cz - half_z),
        ];
        Self {
            name: name.to_string(),
            positions,
            normals: vec![Vec3::Y; 4],
            tex_coords: Some(vec![
                [0.0, 0.0],
                [uv_repeat, 0.0],
                [uv_repeat, uv_repeat],
                [0.0, uv_repeat],
            ]),
            indices: vec![0, 1, 2, 2, 3, 0],
        }
    }

    /// Axis-aligned box between `min` and `max` with per-face normals and UVs.
    pub fn cuboid(name: &str, min: Vec3, max: Vec3) -> Self {
        // (normal, four corners counter-clockwise seen from outside)
        let faces: [(Vec3, [Vec3; 4]); 6] = [
            (
                Vec3::Z,
                [
                    Vec3::new(min.x, min.y, max.z),
                    Vec3::new(max.x, min.y, max.z),
                    Vec3::new(max.x, max.y, max.z),
                    Vec3::new(min.x, max.y, max.z),
                ],
            ),
            (
                Vec3::NEG_Z,
                [
                    Vec3::new(max.x, min.y, min.z),
                    Vec3::new(min.x, min.y, min.z),
                    Vec3::new(min.x, max.y, min.z),
                    Vec3::new(max.x, max.y, min.z),
                ],
            ),
            (
                Vec3::X,
                [
                    Vec3::new(max.x, min.y, max.z),
                    Vec3::new(max.x, min.y, min.z),
                    Vec3::new(max.x, max.y, min.z),
                    Vec3::new(max.x, max.y, max.z),
                ],
            ),
            (
                Vec3::NEG_X,
                [
                    Vec3::new(min.x, min.y, min.z),
                    Vec3::new(min.x, min.y, max.z),
                    Vec3::new(min.x, max.y, max.z),
                    Vec3::new(min.x, max.y, min.z),
                ],
            ),
            (
                Vec3::Y,
                [
                    Vec3::new(min.x, max.y, max.z),
                    Vec3::new(max.x, max.y, max.z),
                    Vec3::new(max.x, max.y, min.z),
                    Vec3::new(min.x, max.y, min.z),
                ],
            ),
            (
                Vec3::NEG_Y,
                [
                    Vec3::new(min.x, min.y, min.z),
                    Vec3::new(max.x, min.y, min.z),
                    Vec3::new(max.x, min.y, max.z),
                    Vec3::new(min.x, min.y, max.z),
                ],
            ),
        ];

        let mut positions = Vec::with_capacity(24);
        let mut normals = Vec::with_capacity(24);
        let mut tex_coords = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);
        for (normal, corners) in faces {
            let base = positions.len() as u32;
            positions.extend_from_slice(&corners);
            normals.extend_from_slice(&[normal; 4]);
            tex_coords.extend_from_slice(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]);
            indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
        }

        Self {
            name: name.to_string(),
            positions,
            normals,
            tex_coords: Some(tex_coords),
            indices,
        }
    }

    /// Drop texture coordinates, for meshes that are only ever drawn flat.
    pub fn without_tex_coords(mut self) -> Self {
        self.tex_coords = None;
        self
    }
}

fn malformed(name: &str, reason: impl Into<String>) -> AssetError {
    AssetError::MalformedMesh {
        name: name.to_string(),
        reason: reason.into(),
    }
}

fn triples(name: &str, field: &str, flat: Vec<f64>) -> Result<Vec<Vec3>, AssetError> {
    if flat.len() % 3 != 0 {
        return Err(malformed(name, format!("{field} length is not a multiple of 3")));
    }
    Ok(flat
        .chunks_exact(3)
        .map(|c| Vec3::new(c[0] as f32, c[1] as f32, c[2] as f32))
        .collect())
}
