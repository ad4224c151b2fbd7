//! CPU reference for the per-fragment lighting the GPU shader computes.

use boatclub_common::Rgb;
use boatclub_kernel::Lighting;
use glam::{Mat4, Vec3};

/// Carry an object-space normal into world space with a normal matrix.
pub fn transform_normal(normal_matrix: Mat4, normal: Vec3) -> Vec3 {
    normal_matrix.transform_vector3(normal).normalize_or_zero()
}

/// Lambertian diffuse plus ambient.
///
/// `texel` is the sampled texture color for textured surfaces; its presence
/// selects the textured path and its boost. Ambient always uses the vertex
/// color. The result is clamped to the displayable range, as the framebuffer
/// would.
pub fn shade(lighting: &Lighting, vertex_color: Rgb, texel: Option<Rgb>, normal: Vec3) -> Rgb {
    let light_dir = lighting.direction.normalize_or_zero();
    let n_dot_l = light_dir.dot(normal.normalize_or_zero()).max(0.0);

    let light = lighting.color.to_vec3();
    let diffuse = match texel {
        Some(t) => light * t.to_vec3() * n_dot_l * lighting.textured_boost,
        None => light * vertex_color.to_vec3() * n_dot_l,
    };
    let ambient = lighting.ambient.to_vec3() * vertex_color.to_vec3();

    Rgb::from_vec3((diffuse + ambient).clamp(Vec3::ZERO, Vec3::ONE))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Rgb, b: Rgb) -> bool {
        a.to_vec3().abs_diff_eq(b.to_vec3(), 1e-5)
    }

    #[test]
    fn facing_light_gets_full_diffuse() {
        let lighting = Lighting::default();
        let c = shade(&lighting, Rgb::new(0.4, 0.1, 0.0), None, Vec3::Y);
        // 0.4 * 1 + 0.2 * 0.4 etc.
        assert!(close(c, Rgb::new(0.48, 0.12, 0.0)));
    }

    #[test]
    fn textured_surfaces_are_boosted() {
        let lighting = Lighting::default();
        let texel = Rgb::new(0.5, 0.25, 0.5);
        let c = shade(&lighting, Rgb::WHITE, Some(texel), Vec3::Y);
        assert!(close(c, Rgb::new(0.8, 0.5, 0.8)));
    }

    #[test]
    fn back_facing_normal_gets_ambient_only() {
        let lighting = Lighting::default();
        let color = Rgb::new(0.0, 0.2, 0.2);
        let c = shade(&lighting, color, Some(Rgb::WHITE), Vec3::NEG_Y);
        assert!(close(c, Rgb::new(0.0, 0.04, 0.04)));
    }

    #[test]
    fn oblique_normal_scales_by_cosine() {
        let lighting = Lighting::default();
        let normal = Vec3::new(1.0, 1.0, 0.0);
        let c = shade(&lighting, Rgb::new(0.5, 0.5, 0.5), None, normal);
        let expected = 0.5 * std::f32::consts::FRAC_1_SQRT_2 + 0.1;
        assert!(close(c, Rgb::new(expected, expected, expected)));
    }

    #[test]
    fn output_is_clamped() {
        let lighting = Lighting::default();
        let c = shade(&lighting, Rgb::WHITE, Some(Rgb::WHITE), Vec3::Y);
        assert_eq!(c, Rgb::WHITE);
    }

    #[test]
    fn normals_follow_the_normal_matrix() {
        let model = Mat4::from_scale(Vec3::new(1.0, 2.0, 1.0));
        let normal_matrix = model.inverse().transpose();
        let n = transform_normal(normal_matrix, Vec3::new(-1.0, 1.0, 0.0));
        let expected = Vec3::new(-1.0, 0.5, 0.0).normalize();
        assert!(n.abs_diff_eq(expected, 1e-6));
    }
}
