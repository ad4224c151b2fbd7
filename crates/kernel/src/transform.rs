use glam::{Mat3, Mat4, Vec3};

/// Errors raised by transform stack misuse or degenerate transforms.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransformError {
    /// `pop` was called without a matching `push`.
    #[error("imbalanced transform stack: pop on an empty stack")]
    ImbalancedStack,
    /// Entries were left on the stack when the traversal finished.
    #[error("imbalanced transform stack: {depth} entries left after traversal")]
    Unterminated { depth: usize },
    /// The linear part of the transform cannot be inverted.
    #[error("model transform is singular (determinant {determinant})")]
    Singular { determinant: f32 },
}

/// A 4x4 affine transform built up by local-frame operations.
///
/// Every operation right-multiplies onto the current value, so the newest
/// operation is applied to the object first ("in the object's local frame").
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    matrix: Mat4,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        matrix: Mat4::IDENTITY,
    };

    pub fn from_matrix(matrix: Mat4) -> Self {
        Self { matrix }
    }

    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }

    pub fn set_identity(&mut self) -> &mut Self {
        self.matrix = Mat4::IDENTITY;
        self
    }

    pub fn translate(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.matrix *= Mat4::from_translation(Vec3::new(x, y, z));
        self
    }

    /// Rotate by `degrees` about `axis`. A zero axis leaves the transform unchanged.
    pub fn rotate(&mut self, degrees: f32, axis: Vec3) -> &mut Self {
        if let Some(axis) = axis.try_normalize() {
            self.matrix *= Mat4::from_axis_angle(axis, degrees.to_radians());
        }
        self
    }

    pub fn scale(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.matrix *= Mat4::from_scale(Vec3::new(x, y, z));
        self
    }

    /// Inverse-transpose of the full 4x4 matrix, used to carry normals.
    ///
    /// Its upper 3x3 block equals the inverse-transpose of the model's linear
    /// part, which keeps normals perpendicular under non-uniform scale.
    ///
    /// Only a zero or non-finite determinant, or an inverse that overflows,
    /// counts as singular. Small uniform scales stay valid.
    pub fn normal_matrix(&self) -> Result<Mat4, TransformError> {
        let determinant = self.matrix.determinant();
        check_invertible(determinant)?;
        let normal = self.matrix.inverse().transpose();
        if !normal.is_finite() {
            return Err(TransformError::Singular { determinant });
        }
        Ok(normal)
    }

    /// Inverse-transpose of the upper 3x3 block alone.
    pub fn normal_matrix3(&self) -> Result<Mat3, TransformError> {
        let linear = Mat3::from_mat4(self.matrix);
        let determinant = linear.determinant();
        check_invertible(determinant)?;
        let normal = linear.inverse().transpose();
        if !normal.is_finite() {
            return Err(TransformError::Singular { determinant });
        }
        Ok(normal)
    }
}

fn check_invertible(determinant: f32) -> Result<(), TransformError> {
    if determinant == 0.0 || !determinant.is_finite() {
        return Err(TransformError::Singular { determinant });
    }
    Ok(())
}

/// Last-in-first-out storage of transform snapshots.
///
/// Each push stores an independent copy, so later mutation of the live
/// transform never reaches a saved entry.
#[derive(Debug, Clone, Default)]
pub struct TransformStack {
    entries: Vec<Transform>,
}

impl TransformStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, current: &Transform) {
        self.entries.push(*current);
    }

    pub fn pop(&mut self) -> Result<Transform, TransformError> {
        self.entries.pop().ok_or(TransformError::ImbalancedStack)
    }

    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fails if any push was left without its pop.
    pub fn ensure_empty(&self) -> Result<(), TransformError> {
        if self.entries.is_empty() {
            Ok(())
        } else {
            Err(TransformError::Unterminated {
                depth: self.entries.len(),
            })
        }
    }

    /// Drop all saved entries, e.g. after an aborted traversal.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Transform {
        let mut t = Transform::default();
        t.translate(1.0, 2.0, 3.0).rotate(30.0, Vec3::Y).scale(2.0, 1.0, 0.5);
        t
    }

    #[test]
    fn operations_compose_in_local_frame() {
        let mut t = Transform::default();
        t.translate(10.0, 0.0, 0.0).scale(2.0, 2.0, 2.0);
        // Scale applies first, then the translation.
        let p = t.matrix().transform_point3(Vec3::new(1.0, 0.0, 0.0));
        assert!((p - Vec3::new(12.0, 0.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn rotate_about_y_by_90_degrees() {
        let mut t = Transform::default();
        t.rotate(90.0, Vec3::Y);
        let p = t.matrix().transform_point3(Vec3::X);
        assert!((p - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-6);
    }

    #[test]
    fn rotate_about_zero_axis_is_noop() {
        let mut t = sample();
        let before = t;
        t.rotate(45.0, Vec3::ZERO);
        assert_eq!(t, before);
    }

    #[test]
    fn set_identity_resets() {
        let mut t = sample();
        t.set_identity();
        assert_eq!(t, Transform::IDENTITY);
    }

    #[test]
    fn balanced_push_pop_restores_bit_for_bit() {
        let mut stack = TransformStack::new();
        let mut live = Transform::default();
        let mut saved = Vec::new();

        for i in 0..8 {
            live.translate(i as f32 * 0.1, 0.3, -1.7).rotate(13.0, Vec3::Y);
            saved.push(live);
            stack.push(&live);
            live.scale(1.0, 1.045, 1.0);
        }
        assert_eq!(stack.depth(), 8);

        for expected in saved.iter().rev() {
            live = stack.pop().unwrap();
            assert_eq!(live.matrix().to_cols_array(), expected.matrix().to_cols_array());
        }
        assert_eq!(stack.depth(), 0);
        assert!(stack.ensure_empty().is_ok());
    }

    #[test]
    fn push_stores_independent_copy() {
        let mut stack = TransformStack::new();
        let mut live = sample();
        let at_push = live;
        stack.push(&live);

        live.translate(100.0, 0.0, 0.0).scale(0.1, 0.1, 0.1);
        live.set_identity();

        assert_eq!(stack.pop().unwrap(), at_push);
    }

    #[test]
    fn pop_on_empty_stack_fails() {
        let mut stack = TransformStack::new();
        assert_eq!(stack.pop(), Err(TransformError::ImbalancedStack));

        stack.push(&Transform::default());
        stack.pop().unwrap();
        assert_eq!(stack.pop(), Err(TransformError::ImbalancedStack));
    }

    #[test]
    fn ensure_empty_reports_depth() {
        let mut stack = TransformStack::new();
        stack.push(&Transform::default());
        stack.push(&Transform::default());
        assert_eq!(
            stack.ensure_empty(),
            Err(TransformError::Unterminated { depth: 2 })
        );
        stack.clear();
        assert!(stack.is_empty());
    }

    #[test]
    fn normal_matrix_for_non_uniform_scale() {
        let mut t = Transform::default();
        t.scale(1.0, 2.0, 1.0);

        // Hand computed: inverse of diag(1,2,1) is diag(1,0.5,1); transpose is itself.
        let expected = Mat3::from_cols(
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 0.5, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        );
        let n3 = t.normal_matrix3().unwrap();
        assert!(n3.abs_diff_eq(expected, 1e-6));

        let n4 = t.normal_matrix().unwrap();
        assert!(Mat3::from_mat4(n4).abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn normal_matrix_keeps_normals_perpendicular() {
        let mut t = Transform::default();
        t.rotate(30.0, Vec3::Z).scale(1.0, 2.0, 1.0);

        // A 45 degree slope: tangent (1,1,0), normal (-1,1,0).
        let tangent = t.matrix().transform_vector3(Vec3::new(1.0, 1.0, 0.0));
        let normal = t
            .normal_matrix()
            .unwrap()
            .transform_vector3(Vec3::new(-1.0, 1.0, 0.0));
        assert!(tangent.dot(normal).abs() < 1e-5);

        // The model matrix alone would not keep them perpendicular.
        let wrong = t.matrix().transform_vector3(Vec3::new(-1.0, 1.0, 0.0));
        assert!(tangent.dot(wrong).abs() > 1e-2);
    }

    #[test]
    fn normal_matrix_ignores_translation() {
        let mut t = Transform::default();
        t.translate(5.0, -3.0, 2.0);
        let n = t.normal_matrix3().unwrap();
        assert!(n.abs_diff_eq(Mat3::IDENTITY, 1e-6));
    }

    #[test]
    fn small_uniform_scale_keeps_a_normal_matrix() {
        let mut t = Transform::default();
        t.scale(0.004, 0.004, 0.004);
        let normal = t.normal_matrix().unwrap();
        assert!(normal.is_finite());
        assert!(
            normal
                .transform_vector3(Vec3::Y)
                .abs_diff_eq(Vec3::new(0.0, 250.0, 0.0), 1e-2)
        );
        let normal3 = t.normal_matrix3().unwrap();
        assert!((normal3.z_axis.z - 250.0).abs() < 1e-2);
    }

    #[test]
    fn singular_transform_has_no_normal_matrix() {
        let mut t = Transform::default();
        t.scale(1.0, 0.0, 1.0);
        assert!(matches!(
            t.normal_matrix(),
            Err(TransformError::Singular { .. })
        ));
        assert!(matches!(
            t.normal_matrix3(),
            Err(TransformError::Singular { .. })
        ));
    }
}
