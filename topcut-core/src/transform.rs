//! Affine transform helpers for host-side scene construction.
use nalgebra::{Matrix4, Vector3};
use serde::Deserialize;

/// Local placement of an object relative to its parent.
///
/// Rotation is XYZ Euler angles in radians.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct LocalTransform {
    pub translation: [f64; 3],
    pub rotation: [f64; 3],
    pub scale: [f64; 3],
}

impl LocalTransform {
    pub fn identity() -> Self {
        Self {
            translation: [0.0; 3],
            rotation: [0.0; 3],
            scale: [1.0; 3],
        }
    }

    pub fn from_translation(x: f64, y: f64, z: f64) -> Self {
        Self {
            translation: [x, y, z],
            ..Self::identity()
        }
    }

    pub fn from_scale(s: f64) -> Self {
        Self {
            scale: [s; 3],
            ..Self::identity()
        }
    }

    /// Local-to-parent matrix: scale first, then rotate, then translate.
    pub fn matrix(&self) -> Matrix4<f64> {
        let [tx, ty, tz] = self.translation;
        let [rx, ry, rz] = self.rotation;
        let [sx, sy, sz] = self.scale;

        Transform::translation_matrix(tx, ty, tz)
            * Transform::rotation_matrix(rx, ry, rz)
            * Transform::scale_matrix(sx, sy, sz)
    }
}

impl Default for LocalTransform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Rotation matrix from XYZ Euler angles (radians)
    pub fn rotation_matrix(x: f64, y: f64, z: f64) -> Matrix4<f64> {
        let rx = Matrix4::new_rotation(Vector3::new(x, 0.0, 0.0));
        let ry = Matrix4::new_rotation(Vector3::new(0.0, y, 0.0));
        let rz = Matrix4::new_rotation(Vector3::new(0.0, 0.0, z));

        // Apply rotations in order: X, then Y, then Z
        rz * ry * rx
    }

    pub fn translation_matrix(x: f64, y: f64, z: f64) -> Matrix4<f64> {
        Matrix4::new_translation(&Vector3::new(x, y, z))
    }

    pub fn scale_matrix(sx: f64, sy: f64, sz: f64) -> Matrix4<f64> {
        Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz))
    }

    /// Compose a child's local matrix under its parent's world matrix
    pub fn compose(parent_world: &Matrix4<f64>, local: &Matrix4<f64>) -> Matrix4<f64> {
        parent_world * local
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_identity_rotation() {
        let matrix = Transform::rotation_matrix(0.0, 0.0, 0.0);
        assert!((matrix - Matrix4::identity()).norm() < 1e-12);
    }

    #[test]
    fn test_local_identity() {
        assert_eq!(LocalTransform::default().matrix(), Matrix4::identity());
    }

    #[test]
    fn test_local_order_scale_rotate_translate() {
        let local = LocalTransform {
            translation: [10.0, 0.0, 0.0],
            rotation: [0.0, 0.0, FRAC_PI_2],
            scale: [2.0, 2.0, 2.0],
        };
        let p = local.matrix().transform_point(&Point3::new(1.0, 0.0, 0.0));

        // (1,0,0) -> scaled (2,0,0) -> rotated (0,2,0) -> translated (10,2,0)
        assert_relative_eq!(p.x, 10.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 2.0, epsilon = 1e-12);
        assert_relative_eq!(p.z, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_compose_parent_first() {
        let parent = Transform::translation_matrix(0.0, 5.0, 0.0);
        let child = Transform::scale_matrix(3.0, 3.0, 3.0);
        let world = Transform::compose(&parent, &child);
        let p = world.transform_point(&Point3::new(1.0, 1.0, 1.0));
        assert_relative_eq!(p.coords, Point3::new(3.0, 8.0, 3.0).coords, epsilon = 1e-12);
    }

    #[test]
    fn test_partial_deserialize_defaults() {
        let local: LocalTransform = ron::from_str("(translation: (1.0, 2.0, 3.0))").unwrap();
        assert_eq!(local.translation, [1.0, 2.0, 3.0]);
        assert_eq!(local.scale, [1.0; 3]);
        assert_eq!(local.rotation, [0.0; 3]);
    }
}
