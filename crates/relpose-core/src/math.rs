//! Mathematical type aliases and small helpers.

use nalgebra::{Matrix3, Point2, Point3, Vector2, Vector3};

/// Scalar type used throughout the workspace (currently `f64`).
pub type Real = f64;

/// 2D vector with [`Real`] components.
pub type Vec2 = Vector2<Real>;
/// 3D vector with [`Real`] components.
pub type Vec3 = Vector3<Real>;
/// 2D point with [`Real`] coordinates.
pub type Pt2 = Point2<Real>;
/// 3D point with [`Real`] coordinates.
pub type Pt3 = Point3<Real>;
/// 3×3 matrix with [`Real`] entries.
pub type Mat3 = Matrix3<Real>;

/// Convert a 2D point into homogeneous coordinates `(x, y, 1)`.
pub fn to_homogeneous(p: &Pt2) -> Vec3 {
    Vec3::new(p.x, p.y, 1.0)
}

/// Convert a homogeneous 3-vector `(x, y, w)` back to a 2D point.
///
/// The caller is responsible for ensuring that `w != 0`.
pub fn from_homogeneous(v: &Vec3) -> Pt2 {
    Pt2::new(v.x / v.z, v.y / v.z)
}

/// Skew-symmetric cross-product matrix `[v]×` such that `[v]× · w = v × w`.
pub fn skew_symmetric(v: &Vec3) -> Mat3 {
    Mat3::new(0.0, -v.z, v.y, v.z, 0.0, -v.x, -v.y, v.x, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn homogeneous_round_trip() {
        let p = Pt2::new(3.5, -1.25);
        let h = to_homogeneous(&p);
        assert_eq!(h.z, 1.0);
        let back = from_homogeneous(&h);
        assert_eq!(back, p);
    }

    #[test]
    fn skew_matrix_reproduces_cross_product() {
        let a = Vec3::new(0.3, -1.2, 2.0);
        let b = Vec3::new(-0.7, 0.4, 1.1);
        let err = (skew_symmetric(&a) * b - a.cross(&b)).norm();
        assert!(err < 1e-15, "cross product mismatch: {}", err);
        // Antisymmetry
        let s = skew_symmetric(&a);
        assert!((s + s.transpose()).norm() < 1e-15);
    }
}
