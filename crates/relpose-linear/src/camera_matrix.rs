//! Camera projection utilities and the rigid camera pose value type.

use nalgebra::Matrix3x4;
use relpose_core::{Mat3, Pt2, Pt3, Real, Vec3};
use serde::{Deserialize, Serialize};

/// 3x4 camera projection matrix `P = K [R | t]`.
pub type Mat34 = Matrix3x4<Real>;

/// Rigid camera pose `[R | t]` mapping world coordinates into the camera
/// frame: `x_cam = R · x_world + t`.
///
/// The world frame is conventionally anchored at the first camera; that
/// convention is spelled out by passing [`CameraPose::identity`] wherever a
/// reference placement is required, rather than being baked into solvers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    /// Rotation matrix (orthonormal, det = +1).
    pub r: Mat3,
    /// Translation vector in camera coordinates.
    pub t: Vec3,
}

impl CameraPose {
    pub fn new(r: Mat3, t: Vec3) -> Self {
        Self { r, t }
    }

    /// The canonical placement: identity rotation, zero translation.
    pub fn identity() -> Self {
        Self {
            r: Mat3::identity(),
            t: Vec3::zeros(),
        }
    }

    /// The pose as a 3x4 matrix `[R | t]`.
    pub fn matrix(&self) -> Mat34 {
        let mut m = Mat34::zeros();
        m.fixed_view_mut::<3, 3>(0, 0).copy_from(&self.r);
        m.set_column(3, &self.t);
        m
    }

    /// Compose with a base pose: the result maps world coordinates through
    /// `base` and then through `self` (`x = R_self (R_base x_w + t_base) + t_self`).
    pub fn compose(&self, base: &CameraPose) -> CameraPose {
        CameraPose {
            r: self.r * base.r,
            t: self.r * base.t + self.t,
        }
    }

    /// Transform a world point into this camera's frame.
    pub fn transform_point(&self, p: &Pt3) -> Pt3 {
        Pt3::from(self.r * p.coords + self.t)
    }
}

/// Compose a projection matrix `P = K [R | t]` from intrinsics and a pose.
pub fn projection_matrix(k: &Mat3, pose: &CameraPose) -> Mat34 {
    let mut p = Mat34::zeros();
    p.fixed_view_mut::<3, 3>(0, 0).copy_from(&(k * pose.r));
    p.set_column(3, &(k * pose.t));
    p
}

/// Project 3D points through a projection matrix and divide out depth.
///
/// Points on the principal plane (`w ≈ 0`) produce non-finite pixels; the
/// caller is responsible for supplying points off that plane.
pub fn perspective_project(cam: &Mat34, points: &[Pt3]) -> Vec<Pt2> {
    points
        .iter()
        .map(|p| {
            let x = cam * p.to_homogeneous();
            Pt2::new(x.x / x.z, x.y / x.z)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Rotation3;

    #[test]
    fn identity_pose_projects_through_k_only() {
        let k = Mat3::new(800.0, 0.0, 320.0, 0.0, 800.0, 240.0, 0.0, 0.0, 1.0);
        let p = projection_matrix(&k, &CameraPose::identity());

        let px = perspective_project(&p, &[Pt3::new(0.1, -0.2, 2.0)]);
        assert!((px[0].x - (800.0 * 0.05 + 320.0)).abs() < 1e-12);
        assert!((px[0].y - (800.0 * -0.1 + 240.0)).abs() < 1e-12);
    }

    #[test]
    fn compose_matches_sequential_transforms() {
        let a = CameraPose::new(
            Rotation3::from_euler_angles(0.1, -0.2, 0.3).into_inner(),
            Vec3::new(0.5, -1.0, 2.0),
        );
        let b = CameraPose::new(
            Rotation3::from_euler_angles(-0.05, 0.15, 0.0).into_inner(),
            Vec3::new(-0.3, 0.8, 0.1),
        );

        let ab = a.compose(&b);
        let p = Pt3::new(1.0, 2.0, 3.0);
        let direct = ab.transform_point(&p);
        let chained = a.transform_point(&b.transform_point(&p));
        assert!((direct - chained).norm() < 1e-12);
    }

    #[test]
    fn pose_matrix_lays_out_r_and_t() {
        let r = Rotation3::from_euler_angles(0.0, 0.3, 0.0).into_inner();
        let t = Vec3::new(1.0, 2.0, 3.0);
        let m = CameraPose::new(r, t).matrix();
        assert_eq!(m.fixed_view::<3, 3>(0, 0).into_owned(), r);
        assert_eq!(m.column(3).into_owned(), t);
    }
}
