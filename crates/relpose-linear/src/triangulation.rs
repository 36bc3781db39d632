//! Linear triangulation of 3D points from multiple views.
//!
//! Uses a DLT formulation on the camera projection matrices and image
//! points. Points near infinity yield a vanishing homogeneous weight and
//! are reported as errors rather than silently producing huge coordinates.

use anyhow::Result;
use nalgebra::DMatrix;
use relpose_core::{Pt2, Pt3, Real};

use crate::camera_matrix::Mat34;

/// Linear triangulation from two or more views using DLT.
///
/// `cameras` are projection matrices `P_i`, and `points` their corresponding
/// pixel coordinates. The returned 3D point is in the world frame the
/// camera matrices are expressed in.
pub fn triangulate_point_linear(cameras: &[Mat34], points: &[Pt2]) -> Result<Pt3> {
    if cameras.len() < 2 {
        anyhow::bail!("need at least 2 views, got {}", cameras.len());
    }
    if cameras.len() != points.len() {
        anyhow::bail!(
            "mismatched number of cameras ({}) and points ({})",
            cameras.len(),
            points.len()
        );
    }

    // Two rows per view: u·P₃ − P₁ and v·P₃ − P₂.
    let mut a = DMatrix::<Real>::zeros(2 * cameras.len(), 4);
    for (i, (p, cam)) in points.iter().zip(cameras.iter()).enumerate() {
        let row2 = cam.row(2);
        a.row_mut(2 * i).copy_from(&(p.x * row2 - cam.row(0)));
        a.row_mut(2 * i + 1).copy_from(&(p.y * row2 - cam.row(1)));
    }

    let svd = a.svd(true, true);
    let v_t = svd
        .v_t
        .ok_or_else(|| anyhow::anyhow!("svd failed during triangulation"))?;
    let x_h = v_t.row(v_t.nrows() - 1);

    let w = x_h[3];
    if w.abs() <= Real::EPSILON {
        anyhow::bail!("triangulation produced a point at infinity");
    }

    Ok(Pt3::new(x_h[0] / w, x_h[1] / w, x_h[2] / w))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera_matrix::{perspective_project, projection_matrix, CameraPose};
    use relpose_core::{Mat3, Vec3};

    #[test]
    fn two_views_recover_the_point() {
        let k = Mat3::identity();
        let cam1 = projection_matrix(&k, &CameraPose::identity());
        let cam2 = projection_matrix(
            &k,
            &CameraPose::new(Mat3::identity(), Vec3::new(-0.2, 0.0, 0.0)),
        );

        let pw = Pt3::new(0.1, -0.05, 2.0);
        let p1 = perspective_project(&cam1, &[pw])[0];
        let p2 = perspective_project(&cam2, &[pw])[0];

        let est = triangulate_point_linear(&[cam1, cam2], &[p1, p2]).unwrap();
        assert!((est - pw).norm() < 1e-6);
    }

    #[test]
    fn rejects_single_view() {
        let cam = projection_matrix(&Mat3::identity(), &CameraPose::identity());
        assert!(triangulate_point_linear(&[cam], &[Pt2::new(0.0, 0.0)]).is_err());
    }
}
