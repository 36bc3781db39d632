//! Shared numeric helpers for the linear solvers.
//!
//! Hartley normalization conditions DLT-style problems by centering points
//! and scaling to a fixed mean distance; `mat3_from_svd_row` recovers a 3x3
//! matrix from the nullspace row of a design-matrix SVD.

use nalgebra::DMatrix;
use relpose_core::{Mat3, Pt2, Real};

/// Hartley normalization for 2D points.
///
/// Centers the points at the origin and scales them so the mean distance
/// from the origin is `√2`. Returns the normalized points and the 3x3
/// transform `T` with `p_norm = T · p_homogeneous`, or `None` if the input
/// is empty or all points coincide.
pub fn normalize_points_2d(points: &[Pt2]) -> Option<(Vec<Pt2>, Mat3)> {
    if points.is_empty() {
        return None;
    }

    let n = points.len() as Real;
    let mut cx = 0.0;
    let mut cy = 0.0;
    for p in points {
        cx += p.x;
        cy += p.y;
    }
    cx /= n;
    cy /= n;

    let mut mean_dist = 0.0;
    for p in points {
        mean_dist += (p.x - cx).hypot(p.y - cy);
    }
    mean_dist /= n;

    if mean_dist <= Real::EPSILON {
        return None;
    }

    let scale = (2.0 as Real).sqrt() / mean_dist;
    let t = Mat3::new(
        scale,
        0.0,
        -scale * cx,
        0.0,
        scale,
        -scale * cy,
        0.0,
        0.0,
        1.0,
    );

    let norm = points
        .iter()
        .map(|p| Pt2::new((p.x - cx) * scale, (p.y - cy) * scale))
        .collect();

    Some((norm, t))
}

/// Reshape a 9-element row of an SVD `Vᵗ` factor into a 3x3 matrix.
///
/// Typically called with the last row to extract the nullspace of a design
/// matrix. Panics if `v_t` does not have exactly 9 columns.
pub fn mat3_from_svd_row(v_t: &DMatrix<Real>, row_idx: usize) -> Mat3 {
    assert_eq!(v_t.ncols(), 9, "expected 9 columns for 3x3 extraction");
    let mut m = Mat3::zeros();
    for r in 0..3 {
        for c in 0..3 {
            m[(r, c)] = v_t[(row_idx, 3 * r + c)];
        }
    }
    m
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_centers_and_scales() {
        let points = vec![
            Pt2::new(100.0, 200.0),
            Pt2::new(200.0, 300.0),
            Pt2::new(150.0, 250.0),
        ];
        let (norm, _t) = normalize_points_2d(&points).unwrap();

        let cx: Real = norm.iter().map(|p| p.x).sum::<Real>() / norm.len() as Real;
        let cy: Real = norm.iter().map(|p| p.y).sum::<Real>() / norm.len() as Real;
        assert!(cx.abs() < 1e-10);
        assert!(cy.abs() < 1e-10);

        let mean_dist: Real =
            norm.iter().map(|p| p.x.hypot(p.y)).sum::<Real>() / norm.len() as Real;
        assert!((mean_dist - (2.0 as Real).sqrt()).abs() < 1e-10);
    }

    #[test]
    fn normalization_rejects_coincident_points() {
        let points = vec![Pt2::new(5.0, 5.0); 4];
        assert!(normalize_points_2d(&points).is_none());
    }

    #[test]
    fn svd_row_extraction_is_row_major() {
        let mut v_t = DMatrix::zeros(9, 9);
        for i in 0..9 {
            v_t[(8, i)] = (i + 1) as Real;
        }
        let m = mat3_from_svd_row(&v_t, 8);
        assert_eq!(m[(0, 0)], 1.0);
        assert_eq!(m[(1, 0)], 4.0);
        assert_eq!(m[(2, 2)], 9.0);
    }
}
