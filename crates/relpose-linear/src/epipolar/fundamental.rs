//! Fundamental matrix estimation.
//!
//! Normalized 8-point algorithm, plain or wrapped in RANSAC for robustness
//! against outlier correspondences.

use nalgebra::{DMatrix, SMatrix};
use relpose_core::{ransac_fit, to_homogeneous, Estimator, Mat3, Pt2, RansacOptions, Real};

use super::EpipolarError;
use crate::math::{mat3_from_svd_row, normalize_points_2d};

/// Normalized 8-point algorithm for the fundamental matrix.
///
/// `pts1` and `pts2` are corresponding pixel points in two images; at least
/// eight pairs are required. Points are Hartley-normalized before the
/// nullspace solve, and the result is projected to rank 2 and denormalized.
pub fn fundamental_8point(pts1: &[Pt2], pts2: &[Pt2]) -> Result<Mat3, EpipolarError> {
    let n = pts1.len();
    if pts2.len() != n {
        return Err(EpipolarError::CorrespondenceMismatch {
            left: n,
            right: pts2.len(),
        });
    }
    if n < 8 {
        return Err(EpipolarError::NotEnoughPoints {
            expected: 8,
            got: n,
        });
    }

    let (pts1_n, t1) = normalize_points_2d(pts1).ok_or(EpipolarError::DegeneratePoints)?;
    let (pts2_n, t2) = normalize_points_2d(pts2).ok_or(EpipolarError::DegeneratePoints)?;

    // Design matrix for x'ᵗ F x = 0, one row per correspondence.
    let mut a = DMatrix::<Real>::zeros(n.max(9), 9);
    for (i, (p1, p2)) in pts1_n.iter().zip(pts2_n.iter()).enumerate() {
        let (x, y) = (p1.x, p1.y);
        let (xp, yp) = (p2.x, p2.y);

        a[(i, 0)] = xp * x;
        a[(i, 1)] = xp * y;
        a[(i, 2)] = xp;
        a[(i, 3)] = yp * x;
        a[(i, 4)] = yp * y;
        a[(i, 5)] = yp;
        a[(i, 6)] = x;
        a[(i, 7)] = y;
        a[(i, 8)] = 1.0;
    }

    let svd = a.svd(true, true);
    let v_t = svd.v_t.ok_or(EpipolarError::SvdFailed)?;
    let mut f = mat3_from_svd_row(&v_t, v_t.nrows() - 1);

    // Enforce the rank-2 constraint.
    let (u, mut s, v_t) = super::svd3(&f)?;
    s[2] = 0.0;
    f = u * SMatrix::<Real, 3, 3>::from_diagonal(&s) * v_t;

    // Undo the normalization.
    Ok(t2.transpose() * f * t1)
}

/// Approximate symmetric epipolar distance of a correspondence, in pixels.
fn symmetric_epipolar_distance(f: &Mat3, p1: &Pt2, p2: &Pt2) -> Real {
    let x = to_homogeneous(p1);
    let xp = to_homogeneous(p2);

    let fx = f * x;
    let ftxp = f.transpose() * xp;
    let denom = (fx.x * fx.x + fx.y * fx.y + ftxp.x * ftxp.x + ftxp.y * ftxp.y).max(1e-12);
    let val = (xp.transpose() * f * x)[0];
    (val * val / denom).sqrt()
}

/// Robust fundamental matrix estimation using the 8-point algorithm inside
/// RANSAC.
///
/// Returns the best model and the indices of inliers. The residual is the
/// approximate symmetric epipolar distance in pixels; the model is refit on
/// the full inlier set when `opts.refit_on_inliers` is set.
pub fn fundamental_8point_ransac(
    pts1: &[Pt2],
    pts2: &[Pt2],
    opts: &RansacOptions,
) -> Result<(Mat3, Vec<usize>), EpipolarError> {
    let n = pts1.len();
    if pts2.len() != n {
        return Err(EpipolarError::CorrespondenceMismatch {
            left: n,
            right: pts2.len(),
        });
    }
    if n < 8 {
        return Err(EpipolarError::NotEnoughPoints {
            expected: 8,
            got: n,
        });
    }

    #[derive(Clone)]
    struct FDatum {
        x1: Pt2,
        x2: Pt2,
    }

    struct FundamentalEst;

    impl Estimator for FundamentalEst {
        type Datum = FDatum;
        type Model = Mat3;

        const MIN_SAMPLES: usize = 8;

        fn fit(data: &[Self::Datum], sample_indices: &[usize]) -> Option<Self::Model> {
            let mut p1 = Vec::with_capacity(sample_indices.len());
            let mut p2 = Vec::with_capacity(sample_indices.len());
            for &idx in sample_indices {
                p1.push(data[idx].x1);
                p2.push(data[idx].x2);
            }
            fundamental_8point(&p1, &p2).ok()
        }

        fn residual(model: &Self::Model, datum: &Self::Datum) -> f64 {
            symmetric_epipolar_distance(model, &datum.x1, &datum.x2)
        }

        fn refit(data: &[Self::Datum], inliers: &[usize]) -> Option<Self::Model> {
            Self::fit(data, inliers)
        }
    }

    let data: Vec<FDatum> = pts1
        .iter()
        .zip(pts2.iter())
        .map(|(&x1, &x2)| FDatum { x1, x2 })
        .collect();

    let res = ransac_fit::<FundamentalEst>(&data, opts);
    if !res.success {
        return Err(EpipolarError::RansacFailed);
    }
    let f = res.model.expect("success guarantees a model");
    Ok((f, res.inliers))
}
