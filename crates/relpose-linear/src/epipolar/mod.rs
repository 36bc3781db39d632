//! Epipolar geometry solvers: fundamental and essential matrices, and
//! recovery of the relative camera pose.
//!
//! - The fundamental matrix `F` relates **pixel coordinates** across two
//!   views and is estimated with the normalized 8-point algorithm, plain or
//!   inside RANSAC.
//! - The essential matrix `E = Kᵗ F K` is its calibrated counterpart; it is
//!   decomposed into four algebraically possible poses which are
//!   disambiguated with a cheirality (positive depth) test on triangulated
//!   correspondences.
//!
//! All solvers are deterministic and use SVD-based nullspace extraction.

use relpose_core::{Mat3, Pt2, RansacOptions, Vec3};
use thiserror::Error;

use crate::camera_matrix::CameraPose;

mod essential;
mod fundamental;
mod recover;

pub use essential::essential_from_fundamental;
pub use fundamental::{fundamental_8point, fundamental_8point_ransac};
pub use recover::{decompose_essential, recover_pose, CheiralityPolicy, PoseRecoveryOptions};

/// Errors that can occur during epipolar estimation and pose recovery.
#[derive(Debug, Error)]
pub enum EpipolarError {
    /// Not enough point correspondences were provided.
    #[error("need at least {expected} point correspondences, got {got}")]
    NotEnoughPoints { expected: usize, got: usize },
    /// The two correspondence slices have different lengths.
    #[error("mismatched correspondence counts: {left} left, {right} right")]
    CorrespondenceMismatch { left: usize, right: usize },
    /// Degenerate point configuration (e.g. all points coincide).
    #[error("degenerate point configuration")]
    DegeneratePoints,
    /// Linear solve (SVD) failed.
    #[error("svd failed in epipolar estimation")]
    SvdFailed,
    /// RANSAC failed to find a consensus model.
    #[error("ransac failed to find a consensus epipolar model")]
    RansacFailed,
    /// No candidate pose satisfied the cheirality constraint.
    #[error("no candidate pose satisfied the cheirality constraint")]
    CheiralityFailed,
}

/// SVD of a 3x3 matrix as `(U, singular values, Vᵗ)`.
///
/// One seam for every decomposition in this module: `U` and `Vᵗ` are
/// orthonormal and the singular values are sorted descending, regardless of
/// the backend's thin/full computation mode.
pub(crate) fn svd3(m: &Mat3) -> Result<(Mat3, Vec3, Mat3), EpipolarError> {
    let svd = m.svd(true, true);
    let u = svd.u.ok_or(EpipolarError::SvdFailed)?;
    let v_t = svd.v_t.ok_or(EpipolarError::SvdFailed)?;
    Ok((u, svd.singular_values, v_t))
}

/// Two-view epipolar geometry solvers.
///
/// All methods are stateless; the struct only groups the public API.
#[derive(Debug, Clone, Copy)]
pub struct EpipolarSolver;

impl EpipolarSolver {
    /// Normalized 8-point algorithm for the fundamental matrix.
    ///
    /// `pts1` and `pts2` are corresponding pixel points in two images. The
    /// returned matrix is forced to rank 2 and satisfies `x'ᵗ F x = 0` up
    /// to numerical error.
    pub fn fundamental_8point(pts1: &[Pt2], pts2: &[Pt2]) -> Result<Mat3, EpipolarError> {
        fundamental::fundamental_8point(pts1, pts2)
    }

    /// Robust fundamental matrix estimation: 8-point inside RANSAC.
    ///
    /// Returns the best model and the indices of inliers. The residual is
    /// an approximate symmetric epipolar distance in pixels.
    pub fn fundamental_8point_ransac(
        pts1: &[Pt2],
        pts2: &[Pt2],
        opts: &RansacOptions,
    ) -> Result<(Mat3, Vec<usize>), EpipolarError> {
        fundamental::fundamental_8point_ransac(pts1, pts2, opts)
    }

    /// Essential matrix from calibration and a fundamental matrix:
    /// `E = Kᵗ F K`.
    ///
    /// A pure matrix product with no failure modes of its own; a singular
    /// `K` is not rejected here but will make the decomposition fail
    /// meaningfully downstream.
    pub fn essential_from_fundamental(k: &Mat3, f: &Mat3) -> Mat3 {
        essential::essential_from_fundamental(k, f)
    }

    /// Decompose an essential matrix into the four candidate poses
    /// `(R0,+t), (R0,−t), (R1,+t), (R1,−t)`, in that order.
    ///
    /// The translation is unit length (direction only); every rotation has
    /// determinant +1.
    pub fn decompose_essential(e: &Mat3) -> Result<Vec<CameraPose>, EpipolarError> {
        recover::decompose_essential(e)
    }

    /// Recover the single physically valid relative pose from an essential
    /// matrix and point correspondences.
    ///
    /// See [`recover_pose`] for the disambiguation semantics and
    /// [`PoseRecoveryOptions`] for the cheirality policy knobs.
    pub fn recover_pose(
        e: &Mat3,
        k: &Mat3,
        pts1: &[Pt2],
        pts2: &[Pt2],
        opts: &PoseRecoveryOptions,
    ) -> Result<CameraPose, EpipolarError> {
        recover::recover_pose(e, k, pts1, pts2, opts)
    }
}
