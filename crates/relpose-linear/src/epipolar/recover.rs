//! Essential matrix decomposition and cheirality-based pose disambiguation.
//!
//! An essential matrix determines the relative pose only up to a four-fold
//! ambiguity: two rotations from the SVD factors and two translation signs.
//! Exactly one candidate (generically) reconstructs scene points in front
//! of both cameras; that candidate is selected by triangulating one or more
//! correspondences and testing their depths.

use log::debug;
use relpose_core::{Mat3, Pt2};
use serde::{Deserialize, Serialize};

use super::essential::enforce_essential_constraints;
use super::{svd3, EpipolarError};
use crate::camera_matrix::{projection_matrix, CameraPose};
use crate::triangulation::triangulate_point_linear;

/// How multiple tested correspondences are combined into a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheiralityPolicy {
    /// Accept the first candidate for which every tested point has
    /// non-negative depth in both cameras.
    AllAgree,
    /// Accept the candidate with the strictly largest number of passing
    /// points, requiring a strict majority of the tested points. Ties are
    /// broken by candidate order.
    MajorityVote,
}

/// Options for [`recover_pose`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoseRecoveryOptions {
    /// Number of leading correspondences fed to the cheirality test.
    ///
    /// One point suffices for a non-degenerate configuration (Hartley &
    /// Zisserman); raising this guards against a single noisy
    /// correspondence. Clamped to the number of supplied correspondences.
    pub test_points: usize,
    /// Voting policy when `test_points > 1`.
    pub policy: CheiralityPolicy,
    /// Pose of the first camera. The recovered pose stays relative to it,
    /// so the solver is reusable when the first camera is not at the
    /// canonical identity placement.
    pub reference: CameraPose,
}

impl Default for PoseRecoveryOptions {
    fn default() -> Self {
        Self {
            test_points: 1,
            policy: CheiralityPolicy::AllAgree,
            reference: CameraPose::identity(),
        }
    }
}

/// Decompose an essential matrix into its four candidate poses.
///
/// The matrix is first projected onto the essential manifold, then factored
/// by SVD. A factor with negative determinant has its null direction
/// negated, which fixes the determinant without perturbing the
/// factorization; the resulting rotations are proper. Candidates are
/// returned in the fixed order `(R0,+t), (R0,−t), (R1,+t), (R1,−t)` with
/// `t` unit length.
pub fn decompose_essential(e: &Mat3) -> Result<Vec<CameraPose>, EpipolarError> {
    let e = enforce_essential_constraints(e)?;
    let (mut u, _s, mut v_t) = svd3(&e)?;

    if u.determinant() < 0.0 {
        u.column_mut(2).neg_mut();
    }
    if v_t.determinant() < 0.0 {
        v_t.row_mut(2).neg_mut();
    }

    let w = Mat3::new(0.0, -1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0);

    let r0 = u * w * v_t;
    let r1 = u * w.transpose() * v_t;
    let t = u.column(2).normalize();

    let mut candidates = vec![
        CameraPose::new(r0, t),
        CameraPose::new(r0, -t),
        CameraPose::new(r1, t),
        CameraPose::new(r1, -t),
    ];

    for pose in candidates.iter_mut() {
        if pose.r.determinant() < 0.0 {
            pose.r = -pose.r;
            pose.t = -pose.t;
        }
    }

    Ok(candidates)
}

/// Count how many of the first `n` correspondences triangulate in front of
/// both cameras under a candidate relative pose.
fn positive_depth_votes(
    candidate: &CameraPose,
    k: &Mat3,
    reference: &CameraPose,
    pts1: &[Pt2],
    pts2: &[Pt2],
    n: usize,
) -> usize {
    let second = candidate.compose(reference);
    let cams = [
        projection_matrix(k, reference),
        projection_matrix(k, &second),
    ];

    (0..n)
        .filter(|&i| {
            // A failed triangulation (e.g. a point at infinity) counts as a
            // failed vote rather than aborting the recovery.
            match triangulate_point_linear(&cams, &[pts1[i], pts2[i]]) {
                Ok(x) => {
                    reference.transform_point(&x).z >= 0.0 && second.transform_point(&x).z >= 0.0
                }
                Err(_) => false,
            }
        })
        .count()
}

/// Recover the relative pose of the second camera from an essential matrix
/// and point correspondences.
///
/// The four candidates from [`decompose_essential`] are evaluated in their
/// fixed order against the cheirality constraint, using the first
/// `opts.test_points` correspondences; the first candidate satisfying the
/// policy wins. The result is fully deterministic given `e`, `k` and the
/// correspondences.
///
/// Returns [`EpipolarError::CheiralityFailed`] when no candidate satisfies
/// the constraint (degenerate correspondences or corrupted inputs): an
/// explicit failure rather than a sentinel pose, so callers can always
/// distinguish a recovered identity pose from a disambiguation failure.
pub fn recover_pose(
    e: &Mat3,
    k: &Mat3,
    pts1: &[Pt2],
    pts2: &[Pt2],
    opts: &PoseRecoveryOptions,
) -> Result<CameraPose, EpipolarError> {
    if pts1.is_empty() {
        return Err(EpipolarError::NotEnoughPoints {
            expected: 1,
            got: 0,
        });
    }
    if pts1.len() != pts2.len() {
        return Err(EpipolarError::CorrespondenceMismatch {
            left: pts1.len(),
            right: pts2.len(),
        });
    }

    let n = opts.test_points.max(1).min(pts1.len());
    let candidates = decompose_essential(e)?;

    match opts.policy {
        CheiralityPolicy::AllAgree => {
            for (idx, candidate) in candidates.iter().enumerate() {
                let votes = positive_depth_votes(candidate, k, &opts.reference, pts1, pts2, n);
                debug!("cheirality: candidate {idx} passed {votes}/{n} points");
                if votes == n {
                    return Ok(*candidate);
                }
            }
        }
        CheiralityPolicy::MajorityVote => {
            let mut best: Option<(usize, usize)> = None;
            for (idx, candidate) in candidates.iter().enumerate() {
                let votes = positive_depth_votes(candidate, k, &opts.reference, pts1, pts2, n);
                debug!("cheirality: candidate {idx} passed {votes}/{n} points");
                if best.map_or(true, |(_, best_votes)| votes > best_votes) {
                    best = Some((idx, votes));
                }
            }
            if let Some((idx, votes)) = best {
                if 2 * votes > n {
                    return Ok(candidates[idx]);
                }
            }
        }
    }

    Err(EpipolarError::CheiralityFailed)
}
