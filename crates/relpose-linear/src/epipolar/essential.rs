//! Essential matrix computation and manifold projection.

use nalgebra::SMatrix;
use relpose_core::{Mat3, Real};

use super::{svd3, EpipolarError};

/// Essential matrix from calibration and a fundamental matrix: `E = Kᵗ F K`.
///
/// Deterministic matrix product; `K` is not validated (the product is
/// well-defined even for singular `K`, which instead surfaces during
/// decomposition).
pub fn essential_from_fundamental(k: &Mat3, f: &Mat3) -> Mat3 {
    k.transpose() * f * k
}

/// Project a 3x3 matrix onto the essential matrix manifold.
///
/// Forces the singular values to `(σ, σ, 0)` with σ the mean of the two
/// largest, which every noise-free essential matrix satisfies.
pub(super) fn enforce_essential_constraints(e: &Mat3) -> Result<Mat3, EpipolarError> {
    let (u, s, v_t) = svd3(e)?;
    let sigma = 0.5 * (s[0] + s[1]);
    let s_mat = SMatrix::<Real, 3, 3>::from_diagonal(&nalgebra::Vector3::new(sigma, sigma, 0.0));
    Ok(u * s_mat * v_t)
}
