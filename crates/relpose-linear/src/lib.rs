//! Linear two-view geometry solvers for `relpose-rs`.
//!
//! This crate recovers the relative pose between two calibrated cameras
//! from point correspondences, using closed-form linear methods:
//!
//! - normalized 8-point fundamental matrix estimation, optionally inside
//!   a RANSAC loop ([`epipolar`]),
//! - essential matrix computation `E = KᵗFK` and its decomposition into
//!   four candidate poses,
//! - cheirality-based disambiguation into a single pose,
//! - DLT triangulation ([`triangulate_point_linear`]) and projection-matrix
//!   utilities ([`projection_matrix`], [`CameraPose`]).
//!
//! All solvers are deterministic and allocation-light; robust estimation
//! reuses the generic RANSAC engine from `relpose-core`.

mod camera_matrix;
/// Epipolar geometry solvers and pose recovery.
pub mod epipolar;
/// Shared numeric helpers (normalization, SVD extraction).
pub mod math;
mod triangulation;

pub use camera_matrix::*;
pub use epipolar::{
    decompose_essential, essential_from_fundamental, fundamental_8point,
    fundamental_8point_ransac, recover_pose, CheiralityPolicy, EpipolarError, EpipolarSolver,
    PoseRecoveryOptions,
};
pub use triangulation::*;
