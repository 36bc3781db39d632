//! Core math and geometry primitives for `relpose-rs`.
//!
//! This crate contains:
//! - linear algebra type aliases (`Real`, `Vec3`, `Pt2`, ...),
//! - a pinhole intrinsics value type ([`PinholeIntrinsics`]),
//! - a generic RANSAC engine ([`ransac_fit`], [`Estimator`]),
//! - deterministic synthetic-scene helpers for tests and benchmarks.
//!
//! Everything here is a pure value type or a pure function: no global state,
//! no I/O. The solvers built on top live in `relpose-linear`.

/// Pinhole camera intrinsics.
pub mod camera;
/// Linear algebra type aliases and helpers.
pub mod math;
/// Generic RANSAC engine and traits.
pub mod ransac;
/// Deterministic synthetic data generation helpers.
///
/// Used by workspace tests and examples; kept public because integration
/// tests across crates need it, not intended as a production API.
pub mod synthetic;

pub use camera::*;
pub use math::*;
pub use ransac::*;
