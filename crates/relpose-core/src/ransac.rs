//! Generic, model-agnostic RANSAC engine.
//!
//! Implement [`Estimator`] for a geometric model and call [`ransac_fit`]
//! with a slice of data and some [`RansacOptions`]. Sampling is driven by a
//! seeded [`StdRng`], so runs are reproducible for a fixed seed.
//!
//! The engine does not panic on failure: when no consensus set satisfying
//! the options is found, the returned [`RansacResult`] carries
//! `success == false` and `model == None`.

use rand::prelude::IndexedRandom;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Configuration parameters for the RANSAC engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RansacOptions {
    /// Maximum number of iterations.
    pub max_iters: usize,
    /// Inlier residual threshold (same units as [`Estimator::residual`]).
    pub thresh: f64,
    /// Minimum number of inliers required to accept a model.
    pub min_inliers: usize,
    /// Desired confidence in `[0, 1]` for finding an outlier-free sample.
    pub confidence: f64,
    /// Random-number generator seed.
    pub seed: u64,
    /// If `true`, refit the model on all inliers before scoring.
    pub refit_on_inliers: bool,
}

impl Default for RansacOptions {
    fn default() -> Self {
        Self {
            max_iters: 1000,
            thresh: 2.0,
            min_inliers: 12,
            confidence: 0.99,
            seed: 1_234_567,
            refit_on_inliers: true,
        }
    }
}

/// Output of a RANSAC run.
///
/// Check [`RansacResult::success`] before using the model; when it is
/// `false`, `model` is `None` and the remaining fields are unspecified.
#[derive(Debug, Clone)]
pub struct RansacResult<M> {
    /// Whether a consensus set satisfying the options was found.
    pub success: bool,
    /// Best model found, if any.
    pub model: Option<M>,
    /// Indices of inlier data points.
    pub inliers: Vec<usize>,
    /// Root-mean-square residual over the inliers.
    pub inlier_rms: f64,
    /// Number of iterations actually performed.
    pub iters: usize,
}

impl<M> Default for RansacResult<M> {
    fn default() -> Self {
        Self {
            success: false,
            model: None,
            inliers: Vec::new(),
            inlier_rms: f64::INFINITY,
            iters: 0,
        }
    }
}

/// Model estimator consumed by [`ransac_fit`].
///
/// Implement this for geometric models: lines, fundamental matrices, poses.
pub trait Estimator {
    type Datum;
    type Model;

    /// Minimal number of samples needed to estimate a model.
    const MIN_SAMPLES: usize;

    /// Fit a model from a subset of data indices.
    ///
    /// Return `None` if the subset is degenerate or fitting fails.
    fn fit(data: &[Self::Datum], sample_indices: &[usize]) -> Option<Self::Model>;

    /// Non-negative residual for one datum, in the units of `opts.thresh`.
    fn residual(model: &Self::Model, datum: &Self::Datum) -> f64;

    /// Optional degeneracy check on the sample subset before fitting.
    fn is_degenerate(_data: &[Self::Datum], _sample_indices: &[usize]) -> bool {
        false
    }

    /// Optional refit on the full inlier set; `None` keeps the sample model.
    fn refit(_data: &[Self::Datum], _inliers: &[usize]) -> Option<Self::Model> {
        None
    }
}

fn collect_inliers<E: Estimator>(
    model: &E::Model,
    data: &[E::Datum],
    thresh: f64,
) -> (Vec<usize>, f64) {
    let mut indices = Vec::new();
    let mut sum_sq = 0.0;
    for (i, datum) in data.iter().enumerate() {
        let r = E::residual(model, datum);
        if r <= thresh {
            indices.push(i);
            sum_sq += r * r;
        }
    }
    let rms = if indices.is_empty() {
        f64::INFINITY
    } else {
        (sum_sq / indices.len() as f64).sqrt()
    };
    (indices, rms)
}

/// Iteration bound for the current inlier ratio: the smallest `n` with
/// `1 - (1 - w^m)^n >= confidence`, clamped to `[iters_so_far, max_iters]`.
fn required_iterations(
    confidence: f64,
    inlier_ratio: f64,
    min_samples: usize,
    iters_so_far: usize,
    max_iters: usize,
) -> usize {
    if confidence <= 0.0 || inlier_ratio <= 0.0 {
        return max_iters;
    }
    let denom = (1.0 - inlier_ratio.powf(min_samples as f64)).max(1e-12).ln();
    if denom >= 0.0 {
        return max_iters;
    }
    let n = ((1.0 - confidence).ln() / denom).ceil() as usize;
    n.clamp(iters_so_far, max_iters)
}

fn improves(count: usize, rms: f64, best_count: usize, best_rms: f64) -> bool {
    count > best_count || (count == best_count && rms < best_rms)
}

/// Run a RANSAC loop for a given [`Estimator`] implementation.
///
/// Never panics under normal circumstances: with insufficient data or no
/// consensus within the iteration budget it returns a [`RansacResult`] with
/// `success == false`.
pub fn ransac_fit<E: Estimator>(data: &[E::Datum], opts: &RansacOptions) -> RansacResult<E::Model> {
    let mut best: RansacResult<E::Model> = RansacResult::default();
    if data.len() < E::MIN_SAMPLES {
        return best;
    }

    let all_indices: Vec<usize> = (0..data.len()).collect();
    let mut sample = vec![0usize; E::MIN_SAMPLES];
    let mut rng = StdRng::seed_from_u64(opts.seed);

    let mut iter_bound = opts.max_iters;
    let mut iters = 0;

    while iters < iter_bound {
        iters += 1;

        for (slot, &idx) in sample
            .iter_mut()
            .zip(all_indices.choose_multiple(&mut rng, E::MIN_SAMPLES))
        {
            *slot = idx;
        }

        if E::is_degenerate(data, &sample) {
            continue;
        }
        let Some(model) = E::fit(data, &sample) else {
            continue;
        };

        let (inliers, rms) = collect_inliers::<E>(&model, data, opts.thresh);
        if inliers.len() < opts.min_inliers {
            continue;
        }

        let (model, inliers, rms) = if opts.refit_on_inliers {
            match E::refit(data, &inliers) {
                Some(refined) => {
                    let (refined_inliers, refined_rms) =
                        collect_inliers::<E>(&refined, data, opts.thresh);
                    (refined, refined_inliers, refined_rms)
                }
                None => (model, inliers, rms),
            }
        } else {
            (model, inliers, rms)
        };

        if improves(inliers.len(), rms, best.inliers.len(), best.inlier_rms) || !best.success {
            let ratio = inliers.len() as f64 / data.len() as f64;
            best.success = true;
            best.model = Some(model);
            best.inliers = inliers;
            best.inlier_rms = rms;
            best.iters = iters;
            iter_bound =
                required_iterations(opts.confidence, ratio, E::MIN_SAMPLES, iters, opts.max_iters);
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone)]
    struct Line {
        slope: f64,
        intercept: f64,
    }

    fn fit_least_squares(data: &[(f64, f64)], indices: &[usize]) -> Option<Line> {
        if indices.len() < 2 {
            return None;
        }
        let n = indices.len() as f64;
        let (mut sx, mut sy, mut sxx, mut sxy) = (0.0, 0.0, 0.0, 0.0);
        for &i in indices {
            let (x, y) = data[i];
            sx += x;
            sy += y;
            sxx += x * x;
            sxy += x * y;
        }
        let denom = n * sxx - sx * sx;
        if denom.abs() < 1e-12 {
            return None;
        }
        let slope = (n * sxy - sx * sy) / denom;
        Some(Line {
            slope,
            intercept: (sy - slope * sx) / n,
        })
    }

    struct LineEstimator;

    impl Estimator for LineEstimator {
        type Datum = (f64, f64);
        type Model = Line;

        const MIN_SAMPLES: usize = 2;

        fn fit(data: &[Self::Datum], sample_indices: &[usize]) -> Option<Self::Model> {
            fit_least_squares(data, sample_indices)
        }

        fn residual(model: &Self::Model, datum: &Self::Datum) -> f64 {
            let (x, y) = *datum;
            (model.slope * x - y + model.intercept).abs() / model.slope.hypot(1.0)
        }

        fn refit(data: &[Self::Datum], inliers: &[usize]) -> Option<Self::Model> {
            fit_least_squares(data, inliers)
        }
    }

    fn opts() -> RansacOptions {
        RansacOptions {
            max_iters: 500,
            thresh: 0.05,
            min_inliers: 6,
            confidence: 0.99,
            seed: 42,
            refit_on_inliers: true,
        }
    }

    #[test]
    fn insufficient_data_reports_failure() {
        let res = ransac_fit::<LineEstimator>(&[(0.0, 0.0)], &opts());
        assert!(!res.success);
        assert!(res.model.is_none());
        assert!(res.inliers.is_empty());
    }

    #[test]
    fn recovers_line_despite_gross_outliers() {
        let mut data: Vec<(f64, f64)> = (0..10)
            .map(|i| {
                let x = i as f64 * 0.5;
                let jitter = if i % 2 == 0 { 0.01 } else { -0.01 };
                (x, 2.0 * x + 1.0 + jitter)
            })
            .collect();
        data.extend_from_slice(&[(5.0, -3.0), (6.0, 10.0), (7.0, -8.0)]);

        let res = ransac_fit::<LineEstimator>(&data, &opts());
        assert!(res.success);
        let line = res.model.expect("success guarantees a model");
        assert!((line.slope - 2.0).abs() < 0.05);
        assert!((line.intercept - 1.0).abs() < 0.05);
        assert!(res.inliers.len() >= 10);
    }

    #[test]
    fn fixed_seed_is_reproducible() {
        let data: Vec<(f64, f64)> = (0..20).map(|i| (i as f64, 3.0 * i as f64 - 2.0)).collect();
        let a = ransac_fit::<LineEstimator>(&data, &opts());
        let b = ransac_fit::<LineEstimator>(&data, &opts());
        assert_eq!(a.inliers, b.inliers);
        assert_eq!(a.iters, b.iters);
    }
}
