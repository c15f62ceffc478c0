//! A multiquadric radial basis function regressor with a constant polynomial term.

use crate::Result;
use parry2d_f64::na::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

/// Parameters of the radial basis function fit. The defaults were tuned for airfoil polar data
/// and give a mildly smoothed fit that does not chase solver noise.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RbfSettings {
    /// Shape parameter of the multiquadric kernel, applied to distances measured in inputs that
    /// have been normalized by their data range.
    pub epsilon: f64,

    /// Amount added to the diagonal of the kernel matrix. Zero gives an exact interpolant (which
    /// fails on duplicated input points), larger values trade fidelity for smoothness.
    pub smoothing: f64,
}

impl Default for RbfSettings {
    fn default() -> Self {
        Self {
            epsilon: 3.0,
            smoothing: 0.01,
        }
    }
}

/// The multiquadric kernel, `-sqrt(1 + r^2)`, where `r` has already been scaled by epsilon.
fn multiquadric(r: f64) -> f64 {
    -(1.0 + r * r).sqrt()
}

/// A fitted radial basis function model over `dim` inputs. Each input is shifted and scaled by
/// the range of its training data before distances are computed, so axes with very different
/// units (degrees, log Reynolds) contribute comparably.
#[derive(Debug, Clone)]
pub struct RbfInterpolator {
    dim: usize,
    centers: Vec<f64>,
    shift: Vec<f64>,
    scale: Vec<f64>,
    epsilon: f64,
    weights: Vec<f64>,
    constant: f64,
}

impl RbfInterpolator {
    /// Fit the model to scattered data.
    ///
    /// # Arguments
    ///
    /// * `columns`: one slice per input dimension, each holding that coordinate of every sample
    /// * `y`: the sampled output, one value per sample
    /// * `settings`: kernel shape and smoothing
    ///
    /// returns: Result<RbfInterpolator, Box<dyn Error, Global>>
    pub fn fit(columns: &[&[f64]], y: &[f64], settings: &RbfSettings) -> Result<Self> {
        let dim = columns.len();
        let n = y.len();
        if dim == 0 || n == 0 {
            return Err("Cannot fit a radial basis function to empty data".into());
        }
        if columns.iter().any(|c| c.len() != n) {
            return Err("Every input column must have one value per sample".into());
        }

        let mut shift = Vec::with_capacity(dim);
        let mut scale = Vec::with_capacity(dim);
        for c in columns {
            let lo = c.iter().copied().fold(f64::INFINITY, f64::min);
            let hi = c.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let range = hi - lo;
            shift.push(lo);
            scale.push(if range > 0.0 { range } else { 1.0 });
        }

        // Row-major normalized sample coordinates
        let mut centers = Vec::with_capacity(n * dim);
        for i in 0..n {
            for (k, c) in columns.iter().enumerate() {
                centers.push((c[i] - shift[k]) / scale[k]);
            }
        }

        let epsilon = settings.epsilon;
        let dist = |i: usize, j: usize| -> f64 {
            (0..dim)
                .map(|k| (centers[i * dim + k] - centers[j * dim + k]).powi(2))
                .sum::<f64>()
                .sqrt()
        };

        // Kernel block, augmented with the constant polynomial column and its orthogonality row
        let lhs = DMatrix::<f64>::from_fn(n + 1, n + 1, |i, j| {
            if i == n && j == n {
                0.0
            } else if i == n || j == n {
                1.0
            } else {
                let k = multiquadric(epsilon * dist(i, j));
                if i == j { k + settings.smoothing } else { k }
            }
        });
        let mut rhs = DVector::<f64>::zeros(n + 1);
        for (i, v) in y.iter().enumerate() {
            rhs[i] = *v;
        }

        let solution = lhs
            .lu()
            .solve(&rhs)
            .ok_or("Radial basis function system is singular")?;

        Ok(Self {
            dim,
            centers,
            shift,
            scale,
            epsilon,
            weights: solution.rows(0, n).iter().copied().collect(),
            constant: solution[n],
        })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Evaluate the fitted model at a point with `dim` coordinates in the unscaled input
    /// units.
    pub fn eval(&self, x: &[f64]) -> f64 {
        let scaled = x
            .iter()
            .zip(self.shift.iter().zip(self.scale.iter()))
            .map(|(v, (s, w))| (v - s) / w)
            .collect::<Vec<_>>();

        let mut total = self.constant;
        for (i, w) in self.weights.iter().enumerate() {
            let center = &self.centers[i * self.dim..(i + 1) * self.dim];
            let r = center
                .iter()
                .zip(scaled.iter())
                .map(|(c, v)| (c - v).powi(2))
                .sum::<f64>()
                .sqrt();
            total += w * multiquadric(self.epsilon * r);
        }
        total
    }
}
