mod angles;
mod discrete_domain;
pub mod hermite;
pub mod smooth;

pub use angles::{rotate_about, wrap_degrees};
pub use discrete_domain::DiscreteDomain;

use serde::{Deserialize, Serialize};

/// Options for distributing parameter values over an interval, used when repaneling an airfoil
/// to decide where the new points land along each surface.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Spacing {
    /// Evenly spaced values
    Linear,

    /// Cosine spaced values, clustered toward both ends of the interval. On an airfoil surface
    /// this concentrates points at the leading and trailing edges, where curvature is highest.
    #[default]
    Cosine,
}

impl Spacing {
    /// Generate `count` values from `start` to `end` (both inclusive) with this spacing.
    pub fn space(&self, start: f64, end: f64, count: usize) -> Vec<f64> {
        match self {
            Spacing::Linear => linear_space(start, end, count),
            Spacing::Cosine => cosine_space(start, end, count),
        }
    }
}

/// Generate a vec of values which are linearly spaced between `start` and `end` and which
/// have a count of `count`. The first value will be `start` and the last value will be `end`.
///
/// # Arguments
///
/// * `start`: the starting value of the domain, inclusive
/// * `end`: the ending value of the domain, inclusive
/// * `count`: the total number of discrete, evenly spaced values in the domain
///
/// returns: Vec<f64, Global>
///
/// # Examples
///
/// ```
/// use foilpolar::common::linear_space;
/// let domain = linear_space(0.0, 1.0, 3);
/// assert_eq!(domain, vec![0.0, 0.5, 1.0]);
/// ```
pub fn linear_space(start: f64, end: f64, count: usize) -> Vec<f64> {
    if count == 1 {
        return vec![start];
    }
    let mut result = Vec::with_capacity(count);
    let step = (end - start) / (count - 1) as f64;
    for i in 0..count {
        result.push(start + i as f64 * step);
    }
    // The last value is assigned directly so that it is exactly `end`
    if let Some(last) = result.last_mut() {
        *last = end;
    }
    result
}

/// Generate a vec of `count` cosine spaced values between `start` and `end`, both inclusive.
/// The values are `mid + amp * cos(t)` for `t` evenly spaced from pi to 0.
///
/// # Examples
///
/// ```
/// use foilpolar::common::cosine_space;
/// let domain = cosine_space(0.0, 1.0, 3);
/// assert_eq!(domain, vec![0.0, 0.5, 1.0]);
/// ```
pub fn cosine_space(start: f64, end: f64, count: usize) -> Vec<f64> {
    let mid = (start + end) / 2.0;
    let amp = (end - start) / 2.0;
    let mut result = linear_space(std::f64::consts::PI, 0.0, count)
        .into_iter()
        .map(|t| mid + amp * t.cos())
        .collect::<Vec<_>>();

    // Pin the ends exactly, the cosine leaves round-off at both of them
    if let Some(first) = result.first_mut() {
        *first = start;
    }
    if let Some(last) = result.last_mut() {
        *last = end;
    }
    result
}

/// Generate a vec of `count` values spaced evenly in log space between `start` and `end`.
/// Both bounds must be strictly positive.
pub fn geom_space(start: f64, end: f64, count: usize) -> Vec<f64> {
    linear_space(start.log10(), end.log10(), count)
        .into_iter()
        .map(|e| 10.0_f64.powf(e))
        .collect()
}

/// One dimensional piecewise linear interpolation of `x` on the ascending sample positions `xp`
/// with values `fp`. Values outside the sampled range are clamped to the end values.
///
/// # Arguments
///
/// * `x`: the position to evaluate at
/// * `xp`: sample positions, ascending, must not be empty
/// * `fp`: sample values, same length as `xp`
///
/// returns: f64
pub fn interp(x: f64, xp: &[f64], fp: &[f64]) -> f64 {
    let n = xp.len();
    if x <= xp[0] {
        return fp[0];
    }
    if x >= xp[n - 1] {
        return fp[n - 1];
    }

    // The first sample position strictly greater than x, which is in 1..n here
    let i = xp.partition_point(|v| *v <= x);
    let (x0, x1) = (xp[i - 1], xp[i]);
    let (f0, f1) = (fp[i - 1], fp[i]);
    if x1 == x0 {
        return f1;
    }
    f0 + (f1 - f0) * (x - x0) / (x1 - x0)
}

/// Returns the median of the finite values in the slice, or `None` if there are none.
pub fn median(values: &[f64]) -> Option<f64> {
    let mut sorted = values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .collect::<Vec<_>>();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(|a, b| a.total_cmp(b));

    let n = sorted.len();
    if n % 2 == 1 {
        Some(sorted[n / 2])
    } else {
        Some((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0)
    }
}
