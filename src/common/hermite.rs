//! Cubic Hermite building blocks: a single two-point patch, slope estimators for knot
//! sequences, and a shape-preserving (PCHIP) interpolant.

use itertools::Itertools;

/// Evaluates the cubic which passes through `(x_a, f_a)` and `(x_b, f_b)` with slopes `dfdx_a`
/// and `dfdx_b` at those points. Outside `[x_a, x_b]` the same cubic is simply continued.
///
/// # Examples
///
/// ```
/// use foilpolar::common::hermite::cubic_hermite_patch;
/// use approx::assert_relative_eq;
/// let f = |x| cubic_hermite_patch(x, 1.0, 3.0, 2.0, 5.0, 0.5, -1.0);
/// assert_relative_eq!(f(1.0), 2.0, epsilon = 1e-12);
/// assert_relative_eq!(f(3.0), 5.0, epsilon = 1e-12);
/// ```
pub fn cubic_hermite_patch(
    x: f64,
    x_a: f64,
    x_b: f64,
    f_a: f64,
    f_b: f64,
    dfdx_a: f64,
    dfdx_b: f64,
) -> f64 {
    let dx = x_b - x_a;
    let t = (x - x_a) / dx;
    hermite_unit(t, f_a, f_b, dfdx_a * dx, dfdx_b * dx)
}

/// The cubic Hermite basis on the unit interval, where `m0` and `m1` are the end slopes already
/// scaled by the interval width.
fn hermite_unit(t: f64, f0: f64, f1: f64, m0: f64, m1: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;
    t3 * (2.0 * f0 - 2.0 * f1 + m0 + m1) + t2 * (-3.0 * f0 + 3.0 * f1 - 2.0 * m0 - m1)
        + t * m0
        + f0
}

/// Finds the knot interval which contains `x`, returning the index of its left knot. Positions
/// outside the knots map to the first or last interval. Requires at least two knots.
pub fn find_interval(knots: &[f64], x: f64) -> usize {
    let i = knots.partition_point(|k| *k <= x);
    i.clamp(1, knots.len() - 1) - 1
}

/// Estimates the slope at every knot from the three-point (parabolic) finite difference, with
/// one-sided secants at the two ends. The slopes are a fixed linear combination of the values,
/// so an interpolant built on them is linear in the data.
pub fn parabolic_slopes(knots: &[f64], values: &[f64]) -> Vec<f64> {
    let n = knots.len();
    if n < 2 {
        return vec![0.0; n];
    }

    let h = knots.iter().tuple_windows().map(|(a, b)| b - a).collect::<Vec<_>>();
    let delta = values
        .iter()
        .tuple_windows()
        .zip(h.iter())
        .map(|((a, b), w)| (b - a) / w)
        .collect::<Vec<_>>();

    let mut slopes = Vec::with_capacity(n);
    slopes.push(delta[0]);
    for i in 1..n - 1 {
        slopes.push((h[i] * delta[i - 1] + h[i - 1] * delta[i]) / (h[i - 1] + h[i]));
    }
    slopes.push(delta[n - 2]);
    slopes
}

/// Evaluates a piecewise cubic Hermite interpolant defined by knots, values and slopes. Outside
/// the knots the interpolant continues linearly with the end slope, which keeps it C¹.
pub fn hermite_eval(knots: &[f64], values: &[f64], slopes: &[f64], x: f64) -> f64 {
    let n = knots.len();
    if n == 1 {
        return values[0];
    }
    if x < knots[0] {
        return values[0] + slopes[0] * (x - knots[0]);
    }
    if x > knots[n - 1] {
        return values[n - 1] + slopes[n - 1] * (x - knots[n - 1]);
    }

    let i = find_interval(knots, x);
    let dx = knots[i + 1] - knots[i];
    let t = (x - knots[i]) / dx;
    hermite_unit(
        t,
        values[i],
        values[i + 1],
        slopes[i] * dx,
        slopes[i + 1] * dx,
    )
}

/// A piecewise cubic Hermite interpolating polynomial with Fritsch-Carlson slopes. It never
/// overshoots the data between knots, which is what keeps a repaneled airfoil surface from
/// developing wiggles that the input coordinates did not have.
#[derive(Debug, Clone)]
pub struct Pchip {
    knots: Vec<f64>,
    values: Vec<f64>,
    slopes: Vec<f64>,
}

impl Pchip {
    /// Builds the interpolant. The knots must be strictly increasing and there must be at least
    /// two of them, otherwise an error is returned.
    pub fn try_new(knots: &[f64], values: &[f64]) -> crate::Result<Self> {
        if knots.len() < 2 || knots.len() != values.len() {
            return Err("PCHIP needs at least two knots and one value per knot".into());
        }
        if knots.iter().tuple_windows().any(|(a, b)| b <= a) {
            return Err("PCHIP knots must be strictly increasing".into());
        }

        let slopes = pchip_slopes(knots, values);
        Ok(Self {
            knots: knots.to_vec(),
            values: values.to_vec(),
            slopes,
        })
    }

    pub fn eval(&self, x: f64) -> f64 {
        hermite_eval(&self.knots, &self.values, &self.slopes, x)
    }
}

fn pchip_slopes(knots: &[f64], values: &[f64]) -> Vec<f64> {
    let n = knots.len();
    let h = knots.iter().tuple_windows().map(|(a, b)| b - a).collect::<Vec<_>>();
    let delta = values
        .iter()
        .tuple_windows()
        .zip(h.iter())
        .map(|((a, b), w)| (b - a) / w)
        .collect::<Vec<_>>();

    if n == 2 {
        return vec![delta[0], delta[0]];
    }

    let mut slopes = vec![0.0; n];
    for k in 1..n - 1 {
        let (d0, d1) = (delta[k - 1], delta[k]);
        if d0 == 0.0 || d1 == 0.0 || d0.signum() != d1.signum() {
            slopes[k] = 0.0;
        } else {
            // Weighted harmonic mean
            let w1 = 2.0 * h[k] + h[k - 1];
            let w2 = h[k] + 2.0 * h[k - 1];
            slopes[k] = (w1 + w2) / (w1 / d0 + w2 / d1);
        }
    }

    slopes[0] = pchip_end_slope(h[0], h[1], delta[0], delta[1]);
    slopes[n - 1] = pchip_end_slope(h[n - 2], h[n - 3], delta[n - 2], delta[n - 3]);
    slopes
}

/// Shape-preserving three-point end slope.
fn pchip_end_slope(h0: f64, h1: f64, d0: f64, d1: f64) -> f64 {
    let d = ((2.0 * h0 + h1) * d0 - h0 * d1) / (h0 + h1);
    if d.signum() != d0.signum() || d0 == 0.0 {
        0.0
    } else if d0.signum() != d1.signum() && d.abs() > 3.0 * d0.abs() {
        3.0 * d0
    } else {
        d
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::linear_space;
    use approx::assert_relative_eq;

    #[test]
    fn patch_end_slopes() {
        let f = |x| cubic_hermite_patch(x, 0.0, 2.0, 1.0, 3.0, -1.0, 4.0);
        let e = 1e-6;
        assert_relative_eq!((f(e) - f(-e)) / (2.0 * e), -1.0, epsilon = 1e-6);
        assert_relative_eq!((f(2.0 + e) - f(2.0 - e)) / (2.0 * e), 4.0, epsilon = 1e-6);
    }

    #[test]
    fn pchip_interpolates_knots() {
        let x = [0.0, 1.0, 2.5, 3.0, 5.0];
        let y = [0.0, 1.0, 0.5, 2.0, 2.0];
        let p = Pchip::try_new(&x, &y).unwrap();
        for (xi, yi) in x.iter().zip(y.iter()) {
            assert_relative_eq!(p.eval(*xi), *yi, epsilon = 1e-12);
        }
    }

    #[test]
    fn pchip_is_monotone_on_monotone_data() {
        let x = [0.0, 1.0, 2.0, 3.0, 4.0];
        let y = [0.0, 0.1, 0.2, 5.0, 5.1];
        let p = Pchip::try_new(&x, &y).unwrap();
        let samples = linear_space(0.0, 4.0, 401)
            .into_iter()
            .map(|v| p.eval(v))
            .collect::<Vec<_>>();
        assert!(samples.windows(2).all(|w| w[1] >= w[0] - 1e-12));
    }

    #[test]
    fn pchip_rejects_repeated_knots() {
        assert!(Pchip::try_new(&[0.0, 1.0, 1.0], &[0.0, 1.0, 2.0]).is_err());
    }

    #[test]
    fn parabolic_slopes_exact_on_quadratic() {
        let x = [0.0, 0.5, 2.0, 3.0];
        let y = x.iter().map(|v| v * v).collect::<Vec<_>>();
        let s = parabolic_slopes(&x, &y);
        assert_relative_eq!(s[1], 1.0, epsilon = 1e-12);
        assert_relative_eq!(s[2], 4.0, epsilon = 1e-12);
    }

    #[test]
    fn hermite_eval_linear_extrapolation() {
        let x = [0.0, 1.0, 2.0];
        let y = [0.0, 1.0, 4.0];
        let s = parabolic_slopes(&x, &y);
        assert_relative_eq!(hermite_eval(&x, &y, &s, 3.0), 4.0 + s[2], epsilon = 1e-12);
        assert_relative_eq!(hermite_eval(&x, &y, &s, -1.0), -s[0], epsilon = 1e-12);
    }
}
