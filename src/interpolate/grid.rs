use crate::common::hermite::{hermite_eval, parabolic_slopes};
use crate::Result;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Values sampled on a rectilinear grid of knots in any number of dimensions, evaluated with a
/// tensor-product cubic Hermite interpolant. Slopes come from three-point finite differences,
/// so the interpolant is C¹ in every input and linear in the stored values. Outside the knots
/// it continues linearly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TensorGrid {
    axes: Vec<Vec<f64>>,

    /// Row-major values, the last axis varying fastest
    values: Vec<f64>,
}

impl TensorGrid {
    /// Create a grid from its axes and the row-major values. Every axis must be strictly
    /// increasing and have at least one knot, and the number of values must equal the product
    /// of the axis lengths.
    pub fn try_new(axes: Vec<Vec<f64>>, values: Vec<f64>) -> Result<Self> {
        if axes.is_empty() {
            return Err("A tensor grid needs at least one axis".into());
        }
        for axis in axes.iter() {
            if axis.is_empty() {
                return Err("Tensor grid axes cannot be empty".into());
            }
            if axis.iter().tuple_windows().any(|(a, b)| b <= a) {
                return Err("Tensor grid axes must be strictly increasing".into());
            }
        }
        let expected = axes.iter().map(|a| a.len()).product::<usize>();
        if values.len() != expected {
            return Err(format!(
                "Tensor grid expected {} values, received {}",
                expected,
                values.len()
            )
            .into());
        }

        Ok(Self { axes, values })
    }

    pub fn axes(&self) -> &[Vec<f64>] {
        &self.axes
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Enumerates every grid node in row-major order, matching the layout of `values`.
    pub fn nodes(axes: &[Vec<f64>]) -> Vec<Vec<f64>> {
        axes.iter()
            .map(|a| a.iter().copied())
            .multi_cartesian_product()
            .collect()
    }

    /// Evaluate the interpolant at `x`, which must have one coordinate per axis.
    pub fn eval(&self, x: &[f64]) -> f64 {
        debug_assert_eq!(x.len(), self.axes.len(), "one coordinate per grid axis");
        // Collapse the last axis first, then the next, until only a scalar is left
        let mut working = self.values.clone();
        for (axis, xi) in self.axes.iter().zip(x.iter()).rev() {
            working = working
                .chunks(axis.len())
                .map(|row| {
                    let slopes = parabolic_slopes(axis, row);
                    hermite_eval(axis, row, &slopes, *xi)
                })
                .collect();
        }
        working[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn bilinear_grid() -> TensorGrid {
        let a = vec![0.0, 1.0, 2.0, 4.0];
        let b = vec![-1.0, 0.0, 3.0];
        let values = TensorGrid::nodes(&[a.clone(), b.clone()])
            .iter()
            .map(|n| 2.0 * n[0] - n[1] + 0.5 * n[0] * n[1])
            .collect();
        TensorGrid::try_new(vec![a, b], values).unwrap()
    }

    #[test]
    fn reproduces_knots() {
        let g = bilinear_grid();
        assert_relative_eq!(g.eval(&[2.0, 3.0]), 4.0 - 3.0 + 3.0, epsilon = 1e-12);
        assert_relative_eq!(g.eval(&[0.0, -1.0]), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn exact_for_bilinear_functions() {
        let g = bilinear_grid();
        for (x, y) in [(0.3, 0.2), (3.1, -0.7), (1.5, 2.9), (5.0, 4.0), (-1.0, -2.0)] {
            let expected = 2.0 * x - y + 0.5 * x * y;
            assert_relative_eq!(g.eval(&[x, y]), expected, epsilon = 1e-10);
        }
    }

    #[test]
    fn one_dimensional() {
        let g = TensorGrid::try_new(vec![vec![0.0, 1.0, 2.0]], vec![1.0, 3.0, 5.0]).unwrap();
        assert_relative_eq!(g.eval(&[0.25]), 1.5, epsilon = 1e-12);
    }

    #[test]
    #[should_panic]
    #[cfg(debug_assertions)]
    fn eval_with_missing_coordinate_panics() {
        bilinear_grid().eval(&[1.0]);
    }

    #[test]
    fn rejects_wrong_value_count() {
        assert!(TensorGrid::try_new(vec![vec![0.0, 1.0], vec![0.0, 1.0]], vec![0.0; 3]).is_err());
    }
}
