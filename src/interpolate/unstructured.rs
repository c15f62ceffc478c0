use super::{RbfInterpolator, RbfSettings, TensorGrid};
use crate::Result;
use serde::{Deserialize, Serialize};

/// One named input axis of an `UnstructuredModel`: the coordinate of every training sample on
/// this axis, and the knots the fitted regressor will be resampled at.
#[derive(Debug, Clone, Copy)]
pub struct Axis<'a> {
    pub name: &'a str,
    pub data: &'a [f64],
    pub knots: &'a [f64],
}

impl<'a> Axis<'a> {
    pub fn new(name: &'a str, data: &'a [f64], knots: &'a [f64]) -> Self {
        Self { name, data, knots }
    }
}

/// A surrogate fitted to unstructured (scattered) samples over one or more named inputs. The
/// samples are regressed with a radial basis function, the regressor is evaluated on the tensor
/// grid of knots, and from then on only the grid is kept. Evaluation has no side effects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnstructuredModel {
    names: Vec<String>,
    grid: TensorGrid,
}

impl UnstructuredModel {
    /// Fit the model.
    ///
    /// # Arguments
    ///
    /// * `axes`: the named input axes, each with its training coordinates and resampling knots.
    /// The knots of each axis are sorted and de-duplicated before use.
    /// * `y_data`: the training output, one value per sample
    /// * `settings`: the radial basis function parameters
    ///
    /// returns: Result<UnstructuredModel, Box<dyn Error, Global>>
    ///
    /// # Examples
    ///
    /// ```
    /// use foilpolar::interpolate::{Axis, RbfSettings, UnstructuredModel};
    /// let x = [0.0, 1.0, 2.0, 3.0];
    /// let y = [1.0, 1.0, 1.0, 1.0];
    /// let model = UnstructuredModel::fit(
    ///     &[Axis::new("x", &x, &x)],
    ///     &y,
    ///     &RbfSettings::default(),
    /// ).unwrap();
    /// assert!((model.eval(&[1.5]) - 1.0).abs() < 1e-9);
    /// ```
    pub fn fit(axes: &[Axis], y_data: &[f64], settings: &RbfSettings) -> Result<Self> {
        let columns = axes.iter().map(|a| a.data).collect::<Vec<_>>();
        let rbf = RbfInterpolator::fit(&columns, y_data, settings)?;

        let knots = axes
            .iter()
            .map(|a| {
                let mut k = a.knots.to_vec();
                k.sort_by(|a, b| a.total_cmp(b));
                k.dedup();
                k
            })
            .collect::<Vec<_>>();

        if knots.iter().flatten().any(|k| !k.is_finite()) {
            return Err("Resampling knots must be finite".into());
        }

        let values = TensorGrid::nodes(&knots)
            .iter()
            .map(|node| rbf.eval(node))
            .collect::<Vec<_>>();

        Ok(Self {
            names: axes.iter().map(|a| a.name.to_string()).collect(),
            grid: TensorGrid::try_new(knots, values)?,
        })
    }

    /// Build a model directly from values already sampled on the knot grid, with no regression
    /// step. This is the exact fit of data that lies on the grid: the stored values are the
    /// data. `values` is row-major with the last axis varying fastest, and every axis must be
    /// strictly increasing.
    ///
    /// # Examples
    ///
    /// ```
    /// use foilpolar::interpolate::UnstructuredModel;
    /// let model = UnstructuredModel::tabulated(
    ///     &["x"],
    ///     vec![vec![0.0, 1.0, 2.0]],
    ///     vec![0.0, 1.0, 4.0],
    /// ).unwrap();
    /// assert!((model.eval(&[2.0]) - 4.0).abs() < 1e-12);
    /// ```
    pub fn tabulated(names: &[&str], knots: Vec<Vec<f64>>, values: Vec<f64>) -> Result<Self> {
        if names.len() != knots.len() {
            return Err("Every knot axis needs a name".into());
        }
        if knots.iter().flatten().any(|k| !k.is_finite()) {
            return Err("Knots must be finite".into());
        }

        Ok(Self {
            names: names.iter().map(|n| n.to_string()).collect(),
            grid: TensorGrid::try_new(knots, values)?,
        })
    }

    /// The names of the input axes, in the order `eval` expects its coordinates.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn grid(&self) -> &TensorGrid {
        &self.grid
    }

    /// Returns true if every coordinate lies within the knot range of its axis.
    pub fn in_domain(&self, x: &[f64]) -> bool {
        debug_assert_eq!(x.len(), self.names.len(), "one coordinate per model axis");
        self.grid
            .axes()
            .iter()
            .zip(x.iter())
            .all(|(axis, v)| *v >= axis[0] && *v <= axis[axis.len() - 1])
    }

    pub fn eval(&self, x: &[f64]) -> f64 {
        self.grid.eval(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::linear_space;
    use approx::assert_relative_eq;

    #[test]
    fn two_axis_smooth_surface() {
        // A plane is in the span of the kernel plus constant only approximately, so check the
        // fit against a loose tolerance at interior points.
        let alphas = linear_space(-10.0, 10.0, 11);
        let ln_re = linear_space(10.0, 14.0, 5);
        let mut a = Vec::new();
        let mut r = Vec::new();
        let mut y = Vec::new();
        for lr in ln_re.iter() {
            for al in alphas.iter() {
                a.push(*al);
                r.push(*lr);
                y.push(0.1 * al + 0.05 * lr);
            }
        }

        let model = UnstructuredModel::fit(
            &[
                Axis::new("alpha", &a, &alphas),
                Axis::new("ln_Re", &r, &ln_re),
            ],
            &y,
            &RbfSettings::default(),
        )
        .unwrap();

        assert_eq!(model.names(), &["alpha".to_string(), "ln_Re".to_string()]);
        let v = model.eval(&[2.0, 12.0]);
        assert_relative_eq!(v, 0.1 * 2.0 + 0.05 * 12.0, epsilon = 0.05);
        assert!(model.in_domain(&[0.0, 11.0]));
        assert!(!model.in_domain(&[20.0, 11.0]));
    }

    #[test]
    fn knots_are_sorted_and_deduplicated() {
        let x = [0.0, 1.0, 2.0];
        let y = [0.0, 1.0, 4.0];
        let knots = [2.0, 0.0, 1.0, 1.0];
        let model =
            UnstructuredModel::fit(&[Axis::new("x", &x, &knots)], &y, &RbfSettings::default())
                .unwrap();
        assert_eq!(model.grid().axes()[0], vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn tabulated_reproduces_its_values() {
        let knots = linear_space(-180.0, 180.0, 19);
        let values = knots.iter().map(|a: &f64| a.to_radians().sin()).collect::<Vec<_>>();
        let model = UnstructuredModel::tabulated(&["alpha"], vec![knots.clone()], values.clone())
            .unwrap();
        for (k, v) in knots.iter().zip(values.iter()) {
            assert_relative_eq!(model.eval(&[*k]), *v, epsilon = 1e-12);
        }
        assert!(UnstructuredModel::tabulated(&["a", "b"], vec![knots], values).is_err());
    }

    #[test]
    #[should_panic]
    #[cfg(debug_assertions)]
    fn in_domain_with_missing_coordinate_panics() {
        let x = [0.0, 1.0, 2.0];
        let model =
            UnstructuredModel::tabulated(&["x", "y"], vec![x.to_vec(), x.to_vec()], vec![0.0; 9])
                .unwrap();
        model.in_domain(&[1.0]);
    }

    #[test]
    fn serde_round_trip_preserves_evaluation() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [0.0, 0.5, 0.7, 0.8];
        let model =
            UnstructuredModel::fit(&[Axis::new("x", &x, &x)], &y, &RbfSettings::default())
                .unwrap();
        let text = serde_json::to_string(&model).unwrap();
        let back: UnstructuredModel = serde_json::from_str(&text).unwrap();
        assert_relative_eq!(model.eval(&[1.3]), back.eval(&[1.3]), epsilon = 1e-12);
    }
}
