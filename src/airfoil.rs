//! This module contains the `Airfoil`, a named 2D section outline paired with the lift, drag and
//! moment coefficient functions that describe its aerodynamics, along with the geometric queries
//! (camber, thickness, trailing edge properties) that the polar pipeline and the transforms need.

mod coordinates;
mod transforms;

use crate::common::{interp, linear_space};
use crate::errors::AirfoilError;
use crate::polars::{AnalysisTool, CoefficientModel, PolarModel, PolarOptions, SurrogateModel};
use crate::{Point2, Result};
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub use coordinates::{
    CoordinateResolver, CoordinateSource, FileResolver, parse_dat, read_dat,
};
pub use transforms::control_surface_effectiveness;

/// The number of evenly spaced chordwise stations used by `max_camber` and `max_thickness`
const MAX_SAMPLE_STATIONS: usize = 101;

/// A 2D airfoil section.
///
/// The points are ordered starting at the upper surface trailing edge, running forward over the
/// upper surface to the leading edge, and then aft over the lower surface to the lower surface
/// trailing edge. The leading edge is the point with the smallest x coordinate and it appears
/// only once; the split into upper and lower surfaces is purely by index around it. The
/// trailing edge does not need to be closed.
///
/// An airfoil may have no points at all, for instance when its coordinates could not be
/// resolved. Every geometric query then fails with `AirfoilError::MissingGeometry`.
///
/// Airfoils are values: the transforms and `generate_polars` all return new airfoils.
#[derive(Debug, Clone)]
pub struct Airfoil {
    name: String,
    points: Vec<Point2>,
    polars: PolarModel,
}

impl Airfoil {
    /// Create an airfoil from its points, with the thin airfoil coefficient functions.
    ///
    /// # Arguments
    ///
    /// * `name`: a display name, which doesn't need to be unique
    /// * `points`: the outline, in the order described on `Airfoil`
    ///
    /// returns: Airfoil
    ///
    /// # Examples
    ///
    /// ```
    /// use foilpolar::{Airfoil, Point2};
    /// let airfoil = Airfoil::new("wedge", vec![
    ///     Point2::new(1.0, 0.0),
    ///     Point2::new(0.0, 0.0),
    ///     Point2::new(1.0, -0.1),
    /// ]);
    /// assert_eq!(airfoil.le_index().unwrap(), 1);
    /// ```
    pub fn new(name: impl Into<String>, points: Vec<Point2>) -> Self {
        Self {
            name: name.into(),
            points,
            polars: PolarModel::default(),
        }
    }

    /// Replace the coefficient functions of the airfoil.
    pub fn with_polars(mut self, polars: PolarModel) -> Self {
        self.polars = polars;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    pub fn n_points(&self) -> usize {
        self.points.len()
    }

    pub fn polars(&self) -> &PolarModel {
        &self.polars
    }

    /// Returns true if the airfoil carries anything other than the thin airfoil default
    /// coefficient functions.
    pub fn has_polars(&self) -> bool {
        self.polars.is_fitted()
    }

    fn require_points(&self) -> Result<&[Point2]> {
        if self.points.is_empty() {
            Err(AirfoilError::MissingGeometry.into())
        } else {
            Ok(&self.points)
        }
    }

    pub fn x(&self) -> Result<Vec<f64>> {
        Ok(self.require_points()?.iter().map(|p| p.x).collect())
    }

    pub fn y(&self) -> Result<Vec<f64>> {
        Ok(self.require_points()?.iter().map(|p| p.y).collect())
    }

    /// The index of the leading edge, the first point with the smallest x coordinate.
    pub fn le_index(&self) -> Result<usize> {
        let points = self.require_points()?;
        let mut index = 0;
        for (i, p) in points.iter().enumerate() {
            if p.x < points[index].x {
                index = i;
            }
        }
        Ok(index)
    }

    /// The upper surface from the trailing edge to the leading edge, including the leading edge
    /// point.
    pub fn upper_coordinates(&self) -> Result<&[Point2]> {
        let i = self.le_index()?;
        Ok(&self.points[..=i])
    }

    /// The lower surface from the leading edge to the trailing edge, including the leading edge
    /// point.
    pub fn lower_coordinates(&self) -> Result<&[Point2]> {
        let i = self.le_index()?;
        Ok(&self.points[i..])
    }

    fn surfaces(&self) -> Result<Surfaces> {
        let upper = self.upper_coordinates()?;
        let lower = self.lower_coordinates()?;
        Ok(Surfaces {
            upper_x: upper.iter().rev().map(|p| p.x).collect(),
            upper_y: upper.iter().rev().map(|p| p.y).collect(),
            lower_x: lower.iter().map(|p| p.x).collect(),
            lower_y: lower.iter().map(|p| p.y).collect(),
        })
    }

    /// The local camber (mean of the upper and lower surface heights) at chordwise position `x`.
    /// Each surface is interpolated linearly and held constant beyond its ends.
    pub fn local_camber(&self, x: f64) -> Result<f64> {
        let (upper, lower) = self.surfaces()?.at(x);
        Ok((upper + lower) / 2.0)
    }

    /// The local thickness (upper surface height minus lower surface height) at chordwise
    /// position `x`.
    pub fn local_thickness(&self, x: f64) -> Result<f64> {
        let (upper, lower) = self.surfaces()?.at(x);
        Ok(upper - lower)
    }

    /// `local_camber` at each of the chordwise positions in `xs`.
    pub fn local_camber_at(&self, xs: &[f64]) -> Result<Vec<f64>> {
        let s = self.surfaces()?;
        Ok(xs
            .iter()
            .map(|x| {
                let (u, l) = s.at(*x);
                (u + l) / 2.0
            })
            .collect())
    }

    /// `local_thickness` at each of the chordwise positions in `xs`.
    pub fn local_thickness_at(&self, xs: &[f64]) -> Result<Vec<f64>> {
        let s = self.surfaces()?;
        Ok(xs
            .iter()
            .map(|x| {
                let (u, l) = s.at(*x);
                u - l
            })
            .collect())
    }

    /// The largest local camber over 101 evenly spaced stations from x = 0 to x = 1.
    pub fn max_camber(&self) -> Result<f64> {
        self.max_camber_at(&linear_space(0.0, 1.0, MAX_SAMPLE_STATIONS))
    }

    /// The largest local thickness over 101 evenly spaced stations from x = 0 to x = 1.
    pub fn max_thickness(&self) -> Result<f64> {
        self.max_thickness_at(&linear_space(0.0, 1.0, MAX_SAMPLE_STATIONS))
    }

    pub fn max_camber_at(&self, stations: &[f64]) -> Result<f64> {
        Ok(self
            .local_camber_at(stations)?
            .into_iter()
            .fold(f64::NEG_INFINITY, f64::max))
    }

    pub fn max_thickness_at(&self, stations: &[f64]) -> Result<f64> {
        Ok(self
            .local_thickness_at(stations)?
            .into_iter()
            .fold(f64::NEG_INFINITY, f64::max))
    }

    /// The distance between the first and last points.
    pub fn te_thickness(&self) -> Result<f64> {
        let points = self.require_points()?;
        Ok((points[0] - points[points.len() - 1]).norm())
    }

    /// The signed angle in degrees between the last upper surface panel and the last lower
    /// surface panel, each taken as the vector pointing toward the trailing edge.
    pub fn te_angle(&self) -> Result<f64> {
        let p = self.require_points()?;
        let n = p.len();
        if n < 3 {
            return Err("A trailing edge angle needs at least three points".into());
        }
        let upper = p[0] - p[1];
        let lower = p[n - 1] - p[n - 2];
        Ok(upper.perp(&lower).atan2(upper.dot(&lower)).to_degrees())
    }

    /// Lift coefficient at `alpha` degrees, Reynolds number `re` and Mach number `mach`.
    pub fn cl(&self, alpha: f64, re: f64, mach: f64) -> f64 {
        self.polars.cl(alpha, re, mach)
    }

    /// Drag coefficient at `alpha` degrees, Reynolds number `re` and Mach number `mach`.
    pub fn cd(&self, alpha: f64, re: f64, mach: f64) -> f64 {
        self.polars.cd(alpha, re, mach)
    }

    /// Moment coefficient at `alpha` degrees, Reynolds number `re` and Mach number `mach`.
    pub fn cm(&self, alpha: f64, re: f64, mach: f64) -> f64 {
        self.polars.cm(alpha, re, mach)
    }

    /// Generate polars for this airfoil by sweeping the analysis tool over the alphas and
    /// Reynolds numbers in `options` (or reading a cached sweep), then fitting a smooth
    /// surrogate to the data. Returns a copy of this airfoil carrying the surrogate as its
    /// coefficient functions; `self` is not modified.
    ///
    /// # Arguments
    ///
    /// * `options`: sweeps, cache location and fitting settings
    /// * `tool`: the external analysis tool
    ///
    /// returns: Result<Airfoil, Box<dyn Error, Global>>
    pub fn generate_polars(
        &self,
        options: &PolarOptions,
        tool: &dyn AnalysisTool,
    ) -> Result<Airfoil> {
        let surrogate = SurrogateModel::generate(self, options, tool)?;
        Ok(self
            .clone()
            .with_polars(PolarModel::Surrogate(Arc::new(surrogate))))
    }
}

/// Equality compares the name and the points only. Coefficient functions are not comparable.
impl PartialEq for Airfoil {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.points == other.points
    }
}

impl Display for Airfoil {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Airfoil {} ({} points)", self.name, self.points.len())
    }
}

/// Upper and lower surfaces, both ordered from the leading edge aft, split into x and y columns
/// for interpolation.
struct Surfaces {
    upper_x: Vec<f64>,
    upper_y: Vec<f64>,
    lower_x: Vec<f64>,
    lower_y: Vec<f64>,
}

impl Surfaces {
    fn at(&self, x: f64) -> (f64, f64) {
        (
            interp(x, &self.upper_x, &self.upper_y),
            interp(x, &self.lower_x, &self.lower_y),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{SyntheticTool, naca_airfoil};
    use approx::assert_relative_eq;
    use test_case::test_case;

    fn wedge() -> Airfoil {
        Airfoil::new(
            "wedge",
            vec![
                Point2::new(1.0, 0.05),
                Point2::new(0.5, 0.05),
                Point2::new(0.0, 0.0),
                Point2::new(0.5, -0.05),
                Point2::new(1.0, -0.05),
            ],
        )
    }

    #[test]
    fn surfaces_share_leading_edge() {
        let a = wedge();
        assert_eq!(a.le_index().unwrap(), 2);
        assert_eq!(a.upper_coordinates().unwrap().len(), 3);
        assert_eq!(a.lower_coordinates().unwrap().len(), 3);
        assert_eq!(a.upper_coordinates().unwrap()[2], a.lower_coordinates().unwrap()[0]);
    }

    #[test]
    fn le_index_takes_first_minimum() {
        let a = Airfoil::new(
            "flat",
            vec![
                Point2::new(1.0, 0.0),
                Point2::new(0.0, 0.1),
                Point2::new(0.0, -0.1),
                Point2::new(1.0, 0.0),
            ],
        );
        assert_eq!(a.le_index().unwrap(), 1);
    }

    #[test_case(0.0, 0.0, 0.0)]
    #[test_case(0.25, 0.0, 0.05)]
    #[test_case(0.75, 0.0, 0.1)]
    #[test_case(1.5, 0.0, 0.1)]
    fn local_thickness_and_camber(x: f64, camber: f64, thickness: f64) {
        let a = wedge();
        assert_relative_eq!(a.local_camber(x).unwrap(), camber, epsilon = 1e-12);
        assert_relative_eq!(a.local_thickness(x).unwrap(), thickness, epsilon = 1e-12);
    }

    #[test]
    fn thickness_consistent_with_surfaces() {
        let a = naca_airfoil("4412");
        let upper = a.upper_coordinates().unwrap().iter().rev().copied().collect::<Vec<_>>();
        let lower = a.lower_coordinates().unwrap();
        let ux = upper.iter().map(|p| p.x).collect::<Vec<_>>();
        let uy = upper.iter().map(|p| p.y).collect::<Vec<_>>();
        let lx = lower.iter().map(|p| p.x).collect::<Vec<_>>();
        let ly = lower.iter().map(|p| p.y).collect::<Vec<_>>();

        for x in linear_space(0.0, 1.0, 37) {
            let u = interp(x, &ux, &uy);
            let l = interp(x, &lx, &ly);
            assert_relative_eq!(a.local_thickness(x).unwrap(), u - l, epsilon = 1e-12);
            assert_relative_eq!(a.local_camber(x).unwrap(), (u + l) / 2.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn naca_maxima() {
        let a = naca_airfoil("2412");
        assert_relative_eq!(a.max_thickness().unwrap(), 0.12, epsilon = 2e-3);
        assert_relative_eq!(a.max_camber().unwrap(), 0.02, epsilon = 1e-3);
        let b = naca_airfoil("0012");
        assert_relative_eq!(b.max_camber().unwrap(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn trailing_edge_properties() {
        let a = wedge();
        assert_relative_eq!(a.te_thickness().unwrap(), 0.1, epsilon = 1e-12);
        assert_relative_eq!(a.te_angle().unwrap(), 0.0, epsilon = 1e-12);

        let sharp = naca_airfoil("0012");
        assert_relative_eq!(sharp.te_thickness().unwrap(), 0.0, epsilon = 1e-9);
        // Upper panel points aft and down, lower panel aft and up
        assert!(sharp.te_angle().unwrap() > 5.0);
        assert!(sharp.te_angle().unwrap() < 30.0);
    }

    #[test]
    fn missing_geometry_queries_fail() {
        let a = Airfoil::new("nothing", Vec::new());
        let is_missing = |e: Box<dyn std::error::Error>| {
            e.downcast_ref::<AirfoilError>() == Some(&AirfoilError::MissingGeometry)
        };
        assert_eq!(a.n_points(), 0);
        assert!(is_missing(a.le_index().unwrap_err()));
        assert!(is_missing(a.max_thickness().unwrap_err()));
        assert!(is_missing(a.max_camber().unwrap_err()));
        assert!(is_missing(a.local_camber(0.5).unwrap_err()));
        assert!(is_missing(a.te_angle().unwrap_err()));
    }

    #[test]
    fn default_polars_are_thin_airfoil() {
        let a = wedge();
        assert!(!a.has_polars());
        assert_relative_eq!(a.cl(1.0, 1e6, 0.0), 2.0 * std::f64::consts::PI * 1f64.to_radians());
        assert_eq!(a.cd(1.0, 1e6, 0.0), 0.0);
    }

    #[test]
    fn generate_polars_returns_new_airfoil() {
        let a = naca_airfoil("2412");
        let options = PolarOptions::new(linear_space(-8.0, 8.0, 9), vec![1e5, 1e6]);
        let b = a.generate_polars(&options, &SyntheticTool::new()).unwrap();
        assert!(!a.has_polars());
        assert!(b.has_polars());
        assert_eq!(a, b);
        assert!(b.cl(4.0, 5e5, 0.0) > b.cl(0.0, 5e5, 0.0));
    }

    #[test]
    fn display_names_point_count() {
        assert_eq!(wedge().to_string(), "Airfoil wedge (5 points)");
    }
}
