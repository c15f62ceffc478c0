//! Geometry transforms. Each one returns a new airfoil whose coordinates and coefficient
//! functions stay consistent with each other, so a transformed airfoil can go straight back into
//! the polar pipeline or be evaluated directly.

use super::Airfoil;
use crate::common::hermite::Pchip;
use crate::common::{Spacing, rotate_about};
use crate::errors::AirfoilError;
use crate::{Point2, Result, Vector2};
use itertools::Itertools;

/// Exponent of the empirical fit of control surface effectiveness against hinge position
const EFFECTIVENESS_EXPONENT: f64 = 2.751428551177291;

/// The fraction of a control surface deflection which shows up as an equivalent change in angle
/// of attack, for a hinge at `hinge_x` (fraction of chord).
pub fn control_surface_effectiveness(hinge_x: f64) -> f64 {
    1.0 - (hinge_x + 1e-16).max(0.0).powf(EFFECTIVENESS_EXPONENT)
}

/// Cumulative distance along a polyline, starting at zero. Fails on the first zero-length
/// segment, reporting its position offset by `first_index`.
fn arclength(points: &[Point2], first_index: usize) -> Result<Vec<f64>> {
    let mut total = 0.0;
    let mut result = Vec::with_capacity(points.len());
    result.push(0.0);
    for (i, (a, b)) in points.iter().tuple_windows().enumerate() {
        let d = (b - a).norm();
        if d == 0.0 {
            return Err(AirfoilError::DegenerateGeometry {
                index: first_index + i,
            }
            .into());
        }
        total += d;
        result.push(total);
    }
    Ok(result)
}

impl Airfoil {
    /// Returns a copy of the airfoil with new points redistributed along each surface. The
    /// surfaces are parameterized by normalized arclength (0 to 1 over the upper surface from
    /// the trailing edge, 1 to 2 over the lower surface from the leading edge), and x and y are
    /// each interpolated against that parameter with a monotone cubic (PCHIP).
    ///
    /// # Arguments
    ///
    /// * `n_points_per_side`: the number of points on each surface, including the shared
    /// leading edge point. The result has `2 * n_points_per_side - 1` points.
    /// * `spacing`: how the points are distributed along each surface
    ///
    /// returns: Result<Airfoil, Box<dyn Error, Global>>
    pub fn repanel(&self, n_points_per_side: usize, spacing: Spacing) -> Result<Airfoil> {
        if n_points_per_side < 2 {
            return Err("Repaneling needs at least two points per side".into());
        }

        let le = self.le_index()?;
        let upper = self.upper_coordinates()?;
        let lower = self.lower_coordinates()?;
        if upper.len() < 2 || lower.len() < 2 {
            return Err("Repaneling needs points on both surfaces".into());
        }

        let upper_s = arclength(upper, 0)?;
        let lower_s = arclength(lower, le)?;
        let upper_total = upper_s[upper_s.len() - 1];
        let lower_total = lower_s[lower_s.len() - 1];

        let mut param = upper_s.iter().map(|s| s / upper_total).collect::<Vec<_>>();
        param.extend(lower_s.iter().skip(1).map(|s| 1.0 + s / lower_total));

        let x = Pchip::try_new(&param, &self.x()?)?;
        let y = Pchip::try_new(&param, &self.y()?)?;

        let side = spacing.space(0.0, 1.0, n_points_per_side);
        let points = side
            .iter()
            .copied()
            .chain(side.iter().skip(1).map(|s| 1.0 + s))
            .map(|s| Point2::new(x.eval(s), y.eval(s)))
            .collect();

        Ok(self.with_points(points))
    }

    /// Returns a version of the airfoil with a trailing edge control surface deflected about a
    /// hinge.
    ///
    /// # Arguments
    ///
    /// * `deflection`: deflection angle in degrees, positive trailing edge down
    /// * `hinge_x`: chordwise position of the hinge as a fraction of chord. The hinge lies on
    /// the lower surface for positive deflections and the upper surface otherwise.
    /// * `modify_coordinates`: whether to rotate the points aft of the hinge
    /// * `modify_polars`: whether to shift the coefficient functions by the equivalent change in
    /// angle of attack
    ///
    /// returns: Result<Airfoil, Box<dyn Error, Global>>
    pub fn add_control_surface(
        &self,
        deflection: f64,
        hinge_x: f64,
        modify_coordinates: bool,
        modify_polars: bool,
    ) -> Result<Airfoil> {
        let mut result = self.clone();

        if modify_coordinates {
            let camber = self.local_camber(hinge_x)?;
            let half_thickness = self.local_thickness(hinge_x)? / 2.0;
            let hinge_y = if deflection > 0.0 {
                camber - half_thickness
            } else {
                camber + half_thickness
            };
            let hinge = Point2::new(hinge_x, hinge_y);

            // The cut line bisects the angle between the fixed and deflected parts
            let (sin_half, cos_half) = (deflection / 2.0).to_radians().sin_cos();
            let is_behind_hinge =
                |p: &Point2| (p.x - hinge.x) * cos_half - (p.y - hinge.y) * sin_half > 0.0;

            let angle = -deflection.to_radians();
            let upper = self.upper_coordinates()?;
            let lower = self.lower_coordinates()?;
            result.points = upper
                .iter()
                .chain(lower.iter().skip(1))
                .map(|p| {
                    let rotated = rotate_about(p, &hinge, angle);
                    if is_behind_hinge(&rotated) { rotated } else { *p }
                })
                .collect();
        }

        if modify_polars {
            let delta_alpha = deflection * control_surface_effectiveness(hinge_x);
            result.polars = self.polars.shifted(delta_alpha);
        }

        Ok(result)
    }

    /// Returns a copy of the airfoil with the given trailing edge thickness (fraction of chord).
    /// The upper and lower surfaces are sheared apart (or together) by an amount that grows
    /// linearly from zero at the leading edge to the full adjustment at the trailing edge. A
    /// thickness of zero closes the trailing edge exactly.
    pub fn set_te_thickness(&self, thickness: f64) -> Result<Airfoil> {
        let upper = self.upper_coordinates()?;
        let lower = &self.lower_coordinates()?[1..];
        if upper.len() < 2 || lower.is_empty() {
            return Err("Setting the trailing edge thickness needs points on both surfaces".into());
        }

        let first = upper[0];
        let last = lower[lower.len() - 1];
        let gap: Vector2 = first - last;
        let gap_length = gap.norm();

        let half_change = (thickness - gap_length) / 2.0;
        let adjustment = if gap_length != 0.0 {
            gap * (half_change / gap_length)
        } else {
            Vector2::new(0.0, half_change)
        };

        let le_x = upper[upper.len() - 1].x;
        let te_x = (first.x + last.x) / 2.0;
        if te_x == le_x {
            return Err("The leading and trailing edges have the same x position".into());
        }
        let fraction = |p: &Point2| (p.x - le_x) / (te_x - le_x);

        let new_upper = upper
            .iter()
            .map(|p| p + adjustment * fraction(p))
            .collect::<Vec<_>>();
        let mut new_lower = lower
            .iter()
            .map(|p| p - adjustment * fraction(p))
            .collect::<Vec<_>>();

        if thickness == 0.0 {
            if let Some(last) = new_lower.last_mut() {
                *last = new_upper[0];
            }
        }

        let mut points = new_upper;
        points.extend(new_lower);
        Ok(self.with_points(points))
    }

    /// Scales the airfoil about the origin. A negative `scale_y` mirrors the airfoil, so the
    /// point order is reversed to keep the upper surface first.
    pub fn scale(&self, scale_x: f64, scale_y: f64) -> Airfoil {
        let mut points = self
            .points
            .iter()
            .map(|p| Point2::new(p.x * scale_x, p.y * scale_y))
            .collect::<Vec<_>>();
        if scale_y < 0.0 {
            points.reverse();
        }
        self.with_points(points)
    }

    pub fn translate(&self, translate_x: f64, translate_y: f64) -> Airfoil {
        let shift = Vector2::new(translate_x, translate_y);
        self.with_points(self.points.iter().map(|p| p + shift).collect())
    }

    /// Rotates the airfoil counter-clockwise by `angle` radians about `(x_center, y_center)`.
    pub fn rotate(&self, angle: f64, x_center: f64, y_center: f64) -> Airfoil {
        let center = Point2::new(x_center, y_center);
        self.with_points(
            self.points
                .iter()
                .map(|p| rotate_about(p, &center, angle))
                .collect(),
        )
    }

    /// Blends this airfoil with another one. Both are repaneled with cosine spacing to the same
    /// number of points, then the coordinates and the coefficient functions are each combined as
    /// `(1 - fraction) * self + fraction * other`. A fraction of 0 reproduces this airfoil (as
    /// repaneled) and a fraction of 1 reproduces the other.
    ///
    /// # Arguments
    ///
    /// * `other`: the airfoil to blend with
    /// * `fraction`: the share of `other` in the result
    /// * `n_points_per_side`: passed to `repanel` for both airfoils
    ///
    /// returns: Result<Airfoil, Box<dyn Error, Global>>
    pub fn blend_with(
        &self,
        other: &Airfoil,
        fraction: f64,
        n_points_per_side: usize,
    ) -> Result<Airfoil> {
        let this_foil = self.repanel(n_points_per_side, Spacing::Cosine)?;
        let that_foil = other.repanel(n_points_per_side, Spacing::Cosine)?;
        let this_fraction = 1.0 - fraction;

        let points = this_foil
            .points
            .iter()
            .zip(that_foil.points.iter())
            .map(|(a, b)| Point2::from(a.coords * this_fraction + b.coords * fraction))
            .collect();

        let name = format!(
            "{:.0}% {}, {:.0}% {}",
            this_fraction * 100.0,
            self.name,
            fraction * 100.0,
            other.name
        );

        Ok(Airfoil {
            name,
            points,
            polars: self.polars.blended(&other.polars, fraction),
        })
    }

    /// A copy of this airfoil with the same name and coefficient functions but new points.
    fn with_points(&self, points: Vec<Point2>) -> Airfoil {
        Airfoil {
            name: self.name.clone(),
            points,
            polars: self.polars.clone(),
        }
    }
}
