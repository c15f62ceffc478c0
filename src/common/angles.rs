//! This module contains common constructs for working with angles

use crate::{Point2, Rotation2};

/// Re-expresses an angle, specified in degrees, in the range [-180, 180). If the angle was
/// already in that range, it is returned unchanged.
///
/// # Arguments
///
/// * `angle`: The angle to re-express, in degrees
///
/// returns: f64
///
/// # Examples
///
/// ```
/// use foilpolar::common::wrap_degrees;
/// use approx::assert_relative_eq;
/// assert_relative_eq!(wrap_degrees(190.0), -170.0, epsilon = 1.0e-10);
/// assert_relative_eq!(wrap_degrees(180.0), -180.0, epsilon = 1.0e-10);
/// ```
pub fn wrap_degrees(angle: f64) -> f64 {
    (angle + 180.0).rem_euclid(360.0) - 180.0
}

/// Rotates a point counter-clockwise by `angle` radians about `center`.
pub fn rotate_about(point: &Point2, center: &Point2, angle: f64) -> Point2 {
    *center + Rotation2::new(angle) * (*point - *center)
}
