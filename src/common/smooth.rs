//! Smooth, everywhere-differentiable stand-ins for `max` and for a hard step. Everything in the
//! polar pipeline that would otherwise branch on a threshold goes through these so that the
//! coefficient functions stay C¹.

/// Smooth approximation of `max(a, b)` via log-sum-exp. Larger `hardness` values approach the
/// true maximum more closely; the error is at most `ln(2) / hardness`, reached when `a == b`.
///
/// # Arguments
///
/// * `a`, `b`: the values to take the smooth maximum of
/// * `hardness`: sharpness of the approximation, must be positive
///
/// returns: f64
///
/// # Examples
///
/// ```
/// use foilpolar::common::smooth::softmax;
/// use approx::assert_relative_eq;
/// assert_relative_eq!(softmax(10.0, -10.0, 1.0), 10.0, epsilon = 1e-8);
/// assert_relative_eq!(softmax(0.0, 0.0, 1.0), 2.0_f64.ln(), epsilon = 1e-12);
/// ```
pub fn softmax(a: f64, b: f64, hardness: f64) -> f64 {
    let ha = a * hardness;
    let hb = b * hardness;
    let m = ha.max(hb);
    (m + ((ha - m).exp() + (hb - m).exp()).ln()) / hardness
}

/// Smooth approximation of `|x|`, as `softmax(x, -x, hardness)`.
pub fn smooth_abs(x: f64, hardness: f64) -> f64 {
    softmax(x, -x, hardness)
}

/// Smoothly switches between two values with a hyperbolic tangent. For large positive `switch`
/// the result approaches `value_high`, for large negative `switch` it approaches `value_low`,
/// and at `switch == 0` it is their mean.
///
/// # Examples
///
/// ```
/// use foilpolar::common::smooth::blend;
/// assert_eq!(blend(0.0, 2.0, 0.0), 1.0);
/// ```
pub fn blend(switch: f64, value_high: f64, value_low: f64) -> f64 {
    let weight_high = switch.tanh() * 0.5 + 0.5;
    weight_high * value_high + (1.0 - weight_high) * value_low
}
