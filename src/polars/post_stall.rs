//! Coefficients of a fully separated (post-stall) airfoil, after the flat-plate-like normal and
//! tangential force model. These depend on angle of attack only.

// Empirical coefficients, fit to NACA 0012 data
const CD90_0: f64 = 2.08;
const PN2_STAR: f64 = 8.36e-2;
const PN3_STAR: f64 = 4.06e-1;
const PT1_STAR: f64 = 9.00e-2;
const PT2_STAR: f64 = -1.78e-1;
const PT3_STAR: f64 = -2.98e-1;

/// Returns `(CL, CD, CM)` of the fully separated airfoil at `alpha` degrees. The moment
/// coefficient is not modelled and is always zero.
///
/// # Examples
///
/// ```
/// use foilpolar::polars::post_stall_coefficients;
/// use approx::assert_relative_eq;
/// let (_, cd, _) = post_stall_coefficients(90.0);
/// assert_relative_eq!(cd, 2.08, epsilon = 1e-12);
/// ```
pub fn post_stall_coefficients(alpha: f64) -> (f64, f64, f64) {
    let (sina, cosa) = alpha.to_radians().sin_cos();

    // Normal force
    let cd90 = CD90_0 + PN2_STAR * cosa + PN3_STAR * cosa.powi(2);
    let cn = cd90 * sina;

    // Tangential force
    let ct = (PT1_STAR + PT2_STAR * cosa + PT3_STAR * cosa.powi(3)) * sina.powi(2);

    // Body to wind axes
    let cl = cn * cosa + ct * sina;
    let cd = cn * sina - ct * cosa;

    (cl, cd, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::linear_space;
    use approx::assert_relative_eq;

    #[test]
    fn drag_never_negative() {
        for a in linear_space(-180.0, 180.0, 721) {
            let (_, cd, _) = post_stall_coefficients(a);
            assert!(cd >= -1e-12, "CD {} at alpha {}", cd, a);
        }
    }

    #[test]
    fn lift_antisymmetric() {
        for a in [5.0, 30.0, 60.0, 120.0] {
            let (cl_p, cd_p, _) = post_stall_coefficients(a);
            let (cl_n, cd_n, _) = post_stall_coefficients(-a);
            assert_relative_eq!(cl_p, -cl_n, epsilon = 1e-12);
            assert_relative_eq!(cd_p, cd_n, epsilon = 1e-12);
        }
    }

    #[test]
    fn lift_peaks_near_45_degrees() {
        let (cl_45, _, _) = post_stall_coefficients(45.0);
        let (cl_10, _, _) = post_stall_coefficients(10.0);
        let (cl_80, _, _) = post_stall_coefficients(80.0);
        assert!(cl_45 > cl_10);
        assert!(cl_45 > cl_80);
    }
}
