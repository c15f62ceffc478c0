//! Compressibility corrections applied to the Mach-zero blended coefficients. Every piece is
//! written so that the result is smooth and finite for all Mach numbers, including M = 1, so a
//! single formula covers the subsonic, transonic and supersonic regimes.

use crate::common::hermite::cubic_hermite_patch;
use crate::common::smooth::{blend, smooth_abs, softmax};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Hardness of the smooth |1 - M²| used in the Prandtl-Glauert factor, tuned empirically
const PRANDTL_GLAUERT_HARDNESS: f64 = 2.0;

/// Airfoil technology factor in the Korn relation when estimating the critical Mach number for
/// the lift correction.
pub const KAPPA_A_LIFT: f64 = 0.95;

/// Airfoil technology factor in the Korn relation for the wave drag model.
pub const KAPPA_A_DRAG: f64 = 0.92;

/// Mach number at which the wave drag reaches its transonic peak.
const WAVE_DRAG_PEAK_MACH: f64 = 0.97;

/// Mach number at which the wave drag hands over to its supersonic plateau.
const WAVE_DRAG_SUPERSONIC_MACH: f64 = 1.1;

/// Settings of the compressibility corrector, carried inside the surrogate model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressibilitySettings {
    /// When false, the coefficients are returned at their Mach-zero values
    pub enabled: bool,

    /// Fraction of lift retained once the airfoil is well into transonic buffet
    pub transonic_buffet_lift_knockdown: f64,
}

impl Default for CompressibilitySettings {
    fn default() -> Self {
        Self {
            enabled: true,
            transonic_buffet_lift_knockdown: 0.3,
        }
    }
}

/// Mach number increment from critical to drag divergence, `(0.1 / 80)^(1/3)`. This is where
/// the quartic wave drag rise reaches a slope of 0.1.
fn drag_divergence_offset() -> f64 {
    (0.1_f64 / 80.0).cbrt()
}

/// The Prandtl-Glauert factor β = sqrt(|1 - M²|), with the absolute value taken smoothly. The
/// smoothing keeps β real and bounded away from zero at M = 1.
pub fn prandtl_glauert_beta(mach: f64) -> f64 {
    let beta_squared_ideal = 1.0 - mach.powi(2);
    softmax(
        beta_squared_ideal,
        -beta_squared_ideal,
        PRANDTL_GLAUERT_HARDNESS,
    )
    .sqrt()
}

/// Estimates the critical Mach number of an unswept airfoil from the Korn relation.
///
/// # Arguments
///
/// * `cl`: lift coefficient (its magnitude is taken smoothly)
/// * `t_over_c`: thickness-to-chord ratio
/// * `kappa_a`: airfoil technology factor, ~0.87 for conventional and ~0.95 for supercritical
/// sections
///
/// returns: f64
pub fn mach_crit_korn(cl: f64, t_over_c: f64, kappa_a: f64) -> f64 {
    let mach_dd = kappa_a - t_over_c - smooth_abs(cl, 10.0) / 10.0;
    mach_dd - drag_divergence_offset()
}

/// Lift multiplier for transonic buffet: 1 at low Mach, smoothly dropping to `knockdown` once
/// the Mach number is well past critical, and recovering above M = 1.1.
pub fn buffet_factor(mach: f64, mach_crit: f64, knockdown: f64) -> f64 {
    blend(
        40.0 * (mach - mach_crit - drag_divergence_offset() - 0.06) * (mach - 1.1),
        1.0,
        knockdown,
    )
}

/// Ratio of the thin airfoil lift curve slope to its subsonic value, going from 1 (2π per
/// radian) to 4 / 2π (linearized supersonic flow) as the Mach number crosses 1.
pub fn supersonic_lift_slope_ratio(mach: f64) -> f64 {
    blend(10.0 * (mach - 1.0), 4.0 / (2.0 * PI), 1.0)
}

/// Wave drag coefficient as a function of Mach number. Zero below critical, a quartic rise up to
/// drag divergence, two cubic Hermite patches through the transonic peak, and a smooth blend
/// onto a supersonic plateau past M = 1.1. Value and slope match at every segment boundary.
pub fn wave_drag(mach: f64, mach_crit: f64, t_over_c: f64) -> f64 {
    let offset = drag_divergence_offset();
    let mach_dd = mach_crit + offset;
    let peak = 0.8 * t_over_c;
    let peak_slope = peak * 8.0;

    if mach < mach_crit {
        0.0
    } else if mach < mach_dd {
        20.0 * (mach - mach_crit).powi(4)
    } else if mach < WAVE_DRAG_PEAK_MACH {
        cubic_hermite_patch(
            mach,
            mach_dd,
            WAVE_DRAG_PEAK_MACH,
            20.0 * offset.powi(4),
            peak,
            0.1,
            peak_slope,
        )
    } else if mach < WAVE_DRAG_SUPERSONIC_MACH {
        cubic_hermite_patch(
            mach,
            WAVE_DRAG_PEAK_MACH,
            WAVE_DRAG_SUPERSONIC_MACH,
            peak,
            peak,
            peak_slope,
            -peak_slope,
        )
    } else {
        blend(
            8.0 * 2.0 * (mach - WAVE_DRAG_SUPERSONIC_MACH) / (1.2 - 0.8),
            0.8 * peak,
            1.2 * peak,
        )
    }
}

/// Applies the lift corrections (Prandtl-Glauert, buffet, supersonic slope) to a Mach-zero
/// lift coefficient.
pub fn corrected_cl(cl_mach_zero: f64, mach: f64, t_over_c: f64, knockdown: f64) -> f64 {
    let cl = cl_mach_zero / prandtl_glauert_beta(mach);
    let mach_crit = mach_crit_korn(cl, t_over_c, KAPPA_A_LIFT);
    cl * buffet_factor(mach, mach_crit, knockdown) * supersonic_lift_slope_ratio(mach)
}

/// Adds wave drag to a Mach-zero drag coefficient. The critical Mach number is estimated from
/// the Prandtl-Glauert corrected lift.
pub fn corrected_cd(cd_mach_zero: f64, cl_mach_zero: f64, mach: f64, t_over_c: f64) -> f64 {
    let cl = cl_mach_zero / prandtl_glauert_beta(mach);
    let mach_crit = mach_crit_korn(cl, t_over_c, KAPPA_A_DRAG);
    cd_mach_zero + wave_drag(mach, mach_crit, t_over_c)
}

/// Prandtl-Glauert correction of the moment coefficient. There is no wave drag analog.
pub fn corrected_cm(cm_mach_zero: f64, mach: f64) -> f64 {
    cm_mach_zero / prandtl_glauert_beta(mach)
}
