//! The trio of lift, drag and moment coefficient functions carried by every `Airfoil`.

use super::SurrogateModel;
use std::f64::consts::PI;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// Lift, drag and moment coefficients as functions of angle of attack (degrees), Reynolds
/// number and Mach number. Implementations must be side effect free.
pub trait CoefficientModel: Send + Sync {
    fn cl(&self, alpha: f64, re: f64, mach: f64) -> f64;
    fn cd(&self, alpha: f64, re: f64, mach: f64) -> f64;
    fn cm(&self, alpha: f64, re: f64, mach: f64) -> f64;
}

/// The coefficient functions of an airfoil. This is a small expression tree: transforms which
/// modify the aerodynamics (control surface deflection, airfoil blending) wrap the existing
/// model rather than refitting anything, and everything else carries it over unchanged.
///
/// Cloning is cheap, the leaves are reference counted.
#[derive(Clone, Default)]
pub enum PolarModel {
    /// Thin airfoil theory: CL = 2π·α (α in radians), zero drag and zero moment.
    #[default]
    ThinAirfoil,

    /// A fitted polar surrogate
    Surrogate(Arc<SurrogateModel>),

    /// User supplied coefficient functions
    Custom(Arc<dyn CoefficientModel>),

    /// The base model evaluated at `alpha + delta_alpha`.
    AlphaShift {
        base: Box<PolarModel>,
        delta_alpha: f64,
    },

    /// `(1 - fraction) * first + fraction * second`
    Blend {
        first: Box<PolarModel>,
        second: Box<PolarModel>,
        fraction: f64,
    },
}

impl PolarModel {
    /// Wrap user supplied functions of `(alpha_deg, re, mach)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use foilpolar::{CoefficientModel, PolarModel};
    /// let model = PolarModel::from_fns(|a, _, _| 0.1 * a, |_, _, _| 0.01, |_, _, _| 0.0);
    /// assert_eq!(model.cl(2.0, 1e6, 0.0), 0.2);
    /// ```
    pub fn from_fns<L, D, M>(cl: L, cd: D, cm: M) -> Self
    where
        L: Fn(f64, f64, f64) -> f64 + Send + Sync + 'static,
        D: Fn(f64, f64, f64) -> f64 + Send + Sync + 'static,
        M: Fn(f64, f64, f64) -> f64 + Send + Sync + 'static,
    {
        PolarModel::Custom(Arc::new(FnCoefficients { cl, cd, cm }))
    }

    /// Returns a model which evaluates this one with the angle of attack offset by
    /// `delta_alpha` degrees. A zero offset returns an unwrapped clone.
    pub fn shifted(&self, delta_alpha: f64) -> Self {
        if delta_alpha == 0.0 {
            return self.clone();
        }
        PolarModel::AlphaShift {
            base: Box::new(self.clone()),
            delta_alpha,
        }
    }

    /// Returns the convex combination `(1 - fraction) * self + fraction * other` of the two
    /// models' coefficient outputs.
    pub fn blended(&self, other: &PolarModel, fraction: f64) -> Self {
        PolarModel::Blend {
            first: Box::new(self.clone()),
            second: Box::new(other.clone()),
            fraction,
        }
    }

    /// True unless this is the thin airfoil default.
    pub fn is_fitted(&self) -> bool {
        !matches!(self, PolarModel::ThinAirfoil)
    }

    fn eval<F>(&self, alpha: f64, re: f64, mach: f64, f: &F) -> f64
    where
        F: Fn(&dyn CoefficientModel, f64, f64, f64) -> f64,
    {
        match self {
            PolarModel::ThinAirfoil => f(&ThinAirfoil, alpha, re, mach),
            PolarModel::Surrogate(s) => f(s.as_ref(), alpha, re, mach),
            PolarModel::Custom(c) => f(c.as_ref(), alpha, re, mach),
            PolarModel::AlphaShift { base, delta_alpha } => {
                base.eval(alpha + delta_alpha, re, mach, f)
            }
            PolarModel::Blend {
                first,
                second,
                fraction,
            } => {
                let a = first.eval(alpha, re, mach, f);
                let b = second.eval(alpha, re, mach, f);
                (1.0 - fraction) * a + fraction * b
            }
        }
    }
}

impl CoefficientModel for PolarModel {
    fn cl(&self, alpha: f64, re: f64, mach: f64) -> f64 {
        self.eval(alpha, re, mach, &|m, a, r, ma| m.cl(a, r, ma))
    }

    fn cd(&self, alpha: f64, re: f64, mach: f64) -> f64 {
        self.eval(alpha, re, mach, &|m, a, r, ma| m.cd(a, r, ma))
    }

    fn cm(&self, alpha: f64, re: f64, mach: f64) -> f64 {
        self.eval(alpha, re, mach, &|m, a, r, ma| m.cm(a, r, ma))
    }
}

impl Debug for PolarModel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PolarModel::ThinAirfoil => write!(f, "ThinAirfoil"),
            PolarModel::Surrogate(_) => write!(f, "Surrogate"),
            PolarModel::Custom(_) => write!(f, "Custom"),
            PolarModel::AlphaShift { base, delta_alpha } => f
                .debug_struct("AlphaShift")
                .field("base", base)
                .field("delta_alpha", delta_alpha)
                .finish(),
            PolarModel::Blend {
                first,
                second,
                fraction,
            } => f
                .debug_struct("Blend")
                .field("first", first)
                .field("second", second)
                .field("fraction", fraction)
                .finish(),
        }
    }
}

struct ThinAirfoil;

impl CoefficientModel for ThinAirfoil {
    fn cl(&self, alpha: f64, _re: f64, _mach: f64) -> f64 {
        2.0 * PI * alpha.to_radians()
    }

    fn cd(&self, _alpha: f64, _re: f64, _mach: f64) -> f64 {
        0.0
    }

    fn cm(&self, _alpha: f64, _re: f64, _mach: f64) -> f64 {
        0.0
    }
}

struct FnCoefficients<L, D, M> {
    cl: L,
    cd: D,
    cm: M,
}

impl<L, D, M> CoefficientModel for FnCoefficients<L, D, M>
where
    L: Fn(f64, f64, f64) -> f64 + Send + Sync,
    D: Fn(f64, f64, f64) -> f64 + Send + Sync,
    M: Fn(f64, f64, f64) -> f64 + Send + Sync,
{
    fn cl(&self, alpha: f64, re: f64, mach: f64) -> f64 {
        (self.cl)(alpha, re, mach)
    }

    fn cd(&self, alpha: f64, re: f64, mach: f64) -> f64 {
        (self.cd)(alpha, re, mach)
    }

    fn cm(&self, alpha: f64, re: f64, mach: f64) -> f64 {
        (self.cm)(alpha, re, mach)
    }
}
