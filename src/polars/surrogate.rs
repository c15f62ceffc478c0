//! The fitted polar surrogate: attached and separated flow models, blended smoothly across the
//! stall boundary and corrected for compressibility.

use super::compressibility::{
    CompressibilitySettings, corrected_cd, corrected_cl, corrected_cm,
};
use super::dataset::{ALPHA, CD, CL, CM, RE};
use super::model::CoefficientModel;
use super::post_stall::post_stall_coefficients;
use super::{AnalysisTool, PolarDataset, PolarOptions, acquire_dataset};
use crate::common::smooth::{blend, softmax};
use crate::common::{DiscreteDomain, linear_space, wrap_degrees};
use crate::interpolate::{Axis, RbfSettings, UnstructuredModel};
use crate::{Airfoil, Result};
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

/// Sweeps longer than this are thinned to every other alpha when building resampling knots
const MAX_ATTACHED_ALPHA_KNOTS: usize = 20;

/// Number of knots (including the sweep end) used to extend the alpha knots out to ±180°
const ALPHA_EXTENSION_KNOTS: usize = 10;

/// Decades of Reynolds number added to each end of the sweep when building resampling knots
const RE_EXTENSION_DECADES: i32 = 4;

/// A complete polar surrogate for one airfoil. This is a plain value: it holds the resampled
/// grids of the six fitted models and the handful of scalars needed to blend and correct them,
/// and it serializes with serde.
///
/// Coefficients are evaluated through the `CoefficientModel` implementation, where the angle of
/// attack is in degrees (wrapped to [-180, 180) first), `re` is the Reynolds number and `mach`
/// the free stream Mach number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurrogateModel {
    attached_cl: UnstructuredModel,
    attached_log10_cd: UnstructuredModel,
    attached_cm: UnstructuredModel,
    separated_cl: UnstructuredModel,
    separated_log10_cd: UnstructuredModel,
    separated_cm: UnstructuredModel,
    alpha_stall_positive: f64,
    alpha_stall_negative: f64,
    max_thickness: f64,
    compressibility: CompressibilitySettings,
}

impl SurrogateModel {
    /// Acquire the polar dataset for `airfoil` (from the cache or the analysis tool) and fit a
    /// surrogate to it, using the sweeps and settings in `options`.
    pub fn generate(
        airfoil: &Airfoil,
        options: &PolarOptions,
        tool: &dyn AnalysisTool,
    ) -> Result<Self> {
        let max_thickness = airfoil.max_thickness()?;
        let data = acquire_dataset(airfoil, options, tool)?;
        Self::from_dataset(
            &data,
            &options.alphas,
            &options.reynolds,
            max_thickness,
            &options.rbf,
            options.compressibility,
        )
    }

    /// Fit a surrogate to an existing dataset.
    ///
    /// # Arguments
    ///
    /// * `data`: the raw polar dataset, which must have `alpha`, `Re`, `CL`, `CD` and `CM`
    /// fields. Rows with non-finite values or non-positive drag are dropped before fitting.
    /// * `alphas`: the alpha sweep the dataset was generated with, used to build the resampling
    /// knots
    /// * `reynolds`: the Reynolds number sweep the dataset was generated with
    /// * `max_thickness`: the airfoil's maximum thickness-to-chord ratio, used by the
    /// compressibility corrections
    /// * `rbf`: the radial basis function settings for the three attached flow fits
    /// * `compressibility`: compressibility corrector settings
    ///
    /// returns: Result<SurrogateModel, Box<dyn Error, Global>>
    pub fn from_dataset(
        data: &PolarDataset,
        alphas: &[f64],
        reynolds: &[f64],
        max_thickness: f64,
        rbf: &RbfSettings,
        compressibility: CompressibilitySettings,
    ) -> Result<Self> {
        let alphas = DiscreteDomain::alpha_sweep(alphas)?;
        let reynolds = DiscreteDomain::reynolds_sweep(reynolds)?;

        let (data, dropped) = data.fit_ready()?;
        if dropped > 0 {
            warn!(
                "Dropped {} polar rows with missing or non-physical values before fitting",
                dropped
            );
        }
        if data.is_empty() {
            return Err("No usable polar rows remain to fit a surrogate".into());
        }

        let alpha_knots = alpha_knots(&alphas);
        let ln_re_knots = reynolds_knots(&reynolds)
            .iter()
            .map(|r| r.ln())
            .collect::<Vec<_>>();

        // Attached flow, fit over (alpha, ln Re)
        let alpha = data.column(ALPHA)?;
        let ln_re = data.column(RE)?.iter().map(|r| r.ln()).collect::<Vec<_>>();
        let log10_cd = data
            .column(CD)?
            .iter()
            .map(|c| c.log10())
            .collect::<Vec<_>>();
        let axes = [
            Axis::new("alpha", alpha, &alpha_knots),
            Axis::new("ln_Re", &ln_re, &ln_re_knots),
        ];

        debug!(
            "Fitting attached flow models to {} rows on a {}x{} knot grid",
            data.n_rows(),
            alpha_knots.len(),
            ln_re_knots.len()
        );
        let attached_cl = UnstructuredModel::fit(&axes, data.column(CL)?, rbf)?;
        let attached_log10_cd = UnstructuredModel::fit(&axes, &log10_cd, rbf)?;
        let attached_cm = UnstructuredModel::fit(&axes, data.column(CM)?, rbf)?;

        // Separated flow is sampled exactly on the alpha knots, so it is tabulated there rather
        // than regressed. Smoothing it would pull the ±180° ends apart.
        let cd_offset = data.median(CD)?;
        let mut sep_knots = alpha_knots.clone();
        sep_knots.sort_by(|a, b| a.total_cmp(b));
        sep_knots.dedup();

        let mut sep_cl = Vec::with_capacity(sep_knots.len());
        let mut sep_log10_cd = Vec::with_capacity(sep_knots.len());
        let mut sep_cm = Vec::with_capacity(sep_knots.len());
        for a in sep_knots.iter() {
            let (cl, cd, cm) = post_stall_coefficients(*a);
            sep_cl.push(cl);
            sep_log10_cd.push((cd + cd_offset).log10());
            sep_cm.push(cm);
        }
        let separated = |values: Vec<f64>| {
            UnstructuredModel::tabulated(&["alpha"], vec![sep_knots.clone()], values)
        };
        let separated_cl = separated(sep_cl)?;
        let separated_log10_cd = separated(sep_log10_cd)?;
        let separated_cm = separated(sep_cm)?;

        let (alpha_stall_negative, alpha_stall_positive) = data.extent(ALPHA)?;

        Ok(Self {
            attached_cl,
            attached_log10_cd,
            attached_cm,
            separated_cl,
            separated_log10_cd,
            separated_cm,
            alpha_stall_positive,
            alpha_stall_negative,
            max_thickness,
            compressibility,
        })
    }

    /// The largest sampled angle of attack across all Reynolds numbers, in degrees.
    pub fn alpha_stall_positive(&self) -> f64 {
        self.alpha_stall_positive
    }

    /// The smallest sampled angle of attack across all Reynolds numbers, in degrees.
    pub fn alpha_stall_negative(&self) -> f64 {
        self.alpha_stall_negative
    }

    pub fn max_thickness(&self) -> f64 {
        self.max_thickness
    }

    pub fn compressibility(&self) -> &CompressibilitySettings {
        &self.compressibility
    }

    /// Positive where the flow is separated and negative where it is attached. This feeds a
    /// tanh blend, so +1 means roughly 90% separated and -1 roughly 90% attached.
    pub fn separation_parameter(&self, alpha: f64) -> f64 {
        0.5 * softmax(
            alpha - self.alpha_stall_positive,
            self.alpha_stall_negative - alpha,
            1.0,
        )
    }

    /// Returns true if the (wrapped) angle of attack and Reynolds number are inside the knot
    /// envelope of the attached flow models. Outside it the models continue linearly, which is
    /// usually still reasonable but is no longer backed by any data.
    pub fn in_knot_domain(&self, alpha: f64, re: f64) -> bool {
        self.attached_cl.in_domain(&[wrap_degrees(alpha), re.ln()])
    }

    /// The blended lift coefficient before compressibility corrections.
    pub fn cl_mach_zero(&self, alpha: f64, re: f64) -> f64 {
        let alpha = self.prepare(alpha, re);
        self.blended(alpha, &self.separated_cl, self.attached_cl.eval(&[alpha, re.ln()]))
    }

    /// The blended base 10 logarithm of the drag coefficient before compressibility corrections.
    pub fn log10_cd_mach_zero(&self, alpha: f64, re: f64) -> f64 {
        let alpha = self.prepare(alpha, re);
        self.blended(
            alpha,
            &self.separated_log10_cd,
            self.attached_log10_cd.eval(&[alpha, re.ln()]),
        )
    }

    /// The blended moment coefficient before compressibility corrections.
    pub fn cm_mach_zero(&self, alpha: f64, re: f64) -> f64 {
        let alpha = self.prepare(alpha, re);
        self.blended(alpha, &self.separated_cm, self.attached_cm.eval(&[alpha, re.ln()]))
    }

    fn prepare(&self, alpha: f64, re: f64) -> f64 {
        let wrapped = wrap_degrees(alpha);
        if !self.attached_cl.in_domain(&[wrapped, re.ln()]) {
            trace!(
                "Polar evaluated outside the knot envelope at alpha={}, Re={:e}",
                wrapped, re
            );
        }
        wrapped
    }

    fn blended(&self, alpha: f64, separated: &UnstructuredModel, attached: f64) -> f64 {
        blend(
            self.separation_parameter(alpha),
            separated.eval(&[alpha]),
            attached,
        )
    }
}

impl CoefficientModel for SurrogateModel {
    fn cl(&self, alpha: f64, re: f64, mach: f64) -> f64 {
        let cl = self.cl_mach_zero(alpha, re);
        if !self.compressibility.enabled {
            return cl;
        }
        corrected_cl(
            cl,
            mach,
            self.max_thickness,
            self.compressibility.transonic_buffet_lift_knockdown,
        )
    }

    fn cd(&self, alpha: f64, re: f64, mach: f64) -> f64 {
        let cd = 10f64.powf(self.log10_cd_mach_zero(alpha, re));
        if !self.compressibility.enabled {
            return cd;
        }
        corrected_cd(cd, self.cl_mach_zero(alpha, re), mach, self.max_thickness)
    }

    fn cm(&self, alpha: f64, re: f64, mach: f64) -> f64 {
        let cm = self.cm_mach_zero(alpha, re);
        if !self.compressibility.enabled {
            return cm;
        }
        corrected_cm(cm, mach)
    }
}

/// Resampling knots in alpha: the sweep (every other value if it is long), extended with evenly
/// spaced knots out to -180 and +180 degrees.
fn alpha_knots(alphas: &DiscreteDomain) -> Vec<f64> {
    let used = if alphas.len() > MAX_ATTACHED_ALPHA_KNOTS {
        alphas.values().iter().step_by(2).copied().collect::<Vec<_>>()
    } else {
        alphas.values().to_vec()
    };

    let lo = used.first().copied().unwrap_or(0.0);
    let hi = used.last().copied().unwrap_or(0.0);
    let below = linear_space(-180.0, lo, ALPHA_EXTENSION_KNOTS);
    let above = linear_space(hi, 180.0, ALPHA_EXTENSION_KNOTS);

    let mut knots = below[..below.len() - 1].to_vec();
    knots.extend(used);
    knots.extend_from_slice(&above[1..]);
    knots
}

/// Resampling knots in Reynolds number: the sweep with four extra decades on each side.
fn reynolds_knots(reynolds: &DiscreteDomain) -> Vec<f64> {
    let lo = reynolds.min().unwrap_or(1.0);
    let hi = reynolds.max().unwrap_or(1.0);

    let mut knots = (1..=RE_EXTENSION_DECADES)
        .rev()
        .map(|k| lo / 10f64.powi(k))
        .collect::<Vec<_>>();
    knots.extend_from_slice(reynolds.values());
    knots.extend((1..=RE_EXTENSION_DECADES).map(|k| hi * 10f64.powi(k)));
    knots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::geom_space;
    use crate::errors::AirfoilError;
    use crate::test_support::{SyntheticTool, naca_airfoil};
    use approx::assert_relative_eq;
    use test_case::test_case;

    fn options() -> PolarOptions {
        PolarOptions {
            alphas: linear_space(-10.0, 10.0, 11),
            reynolds: geom_space(1e5, 1e7, 3),
            ..PolarOptions::default()
        }
    }

    fn fitted() -> SurrogateModel {
        let airfoil = naca_airfoil("2412");
        SurrogateModel::generate(&airfoil, &options(), &SyntheticTool::new()).unwrap()
    }

    #[test]
    fn alpha_knots_thin_long_sweeps() {
        let short = DiscreteDomain::alpha_sweep(&linear_space(-10.0, 10.0, 11)).unwrap();
        let k = alpha_knots(&short);
        assert_eq!(k.len(), 9 + 11 + 9);
        assert_eq!(k[0], -180.0);
        assert_eq!(k[k.len() - 1], 180.0);

        let long = DiscreteDomain::alpha_sweep(&linear_space(-15.0, 15.0, 31)).unwrap();
        let k = alpha_knots(&long);
        assert_eq!(k.len(), 9 + 16 + 9);
        assert!(k.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn reynolds_knots_add_four_decades() {
        let re = DiscreteDomain::reynolds_sweep(&[1e5, 1e6]).unwrap();
        let k = reynolds_knots(&re);
        assert_eq!(k.len(), 10);
        assert_relative_eq!(k[0], 10.0, max_relative = 1e-12);
        assert_relative_eq!(k[9], 1e10, max_relative = 1e-12);
    }

    #[test]
    fn stall_boundary_from_data() {
        let model = fitted();
        assert_eq!(model.alpha_stall_positive(), 10.0);
        assert_eq!(model.alpha_stall_negative(), -10.0);
        assert!(model.separation_parameter(0.0) < -4.0);
        assert!(model.separation_parameter(25.0) > 4.0);
    }

    #[test_case(-4.0)]
    #[test_case(0.0)]
    #[test_case(4.0)]
    fn attached_lift_matches_data(alpha: f64) {
        let model = fitted();
        let expected = SyntheticTool::cl(alpha, 1e6);
        assert_relative_eq!(model.cl_mach_zero(alpha, 1e6), expected, epsilon = 0.05);
        assert_relative_eq!(
            model.log10_cd_mach_zero(alpha, 1e6),
            SyntheticTool::cd(alpha, 1e6).log10(),
            epsilon = 0.1
        );
    }

    #[test]
    fn drag_positive_everywhere() {
        let model = fitted();
        for alpha in linear_space(-180.0, 180.0, 73) {
            for re in [1e3, 1e6, 1e9] {
                let cd = model.cd(alpha, re, 0.3);
                assert!(cd > 0.0 && cd.is_finite(), "CD {} at {} {}", cd, alpha, re);
            }
        }
    }

    #[test]
    fn blend_is_c1_across_stall() {
        let model = fitted();
        let f = |a: f64| model.cl(a, 1e6, 0.0);
        let slope = |a: f64| (f(a + 1e-5) - f(a - 1e-5)) / 2e-5;
        for a in [10.0, 12.0, -10.0] {
            assert_relative_eq!(f(a - 1e-7), f(a + 1e-7), epsilon = 1e-5);
            assert_relative_eq!(slope(a - 1e-3), slope(a + 1e-3), epsilon = 1e-2);
        }
    }

    #[test]
    fn separated_models_hold_post_stall_values_at_knots() {
        let opts = options();
        let model = fitted();
        let data =
            acquire_dataset(&naca_airfoil("2412"), &opts, &SyntheticTool::new()).unwrap();
        let cd_offset = data.median(CD).unwrap();

        let alphas = DiscreteDomain::alpha_sweep(&opts.alphas).unwrap();
        for a in alpha_knots(&alphas) {
            let (cl, cd, cm) = post_stall_coefficients(a);
            assert_relative_eq!(model.separated_cl.eval(&[a]), cl, epsilon = 1e-3);
            assert_relative_eq!(
                model.separated_log10_cd.eval(&[a]),
                (cd + cd_offset).log10(),
                epsilon = 1e-3
            );
            assert_relative_eq!(model.separated_cm.eval(&[a]), cm, epsilon = 1e-3);
        }
    }

    #[test_case(PolarOptions::default(); "default sweep")]
    #[test_case(options(); "short sweep")]
    fn continuous_across_the_wrap(opts: PolarOptions) {
        let airfoil = naca_airfoil("2412");
        let model = SurrogateModel::generate(&airfoil, &opts, &SyntheticTool::new()).unwrap();

        let cl = |a: f64| model.cl(a, 1e6, 0.0);
        let cd = |a: f64| model.cd(a, 1e6, 0.0);
        let cm = |a: f64| model.cm(a, 1e6, 0.0);
        assert_relative_eq!(cl(179.9999), cl(-180.0), epsilon = 1e-3);
        assert_relative_eq!(cd(179.9999), cd(-180.0), epsilon = 1e-3);
        assert_relative_eq!(cm(179.9999), cm(-180.0), epsilon = 1e-3);
        assert_relative_eq!(cl(-180.0), 0.0, epsilon = 1e-3);

        let slope = |a: f64| (cl(a + 1e-5) - cl(a - 1e-5)) / 2e-5;
        assert_relative_eq!(slope(179.9), slope(-179.9), epsilon = 1e-2);
    }

    #[test]
    fn alpha_wraps_around() {
        let model = fitted();
        assert_relative_eq!(model.cl(5.0, 1e6, 0.2), model.cl(365.0, 1e6, 0.2), epsilon = 1e-9);
        assert_relative_eq!(model.cd(-170.0, 1e6, 0.2), model.cd(190.0, 1e6, 0.2), epsilon = 1e-9);
    }

    #[test]
    fn finite_across_mach() {
        let model = fitted();
        for mach in linear_space(0.0, 2.0, 81) {
            assert!(model.cl(3.0, 1e6, mach).is_finite());
            assert!(model.cd(3.0, 1e6, mach).is_finite());
            assert!(model.cm(3.0, 1e6, mach).is_finite());
        }
        assert!(model.cd(3.0, 1e6, 0.95) > model.cd(3.0, 1e6, 0.3));
    }

    #[test]
    fn compressibility_can_be_disabled() {
        let airfoil = naca_airfoil("0012");
        let mut opts = options();
        opts.compressibility.enabled = false;
        let model = SurrogateModel::generate(&airfoil, &opts, &SyntheticTool::new()).unwrap();
        assert_eq!(model.cl(3.0, 1e6, 0.9), model.cl_mach_zero(3.0, 1e6));
        assert_eq!(model.cm(3.0, 1e6, 0.9), model.cm_mach_zero(3.0, 1e6));
    }

    #[test]
    fn knot_domain_covers_extended_envelope() {
        let model = fitted();
        assert!(model.in_knot_domain(170.0, 1e2));
        assert!(model.in_knot_domain(0.0, 1e10));
        assert!(!model.in_knot_domain(0.0, 1e12));
    }

    #[test]
    fn tolerates_unconverged_points() {
        let airfoil = naca_airfoil("2412");
        let tool = SyntheticTool::new().with_gaps(3);
        let model = SurrogateModel::generate(&airfoil, &options(), &tool).unwrap();
        assert!(model.cl(2.0, 1e6, 0.0).is_finite());
        assert!(model.cd(2.0, 1e6, 0.0) > 0.0);
    }

    #[test]
    fn tool_failure_aborts_generation() {
        let airfoil = naca_airfoil("2412");
        let tool = SyntheticTool::new().failing_at(1e6);
        let err = SurrogateModel::generate(&airfoil, &options(), &tool).unwrap_err();
        match err.downcast_ref::<AirfoilError>() {
            Some(AirfoilError::ExternalToolFailure { re, .. }) => {
                assert_relative_eq!(*re, 1e6, max_relative = 1e-9)
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn requires_geometry() {
        let airfoil = Airfoil::new("empty", Vec::new());
        let err = SurrogateModel::generate(&airfoil, &options(), &SyntheticTool::new())
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<AirfoilError>(),
            Some(&AirfoilError::MissingGeometry)
        );
    }

    #[test]
    fn serde_round_trip_preserves_coefficients() {
        let model = fitted();
        let text = serde_json::to_string(&model).unwrap();
        let back: SurrogateModel = serde_json::from_str(&text).unwrap();
        assert_relative_eq!(model.cl(7.0, 2e5, 0.5), back.cl(7.0, 2e5, 0.5), epsilon = 1e-12);
        assert_relative_eq!(model.cd(7.0, 2e5, 0.5), back.cd(7.0, 2e5, 0.5), epsilon = 1e-12);
    }
}
