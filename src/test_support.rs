//! Shared fixtures for the unit tests: a NACA 4-digit coordinate generator and a synthetic
//! analysis tool with a known, smooth polar.

use crate::airfoil::CoordinateResolver;
use crate::common::cosine_space;
use crate::polars::dataset::{ALPHA, CD, CDP, CL, CM};
use crate::polars::{AnalysisOptions, AnalysisTool, PolarDataset, ToolError};
use crate::{Airfoil, Point2};
use std::sync::atomic::{AtomicUsize, Ordering};

const NACA_POINTS_PER_SIDE: usize = 100;

/// Coordinates of a NACA 4-digit airfoil with a closed trailing edge, in the standard order.
pub fn naca4(code: &str, n_points_per_side: usize) -> Option<Vec<Point2>> {
    if code.len() != 4 || !code.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let m = code[0..1].parse::<f64>().ok()? / 100.0;
    let p = code[1..2].parse::<f64>().ok()? / 10.0;
    let t = code[2..4].parse::<f64>().ok()? / 100.0;

    let camber = |x: f64| -> (f64, f64) {
        if m == 0.0 || p == 0.0 {
            (0.0, 0.0)
        } else if x <= p {
            (m / p.powi(2) * (2.0 * p * x - x * x), 2.0 * m / p.powi(2) * (p - x))
        } else {
            (
                m / (1.0 - p).powi(2) * ((1.0 - 2.0 * p) + 2.0 * p * x - x * x),
                2.0 * m / (1.0 - p).powi(2) * (p - x),
            )
        }
    };
    let half_thickness = |x: f64| {
        5.0 * t
            * (0.2969 * x.sqrt() - 0.1260 * x - 0.3516 * x.powi(2) + 0.2843 * x.powi(3)
                - 0.1036 * x.powi(4))
    };

    let xs = cosine_space(0.0, 1.0, n_points_per_side);
    let surface = |x: f64, sign: f64| {
        // The trailing edge is pinned to the camber line so that it closes exactly
        let yt = if x == 1.0 { 0.0 } else { half_thickness(x) };
        let (yc, slope) = camber(x);
        let theta = slope.atan();
        Point2::new(x - sign * yt * theta.sin(), yc + sign * yt * theta.cos())
    };

    let mut points = xs.iter().rev().map(|x| surface(*x, 1.0)).collect::<Vec<_>>();
    points.extend(xs.iter().skip(1).map(|x| surface(*x, -1.0)));
    Some(points)
}

/// A NACA 4-digit airfoil named `naca{code}`.
pub fn naca_airfoil(code: &str) -> Airfoil {
    let points = naca4(code, NACA_POINTS_PER_SIDE).unwrap_or_default();
    Airfoil::new(format!("naca{}", code), points)
}

/// Resolves names of the form `naca2412`.
pub struct NacaResolver;

impl CoordinateResolver for NacaResolver {
    fn resolve(&self, name: &str) -> Option<Vec<Point2>> {
        let code = name.trim().to_lowercase();
        naca4(code.strip_prefix("naca")?.trim(), NACA_POINTS_PER_SIDE)
    }
}

/// An analysis tool returning a smooth analytic polar, optionally with unconverged points or a
/// failing Reynolds number. Counts its calls.
pub struct SyntheticTool {
    calls: AtomicUsize,
    fail_at: Option<f64>,
    gap_every: Option<usize>,
}

impl SyntheticTool {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_at: None,
            gap_every: None,
        }
    }

    /// Fail the sweep at this Reynolds number
    pub fn failing_at(mut self, re: f64) -> Self {
        self.fail_at = Some(re);
        self
    }

    /// Report every `k`-th alpha as unconverged (NaN)
    pub fn with_gaps(mut self, k: usize) -> Self {
        self.gap_every = Some(k);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn cl(alpha: f64, re: f64) -> f64 {
        (0.2 + 0.11 * alpha) * (1.0 + 0.01 * (re / 1e6).ln())
    }

    pub fn cd(alpha: f64, re: f64) -> f64 {
        (0.006 + 1e-4 * alpha * alpha) * (1e6 / re).powf(0.2)
    }

    pub fn cm(alpha: f64, _re: f64) -> f64 {
        -0.05 + 0.001 * alpha
    }
}

impl AnalysisTool for SyntheticTool {
    fn alpha_sweep(
        &self,
        _airfoil: &Airfoil,
        re: f64,
        alphas: &[f64],
        _options: &AnalysisOptions,
    ) -> Result<PolarDataset, ToolError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(fail) = self.fail_at {
            if ((re - fail) / fail).abs() < 1e-9 {
                return Err(format!("did not converge at Re={}", re).into());
            }
        }

        let gap = |i: usize| self.gap_every.is_some_and(|k| i % k == 1);
        let column = |f: &dyn Fn(f64) -> f64| {
            alphas
                .iter()
                .enumerate()
                .map(|(i, a)| if gap(i) { f64::NAN } else { f(*a) })
                .collect::<Vec<_>>()
        };

        let mut data = PolarDataset::new();
        let columns = [
            (ALPHA, alphas.to_vec()),
            (CL, column(&|a| Self::cl(a, re))),
            (CD, column(&|a| Self::cd(a, re))),
            (CM, column(&|a| Self::cm(a, re))),
            (CDP, column(&|a| 0.4 * Self::cd(a, re))),
        ];
        for (name, values) in columns {
            data.set_column(name, values).map_err(|e| e.to_string())?;
        }
        Ok(data)
    }
}
