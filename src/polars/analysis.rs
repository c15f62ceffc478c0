//! The seam to the external 2D analysis tool which produces raw polar samples.

use super::PolarDataset;
use crate::Airfoil;
use serde::{Deserialize, Serialize};
use std::error::Error;

/// The error type returned by analysis tool implementations. It must be `Send + Sync` because
/// sweeps at different Reynolds numbers may run on different threads.
pub type ToolError = Box<dyn Error + Send + Sync>;

/// Tuning options passed through to the analysis tool on every sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    /// Iteration cap per operating point
    pub max_iter: usize,

    /// Whether the tool should repanel the airfoil internally before running
    pub repanel: bool,

    /// Whether the tool should produce its own console output
    pub verbose: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            max_iter: 20,
            repanel: true,
            verbose: false,
        }
    }
}

/// An external analysis tool that can run an angle of attack sweep on an airfoil at a single
/// Reynolds number.
///
/// Implementations return a dataset with one row per requested angle, holding at least the
/// `alpha`, `CL`, `CD` and `CM` fields and optionally any diagnostics. Angles at which the tool
/// did not converge should be reported as NaN values rather than as an error; an `Err` means
/// the whole sweep failed and will abort polar generation.
pub trait AnalysisTool: Sync {
    fn alpha_sweep(
        &self,
        airfoil: &Airfoil,
        re: f64,
        alphas: &[f64],
        options: &AnalysisOptions,
    ) -> Result<PolarDataset, ToolError>;
}
