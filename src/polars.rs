//! Polar generation: acquiring raw alpha/Reynolds sweeps from an analysis tool (or a cache),
//! fitting attached and separated flow surrogates, blending across stall and correcting for
//! compressibility.

mod acquire;
mod analysis;
mod cache;
pub mod compressibility;
pub mod dataset;
mod model;
mod post_stall;
mod surrogate;

use crate::common::{geom_space, linear_space};
use crate::interpolate::RbfSettings;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use acquire::acquire_dataset;
pub use analysis::{AnalysisOptions, AnalysisTool, ToolError};
pub use cache::{load_dataset, save_dataset};
pub use compressibility::CompressibilitySettings;
pub use dataset::PolarDataset;
pub use model::{CoefficientModel, PolarModel};
pub use post_stall::post_stall_coefficients;
pub use surrogate::SurrogateModel;

/// Options for generating an airfoil's polars.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PolarOptions {
    /// Angles of attack to sweep, in degrees. Must be finite and ascending.
    pub alphas: Vec<f64>,

    /// Reynolds numbers to sweep at. Must be positive and ascending.
    pub reynolds: Vec<f64>,

    /// If set, the raw dataset is read from this file when it exists, and written to it after
    /// a sweep when it does not.
    pub cache_path: Option<PathBuf>,

    /// Passed through to the analysis tool
    pub analysis: AnalysisOptions,

    pub rbf: RbfSettings,

    pub compressibility: CompressibilitySettings,

    /// Mirror the dataset across alpha = 0 before fitting. Only valid for airfoils known to be
    /// symmetric, in which case the sweep can cover positive angles only.
    pub make_symmetric_polars: bool,

    /// Run the sweeps for different Reynolds numbers in parallel
    pub parallel: bool,
}

impl PolarOptions {
    pub fn new(alphas: Vec<f64>, reynolds: Vec<f64>) -> Self {
        Self {
            alphas,
            reynolds,
            ..Self::default()
        }
    }

    pub fn with_cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_path = Some(path.into());
        self
    }
}

impl Default for PolarOptions {
    fn default() -> Self {
        Self {
            alphas: linear_space(-13.0, 13.0, 27),
            reynolds: geom_space(1e3, 1e8, 12),
            cache_path: None,
            analysis: AnalysisOptions::default(),
            rbf: RbfSettings::default(),
            compressibility: CompressibilitySettings::default(),
            make_symmetric_polars: false,
            parallel: false,
        }
    }
}
