//! Smooth, differentiable polar surrogates for 2D airfoil sections.
//!
//! An `Airfoil` owns an ordered outline of points and a `PolarModel`, the trio of lift, drag and
//! moment coefficient functions of angle of attack (degrees), Reynolds number and Mach number.
//! Polar generation samples an external analysis tool over an alpha/Re sweep, fits attached and
//! separated flow models, blends them across the stall boundary and applies compressibility
//! corrections. Geometry transforms always re-emit geometry and polars together.

use std::error::Error;

pub mod airfoil;
pub mod common;
mod errors;
pub mod interpolate;
pub mod polars;

#[cfg(test)]
mod test_support;

pub use airfoil::{Airfoil, CoordinateResolver, CoordinateSource, FileResolver};
pub use errors::AirfoilError;
pub use polars::{
    AnalysisOptions, AnalysisTool, CoefficientModel, PolarDataset, PolarModel, PolarOptions,
    SurrogateModel,
};

pub type Result<T> = std::result::Result<T, Box<dyn Error>>;

pub type Point2 = parry2d_f64::na::Point2<f64>;
pub type Vector2 = parry2d_f64::na::Vector2<f64>;
pub type Rotation2 = parry2d_f64::na::Rotation2<f64>;
