use std::error::Error;
use std::fmt::{Display, Formatter};

/// The named failure conditions of airfoil geometry and polar generation. Ad-hoc failures
/// elsewhere in the crate are plain boxed strings; these are the ones callers are expected to
/// match on, which they can do with `err.downcast_ref::<AirfoilError>()`.
#[derive(Debug, Clone, PartialEq)]
pub enum AirfoilError {
    /// The operation needs coordinate points but the airfoil has none.
    MissingGeometry,

    /// Two adjacent points are coincident, so the arclength parameterization is not strictly
    /// increasing. `index` is the position of the first point of the zero-length segment.
    DegenerateGeometry { index: usize },

    /// The analysis tool failed (or could not be reached) during the sweep at Reynolds number
    /// `re`. This aborts the whole polar generation.
    ExternalToolFailure { re: f64, message: String },

    /// None of the coordinate resolution strategies produced points for the given name.
    UnresolvedIdentity(String),

    /// An alpha or Reynolds sweep is empty, not finite, not ascending, or (for Reynolds) not
    /// strictly positive.
    InvalidSweep(String),

    /// A cache file exists but could not be read or parsed.
    Cache(String),
}

impl Display for AirfoilError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AirfoilError::MissingGeometry => {
                write!(f, "The airfoil has no coordinate points")
            }
            AirfoilError::DegenerateGeometry { index } => write!(
                f,
                "Adjacent points {} and {} are coincident (zero-length segment)",
                index,
                index + 1
            ),
            AirfoilError::ExternalToolFailure { re, message } => {
                write!(f, "Analysis tool failed at Re={:e}: {}", re, message)
            }
            AirfoilError::UnresolvedIdentity(name) => {
                write!(f, "Could not resolve coordinates for airfoil '{}'", name)
            }
            AirfoilError::InvalidSweep(msg) => write!(f, "Invalid sweep: {}", msg),
            AirfoilError::Cache(msg) => write!(f, "Polar cache error: {}", msg),
        }
    }
}

impl Error for AirfoilError {}
