//! Resolution of airfoil coordinates from names, files or arrays, and the plain text coordinate
//! formats used to read and write them.

use super::Airfoil;
use crate::errors::AirfoilError;
use crate::{Point2, Result};
use log::{debug, warn};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Where the coordinates of a new airfoil come from.
#[derive(Debug, Clone)]
pub enum CoordinateSource {
    /// Derive the coordinates from the airfoil's name, trying each resolver in turn
    ByName,

    /// Read the coordinates from a `.dat` file
    ByFile(PathBuf),

    /// Use these points as they are
    ByArray(Vec<Point2>),
}

/// A strategy for turning an airfoil name into coordinates, such as a parametric family
/// generator or a catalog lookup. Returns `None` when the name is not recognized.
pub trait CoordinateResolver {
    fn resolve(&self, name: &str) -> Option<Vec<Point2>>;
}

/// Treats the name as the path to a `.dat` file, optionally relative to a base directory.
#[derive(Debug, Clone, Default)]
pub struct FileResolver {
    base: Option<PathBuf>,
}

impl FileResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve names relative to `base`, for instance a local directory of catalog files.
    pub fn in_directory(base: impl Into<PathBuf>) -> Self {
        Self {
            base: Some(base.into()),
        }
    }
}

impl CoordinateResolver for FileResolver {
    fn resolve(&self, name: &str) -> Option<Vec<Point2>> {
        let candidates = match &self.base {
            Some(base) => vec![base.join(name), base.join(format!("{}.dat", name))],
            None => vec![PathBuf::from(name)],
        };

        candidates
            .iter()
            .filter(|p| p.is_file())
            .find_map(|p| match read_dat(p) {
                Ok((_, points)) if !points.is_empty() => Some(points),
                Ok(_) => None,
                Err(e) => {
                    debug!("Could not read {} as coordinates: {}", p.display(), e);
                    None
                }
            })
    }
}

impl Airfoil {
    /// Create an airfoil, resolving its coordinates from `source`. Resolution is never fatal:
    /// if nothing produces coordinates, a warning is logged and the airfoil has no points, so
    /// that any later geometric query fails with `AirfoilError::MissingGeometry`.
    ///
    /// # Arguments
    ///
    /// * `name`: the airfoil name, also the key for `CoordinateSource::ByName`
    /// * `source`: where the coordinates come from
    /// * `resolvers`: the name resolution strategies, tried in order until one succeeds
    ///
    /// returns: Airfoil
    pub fn resolve(
        name: &str,
        source: CoordinateSource,
        resolvers: &[&dyn CoordinateResolver],
    ) -> Self {
        match Self::resolve_checked(name, source, resolvers) {
            Ok(airfoil) => airfoil,
            Err(e) => {
                warn!("{}; the airfoil will have no coordinates", e);
                Airfoil::new(name, Vec::new())
            }
        }
    }

    /// Like `resolve`, but failure to find coordinates is returned as
    /// `AirfoilError::UnresolvedIdentity`.
    pub fn resolve_checked(
        name: &str,
        source: CoordinateSource,
        resolvers: &[&dyn CoordinateResolver],
    ) -> Result<Self> {
        let points = match source {
            CoordinateSource::ByArray(points) => Some(points),
            CoordinateSource::ByFile(path) => match read_dat(&path) {
                Ok((_, points)) => Some(points),
                Err(e) => {
                    debug!("Could not read {}: {}", path.display(), e);
                    None
                }
            },
            CoordinateSource::ByName => resolvers.iter().find_map(|r| r.resolve(name)),
        };

        match points {
            Some(p) if !p.is_empty() => Ok(Airfoil::new(name, p)),
            _ => Err(AirfoilError::UnresolvedIdentity(name.to_string()).into()),
        }
    }

    /// The airfoil in `.dat` format: optionally the name on the first line, then one
    /// `x y` line per point with six decimal places.
    pub fn to_dat_string(&self, include_name: bool) -> String {
        let mut lines = Vec::with_capacity(self.points.len() + 1);
        if include_name {
            lines.push(self.name.clone());
        }
        lines.extend(self.points.iter().map(|p| format!("{:.6} {:.6}", p.x, p.y)));
        lines.join("\n")
    }

    pub fn write_dat(&self, path: &Path, include_name: bool) -> Result<()> {
        write_text(path, &self.to_dat_string(include_name))
    }

    /// The airfoil as a SolidWorks curve file: one `x y 0` line per point, no name line.
    pub fn to_sldcrv_string(&self) -> String {
        self.points
            .iter()
            .map(|p| format!("{:.6} {:.6} 0", p.x, p.y))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn write_sldcrv(&self, path: &Path) -> Result<()> {
        write_text(path, &self.to_sldcrv_string())
    }
}

fn write_text(path: &Path, text: &str) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(text.as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Parse `.dat` formatted text. A first line which does not hold two numbers is taken as the
/// name. Blank lines are skipped and any columns past the second are ignored, so `.sldcrv`
/// text parses too.
///
/// # Examples
///
/// ```
/// use foilpolar::airfoil::parse_dat;
/// let (name, points) = parse_dat("NACA 0012\n1.0 0.0\n0.0 0.0\n1.0 0.0").unwrap();
/// assert_eq!(name.as_deref(), Some("NACA 0012"));
/// assert_eq!(points.len(), 3);
/// ```
pub fn parse_dat(text: &str) -> Result<(Option<String>, Vec<Point2>)> {
    let mut name = None;
    let mut points = Vec::new();

    for (i, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match parse_pair(trimmed) {
            Some(p) => points.push(p),
            None if points.is_empty() && name.is_none() => name = Some(trimmed.to_string()),
            None => {
                return Err(format!("Line {} is not a coordinate pair: '{}'", i + 1, trimmed).into());
            }
        }
    }

    Ok((name, points))
}

fn parse_pair(line: &str) -> Option<Point2> {
    let mut parts = line.split_whitespace();
    let x = parts.next()?.parse::<f64>().ok()?;
    let y = parts.next()?.parse::<f64>().ok()?;
    Some(Point2::new(x, y))
}

/// Read and parse a `.dat` file.
pub fn read_dat(path: &Path) -> Result<(Option<String>, Vec<Point2>)> {
    let text = std::fs::read_to_string(path)?;
    parse_dat(&text)
}
