//! Persistence of polar datasets as a human-readable JSON object mapping each field name to a
//! flat array of numbers. The file holds no metadata about the sweep which produced it.

use super::PolarDataset;
use crate::errors::AirfoilError;
use crate::Result;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Read a cached dataset. Non-finite values are stored as `null` and come back as NaN.
pub fn load_dataset(path: &Path) -> Result<PolarDataset> {
    let file = File::open(path)
        .map_err(|e| AirfoilError::Cache(format!("{}: {}", path.display(), e)))?;
    let raw: BTreeMap<String, Vec<Option<f64>>> = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| AirfoilError::Cache(format!("{}: {}", path.display(), e)))?;

    let fields = raw
        .into_iter()
        .map(|(k, v)| (k, v.into_iter().map(|x| x.unwrap_or(f64::NAN)).collect()))
        .collect();

    PolarDataset::from_fields(fields)
        .map_err(|e| AirfoilError::Cache(format!("{}: {}", path.display(), e)).into())
}

/// Write a dataset to the cache file, creating the parent directory if needed. An existing file
/// is overwritten.
pub fn save_dataset(path: &Path, data: &PolarDataset) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
    serde::Serialize::serialize(data, &mut serializer)?;
    writer.flush()?;
    Ok(())
}
