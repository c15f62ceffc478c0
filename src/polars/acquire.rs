//! Acquisition of the raw polar dataset, either from the cache or by sweeping the analysis tool
//! over every Reynolds number.

use super::cache::{load_dataset, save_dataset};
use super::dataset::{ALPHA, RE};
use super::{AnalysisTool, PolarDataset, PolarOptions};
use crate::common::DiscreteDomain;
use crate::errors::AirfoilError;
use crate::{Airfoil, Result};
use log::{debug, info, warn};
use rayon::prelude::*;

/// Get the polar dataset for an airfoil over the alpha and Reynolds sweeps in `options`.
///
/// If `options.cache_path` names an existing file, its contents are returned as they are, with
/// only a logged warning if the cached alpha/Re extents differ from the requested sweep.
/// Otherwise the tool is run once per Reynolds number with the full alpha sweep, each run's rows
/// are tagged with their Reynolds number, and the runs are concatenated in sweep order. The
/// dataset is mirrored across alpha when `options.make_symmetric_polars` is set, and written to
/// the cache path if one was given.
///
/// A failure of any single tool run fails the whole call with
/// `AirfoilError::ExternalToolFailure`; partial datasets are never returned or cached.
///
/// # Arguments
///
/// * `airfoil`: the airfoil to analyze
/// * `options`: sweeps, cache location, and tool options
/// * `tool`: the external analysis tool
///
/// returns: Result<PolarDataset, Box<dyn Error, Global>>
pub fn acquire_dataset(
    airfoil: &Airfoil,
    options: &PolarOptions,
    tool: &dyn AnalysisTool,
) -> Result<PolarDataset> {
    let alphas = DiscreteDomain::alpha_sweep(&options.alphas)?;
    let reynolds = DiscreteDomain::reynolds_sweep(&options.reynolds)?;

    if let Some(path) = options.cache_path.as_deref() {
        if path.exists() {
            let data = load_dataset(path)?;
            info!(
                "Loaded {} cached polar rows for airfoil '{}' from {}",
                data.n_rows(),
                airfoil.name(),
                path.display()
            );
            check_cached_sweep(&data, &alphas, &reynolds);
            return Ok(data);
        }
    }

    info!(
        "Running {} alpha sweeps to generate polars for airfoil '{}'",
        reynolds.len(),
        airfoil.name()
    );

    let run = |re: f64| -> std::result::Result<PolarDataset, AirfoilError> {
        let failure = |message: String| AirfoilError::ExternalToolFailure { re, message };

        debug!("Alpha sweep at Re={:e}", re);
        let mut data = tool
            .alpha_sweep(airfoil, re, alphas.values(), &options.analysis)
            .map_err(|e| failure(e.to_string()))?;

        if data.get(ALPHA).is_none() {
            return Err(failure("result has no 'alpha' field".to_string()));
        }
        let n = data.n_rows();
        data.set_column(RE, vec![re; n])
            .map_err(|e| failure(e.to_string()))?;
        Ok(data)
    };

    // Collecting into a Result keeps the sweep order and stops at the first failure
    let runs = if options.parallel {
        reynolds
            .values()
            .par_iter()
            .map(|re| run(*re))
            .collect::<std::result::Result<Vec<_>, _>>()?
    } else {
        reynolds
            .values()
            .iter()
            .map(|re| run(*re))
            .collect::<std::result::Result<Vec<_>, _>>()?
    };

    let mut data = PolarDataset::concat(&runs)?;
    if options.make_symmetric_polars {
        data = data.with_mirror_across_alpha();
    }

    if let Some(path) = options.cache_path.as_deref() {
        save_dataset(path, &data)?;
        debug!("Wrote polar cache {}", path.display());
    }

    Ok(data)
}

/// Logs a warning when a cached dataset does not span the sweep that was asked for. The cache
/// format holds no sweep metadata, so extents are the only thing that can be compared.
fn check_cached_sweep(data: &PolarDataset, alphas: &DiscreteDomain, reynolds: &DiscreteDomain) {
    let requested = [
        (ALPHA, alphas.min(), alphas.max()),
        (RE, reynolds.min(), reynolds.max()),
    ];
    for (field, lo, hi) in requested {
        match (data.extent(field), lo, hi) {
            (Ok((c_lo, c_hi)), Some(lo), Some(hi)) => {
                let tol = 1e-9 * (hi - lo).abs().max(1.0);
                if (c_lo - lo).abs() > tol || (c_hi - hi).abs() > tol {
                    warn!(
                        "Cached '{}' spans [{}, {}] but [{}, {}] was requested; using the cache anyway",
                        field, c_lo, c_hi, lo, hi
                    );
                }
            }
            (Err(e), _, _) => warn!("Cached polar data cannot be checked: {}", e),
            _ => {}
        }
    }
}
