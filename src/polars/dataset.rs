//! The keyed-array dataset produced by alpha/Reynolds sweeps of the analysis tool.

use crate::common::median;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const ALPHA: &str = "alpha";
pub const RE: &str = "Re";
pub const CL: &str = "CL";
pub const CD: &str = "CD";
pub const CM: &str = "CM";
pub const CDP: &str = "CDp";

/// Fields which are unchanged when the data is mirrored across alpha. Every other field is
/// treated as antisymmetric and negated.
const SYMMETRIC_ACROSS_ALPHA: [&str; 3] = [CD, CDP, RE];

/// A mapping from field name (`alpha`, `Re`, `CL`, `CD`, `CM` and any solver diagnostics) to a
/// column of values, one row per evaluated (alpha, Re) sample. All columns always have the same
/// number of rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolarDataset {
    fields: BTreeMap<String, Vec<f64>>,
}

impl PolarDataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dataset from named columns, failing if they do not all have the same length.
    pub fn from_fields(fields: BTreeMap<String, Vec<f64>>) -> Result<Self> {
        let mut result = Self::new();
        for (name, values) in fields {
            result.set_column(&name, values)?;
        }
        Ok(result)
    }

    /// The number of rows, zero for a dataset without fields.
    pub fn n_rows(&self) -> usize {
        self.fields.values().next().map(|v| v.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows() == 0
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(|k| k.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&[f64]> {
        self.fields.get(name).map(|v| v.as_slice())
    }

    /// Like `get`, but a missing field is an error.
    pub fn column(&self, name: &str) -> Result<&[f64]> {
        self.get(name)
            .ok_or_else(|| format!("Polar dataset has no '{}' field", name).into())
    }

    /// Insert or replace a column. The column must have the same number of rows as the columns
    /// already present (any length is accepted for the first column).
    pub fn set_column(&mut self, name: &str, values: Vec<f64>) -> Result<()> {
        let others = self.fields.iter().find(|(k, _)| k.as_str() != name);
        if let Some((other, v)) = others {
            if v.len() != values.len() {
                return Err(format!(
                    "Field '{}' has {} rows but '{}' has {}",
                    name,
                    values.len(),
                    other,
                    v.len()
                )
                .into());
            }
        }
        self.fields.insert(name.to_string(), values);
        Ok(())
    }

    /// Concatenate datasets row-wise, in the order given. Every dataset must have exactly the
    /// same fields.
    pub fn concat(parts: &[PolarDataset]) -> Result<Self> {
        let Some(first) = parts.first() else {
            return Ok(Self::new());
        };

        let mut fields = BTreeMap::new();
        for name in first.fields.keys() {
            let mut column = Vec::new();
            for part in parts {
                column.extend_from_slice(part.column(name)?);
            }
            fields.insert(name.clone(), column);
        }

        if parts.iter().any(|p| p.fields.len() != first.fields.len()) {
            return Err("Cannot concatenate polar datasets with different fields".into());
        }

        Self::from_fields(fields)
    }

    /// Returns the dataset followed by its mirror image across alpha = 0. In the mirrored rows
    /// alpha and every antisymmetric coefficient are negated, while drag-like fields and the
    /// Reynolds number are copied as is. Only valid for airfoils known to be symmetric.
    pub fn with_mirror_across_alpha(&self) -> Self {
        let fields = self
            .fields
            .iter()
            .map(|(name, values)| {
                let mirrored = if SYMMETRIC_ACROSS_ALPHA.contains(&name.as_str()) {
                    values.clone()
                } else {
                    values.iter().map(|v| -v).collect()
                };
                let mut column = values.clone();
                column.extend(mirrored);
                (name.clone(), column)
            })
            .collect();
        Self { fields }
    }

    /// Keep only the rows for which `keep` returns true. The closure receives the row index.
    pub fn filter_rows<F>(&self, keep: F) -> Self
    where
        F: Fn(usize) -> bool,
    {
        let rows = (0..self.n_rows()).filter(|i| keep(*i)).collect::<Vec<_>>();
        let fields = self
            .fields
            .iter()
            .map(|(name, values)| (name.clone(), rows.iter().map(|i| values[*i]).collect()))
            .collect();
        Self { fields }
    }

    /// Returns the rows usable for fitting: alpha, Re, CL, CD and CM all finite, and CD
    /// strictly positive (drag is fit in log space). Also returns the number of rows dropped.
    pub fn fit_ready(&self) -> Result<(Self, usize)> {
        let alpha = self.column(ALPHA)?;
        let re = self.column(RE)?;
        let cl = self.column(CL)?;
        let cd = self.column(CD)?;
        let cm = self.column(CM)?;

        let clean = self.filter_rows(|i| {
            alpha[i].is_finite()
                && re[i].is_finite()
                && cl[i].is_finite()
                && cm[i].is_finite()
                && cd[i].is_finite()
                && cd[i] > 0.0
        });
        let dropped = self.n_rows() - clean.n_rows();
        Ok((clean, dropped))
    }

    /// The median of the finite values of a field.
    pub fn median(&self, name: &str) -> Result<f64> {
        median(self.column(name)?)
            .ok_or_else(|| format!("Field '{}' has no finite values", name).into())
    }

    /// Smallest and largest finite value of a field.
    pub fn extent(&self, name: &str) -> Result<(f64, f64)> {
        let values = self.column(name)?;
        let finite = values.iter().copied().filter(|v| v.is_finite());
        let lo = finite.clone().fold(f64::INFINITY, f64::min);
        let hi = finite.fold(f64::NEG_INFINITY, f64::max);
        if lo > hi {
            return Err(format!("Field '{}' has no finite values", name).into());
        }
        Ok((lo, hi))
    }
}
