//! This module contains an abstraction for working with a discrete domain of scalar f64 values,
//! where the values are always ordered and only finite values are allowed. Alpha and Reynolds
//! sweeps are validated through it before any analysis runs.

use crate::errors::AirfoilError;
use crate::Result;
use itertools::Itertools;
use std::error::Error;

fn are_all_finite(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}

fn are_in_ascending_order(values: &[f64]) -> bool {
    values.iter().tuple_windows().all(|(a, b)| a <= b)
}

/// A discrete domain of scalar f64 values, in which all values are guaranteed to be finite and
/// in ascending order.
#[derive(Debug, Default, Clone)]
pub struct DiscreteDomain {
    values: Vec<f64>,
}

impl DiscreteDomain {
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn min(&self) -> Option<f64> {
        self.values.first().copied()
    }

    pub fn max(&self) -> Option<f64> {
        self.values.last().copied()
    }

    /// Try to push a value onto the end of the domain. The value must be finite and greater than
    /// the last value in the domain (unless the domain is empty).  If the value is not finite or
    /// is less than the last value in the domain, an error is returned.
    ///
    /// # Arguments
    ///
    /// * `value`: a finite value to add to the domain, must be greater than the last value in the
    /// domain (unless the domain is empty)
    ///
    /// returns: Result<(), Box<dyn Error, Global>>
    ///
    /// # Examples
    ///
    /// ```
    /// use foilpolar::common::DiscreteDomain;
    /// let mut domain = DiscreteDomain::default();
    /// domain.push(1.0).unwrap();
    /// domain.push(2.0).unwrap();
    ///
    /// assert_eq!(domain.values(), vec![1.0, 2.0]);
    /// ```
    pub fn push(&mut self, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(Box::from(
                "Cannot add a non-finite value to a discrete domain",
            ));
        }
        if !self.is_empty() && value < self.values[self.values.len() - 1] {
            return Err(Box::from(
                "Cannot add a value to a discrete domain that is less than the last value",
            ));
        }
        self.values.push(value);
        Ok(())
    }

    /// Validate an alpha sweep: non-empty, finite and ascending.
    pub fn alpha_sweep(values: &[f64]) -> Result<Self> {
        let domain = Self::try_from(values.to_vec())
            .map_err(|e| AirfoilError::InvalidSweep(format!("alpha sweep: {}", e)))?;
        if domain.is_empty() {
            return Err(AirfoilError::InvalidSweep("alpha sweep is empty".to_string()).into());
        }
        Ok(domain)
    }

    /// Validate a Reynolds number sweep: non-empty, finite, ascending and strictly positive.
    pub fn reynolds_sweep(values: &[f64]) -> Result<Self> {
        let domain = Self::try_from(values.to_vec())
            .map_err(|e| AirfoilError::InvalidSweep(format!("Reynolds sweep: {}", e)))?;
        match domain.min() {
            None => {
                Err(AirfoilError::InvalidSweep("Reynolds sweep is empty".to_string()).into())
            }
            Some(m) if m <= 0.0 => Err(AirfoilError::InvalidSweep(format!(
                "Reynolds numbers must be positive, got {}",
                m
            ))
            .into()),
            Some(_) => Ok(domain),
        }
    }
}

impl TryFrom<Vec<f64>> for DiscreteDomain {
    type Error = Box<dyn Error>;

    fn try_from(values: Vec<f64>) -> Result<Self> {
        if !are_all_finite(&values) {
            return Err(Box::from(
                "Cannot create a discrete domain from a vector containing NaN or infinite values",
            ));
        }

        if !are_in_ascending_order(&values) {
            return Err(Box::from(
                "Cannot create a discrete domain from a vector that is not in ascending order",
            ));
        }

        Ok(Self { values })
    }
}
