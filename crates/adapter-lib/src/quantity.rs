//! Fixed-point metric quantities
//!
//! Values are kept in milli-units. Integer samples are summed exactly.
//! Each floating sample is rounded to the nearest 0.001 (half away from
//! zero) before it is added, so the sum itself never accumulates floating
//! error. Resolution below one thousandth is not preserved.

use crate::error::{Result, TranslateError};
use serde::{Serialize, Serializer};
use std::fmt;

/// Number of milli-units per unit
pub const MILLIS_PER_UNIT: i128 = 1000;

/// Decimal quantity with 0.001 resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Quantity {
    millis: i128,
}

impl Quantity {
    pub fn from_integer(value: i64) -> Self {
        Self {
            millis: value as i128 * MILLIS_PER_UNIT,
        }
    }

    pub fn from_millis(millis: i128) -> Self {
        Self { millis }
    }

    /// Round a double to the nearest milli-unit
    ///
    /// Returns `None` for non-finite values and values outside the
    /// representable range.
    pub fn from_f64(value: f64) -> Option<Self> {
        let scaled = (value * MILLIS_PER_UNIT as f64).round();
        // i128::MAX as f64 rounds up to 2^127, hence the strict bound
        if scaled.is_finite() && scaled >= i128::MIN as f64 && scaled < i128::MAX as f64 {
            Some(Self {
                millis: scaled as i128,
            })
        } else {
            None
        }
    }

    pub fn millis(&self) -> i128 {
        self.millis
    }

    /// True when the quantity has no sub-unit part
    pub fn is_integer(&self) -> bool {
        self.millis % MILLIS_PER_UNIT == 0
    }

    pub fn checked_add(self, rhs: Quantity) -> Option<Quantity> {
        self.millis.checked_add(rhs.millis).map(Quantity::from_millis)
    }
}

/// Canonical Kubernetes decimal form: `12` or `2001m`
impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_integer() {
            write!(f, "{}", self.millis / MILLIS_PER_UNIT)
        } else {
            write!(f, "{}m", self.millis)
        }
    }
}

impl Serialize for Quantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Running sum of the samples that belong to one resource key
#[derive(Debug, Clone, Copy, Default)]
pub struct QuantityAccumulator {
    integer: i64,
    floating: Quantity,
}

impl QuantityAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_integer(&mut self, value: i64) -> Result<()> {
        self.integer = self.integer.checked_add(value).ok_or_else(|| {
            TranslateError::BackendContractViolation(format!(
                "integer sum overflows when adding {}",
                value
            ))
        })?;
        Ok(())
    }

    pub fn add_floating(&mut self, value: f64) -> Result<()> {
        let sample = Quantity::from_f64(value).ok_or_else(|| {
            TranslateError::MalformedSample(format!("double value {} is out of range", value))
        })?;
        self.floating = self.floating.checked_add(sample).ok_or_else(|| {
            TranslateError::BackendContractViolation(format!(
                "floating sum overflows when adding {}",
                value
            ))
        })?;
        Ok(())
    }

    /// Combine the integer and floating parts
    pub fn finish(&self) -> Result<Quantity> {
        Quantity::from_integer(self.integer)
            .checked_add(self.floating)
            .ok_or_else(|| {
                TranslateError::BackendContractViolation(
                    "sum of integer and floating samples overflows".to_string(),
                )
            })
    }
}
