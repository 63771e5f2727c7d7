//! Scalar signals aligned 1:1 with a time grid.
//!
//! Carrier, message, encrypted, recovered and attacked signals all share this
//! representation. Binary operations require equal-length operands and
//! reject mismatches with [`SignalError::LengthMismatch`] before touching a
//! sample.

use std::ops::Deref;

use crate::error::SignalError;

/// Real-valued samples on a time grid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScalarSignal {
    samples: Vec<f64>,
}

impl ScalarSignal {
    /// Wrap raw samples.
    pub fn new(samples: Vec<f64>) -> Self {
        Self { samples }
    }

    /// Silent signal of `len` samples.
    pub fn zeros(len: usize) -> Self {
        Self { samples: vec![0.0; len] }
    }

    /// Samples as a slice.
    pub fn as_slice(&self) -> &[f64] {
        &self.samples
    }

    /// Consume the signal and return its samples.
    pub fn into_inner(self) -> Vec<f64> {
        self.samples
    }

    /// Largest absolute sample, 0 for an empty signal.
    pub fn peak(&self) -> f64 {
        self.samples.iter().fold(0.0, |peak, x| peak.max(x.abs()))
    }
}

impl Deref for ScalarSignal {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.samples
    }
}

impl AsRef<[f64]> for ScalarSignal {
    fn as_ref(&self) -> &[f64] {
        &self.samples
    }
}

impl From<Vec<f64>> for ScalarSignal {
    fn from(samples: Vec<f64>) -> Self {
        Self { samples }
    }
}

impl FromIterator<f64> for ScalarSignal {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self { samples: iter.into_iter().collect() }
    }
}

/// Reject operands of different length.
pub(crate) fn ensure_same_len(
    operation: &'static str,
    expected: &[f64],
    actual: &[f64],
) -> Result<(), SignalError> {
    if expected.len() == actual.len() {
        Ok(())
    } else {
        Err(SignalError::LengthMismatch {
            operation,
            expected: expected.len(),
            actual: actual.len(),
        })
    }
}

/// Combine two equal-length signals sample by sample.
pub(crate) fn zip_with(
    operation: &'static str,
    left: &[f64],
    right: &[f64],
    op: impl Fn(f64, f64) -> f64,
) -> Result<ScalarSignal, SignalError> {
    ensure_same_len(operation, left, right)?;
    Ok(left.iter().zip(right.iter()).map(|(&l, &r)| op(l, r)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zip_with_applies_elementwise() {
        let sum = zip_with("sum", &[1.0, 2.0, 3.0], &[0.1, 0.2, 0.3], |a, b| a + b).unwrap();
        assert_eq!(sum.as_slice(), &[1.1, 2.2, 3.3]);
    }

    #[test]
    fn zip_with_rejects_mismatch() {
        let err = zip_with("sum", &[1.0, 2.0, 3.0], &[1.0, 2.0], |a, b| a + b).unwrap_err();
        assert_eq!(err, SignalError::LengthMismatch { operation: "sum", expected: 3, actual: 2 });
    }

    #[test]
    fn empty_operands_are_not_errors() {
        let out = zip_with("sum", &[], &[], |a, b| a + b).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn peak_of_empty_is_zero() {
        assert_eq!(ScalarSignal::default().peak(), 0.0);
        assert_eq!(ScalarSignal::new(vec![1.0, -3.0, 2.0]).peak(), 3.0);
    }
}
