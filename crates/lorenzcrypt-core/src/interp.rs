//! Continuous-time forcing built from sampled signals.
//!
//! The receiver's vector field needs the intercepted signal at arbitrary
//! times chosen by the adaptive integrator. [`Forcing`] is that single
//! capability; [`CubicSpline`] provides it from samples.

use crate::{error::SignalError, signal::ensure_same_len};

/// A scalar signal that can be evaluated at any time.
///
/// Outside the sampled domain implementations clamp to the boundary values
/// instead of extrapolating.
pub trait Forcing {
    /// Signal value at time `t`.
    fn value_at(&self, t: f64) -> f64;
}

impl<F> Forcing for F
where
    F: Fn(f64) -> f64,
{
    fn value_at(&self, t: f64) -> f64 {
        self(t)
    }
}

/// Natural cubic spline through `(times, values)`.
///
/// Degrades gracefully: two samples interpolate linearly, one sample is a
/// constant, and no samples evaluate to zero everywhere.
#[derive(Debug, Clone, PartialEq)]
pub struct CubicSpline {
    times: Vec<f64>,
    values: Vec<f64>,
    /// Second derivatives at the knots
    curvature: Vec<f64>,
}

impl CubicSpline {
    /// Fit a spline through the samples.
    ///
    /// # Errors
    ///
    /// - `LengthMismatch`: `values` and `times` differ in length
    /// - `NonIncreasingTimes`: `times` is not strictly increasing
    pub fn new(times: &[f64], values: &[f64]) -> Result<Self, SignalError> {
        ensure_same_len("cubic_spline", times, values)?;
        if let Some(index) = times.iter().position(|t| !t.is_finite()) {
            return Err(SignalError::NonIncreasingTimes { index });
        }
        if let Some(index) = times.windows(2).position(|w| w[1] <= w[0]) {
            return Err(SignalError::NonIncreasingTimes { index: index + 1 });
        }

        let curvature = natural_curvature(times, values);
        Ok(Self { times: times.to_vec(), values: values.to_vec(), curvature })
    }

    /// Number of knots.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Whether the spline has no knots.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

impl Forcing for CubicSpline {
    fn value_at(&self, t: f64) -> f64 {
        let (Some(&first), Some(&last)) = (self.times.first(), self.times.last()) else {
            return 0.0;
        };
        if t <= first {
            return self.values[0];
        }
        if t >= last {
            return self.values[self.values.len() - 1];
        }

        // first < t < last, so at least two knots and i + 1 is in range
        let i = self.times.partition_point(|&x| x <= t).saturating_sub(1).min(self.times.len() - 2);
        let (x0, x1) = (self.times[i], self.times[i + 1]);
        let h = x1 - x0;
        let a = (x1 - t) / h;
        let b = (t - x0) / h;

        a * self.values[i]
            + b * self.values[i + 1]
            + ((a * a * a - a) * self.curvature[i] + (b * b * b - b) * self.curvature[i + 1])
                * h
                * h
                / 6.0
    }
}

/// Solve the tridiagonal system for knot second derivatives with zero
/// curvature at both ends.
fn natural_curvature(x: &[f64], y: &[f64]) -> Vec<f64> {
    let n = x.len();
    let mut m = vec![0.0; n];
    if n < 3 {
        return m;
    }

    // Thomas algorithm over the interior knots 1..n-1
    let mut diag = vec![0.0; n];
    let mut rhs = vec![0.0; n];
    for i in 1..n - 1 {
        let h_prev = x[i] - x[i - 1];
        let h_next = x[i + 1] - x[i];
        diag[i] = 2.0 * (h_prev + h_next);
        rhs[i] = 6.0 * ((y[i + 1] - y[i]) / h_next - (y[i] - y[i - 1]) / h_prev);
    }
    for i in 2..n - 1 {
        let h_prev = x[i] - x[i - 1];
        let w = h_prev / diag[i - 1];
        diag[i] -= w * h_prev;
        rhs[i] -= w * rhs[i - 1];
    }
    m[n - 2] = rhs[n - 2] / diag[n - 2];
    for i in (1..n - 2).rev() {
        let h_next = x[i + 1] - x[i];
        m[i] = (rhs[i] - h_next * m[i + 1]) / diag[i];
    }
    m
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_through_knots() {
        let times = [0.0, 0.5, 1.5, 2.0, 3.0];
        let values = [1.0, -2.0, 0.5, 4.0, 3.0];
        let spline = CubicSpline::new(&times, &values).unwrap();
        for (t, v) in times.iter().zip(values.iter()) {
            assert!((spline.value_at(*t) - v).abs() < 1e-12);
        }
    }

    #[test]
    fn reproduces_straight_lines() {
        let times: Vec<f64> = (0..10).map(f64::from).collect();
        let values: Vec<f64> = times.iter().map(|t| 3.0 * t - 1.0).collect();
        let spline = CubicSpline::new(&times, &values).unwrap();
        for t in [0.25, 3.7, 8.9] {
            assert!((spline.value_at(t) - (3.0 * t - 1.0)).abs() < 1e-12);
        }
    }

    #[test]
    fn approximates_smooth_signal() {
        let times: Vec<f64> = (0..=200).map(|i| f64::from(i) * 0.05).collect();
        let values: Vec<f64> = times.iter().map(|t| t.sin()).collect();
        let spline = CubicSpline::new(&times, &values).unwrap();
        for i in 10..190 {
            let t = f64::from(i) * 0.05 + 0.013;
            assert!((spline.value_at(t) - t.sin()).abs() < 1e-5, "at {t}");
        }
    }

    #[test]
    fn clamps_outside_domain() {
        let spline = CubicSpline::new(&[1.0, 2.0, 3.0], &[5.0, 7.0, -1.0]).unwrap();
        assert_eq!(spline.value_at(-100.0), 5.0);
        assert_eq!(spline.value_at(1.0), 5.0);
        assert_eq!(spline.value_at(3.0), -1.0);
        assert_eq!(spline.value_at(1e9), -1.0);
    }

    #[test]
    fn degenerate_knot_counts() {
        let empty = CubicSpline::new(&[], &[]).unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty.value_at(1.0), 0.0);

        let single = CubicSpline::new(&[2.0], &[4.0]).unwrap();
        assert_eq!(single.len(), 1);
        assert_eq!(single.value_at(0.0), 4.0);
        assert_eq!(single.value_at(10.0), 4.0);

        let pair = CubicSpline::new(&[0.0, 2.0], &[0.0, 4.0]).unwrap();
        assert!((pair.value_at(0.5) - 1.0).abs() < 1e-15);
    }

    #[test]
    fn rejects_mismatched_lengths() {
        let err = CubicSpline::new(&[0.0, 1.0, 2.0], &[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, SignalError::LengthMismatch { expected: 3, actual: 2, .. }));
    }

    #[test]
    fn rejects_unsorted_times() {
        let err = CubicSpline::new(&[0.0, 1.0, 1.0, 2.0], &[0.0; 4]).unwrap_err();
        assert_eq!(err, SignalError::NonIncreasingTimes { index: 2 });
    }

    #[test]
    fn closures_are_forcings() {
        let forcing = |t: f64| 2.0 * t;
        assert_eq!(forcing.value_at(1.5), 3.0);
    }
}
