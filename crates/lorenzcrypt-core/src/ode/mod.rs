//! Adaptive embedded Runge-Kutta integration with dense resampling.
//!
//! The integrator advances with error-controlled steps and reports the
//! solution only at caller-chosen evaluation times, interpolating inside each
//! accepted step with a cubic Hermite polynomial built from the step's end
//! states and slopes. The output therefore does not depend on where the
//! adaptive steps happened to land.
//!
//! # Determinism
//!
//! The step sequence is a pure function of the field, the initial state, the
//! time bounds and the [`SolverSettings`]. There is no hidden state, so two
//! runs with equal inputs produce bit-identical output.

mod tableau;

use std::cmp::Ordering;

use crate::{
    error::IntegrationError,
    key::{SolverSettings, State},
};

/// Safety factor applied to the optimal step estimate
const SAFETY: f64 = 0.9;

/// Smallest allowed step shrink on rejection
const MIN_FACTOR: f64 = 0.2;

/// Largest allowed step growth on acceptance
const MAX_FACTOR: f64 = 10.0;

/// Right-hand side of an autonomous or forced ODE system in three states.
pub trait VectorField {
    /// Time derivative of `state` at time `t`.
    fn derivative(&self, t: f64, state: &State) -> State;
}

impl<F> VectorField for F
where
    F: Fn(f64, &State) -> State,
{
    fn derivative(&self, t: f64, state: &State) -> State {
        self(t, state)
    }
}

/// Step statistics of one integration run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntegrationStats {
    /// Accepted steps
    pub accepted: usize,
    /// Rejected trial steps
    pub rejected: usize,
    /// Vector field evaluations
    pub evaluations: usize,
}

/// Integrate `field` from `(t_eval[0], y0)` and sample at every `t_eval`.
///
/// Integration runs towards `t_bound` (at least `t_eval`'s last entry) and
/// stops as soon as every evaluation time has been produced. Evaluation times
/// equal to the start time yield `y0` exactly.
///
/// # Errors
///
/// - `NonIncreasingEvalTimes`: `t_eval` goes backwards or is not finite
/// - `StepSizeUnderflow`: the step controller could not meet the tolerances
pub fn integrate<F: VectorField + ?Sized>(
    field: &F,
    y0: State,
    t_eval: &[f64],
    t_bound: f64,
    settings: &SolverSettings,
) -> Result<(Vec<State>, IntegrationStats), IntegrationError> {
    let mut stats = IntegrationStats::default();
    let Some((&t_start, &t_last)) = t_eval.first().zip(t_eval.last()) else {
        return Ok((Vec::new(), stats));
    };
    if let Some(index) = t_eval.iter().position(|t| !t.is_finite()) {
        return Err(IntegrationError::NonIncreasingEvalTimes { index });
    }
    if let Some(index) = t_eval
        .windows(2)
        .position(|w| matches!(w[1].partial_cmp(&w[0]), None | Some(Ordering::Less)))
    {
        return Err(IntegrationError::NonIncreasingEvalTimes { index: index + 1 });
    }

    let mut samples = Vec::with_capacity(t_eval.len());
    let mut next = 0;
    while next < t_eval.len() && t_eval[next] <= t_start {
        samples.push(y0);
        next += 1;
    }
    if next == t_eval.len() {
        return Ok((samples, stats));
    }

    let t_bound = if t_bound.is_finite() { t_bound.max(t_last) } else { t_last };
    let tableau = settings.method().tableau();
    let exponent = -1.0 / f64::from(tableau.error_order + 1);

    let mut t = t_start;
    let mut y = y0;
    let mut f = field.derivative(t, &y);
    stats.evaluations += 1;
    let mut h_abs = initial_step(field, t, &y, &f, settings, tableau.error_order, &mut stats);

    while next < t_eval.len() {
        let min_step = 10.0 * (t.next_up() - t).abs();
        let mut step_rejected = false;

        let (t_new, step) = loop {
            if h_abs.is_nan() || h_abs < min_step {
                return Err(IntegrationError::StepSizeUnderflow { t, step: h_abs });
            }

            let mut t_new = t + h_abs;
            if t_new > t_bound {
                t_new = t_bound;
            }
            let h = t_new - t;
            h_abs = h.abs();

            let step = tableau.step(field, t, &y, &f, h);
            stats.evaluations += tableau.c.len();
            let error_norm = scaled_rms(&step.error, &y, &step.y, settings);

            if error_norm < 1.0 {
                let mut factor = if error_norm == 0.0 {
                    MAX_FACTOR
                } else {
                    MAX_FACTOR.min(SAFETY * error_norm.powf(exponent))
                };
                if step_rejected {
                    factor = factor.min(1.0);
                }
                h_abs *= factor;
                stats.accepted += 1;
                break (t_new, step);
            }

            h_abs *= MIN_FACTOR.max(SAFETY * error_norm.powf(exponent));
            step_rejected = true;
            stats.rejected += 1;
        };

        while next < t_eval.len() && t_eval[next] <= t_new {
            samples.push(hermite(t, t_new, &y, &step.y, &f, &step.f, t_eval[next]));
            next += 1;
        }

        t = t_new;
        y = step.y;
        f = step.f;
    }

    tracing::debug!(
        accepted = stats.accepted,
        rejected = stats.rejected,
        evaluations = stats.evaluations,
        samples = samples.len(),
        "integration finished"
    );

    Ok((samples, stats))
}

/// Pick the first step from the local behaviour of the field.
///
/// Hairer, Norsett & Wanner, "Solving ODEs I", II.4.
fn initial_step<F: VectorField + ?Sized>(
    field: &F,
    t0: f64,
    y0: &State,
    f0: &State,
    settings: &SolverSettings,
    error_order: i32,
    stats: &mut IntegrationStats,
) -> f64 {
    let scale: State = std::array::from_fn(|i| settings.atol() + y0[i].abs() * settings.rtol());
    let d0 = rms(std::array::from_fn(|i| y0[i] / scale[i]));
    let d1 = rms(std::array::from_fn(|i| f0[i] / scale[i]));

    let h0 = if d0 < 1e-5 || d1 < 1e-5 { 1e-6 } else { 0.01 * d0 / d1 };

    let y1: State = std::array::from_fn(|i| y0[i] + h0 * f0[i]);
    let f1 = field.derivative(t0 + h0, &y1);
    stats.evaluations += 1;
    let d2 = rms(std::array::from_fn(|i| (f1[i] - f0[i]) / scale[i])) / h0;

    let h1 = if d1 <= 1e-15 && d2 <= 1e-15 {
        (h0 * 1e-3).max(1e-6)
    } else {
        (0.01 / d1.max(d2)).powf(1.0 / f64::from(error_order + 1))
    };

    (100.0 * h0).min(h1)
}

/// RMS of the error relative to `atol + rtol * max(|y|, |y_new|)`.
fn scaled_rms(error: &State, y: &State, y_new: &State, settings: &SolverSettings) -> f64 {
    rms(std::array::from_fn(|i| {
        let scale = settings.atol() + y[i].abs().max(y_new[i].abs()) * settings.rtol();
        error[i] / scale
    }))
}

fn rms(v: State) -> f64 {
    (v.iter().map(|x| x * x).sum::<f64>() / v.len() as f64).sqrt()
}

/// Cubic Hermite interpolation inside the step `[t0, t1]`.
fn hermite(t0: f64, t1: f64, y0: &State, y1: &State, f0: &State, f1: &State, t: f64) -> State {
    let h = t1 - t0;
    let theta = (t - t0) / h;
    let one_minus = 1.0 - theta;

    let h00 = (1.0 + 2.0 * theta) * one_minus * one_minus;
    let h10 = theta * one_minus * one_minus;
    let h01 = theta * theta * (3.0 - 2.0 * theta);
    let h11 = theta * theta * (theta - 1.0);

    std::array::from_fn(|i| h00 * y0[i] + h10 * h * f0[i] + h01 * y1[i] + h11 * h * f1[i])
}
