//! Drive-response receiver.
//!
//! The receiver runs its own Lorenz copy in which the intercepted signal
//! `me(t)` replaces the first state variable wherever it drives the other two:
//!
//! ```text
//! dur/dt = a(vr - ur)
//! dvr/dt = r*me(t) - vr - me(t)*wr
//! dwr/dt = me(t)*vr - b*wr
//! ```
//!
//! When `me` is the sender's carrier, `(vr, wr)` and then `ur` converge to
//! the sender's trajectory regardless of the receiver's initial state.

use crate::{
    carrier::Trajectory,
    error::SyncError,
    interp::{CubicSpline, Forcing},
    key::{LorenzParams, SolverSettings, State},
    ode::{self, VectorField},
};

/// Lorenz field whose coupling terms are driven by an external signal.
pub struct DrivenLorenzField<'a, F: Forcing + ?Sized> {
    params: LorenzParams,
    forcing: &'a F,
}

impl<'a, F: Forcing + ?Sized> DrivenLorenzField<'a, F> {
    /// Field driven by `forcing`.
    pub fn new(params: LorenzParams, forcing: &'a F) -> Self {
        Self { params, forcing }
    }
}

impl<F: Forcing + ?Sized> VectorField for DrivenLorenzField<'_, F> {
    fn derivative(&self, t: f64, state: &State) -> State {
        let [ur, vr, wr] = *state;
        let me = self.forcing.value_at(t);
        let (a, b, r) = (self.params.a(), self.params.b(), self.params.r());
        [a * (vr - ur), r * me - vr - me * wr, me * vr - b * wr]
    }
}

/// Drive a receiver with the sampled signal `(t_signal, forcing_signal)`.
///
/// The samples are interpolated with a natural cubic spline that clamps to
/// the boundary values outside `t_signal`. The receiver integrates with
/// [`SolverSettings::default`] and is sampled at every `t_eval`.
///
/// # Errors
///
/// - `Signal(LengthMismatch)`: `forcing_signal` and `t_signal` differ in length
/// - `Signal(NonIncreasingTimes)`: `t_signal` is not strictly increasing
/// - `Integration(_)`: `t_eval` goes backwards or integration stalls
pub fn synchronize_receiver(
    initial_state: State,
    t_eval: &[f64],
    forcing_signal: &[f64],
    t_signal: &[f64],
    params: &LorenzParams,
) -> Result<Trajectory, SyncError> {
    let spline = CubicSpline::new(t_signal, forcing_signal)?;
    tracing::debug!(knots = spline.len(), "forcing interpolated");
    synchronize_receiver_with(initial_state, t_eval, &spline, params, &SolverSettings::default())
}

/// Drive a receiver with an arbitrary [`Forcing`] and solver settings.
///
/// Empty `t_eval` gives an empty trajectory.
pub fn synchronize_receiver_with<F: Forcing + ?Sized>(
    initial_state: State,
    t_eval: &[f64],
    forcing: &F,
    params: &LorenzParams,
    settings: &SolverSettings,
) -> Result<Trajectory, SyncError> {
    let Some(&t_bound) = t_eval.last() else {
        return Ok(Trajectory::default());
    };

    let field = DrivenLorenzField::new(*params, forcing);
    let (states, stats) = ode::integrate(&field, initial_state, t_eval, t_bound, settings)?;

    tracing::debug!(
        samples = states.len(),
        accepted = stats.accepted,
        rejected = stats.rejected,
        "receiver synchronized"
    );

    Ok(Trajectory::new(t_eval.to_vec(), states))
}
