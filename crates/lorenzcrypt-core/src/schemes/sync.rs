//! Drive-response synchronization scheme.
//!
//! The sender transmits `me = u + m`. The receiver feeds `me` into its own
//! driven Lorenz copy, whose first state `ur` converges towards `u` because
//! the message is small against the carrier, and recovers `mr = me - ur`.
//! No key is shared; only the Lorenz parameters must match approximately.

use super::{EncryptionScheme, SchemeKind};
use crate::{
    carrier::Component,
    error::{SignalError, SyncError},
    interp::CubicSpline,
    key::{LorenzParams, SolverSettings, State},
    receiver::synchronize_receiver_with,
    signal::{ScalarSignal, zip_with},
};

/// Receiver initial state used when none is given.
const DEFAULT_RECEIVER_STATE: State = [25.0, 6.0, 50.0];

/// Synchronization scheme with its receiver configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynchronizationScheme {
    receiver_state: State,
    params: LorenzParams,
    settings: SolverSettings,
}

impl SynchronizationScheme {
    /// Scheme whose receiver starts at `receiver_state`.
    pub fn new(receiver_state: State, params: LorenzParams, settings: SolverSettings) -> Self {
        Self { receiver_state, params, settings }
    }

    /// Initial state of the receiver.
    pub fn receiver_state(&self) -> State {
        self.receiver_state
    }

    /// Lorenz parameters of the receiver.
    pub fn params(&self) -> &LorenzParams {
        &self.params
    }

    /// Run the receiver driven by `encrypted` and return its first state.
    ///
    /// # Errors
    ///
    /// - `Signal(_)`: `times` and `encrypted` differ in length or `times`
    ///   is not strictly increasing
    /// - `Integration(_)`: the receiver could not be integrated
    pub fn reconstruct_carrier(
        &self,
        encrypted: &[f64],
        times: &[f64],
    ) -> Result<ScalarSignal, SyncError> {
        let spline = CubicSpline::new(times, encrypted)?;
        tracing::debug!(knots = spline.len(), "reconstructing carrier from wire signal");
        let trajectory = synchronize_receiver_with(
            self.receiver_state,
            times,
            &spline,
            &self.params,
            &self.settings,
        )?;
        Ok(trajectory.component(Component::U))
    }

    /// Reconstruct the carrier from `encrypted` and subtract it.
    pub fn recover(&self, encrypted: &[f64], times: &[f64]) -> Result<ScalarSignal, SyncError> {
        let ur = self.reconstruct_carrier(encrypted, times)?;
        Ok(sync_decrypt(encrypted, &ur)?)
    }
}

impl Default for SynchronizationScheme {
    fn default() -> Self {
        Self::new(DEFAULT_RECEIVER_STATE, LorenzParams::default(), SolverSettings::default())
    }
}

impl EncryptionScheme for SynchronizationScheme {
    fn kind(&self) -> SchemeKind {
        SchemeKind::Synchronization
    }

    fn encrypt(&self, carrier: &[f64], message: &[f64]) -> Result<ScalarSignal, SignalError> {
        sync_encrypt(carrier, message)
    }

    /// `side_info` is the receiver's reconstructed carrier, see
    /// [`SynchronizationScheme::reconstruct_carrier`].
    fn decrypt(&self, encrypted: &[f64], side_info: &[f64]) -> Result<ScalarSignal, SignalError> {
        sync_decrypt(encrypted, side_info)
    }
}

/// `me = u + m`.
pub fn sync_encrypt(u: &[f64], m: &[f64]) -> Result<ScalarSignal, SignalError> {
    zip_with("sync_encrypt", u, m, |u, m| u + m)
}

/// `mr = me - ur`, with `ur` the synchronized receiver's first state.
pub fn sync_decrypt(me: &[f64], ur: &[f64]) -> Result<ScalarSignal, SignalError> {
    zip_with("sync_decrypt", me, ur, |me, ur| me - ur)
}
