//! Key-independent spectral adversary.
//!
//! The Lorenz carrier concentrates its energy at low frequencies. An
//! eavesdropper who knows only that removes every bin with
//! `|f| <= cutoff` from the intercepted signal and keeps what is left as
//! the message estimate.

use crate::{error::SignalError, signal::ScalarSignal, spectral};

/// High-pass adversary with a fixed cutoff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectralAdversary {
    /// Highest removed frequency, in cycles per time unit
    pub cutoff_hz: f64,
}

impl SpectralAdversary {
    /// Adversary removing everything at or below `cutoff_hz`.
    pub fn new(cutoff_hz: f64) -> Self {
        Self { cutoff_hz }
    }

    /// Estimate the message hidden in `signal`, sampled every `dt`.
    pub fn estimate(&self, signal: &[f64], dt: f64) -> Result<ScalarSignal, SignalError> {
        attack(signal, dt, self.cutoff_hz)
    }
}

/// Zero every DFT bin with `|f| <= cutoff_freq` and return the real part of
/// the inverse transform.
///
/// # Errors
///
/// `InvalidSampleSpacing` if `dt` is not finite and positive.
pub fn attack(signal: &[f64], dt: f64, cutoff_freq: f64) -> Result<ScalarSignal, SignalError> {
    if !(dt.is_finite() && dt > 0.0) {
        return Err(SignalError::InvalidSampleSpacing { dt });
    }
    if signal.is_empty() {
        return Ok(ScalarSignal::default());
    }

    let mut spectrum = spectral::forward(signal);
    let freqs = spectral::fft_frequencies(signal.len(), dt);
    let mut removed = 0usize;
    for (bin, freq) in spectrum.iter_mut().zip(freqs) {
        if freq.abs() <= cutoff_freq {
            *bin = Default::default();
            removed += 1;
        }
    }
    let (estimate, _) = spectral::inverse(spectrum);

    tracing::debug!(bins = signal.len(), removed, cutoff_freq, "high-pass attack applied");

    Ok(estimate.into())
}
