//! Scalar figures of merit for experiment reports.
//!
//! Nothing here feeds back into encryption or decryption.

use crate::{
    error::SignalError,
    signal::ensure_same_len,
    spectral::{self, fft_frequencies},
};

/// Root-mean-square difference `sqrt(mean((a - b)^2))`, 0 for empty inputs.
pub fn rms_error(a: &[f64], b: &[f64]) -> Result<f64, SignalError> {
    ensure_same_len("rms_error", a, b)?;
    if a.is_empty() {
        return Ok(0.0);
    }
    let sum: f64 = a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum();
    Ok((sum / a.len() as f64).sqrt())
}

/// Pearson correlation coefficient.
///
/// `None` when either input is empty or constant, where correlation is
/// undefined.
pub fn pearson_correlation(a: &[f64], b: &[f64]) -> Result<Option<f64>, SignalError> {
    ensure_same_len("pearson_correlation", a, b)?;
    if a.is_empty() {
        return Ok(None);
    }

    let n = a.len() as f64;
    let mean_a = a.iter().sum::<f64>() / n;
    let mean_b = b.iter().sum::<f64>() / n;

    let (mut cov, mut var_a, mut var_b) = (0.0, 0.0, 0.0);
    for (x, y) in a.iter().zip(b.iter()) {
        let (dx, dy) = (x - mean_a, y - mean_b);
        cov += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }

    let denom = (var_a * var_b).sqrt();
    if denom == 0.0 || !denom.is_finite() {
        return Ok(None);
    }
    Ok(Some((cov / denom).clamp(-1.0, 1.0)))
}

/// One bin of a magnitude spectrum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectrumBin {
    /// Frequency in cycles per time unit
    pub frequency: f64,
    /// Absolute value of the DFT coefficient
    pub magnitude: f64,
}

/// Magnitude spectrum of `signal` sorted by ascending frequency.
pub fn spectrum(signal: &[f64], dt: f64) -> Result<Vec<SpectrumBin>, SignalError> {
    if !(dt.is_finite() && dt > 0.0) {
        return Err(SignalError::InvalidSampleSpacing { dt });
    }
    let mut bins: Vec<SpectrumBin> = fft_frequencies(signal.len(), dt)
        .into_iter()
        .zip(spectral::forward(signal))
        .map(|(frequency, z)| SpectrumBin { frequency, magnitude: z.norm() })
        .collect();
    bins.sort_by(|a, b| a.frequency.total_cmp(&b.frequency));
    Ok(bins)
}

/// Non-negative frequency carrying the most energy, ignoring DC.
///
/// `None` for signals too short to have a non-DC bin or with no energy.
pub fn dominant_frequency(signal: &[f64], dt: f64) -> Result<Option<f64>, SignalError> {
    let peak = spectrum(signal, dt)?
        .into_iter()
        .filter(|bin| bin.frequency > 0.0 && bin.magnitude > 0.0)
        .max_by(|a, b| a.magnitude.total_cmp(&b.magnitude));
    Ok(peak.map(|bin| bin.frequency))
}

/// Percentage of positions where the two texts carry the same character.
///
/// Texts of different character count score 0. Two empty texts score 100.
pub fn text_fidelity(original: &str, recovered: &str) -> f64 {
    let len = original.chars().count();
    if len != recovered.chars().count() {
        return 0.0;
    }
    if len == 0 {
        return 100.0;
    }
    let matches = original.chars().zip(recovered.chars()).filter(|(a, b)| a == b).count();
    matches as f64 / len as f64 * 100.0
}
