//! Discrete Fourier transform helpers shared by the convolution scheme, the
//! spectral adversary and the reporting metrics.
//!
//! [`inverse`] normalizes by `1/n`, so `inverse(forward(x))` reproduces `x`.

use rustfft::{FftPlanner, num_complex::Complex64};

/// Largest imaginary residue, relative to `max(max_real, 1)`, still treated
/// as round-off after an inverse transform.
pub const RESIDUE_TOLERANCE: f64 = 1e-6;

/// Size of the imaginary part left over by an inverse transform whose
/// result is expected to be real.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpectralResidue {
    /// Largest absolute imaginary component
    pub max_imag: f64,
    /// Largest absolute real component
    pub max_real: f64,
}

impl SpectralResidue {
    /// Measure the residue of a complex buffer.
    pub fn measure(values: &[Complex64]) -> Self {
        values.iter().fold(Self::default(), |acc, z| Self {
            max_imag: acc.max_imag.max(z.im.abs()),
            max_real: acc.max_real.max(z.re.abs()),
        })
    }

    /// Returns true if the imaginary residue is too large to be round-off.
    ///
    /// A non-finite residue is always anomalous.
    pub fn is_anomalous(&self) -> bool {
        let bound = RESIDUE_TOLERANCE * self.max_real.max(1.0);
        !(self.max_imag.is_finite() && self.max_real.is_finite()) || self.max_imag > bound
    }
}

/// Smallest bin magnitude, relative to the largest, that a spectrum may
/// have and still be divided into without losing that bin's content.
pub const CONDITION_TOLERANCE: f64 = 1e-9;

/// Spread of bin magnitudes of a spectrum used as a divisor.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpectralConditioning {
    /// Number of bins measured
    pub bins: usize,
    /// Smallest bin magnitude
    pub min_magnitude: f64,
    /// Largest bin magnitude
    pub max_magnitude: f64,
}

impl SpectralConditioning {
    /// Measure the bin magnitudes of `spectrum`.
    ///
    /// A NaN bin makes both extremes NaN.
    pub fn measure(spectrum: &[Complex64]) -> Self {
        let mut min_magnitude = f64::INFINITY;
        let mut max_magnitude = 0.0_f64;
        for z in spectrum {
            let magnitude = z.norm();
            if magnitude.is_nan() {
                let bins = spectrum.len();
                return Self { bins, min_magnitude: f64::NAN, max_magnitude: f64::NAN };
            }
            min_magnitude = min_magnitude.min(magnitude);
            max_magnitude = max_magnitude.max(magnitude);
        }
        if spectrum.is_empty() {
            return Self::default();
        }
        Self { bins: spectrum.len(), min_magnitude, max_magnitude }
    }

    /// `min_magnitude / max_magnitude`, or 0 for an all-zero spectrum.
    pub fn ratio(&self) -> f64 {
        if self.max_magnitude > 0.0 { self.min_magnitude / self.max_magnitude } else { 0.0 }
    }

    /// Returns true if some bin is too small, relative to the largest, for
    /// division by it to be meaningful.
    ///
    /// An empty spectrum is well conditioned; a non-finite one never is.
    pub fn is_ill_conditioned(&self) -> bool {
        if self.bins == 0 {
            return false;
        }
        !(self.min_magnitude.is_finite() && self.max_magnitude.is_finite())
            || self.min_magnitude <= CONDITION_TOLERANCE * self.max_magnitude
    }
}

/// Forward DFT of a real signal.
pub fn forward(signal: &[f64]) -> Vec<Complex64> {
    let mut buffer: Vec<Complex64> = signal.iter().map(|&x| Complex64::new(x, 0.0)).collect();
    if buffer.is_empty() {
        return buffer;
    }
    let fft = FftPlanner::<f64>::new().plan_fft_forward(buffer.len());
    fft.process(&mut buffer);
    buffer
}

/// Normalized inverse DFT, returning the real part and the discarded
/// imaginary residue.
pub fn inverse(mut spectrum: Vec<Complex64>) -> (Vec<f64>, SpectralResidue) {
    if spectrum.is_empty() {
        return (Vec::new(), SpectralResidue::default());
    }
    let n = spectrum.len();
    let fft = FftPlanner::<f64>::new().plan_fft_inverse(n);
    fft.process(&mut spectrum);

    let scale = 1.0 / n as f64;
    for z in &mut spectrum {
        *z *= scale;
    }
    let residue = SpectralResidue::measure(&spectrum);
    (spectrum.iter().map(|z| z.re).collect(), residue)
}

/// Sample frequencies of an `n`-point DFT with spacing `dt`.
///
/// Layout `[0, 1, ..., ceil(n/2) - 1, -floor(n/2), ..., -1] / (n * dt)`.
pub fn fft_frequencies(n: usize, dt: f64) -> Vec<f64> {
    let scale = 1.0 / (n as f64 * dt);
    let positive = n.div_ceil(2);
    (0..n)
        .map(|k| if k < positive { k as f64 } else { k as f64 - n as f64 })
        .map(|k| k * scale)
        .collect()
}
