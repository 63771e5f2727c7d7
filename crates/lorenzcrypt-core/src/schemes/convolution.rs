//! Perfect chaotic encryption by spectral convolution.
//!
//! ```text
//! me = Re IFFT(FFT(u) * FFT(m))
//! mr = Re IFFT(FFT(me) / (FFT(u) + epsilon))
//! ```
//!
//! The convolution is circular. Decryption divides by the carrier spectrum,
//! so the message content of any carrier bin near zero is lost. Such bins are
//! reported through [`SpectralConditioning`], a large imaginary part after the
//! inverse transform through [`SpectralResidue`]. Either logs a warning.

use super::{EncryptionScheme, SchemeKind};
use crate::{
    error::SignalError,
    signal::{ScalarSignal, ensure_same_len},
    spectral::{self, SpectralConditioning, SpectralResidue},
};

/// Default regularization added to the carrier spectrum before dividing.
pub const DEFAULT_EPSILON: f64 = 1e-15;

/// Spectral convolution with a shared carrier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PceConvolution {
    /// Regularization added to every carrier bin on decrypt
    pub epsilon: f64,
}

impl PceConvolution {
    /// Scheme with a custom regularization constant.
    pub fn with_epsilon(epsilon: f64) -> Self {
        Self { epsilon }
    }
}

impl Default for PceConvolution {
    fn default() -> Self {
        Self { epsilon: DEFAULT_EPSILON }
    }
}

impl EncryptionScheme for PceConvolution {
    fn kind(&self) -> SchemeKind {
        SchemeKind::PceConvolution
    }

    fn encrypt(&self, carrier: &[f64], message: &[f64]) -> Result<ScalarSignal, SignalError> {
        pce_convolve_encrypt(carrier, message)
    }

    fn decrypt(&self, encrypted: &[f64], carrier: &[f64]) -> Result<ScalarSignal, SignalError> {
        pce_convolve_decrypt(encrypted, carrier, self.epsilon)
    }
}

/// Recovered message together with the numerical health of the division.
#[derive(Debug, Clone, PartialEq)]
pub struct Deconvolution {
    /// Real part of the inverse transform
    pub message: ScalarSignal,
    /// Size of the discarded imaginary part
    pub residue: SpectralResidue,
    /// Bin magnitudes of the regularized carrier spectrum
    pub conditioning: SpectralConditioning,
}

impl Deconvolution {
    /// Returns true if `message` cannot be trusted: a carrier bin was too
    /// small to divide by, or the imaginary residue was not round-off.
    pub fn is_anomalous(&self) -> bool {
        self.conditioning.is_ill_conditioned() || self.residue.is_anomalous()
    }
}

/// `me = Re IFFT(FFT(u) * FFT(m))`.
pub fn pce_convolve_encrypt(u: &[f64], m: &[f64]) -> Result<ScalarSignal, SignalError> {
    ensure_same_len("pce_convolve_encrypt", u, m)?;

    let mut spectrum = spectral::forward(u);
    for (bin, message_bin) in spectrum.iter_mut().zip(spectral::forward(m)) {
        *bin *= message_bin;
    }
    let (me, _) = spectral::inverse(spectrum);
    Ok(me.into())
}

/// `mr = Re IFFT(FFT(me) / (FFT(u) + epsilon))`.
///
/// Logs a warning if the carrier spectrum is ill conditioned or the
/// discarded imaginary part is not round-off.
pub fn pce_convolve_decrypt(
    me: &[f64],
    u: &[f64],
    epsilon: f64,
) -> Result<ScalarSignal, SignalError> {
    Ok(pce_convolve_decrypt_with_residue(me, u, epsilon)?.message)
}

/// Like [`pce_convolve_decrypt`], also returning the residue and the carrier
/// conditioning.
pub fn pce_convolve_decrypt_with_residue(
    me: &[f64],
    u: &[f64],
    epsilon: f64,
) -> Result<Deconvolution, SignalError> {
    ensure_same_len("pce_convolve_decrypt", me, u)?;

    let divisor: Vec<_> = spectral::forward(u).into_iter().map(|bin| bin + epsilon).collect();
    let conditioning = SpectralConditioning::measure(&divisor);
    if conditioning.is_ill_conditioned() {
        tracing::warn!(
            min_magnitude = conditioning.min_magnitude,
            max_magnitude = conditioning.max_magnitude,
            epsilon,
            "carrier spectrum has near-zero bins, their message content is lost"
        );
    }

    let mut spectrum = spectral::forward(me);
    for (bin, carrier_bin) in spectrum.iter_mut().zip(divisor) {
        *bin /= carrier_bin;
    }
    let (message, residue) = spectral::inverse(spectrum);

    if residue.is_anomalous() {
        tracing::warn!(
            max_imag = residue.max_imag,
            max_real = residue.max_real,
            epsilon,
            "deconvolution left a large imaginary residue, using real part"
        );
    }

    Ok(Deconvolution { message: message.into(), residue, conditioning })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convolving_with_unit_impulse_is_identity() {
        let impulse = [1.0, 0.0, 0.0, 0.0, 0.0];
        let m = [0.5, -1.0, 2.0, 0.0, 3.0];
        let me = pce_convolve_encrypt(&impulse, &m).unwrap();
        for (a, b) in me.iter().zip(m.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn convolution_is_circular() {
        // Delay by one sample wraps the last sample to the front
        let delay = [0.0, 1.0, 0.0, 0.0];
        let m = [1.0, 2.0, 3.0, 4.0];
        let me = pce_convolve_encrypt(&delay, &m).unwrap();
        let expected = [4.0, 1.0, 2.0, 3.0];
        for (a, b) in me.iter().zip(expected.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn round_trip_with_well_conditioned_carrier() {
        let u = [3.0, 1.0, -0.5, 0.25, 2.0, 0.75];
        let m = [0.0, 0.1, 0.2, -0.3, 0.0, 0.05];
        let me = pce_convolve_encrypt(&u, &m).unwrap();

        let out = pce_convolve_decrypt_with_residue(&me, &u, DEFAULT_EPSILON).unwrap();
        assert!(!out.is_anomalous());
        assert_eq!(out.conditioning.bins, 6);
        for (a, b) in out.message.iter().zip(m.iter()) {
            assert!((a - b).abs() < 1e-10);
        }
    }

    #[test]
    fn zero_mean_carrier_is_flagged() {
        // Alternating carrier has no DC component, so the message mean is lost
        let u: Vec<f64> = (0..64).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        let m: Vec<f64> = (0..64).map(|i| 0.3 + 0.01 * f64::from(i)).collect();
        let me = pce_convolve_encrypt(&u, &m).unwrap();

        let out = pce_convolve_decrypt_with_residue(&me, &u, DEFAULT_EPSILON).unwrap();
        assert!(out.conditioning.is_ill_conditioned());
        assert!(out.is_anomalous());
        // Division stays Hermitian, so the residue alone cannot see the loss
        assert!(!out.residue.is_anomalous());

        let worst = out.message.iter().zip(&m).map(|(a, b)| (a - b).abs()).fold(0.0, f64::max);
        assert!(worst > 0.1);
    }

    #[test]
    fn exact_zero_bin_divides_into_epsilon() {
        let u = [1.0, -1.0, 1.0, -1.0];
        let me = [1.0, 0.0, 0.0, 0.0];
        let out = pce_convolve_decrypt_with_residue(&me, &u, 1e-15).unwrap();
        assert!(out.residue.max_real > 1e10);
        assert!(out.conditioning.min_magnitude < 1e-12);
        assert!(out.is_anomalous());
    }

    #[test]
    fn empty_signals_are_not_errors() {
        assert!(pce_convolve_encrypt(&[], &[]).unwrap().is_empty());
        assert!(pce_convolve_decrypt(&[], &[], DEFAULT_EPSILON).unwrap().is_empty());
    }

    #[test]
    fn rejects_mismatched_lengths() {
        assert!(matches!(
            pce_convolve_encrypt(&[1.0, 2.0], &[1.0]),
            Err(SignalError::LengthMismatch { operation: "pce_convolve_encrypt", .. })
        ));
        assert!(matches!(
            pce_convolve_decrypt(&[1.0], &[1.0, 2.0], DEFAULT_EPSILON),
            Err(SignalError::LengthMismatch { operation: "pce_convolve_decrypt", .. })
        ));
    }
}
