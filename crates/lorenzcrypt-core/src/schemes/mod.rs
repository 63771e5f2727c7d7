//! Message hiding schemes.
//!
//! Every scheme hides a message signal in a chaotic carrier of the same
//! length and recovers it from the wire signal plus side information:
//!
//! | scheme | side information for [`EncryptionScheme::decrypt`] |
//! |---|---|
//! | [`SynchronizationScheme`] | first state of a synchronized receiver |
//! | [`PceAddition`] | the identical carrier |
//! | [`PceConvolution`] | the identical carrier |
//!
//! All operations reject operands of different length before touching a
//! sample.

mod addition;
mod convolution;
mod sync;

use std::fmt;

pub use addition::{PceAddition, pce_add_decrypt, pce_add_encrypt};
pub use convolution::{
    DEFAULT_EPSILON, Deconvolution, PceConvolution, pce_convolve_decrypt,
    pce_convolve_decrypt_with_residue, pce_convolve_encrypt,
};
pub use sync::{SynchronizationScheme, sync_decrypt, sync_encrypt};

use crate::{error::SignalError, signal::ScalarSignal};

/// The three supported schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemeKind {
    /// Drive-response synchronization
    Synchronization,
    /// Perfect chaotic encryption by addition
    PceAddition,
    /// Perfect chaotic encryption by spectral convolution
    PceConvolution,
}

impl SchemeKind {
    /// Every scheme.
    pub const ALL: [Self; 3] = [Self::Synchronization, Self::PceAddition, Self::PceConvolution];

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Synchronization => "synchronization",
            Self::PceAddition => "pce-addition",
            Self::PceConvolution => "pce-convolution",
        }
    }

    /// Whether decryption needs the identical carrier (a shared key).
    pub fn requires_shared_key(self) -> bool {
        !matches!(self, Self::Synchronization)
    }
}

impl fmt::Display for SchemeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Encrypt and decrypt over equal-length scalar signals.
pub trait EncryptionScheme {
    /// Which scheme this is.
    fn kind(&self) -> SchemeKind;

    /// Hide `message` in `carrier`.
    ///
    /// # Errors
    ///
    /// `LengthMismatch` if the operands differ in length.
    fn encrypt(&self, carrier: &[f64], message: &[f64]) -> Result<ScalarSignal, SignalError>;

    /// Recover the message from `encrypted` using the scheme's side
    /// information.
    ///
    /// # Errors
    ///
    /// `LengthMismatch` if the operands differ in length.
    fn decrypt(&self, encrypted: &[f64], side_info: &[f64]) -> Result<ScalarSignal, SignalError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_synchronization_works_without_key() {
        let keyless: Vec<_> =
            SchemeKind::ALL.into_iter().filter(|kind| !kind.requires_shared_key()).collect();
        assert_eq!(keyless, vec![SchemeKind::Synchronization]);
    }

    #[test]
    fn schemes_report_their_kind() {
        let schemes: [&dyn EncryptionScheme; 3] = [
            &SynchronizationScheme::default(),
            &PceAddition,
            &PceConvolution::default(),
        ];
        let kinds: Vec<_> = schemes.iter().map(|s| s.kind()).collect();
        assert_eq!(kinds, SchemeKind::ALL.to_vec());
    }

    #[test]
    fn every_scheme_rejects_mismatched_lengths() {
        let schemes: [&dyn EncryptionScheme; 3] = [
            &SynchronizationScheme::default(),
            &PceAddition,
            &PceConvolution::default(),
        ];
        for scheme in schemes {
            assert!(scheme.encrypt(&[1.0, 2.0], &[1.0]).is_err(), "{}", scheme.kind());
            assert!(scheme.decrypt(&[1.0], &[1.0, 2.0]).is_err(), "{}", scheme.kind());
        }
    }
}
