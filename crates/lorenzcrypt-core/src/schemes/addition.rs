//! Perfect chaotic encryption by addition.
//!
//! `me = u + m`, `mr = me - u`. Exact as long as both ends hold the same
//! carrier, which requires the same [`crate::CarrierKey`].

use super::{EncryptionScheme, SchemeKind};
use crate::{
    error::SignalError,
    signal::{ScalarSignal, zip_with},
};

/// Additive masking with a shared carrier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PceAddition;

impl EncryptionScheme for PceAddition {
    fn kind(&self) -> SchemeKind {
        SchemeKind::PceAddition
    }

    fn encrypt(&self, carrier: &[f64], message: &[f64]) -> Result<ScalarSignal, SignalError> {
        pce_add_encrypt(carrier, message)
    }

    fn decrypt(&self, encrypted: &[f64], carrier: &[f64]) -> Result<ScalarSignal, SignalError> {
        pce_add_decrypt(encrypted, carrier)
    }
}

/// `me = u + m`.
pub fn pce_add_encrypt(u: &[f64], m: &[f64]) -> Result<ScalarSignal, SignalError> {
    zip_with("pce_add_encrypt", u, m, |u, m| u + m)
}

/// `mr = me - u`, with `u` the identical carrier used to encrypt.
pub fn pce_add_decrypt(me: &[f64], u: &[f64]) -> Result<ScalarSignal, SignalError> {
    zip_with("pce_add_decrypt", me, u, |me, u| me - u)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_and_unmasks() {
        let u = [10.0, -3.0, 0.5];
        let m = [0.25, 0.5, -0.125];
        let me = pce_add_encrypt(&u, &m).unwrap();
        assert_eq!(me.as_slice(), &[10.25, -2.5, 0.375]);
        assert_eq!(pce_add_decrypt(&me, &u).unwrap().as_slice(), &m);
    }

    #[test]
    fn wrong_carrier_does_not_recover() {
        let m = [1.0, 1.0];
        let me = pce_add_encrypt(&[5.0, 6.0], &m).unwrap();
        let mr = pce_add_decrypt(&me, &[5.0, 6.5]).unwrap();
        assert_ne!(mr.as_slice(), &m);
    }

    #[test]
    fn mismatch_names_operation() {
        let err = pce_add_decrypt(&[1.0, 2.0], &[1.0]).unwrap_err();
        assert_eq!(
            err,
            SignalError::LengthMismatch { operation: "pce_add_decrypt", expected: 2, actual: 1 }
        );
    }
}
