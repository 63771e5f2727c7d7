//! Property-based tests for the encryption schemes
//!
//! These tests verify the algebraic contracts of every scheme:
//!
//! 1. **Round-trip**: decrypt(encrypt(u, m), u) == m for the PCE schemes
//! 2. **Shape validation**: every operation rejects unequal lengths
//! 3. **Regularization**: convolution decrypt recovers the message for both
//!    tiny and moderate epsilon when the carrier spectrum has no near-zero bin
//! 4. **Conditioning**: a zero-mean carrier loses the message mean and the
//!    decrypt flags it

use lorenzcrypt_core::{
    CarrierKey, EncryptionScheme, PceAddition, PceConvolution, ScalarSignal, SignalError,
    pce_add_decrypt, pce_add_encrypt, pce_convolve_decrypt, pce_convolve_encrypt,
    schemes::{DEFAULT_EPSILON, pce_convolve_decrypt_with_residue},
    solve_carrier, sync_decrypt, sync_encrypt,
};
use proptest::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

type BinaryOp = fn(&[f64], &[f64]) -> Result<ScalarSignal, SignalError>;

fn convolve_decrypt_default(me: &[f64], u: &[f64]) -> Result<ScalarSignal, SignalError> {
    pce_convolve_decrypt(me, u, DEFAULT_EPSILON)
}

const OPERATIONS: [(&str, BinaryOp); 6] = [
    ("sync_encrypt", sync_encrypt),
    ("sync_decrypt", sync_decrypt),
    ("pce_add_encrypt", pce_add_encrypt),
    ("pce_add_decrypt", pce_add_decrypt),
    ("pce_convolve_encrypt", pce_convolve_encrypt),
    ("pce_convolve_decrypt", convolve_decrypt_default),
];

/// Broadband carrier with a strong DC offset, so no spectral bin is near zero.
fn synthetic_carrier(len: usize, seed: u64) -> Vec<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..len).map(|_| 3.0 + rng.gen_range(-1.0..1.0)).collect()
}

fn synthetic_message(len: usize, seed: u64) -> Vec<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..len).map(|_| rng.gen_range(-0.5..0.5)).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_pce_add_roundtrip(
        pairs in prop::collection::vec((-50.0f64..50.0, -5.0f64..5.0), 0..200),
    ) {
        let (u, m): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();

        let me = pce_add_encrypt(&u, &m).unwrap();
        let mr = pce_add_decrypt(&me, &u).unwrap();

        prop_assert_eq!(mr.len(), m.len());
        for ((recovered, original), carrier) in mr.iter().zip(&m).zip(&u) {
            let bound = 4.0 * f64::EPSILON * (carrier.abs() + original.abs());
            prop_assert!((recovered - original).abs() <= bound);
        }
    }

    #[test]
    fn prop_every_operation_rejects_unequal_lengths(
        left in 0usize..64,
        right in 0usize..64,
    ) {
        prop_assume!(left != right);
        let a = vec![1.0; left];
        let b = vec![2.0; right];

        for (name, op) in OPERATIONS {
            let err = op(&a, &b).unwrap_err();
            prop_assert_eq!(
                err,
                SignalError::LengthMismatch { operation: name, expected: left, actual: right }
            );
        }
    }

    #[test]
    fn prop_zero_mean_carrier_is_flagged(
        half in 1usize..100,
        seed in any::<u64>(),
    ) {
        let mut u = synthetic_message(2 * half, seed);
        let mean = u.iter().sum::<f64>() / u.len() as f64;
        for sample in &mut u {
            *sample -= mean;
        }
        let m = synthetic_carrier(2 * half, seed.wrapping_add(1));

        let me = pce_convolve_encrypt(&u, &m).unwrap();
        let out = pce_convolve_decrypt_with_residue(&me, &u, DEFAULT_EPSILON).unwrap();
        prop_assert!(out.is_anomalous());
    }

    #[test]
    fn prop_pce_convolve_roundtrip(
        len in 1usize..300,
        seed in any::<u64>(),
    ) {
        let u = synthetic_carrier(len, seed);
        let m = synthetic_message(len, seed.wrapping_add(1));

        let me = pce_convolve_encrypt(&u, &m).unwrap();
        for epsilon in [1e-15, 1e-10] {
            let mr = pce_convolve_decrypt(&me, &u, epsilon).unwrap();
            for (recovered, original) in mr.iter().zip(&m) {
                prop_assert!((recovered - original).abs() < 1e-8);
            }
        }
    }
}

#[test]
fn convolution_roundtrip_on_long_carrier() {
    let u = synthetic_carrier(4096, 7);
    let m = synthetic_message(4096, 8);
    let me = pce_convolve_encrypt(&u, &m).unwrap();

    for epsilon in [1e-15, 1e-10] {
        let out = pce_convolve_decrypt_with_residue(&me, &u, epsilon).unwrap();
        assert!(!out.is_anomalous(), "epsilon {epsilon}: {:?}", out.conditioning);
        let worst = out.message.iter().zip(&m).map(|(a, b)| (a - b).abs()).fold(0.0, f64::max);
        assert!(worst < 1e-8, "epsilon {epsilon}: error {worst}");
    }
}

#[test]
fn addition_roundtrip_on_lorenz_carrier_is_exact() {
    let key = CarrierKey::builder(&[5.0, 5.0, 5.0]).build().unwrap();
    let u = solve_carrier(&key, (0.0, 20.0), 0.01).unwrap().carrier();
    let m = synthetic_message(u.len(), 3);

    let scheme = PceAddition;
    let me = scheme.encrypt(&u, &m).unwrap();
    let mr = scheme.decrypt(&me, &u).unwrap();
    let worst = mr.iter().zip(&m).map(|(a, b)| (a - b).abs()).fold(0.0, f64::max);
    assert!(worst < 1e-13);
}

#[test]
fn convolution_needs_the_identical_carrier() {
    let u = synthetic_carrier(512, 11);
    let wrong = synthetic_carrier(512, 12);
    let m = synthetic_message(512, 13);

    let scheme = PceConvolution::default();
    let me = scheme.encrypt(&u, &m).unwrap();
    let garbled = scheme.decrypt(&me, &wrong).unwrap();
    let worst = garbled.iter().zip(&m).map(|(a, b)| (a - b).abs()).fold(0.0, f64::max);
    assert!(worst > 1e-3);
}

#[test]
fn zero_message_encrypts_to_silence() {
    let u = synthetic_carrier(64, 5);
    let me = pce_convolve_encrypt(&u, &[0.0; 64]).unwrap();
    assert!(me.peak() < 1e-12);
}
