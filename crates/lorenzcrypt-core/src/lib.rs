//! Lorenz Chaotic Carrier Message Hiding
//!
//! Message hiding on a Lorenz strange-attractor carrier. Pure functions over
//! immutable values: equal inputs give bit-identical outputs, and nothing is
//! shared between calls.
//!
//! # Pipeline
//!
//! ```text
//! CarrierKey
//!      │ solve_carrier
//!      ▼
//! Trajectory ── u(t) ──┐
//!                      ▼
//! message m(t) ──► encrypt ──► me(t) (wire) ──► attack ──► estimate
//!                                  │
//!                                  ▼
//!              decrypt (carrier or synchronized receiver) ──► mr(t)
//! ```
//!
//! # Schemes
//!
//! Synchronization:
//! - `me = u + m`, `mr = me - ur`
//! - `ur` comes from a receiver driven by `me`; no key is shared
//! - Recovery is approximate, limited by the synchronization error
//!
//! PCE-Addition:
//! - `me = u + m`, `mr = me - u`
//! - Both ends regenerate `u` from the same [`CarrierKey`]
//!
//! PCE-Convolution:
//! - `me = IFFT(FFT(u) FFT(m))`, `mr = IFFT(FFT(me) / (FFT(u) + epsilon))`
//! - Spreads the message over the carrier spectrum, which defeats the
//!   high-pass [`attack()`] far better than addition
//!
//! # Security
//!
//! None beyond the empirical resistance to spectral filtering. There is no
//! key derivation and no authentication.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod attack;
pub mod carrier;
pub mod error;
pub mod interp;
pub mod key;
pub mod message;
pub mod metrics;
pub mod ode;
pub mod receiver;
pub mod schemes;
pub mod signal;
pub mod spectral;

pub use attack::{SpectralAdversary, attack};
pub use carrier::{Component, LorenzField, TimeGrid, Trajectory, solve_carrier};
pub use error::{IntegrationError, KeyCodecError, KeyError, SignalError, SyncError};
pub use interp::{CubicSpline, Forcing};
pub use key::{CarrierKey, CarrierKeyBuilder, LorenzParams, SolverMethod, SolverSettings, State};
pub use message::{TextCodec, monochromatic};
pub use receiver::{DrivenLorenzField, synchronize_receiver, synchronize_receiver_with};
pub use schemes::{
    EncryptionScheme, PceAddition, PceConvolution, SchemeKind, SynchronizationScheme,
    pce_add_decrypt, pce_add_encrypt, pce_convolve_decrypt, pce_convolve_encrypt, sync_decrypt,
    sync_encrypt,
};
pub use signal::ScalarSignal;
pub use spectral::{SpectralConditioning, SpectralResidue};
