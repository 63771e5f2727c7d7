//! Error types for carrier construction, signal contracts and integration.
//!
//! Configuration errors ([`KeyError`]) surface when a [`crate::CarrierKey`] is
//! built, never later. Contract errors ([`SignalError`]) surface before any
//! sample is processed. Numerical anomalies are not errors; see
//! [`crate::spectral::SpectralResidue`].

use thiserror::Error;

/// Errors raised while constructing a carrier key.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KeyError {
    /// Initial state does not have exactly three components
    #[error("initial state must have exactly 3 components [u0, v0, w0], got {len}")]
    InvalidInitialState {
        /// Number of components supplied
        len: usize,
    },

    /// Initial state contains NaN or an infinity
    #[error("initial state component {index} must be finite")]
    NonFiniteInitialState {
        /// Index of the offending component
        index: usize,
    },

    /// Integration method name is not one of the supported solvers
    #[error("unsupported integration method {name:?}: must be one of RK45, RK23")]
    UnsupportedMethod {
        /// Name that was requested
        name: String,
    },

    /// Lorenz parameter is zero, negative or not finite
    #[error("lorenz parameter {name} must be positive, got {value}")]
    NonPositiveParameter {
        /// Parameter name (`a`, `b` or `r`)
        name: &'static str,
        /// Rejected value
        value: f64,
    },

    /// Solver tolerance is zero, negative or not finite
    #[error("tolerance {name} must be positive, got {value}")]
    NonPositiveTolerance {
        /// Tolerance name (`rtol` or `atol`)
        name: &'static str,
        /// Rejected value
        value: f64,
    },
}

/// Errors raised while exchanging a carrier key as CBOR.
#[derive(Error, Debug)]
pub enum KeyCodecError {
    /// Serialization failed
    #[error("key encoding failed: {reason}")]
    Encode {
        /// Underlying encoder message
        reason: String,
    },

    /// Bytes are not a well-formed key document
    #[error("key decoding failed: {reason}")]
    Decode {
        /// Underlying decoder message
        reason: String,
    },
}

/// Contract violations on scalar signals and time grids.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SignalError {
    /// Two operands of a binary signal operation differ in length
    #[error("{operation}: signal length mismatch (expected {expected}, got {actual})")]
    LengthMismatch {
        /// Operation that rejected its operands
        operation: &'static str,
        /// Length of the reference operand
        expected: usize,
        /// Length of the offending operand
        actual: usize,
    },

    /// Sample spacing is zero, negative or not finite
    #[error("sample spacing must be positive and finite, got {dt}")]
    InvalidSampleSpacing {
        /// Rejected spacing
        dt: f64,
    },

    /// Sample times are not strictly increasing
    #[error("sample times must be strictly increasing (violated at index {index})")]
    NonIncreasingTimes {
        /// First index whose time does not exceed its predecessor
        index: usize,
    },
}

/// Failures of the adaptive integrator itself.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IntegrationError {
    /// Step size control shrank the step below the representable minimum
    #[error("step size underflow at t = {t} (step {step:e})")]
    StepSizeUnderflow {
        /// Time at which integration stalled
        t: f64,
        /// Last attempted step
        step: f64,
    },

    /// Requested evaluation times go backwards or are not finite
    #[error("evaluation times must be finite and non-decreasing (violated at index {index})")]
    NonIncreasingEvalTimes {
        /// First offending index
        index: usize,
    },
}

/// Errors from the drive-response receiver.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyncError {
    /// Forcing signal or evaluation grid violates its contract
    #[error(transparent)]
    Signal(#[from] SignalError),

    /// Integration of the receiver failed
    #[error(transparent)]
    Integration(#[from] IntegrationError),
}

impl SyncError {
    /// Returns true if the caller passed malformed inputs.
    ///
    /// Contract violations never succeed on retry. Integration failures
    /// depend on the forcing signal and solver settings.
    pub fn is_contract_violation(&self) -> bool {
        match self {
            Self::Signal(_) => true,
            Self::Integration(IntegrationError::NonIncreasingEvalTimes { .. }) => true,
            Self::Integration(IntegrationError::StepSizeUnderflow { .. }) => false,
        }
    }
}
