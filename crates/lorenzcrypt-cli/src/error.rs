//! Experiment errors.

use lorenzcrypt_core::{IntegrationError, KeyError, SignalError, SyncError};
use thiserror::Error;

/// Reasons an experiment run can fail.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExperimentError {
    /// Carrier key or solver configuration is invalid
    #[error("invalid configuration: {0}")]
    Config(#[from] KeyError),

    /// The time span and spacing produce fewer than two samples
    #[error("time grid [{t_start}, {t_end}) with dt {dt} has fewer than two samples")]
    EmptyTimeGrid {
        /// Start of the span
        t_start: f64,
        /// End of the span
        t_end: f64,
        /// Sample spacing
        dt: f64,
    },

    /// Carrier integration failed
    #[error("carrier integration failed: {0}")]
    Carrier(#[from] IntegrationError),

    /// Receiver synchronization failed
    #[error("receiver synchronization failed: {0}")]
    Receiver(#[from] SyncError),

    /// A signal operation rejected its operands
    #[error("signal contract violated: {0}")]
    Signal(#[from] SignalError),
}

impl ExperimentError {
    /// Returns true if the error comes from the configuration rather than
    /// from the numerics.
    ///
    /// Configuration errors never succeed on retry with the same settings.
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::Config(_) | Self::EmptyTimeGrid { .. })
    }
}
