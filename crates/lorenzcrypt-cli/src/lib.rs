//! Experiment runner for chaotic-carrier message hiding.
//!
//! Generates one Lorenz carrier, hides a monochromatic burst and a text
//! message in it with each of the three schemes, decrypts them the
//! legitimate way and attacks the wire signal with a spectral high-pass
//! adversary. The resulting [`ExperimentReport`] summarizes decryption
//! accuracy and attack success per scheme.
//!
//! # Example
//!
//! ```no_run
//! use lorenzcrypt_cli::{ExperimentConfig, run_experiment};
//!
//! let config = ExperimentConfig { t_end: 20.0, dt: 0.01, ..Default::default() };
//! let report = run_experiment(&config)?;
//! report.log();
//! # Ok::<(), lorenzcrypt_cli::ExperimentError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod experiment;

pub use config::ExperimentConfig;
pub use error::ExperimentError;
pub use experiment::{
    ExperimentReport, MessageKind, SchemeReport, SpectrumSummary, run_experiment,
};
