//! Lorenzcrypt experiment binary.
//!
//! # Usage
//!
//! ```bash
//! # Reference scenario
//! lorenzcrypt
//!
//! # Short run with a custom message, exporting the sender key
//! lorenzcrypt --t-end 20 --dt 0.01 --message-center 10 --text "Hi" --export-key key.cbor
//! ```

use std::path::PathBuf;

use clap::Parser;
use lorenzcrypt_cli::{ExperimentConfig, run_experiment};
use lorenzcrypt_core::{
    KeyError, State,
    key::{DEFAULT_A, DEFAULT_B, DEFAULT_R, DEFAULT_TOLERANCE},
    schemes::DEFAULT_EPSILON,
};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Chaotic carrier message hiding experiment
#[derive(Parser, Debug)]
#[command(name = "lorenzcrypt")]
#[command(about = "Compare Lorenz carrier encryption schemes against a spectral adversary")]
#[command(version)]
struct Args {
    /// Sender initial state u0,v0,w0
    #[arg(long, value_delimiter = ',', default_value = "5,5,5")]
    sender_state: Vec<f64>,

    /// Receiver initial state of the synchronization scheme
    #[arg(long, value_delimiter = ',', default_value = "25,6,50")]
    receiver_state: Vec<f64>,

    /// Lorenz parameter a
    #[arg(long, default_value_t = DEFAULT_A)]
    a: f64,

    /// Lorenz parameter b
    #[arg(long, default_value_t = DEFAULT_B)]
    b: f64,

    /// Lorenz parameter r
    #[arg(long, default_value_t = DEFAULT_R)]
    r: f64,

    /// Integration method (RK45 or RK23)
    #[arg(short, long, default_value = "RK45")]
    method: String,

    /// Relative solver tolerance
    #[arg(long, default_value_t = DEFAULT_TOLERANCE)]
    rtol: f64,

    /// Absolute solver tolerance
    #[arg(long, default_value_t = DEFAULT_TOLERANCE)]
    atol: f64,

    /// Start of the time span
    #[arg(long, default_value_t = 0.0)]
    t_start: f64,

    /// End of the time span (exclusive)
    #[arg(long, default_value_t = 200.0)]
    t_end: f64,

    /// Sample spacing
    #[arg(long, default_value_t = 0.001)]
    dt: f64,

    /// Amplitude of the monochromatic burst
    #[arg(long, default_value_t = 1.0)]
    amplitude: f64,

    /// Angular frequency of the monochromatic burst
    #[arg(long, default_value_t = 10.0)]
    omega: f64,

    /// Burst center and text start time
    #[arg(long, default_value_t = 100.0)]
    message_center: f64,

    /// Attack cutoff frequency in Hz
    #[arg(long, default_value_t = 35.0)]
    cutoff_hz: f64,

    /// Text message to hide
    #[arg(short, long, default_value = "Hello World!")]
    text: String,

    /// Samples per text character
    #[arg(long, default_value_t = 100)]
    steps_per_symbol: usize,

    /// Convolution decrypt regularization
    #[arg(long, default_value_t = DEFAULT_EPSILON)]
    epsilon: f64,

    /// Write the sender key as CBOR to this path
    #[arg(long)]
    export_key: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn config(&self) -> Result<ExperimentConfig, KeyError> {
        Ok(ExperimentConfig {
            sender_state: state_arg(&self.sender_state)?,
            receiver_state: state_arg(&self.receiver_state)?,
            a: self.a,
            b: self.b,
            r: self.r,
            method: self.method.clone(),
            rtol: self.rtol,
            atol: self.atol,
            t_start: self.t_start,
            t_end: self.t_end,
            dt: self.dt,
            amplitude: self.amplitude,
            omega: self.omega,
            message_center: self.message_center,
            cutoff_hz: self.cutoff_hz,
            text: self.text.clone(),
            steps_per_symbol: self.steps_per_symbol,
            epsilon: self.epsilon,
        })
    }
}

fn state_arg(values: &[f64]) -> Result<State, KeyError> {
    State::try_from(values).map_err(|_| KeyError::InvalidInitialState { len: values.len() })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    let config = args.config()?;
    tracing::info!(
        method = %config.method,
        t_end = config.t_end,
        dt = config.dt,
        "lorenzcrypt starting"
    );

    if let Some(path) = &args.export_key {
        let key = config.carrier_key()?;
        std::fs::write(path, key.to_cbor()?)?;
        tracing::info!(path = %path.display(), "sender key exported");
    }

    let report = run_experiment(&config)?;
    report.log();

    Ok(())
}
