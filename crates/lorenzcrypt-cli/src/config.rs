//! Experiment configuration.

use lorenzcrypt_core::{
    CarrierKey, KeyError, LorenzParams, SolverMethod, SolverSettings, State, TimeGrid,
    key::{DEFAULT_A, DEFAULT_B, DEFAULT_R, DEFAULT_TOLERANCE},
    schemes::DEFAULT_EPSILON,
};

/// Everything one experiment run depends on.
///
/// `Default` reproduces the reference scenario: sender `[5, 5, 5]`, receiver
/// `[25, 6, 50]`, `t` in `[0, 200)` with `dt = 0.001`, a burst of amplitude 1
/// at `omega = 10` centered on `t = 100`, cutoff 35 and the text
/// `"Hello World!"` at 100 samples per character.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentConfig {
    /// Sender initial state (the shared secret of the PCE schemes)
    pub sender_state: State,
    /// Receiver initial state of the synchronization scheme
    pub receiver_state: State,
    /// Lorenz parameter `a`
    pub a: f64,
    /// Lorenz parameter `b`
    pub b: f64,
    /// Lorenz parameter `r`
    pub r: f64,
    /// Integration method name (`RK45` or `RK23`)
    pub method: String,
    /// Relative solver tolerance
    pub rtol: f64,
    /// Absolute solver tolerance
    pub atol: f64,
    /// Start of the time span
    pub t_start: f64,
    /// End of the time span (exclusive)
    pub t_end: f64,
    /// Sample spacing
    pub dt: f64,
    /// Amplitude of the monochromatic burst
    pub amplitude: f64,
    /// Angular frequency of the monochromatic burst
    pub omega: f64,
    /// Center of the burst and start of the text message
    pub message_center: f64,
    /// Attack cutoff frequency
    pub cutoff_hz: f64,
    /// Text message
    pub text: String,
    /// Samples per text character
    pub steps_per_symbol: usize,
    /// Convolution decrypt regularization
    pub epsilon: f64,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            sender_state: [5.0, 5.0, 5.0],
            receiver_state: [25.0, 6.0, 50.0],
            a: DEFAULT_A,
            b: DEFAULT_B,
            r: DEFAULT_R,
            method: SolverMethod::default().name().to_string(),
            rtol: DEFAULT_TOLERANCE,
            atol: DEFAULT_TOLERANCE,
            t_start: 0.0,
            t_end: 200.0,
            dt: 0.001,
            amplitude: 1.0,
            omega: 10.0,
            message_center: 100.0,
            cutoff_hz: 35.0,
            text: "Hello World!".to_string(),
            steps_per_symbol: 100,
            epsilon: DEFAULT_EPSILON,
        }
    }
}

impl ExperimentConfig {
    /// Validated sender key.
    pub fn carrier_key(&self) -> Result<CarrierKey, KeyError> {
        CarrierKey::builder(&self.sender_state)
            .params(self.a, self.b, self.r)
            .method_name(&self.method)
            .rtol(self.rtol)
            .atol(self.atol)
            .build()
    }

    /// Lorenz parameters shared by sender and receiver.
    pub fn lorenz_params(&self) -> Result<LorenzParams, KeyError> {
        LorenzParams::new(self.a, self.b, self.r)
    }

    /// Receiver solver settings, matching the sender's.
    pub fn solver_settings(&self) -> Result<SolverSettings, KeyError> {
        SolverSettings::new(self.method.parse()?, self.rtol, self.atol)
    }

    /// Sampling grid of every signal in the run.
    pub fn time_grid(&self) -> TimeGrid {
        TimeGrid::new((self.t_start, self.t_end), self.dt)
    }
}
