//! Carrier keys: validated, immutable descriptions of a Lorenz oscillator.
//!
//! A [`CarrierKey`] pins down everything that influences the generated
//! carrier: the initial state, the physical parameters, the integration
//! method and its tolerances. Two parties holding equal keys regenerate
//! bit-identical carriers, which is the shared secret the PCE schemes rely
//! on. Because the Lorenz system amplifies a 1-ULP difference exponentially,
//! the solver choice is part of the key rather than ambient configuration.
//!
//! Keys are only obtainable through [`CarrierKeyBuilder::build`] or CBOR
//! decoding, both of which validate. An invalid key cannot be represented.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{KeyCodecError, KeyError};

/// State vector `[u, v, w]` of a Lorenz oscillator.
pub type State = [f64; 3];

/// Canonical Prandtl number `a` of the chaotic regime.
pub const DEFAULT_A: f64 = 10.0;

/// Canonical geometric factor `b` of the chaotic regime.
pub const DEFAULT_B: f64 = 8.0 / 3.0;

/// Canonical Rayleigh number `r` of the chaotic regime.
pub const DEFAULT_R: f64 = 28.0;

/// Default relative and absolute solver tolerance.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Adaptive embedded Runge-Kutta integration methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SolverMethod {
    /// Dormand-Prince 5(4)
    #[default]
    #[serde(rename = "RK45")]
    Rk45,
    /// Bogacki-Shampine 3(2)
    #[serde(rename = "RK23")]
    Rk23,
}

impl SolverMethod {
    /// Every supported method.
    pub const ALL: [Self; 2] = [Self::Rk45, Self::Rk23];

    /// Canonical method name as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            Self::Rk45 => "RK45",
            Self::Rk23 => "RK23",
        }
    }
}

impl fmt::Display for SolverMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SolverMethod {
    type Err = KeyError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|method| method.name() == name)
            .ok_or_else(|| KeyError::UnsupportedMethod { name: name.to_string() })
    }
}

/// Physical parameters `(a, b, r)` of the Lorenz equations.
///
/// # Invariants
///
/// - All three parameters are finite and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LorenzParams {
    a: f64,
    b: f64,
    r: f64,
}

impl LorenzParams {
    /// Validate and create a parameter set.
    pub fn new(a: f64, b: f64, r: f64) -> Result<Self, KeyError> {
        positive_parameter("a", a)?;
        positive_parameter("b", b)?;
        positive_parameter("r", r)?;
        Ok(Self { a, b, r })
    }

    /// Prandtl number.
    pub fn a(&self) -> f64 {
        self.a
    }

    /// Geometric factor.
    pub fn b(&self) -> f64 {
        self.b
    }

    /// Rayleigh number.
    pub fn r(&self) -> f64 {
        self.r
    }
}

impl Default for LorenzParams {
    fn default() -> Self {
        Self { a: DEFAULT_A, b: DEFAULT_B, r: DEFAULT_R }
    }
}

/// Integration method and error tolerances.
///
/// # Invariants
///
/// - `rtol` and `atol` are finite and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverSettings {
    method: SolverMethod,
    rtol: f64,
    atol: f64,
}

impl SolverSettings {
    /// Validate and create solver settings.
    pub fn new(method: SolverMethod, rtol: f64, atol: f64) -> Result<Self, KeyError> {
        positive_tolerance("rtol", rtol)?;
        positive_tolerance("atol", atol)?;
        Ok(Self { method, rtol, atol })
    }

    /// Integration method.
    pub fn method(&self) -> SolverMethod {
        self.method
    }

    /// Relative tolerance.
    pub fn rtol(&self) -> f64 {
        self.rtol
    }

    /// Absolute tolerance.
    pub fn atol(&self) -> f64 {
        self.atol
    }
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self { method: SolverMethod::Rk45, rtol: DEFAULT_TOLERANCE, atol: DEFAULT_TOLERANCE }
    }
}

/// Shared secret from which sender and receiver regenerate the carrier.
///
/// Serializes to a flat document (`initial_state`, `a`, `b`, `r`, `method`,
/// `rtol`, `atol`). Deserialization validates exactly like the builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCarrierKey", into = "RawCarrierKey")]
pub struct CarrierKey {
    initial_state: State,
    params: LorenzParams,
    solver: SolverSettings,
}

impl CarrierKey {
    /// Start building a key from its initial state.
    ///
    /// The slice length is checked by [`CarrierKeyBuilder::build`].
    pub fn builder(initial_state: &[f64]) -> CarrierKeyBuilder {
        CarrierKeyBuilder::new(initial_state)
    }

    /// Initial state `[u0, v0, w0]`.
    pub fn initial_state(&self) -> State {
        self.initial_state
    }

    /// Lorenz parameters.
    pub fn params(&self) -> &LorenzParams {
        &self.params
    }

    /// Integration method and tolerances.
    pub fn solver(&self) -> &SolverSettings {
        &self.solver
    }

    /// Encode the key as CBOR for transfer to the receiving party.
    pub fn to_cbor(&self) -> Result<Vec<u8>, KeyCodecError> {
        let mut bytes = Vec::new();
        ciborium::into_writer(self, &mut bytes)
            .map_err(|e| KeyCodecError::Encode { reason: e.to_string() })?;
        Ok(bytes)
    }

    /// Decode and validate a CBOR-encoded key.
    pub fn from_cbor(bytes: &[u8]) -> Result<Self, KeyCodecError> {
        ciborium::from_reader(bytes).map_err(|e| KeyCodecError::Decode { reason: e.to_string() })
    }
}

/// Step-by-step construction of a [`CarrierKey`].
///
/// Parameters not set explicitly take the canonical chaotic-regime defaults
/// (`a = 10`, `b = 8/3`, `r = 28`, RK45, `rtol = atol = 1e-6`).
#[derive(Debug, Clone)]
pub struct CarrierKeyBuilder {
    initial_state: Vec<f64>,
    a: f64,
    b: f64,
    r: f64,
    method: MethodChoice,
    rtol: f64,
    atol: f64,
}

#[derive(Debug, Clone)]
enum MethodChoice {
    Known(SolverMethod),
    Named(String),
}

impl CarrierKeyBuilder {
    fn new(initial_state: &[f64]) -> Self {
        Self {
            initial_state: initial_state.to_vec(),
            a: DEFAULT_A,
            b: DEFAULT_B,
            r: DEFAULT_R,
            method: MethodChoice::Known(SolverMethod::default()),
            rtol: DEFAULT_TOLERANCE,
            atol: DEFAULT_TOLERANCE,
        }
    }

    /// Set all three Lorenz parameters.
    #[must_use]
    pub fn params(mut self, a: f64, b: f64, r: f64) -> Self {
        self.a = a;
        self.b = b;
        self.r = r;
        self
    }

    /// Set the Prandtl number `a`.
    #[must_use]
    pub fn a(mut self, a: f64) -> Self {
        self.a = a;
        self
    }

    /// Set the geometric factor `b`.
    #[must_use]
    pub fn b(mut self, b: f64) -> Self {
        self.b = b;
        self
    }

    /// Set the Rayleigh number `r`.
    #[must_use]
    pub fn r(mut self, r: f64) -> Self {
        self.r = r;
        self
    }

    /// Select the integration method.
    #[must_use]
    pub fn method(mut self, method: SolverMethod) -> Self {
        self.method = MethodChoice::Known(method);
        self
    }

    /// Select the integration method by name (`"RK45"`, `"RK23"`).
    ///
    /// Unknown names are reported by [`build`](Self::build).
    #[must_use]
    pub fn method_name(mut self, name: &str) -> Self {
        self.method = MethodChoice::Named(name.to_string());
        self
    }

    /// Set the relative tolerance.
    #[must_use]
    pub fn rtol(mut self, rtol: f64) -> Self {
        self.rtol = rtol;
        self
    }

    /// Set the absolute tolerance.
    #[must_use]
    pub fn atol(mut self, atol: f64) -> Self {
        self.atol = atol;
        self
    }

    /// Validate everything and produce the key.
    ///
    /// Checks run in a fixed order: initial state shape, initial state
    /// finiteness, method, tolerances, Lorenz parameters. The first
    /// violation is returned.
    pub fn build(self) -> Result<CarrierKey, KeyError> {
        let initial_state: State = self
            .initial_state
            .as_slice()
            .try_into()
            .map_err(|_| KeyError::InvalidInitialState { len: self.initial_state.len() })?;
        if let Some(index) = initial_state.iter().position(|x| !x.is_finite()) {
            return Err(KeyError::NonFiniteInitialState { index });
        }

        let method = match self.method {
            MethodChoice::Known(method) => method,
            MethodChoice::Named(name) => name.parse()?,
        };
        let solver = SolverSettings::new(method, self.rtol, self.atol)?;
        let params = LorenzParams::new(self.a, self.b, self.r)?;

        Ok(CarrierKey { initial_state, params, solver })
    }
}

/// Wire form of a key. Never handed out unvalidated.
#[derive(Serialize, Deserialize)]
struct RawCarrierKey {
    initial_state: Vec<f64>,
    a: f64,
    b: f64,
    r: f64,
    method: String,
    rtol: f64,
    atol: f64,
}

impl TryFrom<RawCarrierKey> for CarrierKey {
    type Error = KeyError;

    fn try_from(raw: RawCarrierKey) -> Result<Self, Self::Error> {
        CarrierKey::builder(&raw.initial_state)
            .params(raw.a, raw.b, raw.r)
            .method_name(&raw.method)
            .rtol(raw.rtol)
            .atol(raw.atol)
            .build()
    }
}

impl From<CarrierKey> for RawCarrierKey {
    fn from(key: CarrierKey) -> Self {
        Self {
            initial_state: key.initial_state.to_vec(),
            a: key.params.a,
            b: key.params.b,
            r: key.params.r,
            method: key.solver.method.name().to_string(),
            rtol: key.solver.rtol,
            atol: key.solver.atol,
        }
    }
}

fn positive_parameter(name: &'static str, value: f64) -> Result<(), KeyError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(KeyError::NonPositiveParameter { name, value })
    }
}

fn positive_tolerance(name: &'static str, value: f64) -> Result<(), KeyError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(KeyError::NonPositiveTolerance { name, value })
    }
}
