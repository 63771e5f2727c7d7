//! Chaotic carrier generation from a [`CarrierKey`].
//!
//! The sender's carrier is the Lorenz system
//!
//! ```text
//! du/dt = a(v - u)
//! dv/dt = r*u - v - u*w
//! dw/dt = u*v - b*w
//! ```
//!
//! integrated with the key's adaptive method and resampled on the uniform
//! half-open grid `t0, t0 + dt, ... < t1`.

use crate::{
    error::IntegrationError,
    key::{CarrierKey, LorenzParams, State},
    ode::{self, VectorField},
    signal::ScalarSignal,
};

/// Autonomous Lorenz vector field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LorenzField {
    params: LorenzParams,
}

impl LorenzField {
    /// Field for the given parameters.
    pub fn new(params: LorenzParams) -> Self {
        Self { params }
    }
}

impl VectorField for LorenzField {
    fn derivative(&self, _t: f64, state: &State) -> State {
        let [u, v, w] = *state;
        let (a, b, r) = (self.params.a(), self.params.b(), self.params.r());
        [a * (v - u), r * u - v - u * w, u * v - b * w]
    }
}

/// Uniform half-open time grid `[start, end)` with spacing `step`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeGrid {
    start: f64,
    step: f64,
    len: usize,
}

impl TimeGrid {
    /// Grid over `[t_span.0, t_span.1)`.
    ///
    /// An empty span (`t1 <= t0`), a non-positive step or non-finite bounds
    /// give an empty grid rather than an error.
    pub fn new(t_span: (f64, f64), dt: f64) -> Self {
        let (t0, t1) = t_span;
        let valid = t0.is_finite() && t1.is_finite() && dt.is_finite() && dt > 0.0 && t1 > t0;
        if !valid {
            return Self { start: t0, step: dt, len: 0 };
        }

        let mut len = ((t1 - t0) / dt).ceil() as usize;
        while len > 0 && t0 + (len - 1) as f64 * dt >= t1 {
            len -= 1;
        }
        Self { start: t0, step: dt, len }
    }

    /// First grid time.
    pub fn start(&self) -> f64 {
        self.start
    }

    /// Grid spacing.
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Number of grid points.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the grid has no points.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Time of grid point `index`.
    pub fn at(&self, index: usize) -> f64 {
        self.start + index as f64 * self.step
    }

    /// All grid times.
    pub fn times(&self) -> Vec<f64> {
        (0..self.len).map(|i| self.at(i)).collect()
    }
}

/// One of the three Lorenz state variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    /// First variable, the transmitted carrier
    U,
    /// Second variable
    V,
    /// Third variable
    W,
}

impl Component {
    fn index(self) -> usize {
        match self {
            Self::U => 0,
            Self::V => 1,
            Self::W => 2,
        }
    }
}

/// Time-ordered `(time, state)` samples.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trajectory {
    times: Vec<f64>,
    states: Vec<State>,
}

impl Trajectory {
    pub(crate) fn new(times: Vec<f64>, states: Vec<State>) -> Self {
        debug_assert_eq!(times.len(), states.len());
        Self { times, states }
    }

    /// Sample times.
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// States, one per sample time.
    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Whether the trajectory has no samples.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// One state variable as a scalar signal.
    pub fn component(&self, component: Component) -> ScalarSignal {
        let index = component.index();
        self.states.iter().map(|state| state[index]).collect()
    }

    /// The transmitted carrier `u(t)`.
    pub fn carrier(&self) -> ScalarSignal {
        self.component(Component::U)
    }

    /// Largest absolute componentwise difference to another trajectory over
    /// samples with `time > after`.
    ///
    /// Returns `None` when lengths differ or no sample qualifies.
    pub fn max_deviation_after(&self, other: &Trajectory, after: f64) -> Option<f64> {
        if self.len() != other.len() {
            return None;
        }
        self.times
            .iter()
            .zip(self.states.iter().zip(other.states.iter()))
            .filter(|(t, _)| **t > after)
            .map(|(_, (a, b))| (0..3).map(|i| (a[i] - b[i]).abs()).fold(0.0, f64::max))
            .reduce(f64::max)
    }
}

/// Integrate the carrier described by `key` over `[t_span.0, t_span.1)`.
///
/// The first sample equals `key.initial_state()` exactly. Equal keys and
/// grids always give bit-identical trajectories. An empty span or a
/// non-positive `dt` gives an empty trajectory.
pub fn solve_carrier(
    key: &CarrierKey,
    t_span: (f64, f64),
    dt: f64,
) -> Result<Trajectory, IntegrationError> {
    let grid = TimeGrid::new(t_span, dt);
    if grid.is_empty() {
        return Ok(Trajectory::default());
    }

    let times = grid.times();
    let field = LorenzField::new(*key.params());
    let (states, stats) =
        ode::integrate(&field, key.initial_state(), &times, t_span.1, key.solver())?;

    tracing::debug!(
        samples = states.len(),
        method = %key.solver().method(),
        accepted = stats.accepted,
        rejected = stats.rejected,
        "carrier solved"
    );

    Ok(Trajectory::new(times, states))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivative_at_unit_state() {
        let field = LorenzField::new(LorenzParams::default());
        let d = field.derivative(0.0, &[1.0, 1.0, 1.0]);
        assert_eq!(d[0], 0.0);
        assert_eq!(d[1], 26.0);
        assert!((d[2] - (1.0 - 8.0 / 3.0)).abs() < 1e-15);
    }

    #[test]
    fn origin_is_fixed_point() {
        let field = LorenzField::new(LorenzParams::default());
        assert_eq!(field.derivative(3.0, &[0.0; 3]), [0.0; 3]);
    }

    #[test]
    fn grid_is_half_open() {
        let grid = TimeGrid::new((0.0, 1.0), 0.1);
        assert_eq!(grid.len(), 10);
        assert!(grid.times().iter().all(|&t| t < 1.0));
        assert!((grid.at(9) - 0.9).abs() < 1e-12);
    }

    #[test]
    fn grid_matches_arange_layout() {
        let grid = TimeGrid::new((2.0, 3.0), 0.25);
        assert_eq!(grid.times(), vec![2.0, 2.25, 2.5, 2.75]);
    }

    #[test]
    fn degenerate_spans_give_empty_grids() {
        assert!(TimeGrid::new((1.0, 1.0), 0.1).is_empty());
        assert!(TimeGrid::new((2.0, 1.0), 0.1).is_empty());
        assert!(TimeGrid::new((0.0, 1.0), 0.0).is_empty());
        assert!(TimeGrid::new((0.0, 1.0), -0.1).is_empty());
        assert!(TimeGrid::new((0.0, f64::NAN), 0.1).is_empty());
    }

    #[test]
    fn empty_span_gives_empty_trajectory() {
        let key = CarrierKey::builder(&[5.0, 5.0, 5.0]).build().unwrap();
        assert!(solve_carrier(&key, (1.0, 0.0), 0.01).unwrap().is_empty());
        assert!(solve_carrier(&key, (0.0, 1.0), 0.0).unwrap().is_empty());
    }

    #[test]
    fn output_shape_and_initial_state() {
        let key = CarrierKey::builder(&[5.0, 5.0, 5.0]).build().unwrap();
        let trajectory = solve_carrier(&key, (0.0, 1.0), 0.1).unwrap();

        assert_eq!(trajectory.len(), 10);
        assert_eq!(trajectory.states()[0], [5.0, 5.0, 5.0]);
        assert_eq!(trajectory.times(), TimeGrid::new((0.0, 1.0), 0.1).times().as_slice());
        assert_eq!(trajectory.carrier().len(), 10);
    }

    #[test]
    fn components_select_state_columns() {
        let trajectory = Trajectory::new(vec![0.0, 1.0], vec![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        assert_eq!(trajectory.component(Component::U).as_slice(), &[1.0, 4.0]);
        assert_eq!(trajectory.component(Component::V).as_slice(), &[2.0, 5.0]);
        assert_eq!(trajectory.component(Component::W).as_slice(), &[3.0, 6.0]);
    }

    #[test]
    fn max_deviation_after_skips_transient() {
        let a = Trajectory::new(vec![0.0, 1.0, 2.0], vec![[0.0; 3], [0.0; 3], [0.0; 3]]);
        let b = Trajectory::new(vec![0.0, 1.0, 2.0], vec![[9.0; 3], [0.0, 0.5, 0.0], [0.0, 0.0, -0.25]]);
        assert_eq!(a.max_deviation_after(&b, 0.5), Some(0.5));
        assert_eq!(a.max_deviation_after(&b, 1.5), Some(0.25));
        assert_eq!(a.max_deviation_after(&b, 2.0), None);
    }
}
