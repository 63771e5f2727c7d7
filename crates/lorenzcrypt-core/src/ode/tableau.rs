//! Butcher tableaus of the embedded Runge-Kutta pairs.
//!
//! `e` holds the error-estimator weights over all stages plus the FSAL stage
//! `f(t + h, y_new)`, so `err = h * sum(e[j] * k[j])`.

use crate::key::{SolverMethod, State};

use super::VectorField;

/// Coefficients of one embedded pair.
pub(crate) struct Tableau {
    pub(crate) c: &'static [f64],
    pub(crate) a: &'static [&'static [f64]],
    pub(crate) b: &'static [f64],
    pub(crate) e: &'static [f64],
    /// Order of the embedded error estimate
    pub(crate) error_order: i32,
}

/// Dormand-Prince 5(4).
const RK45: Tableau = Tableau {
    c: &[0.0, 1.0 / 5.0, 3.0 / 10.0, 4.0 / 5.0, 8.0 / 9.0, 1.0],
    a: &[
        &[],
        &[1.0 / 5.0],
        &[3.0 / 40.0, 9.0 / 40.0],
        &[44.0 / 45.0, -56.0 / 15.0, 32.0 / 9.0],
        &[19372.0 / 6561.0, -25360.0 / 2187.0, 64448.0 / 6561.0, -212.0 / 729.0],
        &[9017.0 / 3168.0, -355.0 / 33.0, 46732.0 / 5247.0, 49.0 / 176.0, -5103.0 / 18656.0],
    ],
    b: &[35.0 / 384.0, 0.0, 500.0 / 1113.0, 125.0 / 192.0, -2187.0 / 6784.0, 11.0 / 84.0],
    e: &[
        -71.0 / 57600.0,
        0.0,
        71.0 / 16695.0,
        -71.0 / 1920.0,
        17253.0 / 339200.0,
        -22.0 / 525.0,
        1.0 / 40.0,
    ],
    error_order: 4,
};

/// Bogacki-Shampine 3(2).
const RK23: Tableau = Tableau {
    c: &[0.0, 1.0 / 2.0, 3.0 / 4.0],
    a: &[&[], &[1.0 / 2.0], &[0.0, 3.0 / 4.0]],
    b: &[2.0 / 9.0, 1.0 / 3.0, 4.0 / 9.0],
    e: &[5.0 / 72.0, -1.0 / 12.0, -1.0 / 9.0, 1.0 / 8.0],
    error_order: 2,
};

impl SolverMethod {
    pub(crate) fn tableau(self) -> &'static Tableau {
        match self {
            Self::Rk45 => &RK45,
            Self::Rk23 => &RK23,
        }
    }
}

/// Result of one trial step.
pub(crate) struct Step {
    pub(crate) y: State,
    pub(crate) f: State,
    pub(crate) error: State,
}

impl Tableau {
    /// Number of stages excluding the FSAL evaluation.
    fn stages(&self) -> usize {
        self.b.len()
    }

    /// Advance `y` by `h` from `t`, given `f = field(t, y)`.
    pub(crate) fn step<F: VectorField + ?Sized>(
        &self,
        field: &F,
        t: f64,
        y: &State,
        f: &State,
        h: f64,
    ) -> Step {
        let stages = self.stages();
        // At most 7 slopes (six DP5 stages plus FSAL)
        let mut k = [[0.0; 3]; 7];
        k[0] = *f;

        for s in 1..stages {
            let mut y_stage = *y;
            for (i, component) in y_stage.iter_mut().enumerate() {
                let mut dy = 0.0;
                for (j, a) in self.a[s].iter().enumerate() {
                    dy += a * k[j][i];
                }
                *component += h * dy;
            }
            k[s] = field.derivative(t + self.c[s] * h, &y_stage);
        }

        let mut y_new = *y;
        for (i, component) in y_new.iter_mut().enumerate() {
            let mut dy = 0.0;
            for (j, b) in self.b.iter().enumerate() {
                dy += b * k[j][i];
            }
            *component += h * dy;
        }

        let f_new = field.derivative(t + h, &y_new);
        k[stages] = f_new;

        let mut error = [0.0; 3];
        for (i, component) in error.iter_mut().enumerate() {
            let mut sum = 0.0;
            for (j, e) in self.e.iter().enumerate() {
                sum += e * k[j][i];
            }
            *component = h * sum;
        }

        Step { y: y_new, f: f_new, error }
    }
}
