//! Pathline tracing: particle trajectories through the velocity field
//!
//! Seeds are placed on the cylinder circumference and advected forward by
//! solving dx/dt = u(x, y), dy/dt = v(x, y) with an [`OdeIntegrator`].
//! Each seed is an independent initial-value problem: a solver failure on
//! one seed is collected into the run's failure list and never touches the
//! other trajectories.

use std::f64::consts::TAU;

use super::field::{NVec2, VelocityField};
use super::integrator::{Derivative, OdeIntegrator, SolverError};
use super::params::Parameters;

/// One particle's positions, one per output time, immutable once built
#[derive(Debug, Clone)]
pub struct Trajectory {
    pub seed: NVec2,          // initial position
    pub positions: Vec<NVec2>, // position at each output time, positions[0] == seed
}

/// A seed whose integration did not complete
#[derive(Debug, Clone)]
pub struct SeedFailure {
    pub seed_index: usize,
    pub seed: NVec2,
    pub error: SolverError,
}

/// Result of tracing all seeds: completed trajectories plus any per-seed
/// failures, in seed order
#[derive(Debug, Clone)]
pub struct PathlineRun {
    pub trajectories: Vec<Trajectory>,
    pub failures: Vec<SeedFailure>,
}

/// Adapts a [`VelocityField`] to the solver's [`Derivative`] interface
/// The field is autonomous, so the time argument is unused
struct FieldDerivative<'a, F: VelocityField> {
    field: &'a F,
}

impl<F: VelocityField> Derivative for FieldDerivative<'_, F> {
    fn derivative(&self, _t: f64, y: NVec2) -> NVec2 {
        self.field.velocity(y.x, y.y)
    }
}

/// Default seed layout: `n_seeds` angles evenly spaced over [0, 2pi]
/// inclusive of both endpoints (so the first and last seed coincide),
/// at radius D/2 on the cylinder surface
pub fn seed_positions(params: &Parameters) -> Vec<NVec2> {
    let n = params.n_seeds;
    let r = params.cylinder_radius();

    if n == 1 {
        return vec![NVec2::new(r, 0.0)];
    }

    (0..n)
        .map(|i| {
            let theta = TAU * i as f64 / (n as f64 - 1.0);
            NVec2::new(r * theta.cos(), r * theta.sin())
        })
        .collect()
}

/// Output time vector: T/dt samples spanning [0, T] inclusive
/// A horizon shorter than one step degenerates to the single sample t = 0
/// rather than dividing by zero
pub fn time_vector(params: &Parameters) -> Vec<f64> {
    let steps = params.n_time_samples();
    if steps < 2 {
        return vec![0.0];
    }
    (0..steps)
        .map(|i| params.t_end * i as f64 / (steps as f64 - 1.0))
        .collect()
}

/// Trace one trajectory per seed through `field` at the given output times
pub fn trace_pathlines(
    field: &impl VelocityField,
    solver: &dyn OdeIntegrator,
    seeds: &[NVec2],
    times: &[f64],
) -> PathlineRun {
    let deriv = FieldDerivative { field };

    let mut trajectories = Vec::with_capacity(seeds.len());
    let mut failures = Vec::new();

    for (i, &seed) in seeds.iter().enumerate() {
        match solver.integrate(&deriv, seed, times) {
            Ok(positions) => trajectories.push(Trajectory { seed, positions }),
            Err(error) => failures.push(SeedFailure {
                seed_index: i,
                seed,
                error,
            }),
        }
    }

    PathlineRun {
        trajectories,
        failures,
    }
}
