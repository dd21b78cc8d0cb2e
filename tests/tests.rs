use cylflow::configuration::config::{EngineConfig, IntegratorConfig, ParametersConfig, ScenarioConfig};
use cylflow::simulation::field::{CylinderFlow, NVec2, VelocityField};
use cylflow::simulation::grid::{FieldSample, Grid};
use cylflow::simulation::integrator::{CashKarp45, SolverError};
use cylflow::simulation::params::Parameters;
use cylflow::simulation::pathlines::{seed_positions, time_vector, trace_pathlines};
use cylflow::simulation::scenario::Scenario;
use cylflow::simulation::vorticity::vorticity;

use ndarray::Array2;

/// Default physics parameters for tests (Re 40, Mach 0.3, D = 1)
pub fn test_params(n_grid: usize) -> Parameters {
    Parameters {
        re: 40.0,
        mach: 0.3,
        diameter: 1.0,
        n_grid,
        dt: 0.1,
        t_end: 20.0,
        n_seeds: 10,
        atol: 1e-8,
        rtol: 1e-6,
    }
}

/// Adaptive solver matching the parameter tolerances
pub fn test_solver(p: &Parameters) -> CashKarp45 {
    CashKarp45 {
        atol: p.atol,
        rtol: p.rtol,
    }
}

/// A valid serde-facing config to perturb in validation tests
pub fn base_config() -> ScenarioConfig {
    ScenarioConfig {
        engine: EngineConfig {
            integrator: IntegratorConfig::Rk45,
            rk4_step: None,
        },
        parameters: ParametersConfig {
            re: 40.0,
            mach: 0.3,
            diameter: 1.0,
            n_grid: 100,
            dt: 0.1,
            t_end: 20.0,
            n_seeds: None,
            atol: None,
            rtol: None,
        },
    }
}

/// Closed-form vorticity of the cylinder field, for convergence checks
/// With u = Vc x f(r)/r, v = -Vc y f(r)/r and q = f/r:
///   w = -2 Vc x y q'(r) / r,  q'(r) = (2 r^2 e^(-r^2) - f) / r^2
pub fn analytic_vorticity(x: f64, y: f64, v_char: f64) -> f64 {
    let r2 = x * x + y * y;
    let r = r2.sqrt();
    let f = 1.0 - (-r2).exp();
    let qp = (2.0 * r2 * (-r2).exp() - f) / r2;
    -2.0 * v_char * x * y * qp / r
}

// ==================================================================================
// Velocity field tests
// ==================================================================================

#[test]
fn velocity_vanishes_at_origin() {
    let p = test_params(10);
    let field = CylinderFlow::new(&p);

    let vel = field.velocity(0.0, 0.0);
    assert_eq!(vel.x, 0.0, "u at the origin must be exactly zero");
    assert_eq!(vel.y, 0.0, "v at the origin must be exactly zero");
}

#[test]
fn velocity_reaches_v_char_in_far_field() {
    let p = test_params(10);
    let field = CylinderFlow::new(&p);
    let v_char = p.v_char();

    // r = 5D in a few directions
    for (x, y) in [(5.0, 0.0), (0.0, -5.0), (3.0, 4.0)] {
        let vel = field.velocity(x, y);
        let speed = vel.norm();
        assert!(
            (speed - v_char).abs() / v_char < 1e-6,
            "speed {} at ({}, {}) should be within 1e-6 of V_char {}",
            speed,
            x,
            y,
            v_char
        );
    }
}

#[test]
fn velocity_mirror_symmetry_about_x_axis() {
    let p = test_params(10);
    let field = CylinderFlow::new(&p);
    let tol = 1e-12 * p.v_char();

    for (x, y) in [(0.3, 0.7), (-1.2, 0.4), (2.0, -1.5), (0.0, 0.9)] {
        let upper = field.velocity(x, y);
        let lower = field.velocity(x, -y);
        assert!((upper.x - lower.x).abs() < tol, "u must be even in y");
        assert!((upper.y + lower.y).abs() < tol, "v must be odd in y");
    }
}

// ==================================================================================
// Grid sampler tests
// ==================================================================================

#[test]
fn sample_shape_matches_grid_shape() {
    for n in [2, 3, 10, 25] {
        let p = test_params(n);
        let field = CylinderFlow::new(&p);
        let grid = Grid::new(&p);
        let sample = grid.sample(&field);

        assert_eq!(grid.shape(), (n, n));
        assert_eq!(sample.u.dim(), (n, n));
        assert_eq!(sample.v.dim(), (n, n));
    }
}

#[test]
fn small_grid_sample_is_finite() {
    // End-to-end: N = 10, D = 1, Mach = 0.3
    let p = test_params(10);
    let field = CylinderFlow::new(&p);
    let grid = Grid::new(&p);
    let sample = grid.sample(&field);

    assert_eq!(sample.u.dim(), (10, 10));
    for (u, v) in sample.u.iter().zip(sample.v.iter()) {
        assert!(u.is_finite() && v.is_finite(), "sample contains NaN/Inf");
    }
}

#[test]
fn grid_spans_three_diameters_uniformly() {
    let p = test_params(7);
    let grid = Grid::new(&p);

    assert_eq!(grid.x[[0, 0]], -3.0);
    assert_eq!(grid.x[[0, 6]], 3.0);
    assert_eq!(grid.y[[0, 0]], -3.0);
    assert_eq!(grid.y[[6, 0]], 3.0);
    assert!((grid.spacing - 1.0).abs() < 1e-15);
}

// ==================================================================================
// Pathline integrator tests
// ==================================================================================

#[test]
fn origin_seed_stays_put() {
    let p = test_params(10);
    let field = CylinderFlow::new(&p);
    let solver = test_solver(&p);
    let times = time_vector(&p);

    let run = trace_pathlines(&field, &solver, &[NVec2::new(0.0, 0.0)], &times);

    assert!(run.failures.is_empty());
    let traj = &run.trajectories[0];
    assert_eq!(traj.positions.len(), times.len());
    for pos in &traj.positions {
        assert_eq!(pos.x, 0.0, "stagnation point must not drift");
        assert_eq!(pos.y, 0.0, "stagnation point must not drift");
    }
}

#[test]
fn boundary_seed_moves_along_local_velocity() {
    // End-to-end: seed (0.5, 0) on the cylinder boundary, t in [0, 20] step 0.1
    let p = test_params(10);
    let field = CylinderFlow::new(&p);
    let solver = test_solver(&p);
    let times = time_vector(&p);
    assert_eq!(times.len(), 200);

    let seed = NVec2::new(0.5, 0.0);
    let run = trace_pathlines(&field, &solver, &[seed], &times);

    assert!(run.failures.is_empty());
    let traj = &run.trajectories[0];
    assert_eq!(traj.positions.len(), 200);

    // Initial direction matches velocity(0.5, 0): purely +x on the axis
    let first_step = traj.positions[1] - traj.positions[0];
    assert!(first_step.x > 0.0, "particle should leave along +x");
    assert!(first_step.y.abs() < 1e-12, "no cross-axis drift on y = 0");

    // And it keeps moving outward
    let last = traj.positions[traj.positions.len() - 1];
    assert!(last.x > traj.positions[0].x);
}

#[test]
fn default_seeding_sits_on_the_cylinder() {
    let p = test_params(10);
    let seeds = seed_positions(&p);

    assert_eq!(seeds.len(), 10);
    for s in &seeds {
        assert!(
            (s.norm() - p.cylinder_radius()).abs() < 1e-12,
            "seed off the circumference: {:?}",
            s
        );
    }
    // linspace(0, 2pi) includes both endpoints, so first and last coincide
    assert!((seeds[0] - seeds[9]).norm() < 1e-12);
}

#[test]
fn pathlines_are_bit_reproducible() {
    let p = test_params(10);
    let field = CylinderFlow::new(&p);
    let solver = test_solver(&p);
    let seeds = seed_positions(&p);
    let times = time_vector(&p);

    let run_a = trace_pathlines(&field, &solver, &seeds, &times);
    let run_b = trace_pathlines(&field, &solver, &seeds, &times);

    assert_eq!(run_a.trajectories.len(), run_b.trajectories.len());
    for (ta, tb) in run_a.trajectories.iter().zip(run_b.trajectories.iter()) {
        for (pa, pb) in ta.positions.iter().zip(tb.positions.iter()) {
            assert_eq!(pa.x, pb.x);
            assert_eq!(pa.y, pb.y);
        }
    }
}

/// Trivially integrable constant field dy/dt = (1, 0)
struct UniformDrift;

impl VelocityField for UniformDrift {
    fn velocity(&self, _x: f64, _y: f64) -> NVec2 {
        NVec2::new(1.0, 0.0)
    }
}

#[test]
fn closely_spaced_output_times_are_not_an_underflow() {
    // Two output times one ulp-scale gap apart: the clamp that lands the
    // step on the first of them must not feed back into the controller's
    // step memory and misreport a smooth problem as StepUnderflow
    let p = test_params(10);
    let solver = test_solver(&p);
    let times = [0.0, 1.0, 1.0 + 1e-13, 2.0];

    let run = trace_pathlines(&UniformDrift, &solver, &[NVec2::new(0.0, 0.0)], &times);

    assert!(
        run.failures.is_empty(),
        "constant field reported a failure: {:?}",
        run.failures
    );
    let traj = &run.trajectories[0];
    assert_eq!(traj.positions.len(), 4);
    assert!((traj.positions[3].x - 2.0).abs() < 1e-9);
    assert_eq!(traj.positions[3].y, 0.0);
}

#[test]
fn fixed_rk4_agrees_with_adaptive_solver() {
    // The "rk4" engine branch with the defaulted internal step must land
    // on the same trajectories as the adaptive pair. V_char is ~103 m/s,
    // so a 0.01 fixed step buys roughly 2e-3 relative accuracy near the
    // cylinder; 1e-2 separates agreement from a wrong solver cleanly
    let rk45 = Scenario::build_scenario(base_config()).unwrap();

    let mut cfg = base_config();
    cfg.engine.integrator = IntegratorConfig::Rk4;
    cfg.engine.rk4_step = None;
    let rk4 = Scenario::build_scenario(cfg).unwrap();

    let run_a = rk45.run_pathlines();
    let run_b = rk4.run_pathlines();

    assert!(run_a.failures.is_empty() && run_b.failures.is_empty());
    assert_eq!(run_a.trajectories.len(), run_b.trajectories.len());
    for (ta, tb) in run_a.trajectories.iter().zip(run_b.trajectories.iter()) {
        assert_eq!(ta.positions.len(), tb.positions.len());
        for (pa, pb) in ta.positions.iter().zip(tb.positions.iter()) {
            let scale = 1.0 + pa.norm();
            assert!(
                (pa - pb).norm() / scale < 1e-2,
                "solvers disagree: {:?} vs {:?}",
                pa,
                pb
            );
        }
    }
}

#[test]
#[should_panic(expected = "non-decreasing")]
fn decreasing_output_times_violate_the_contract() {
    let p = test_params(10);
    let solver = test_solver(&p);
    let times = [0.0, 1.0, 0.5];

    let _ = trace_pathlines(&UniformDrift, &solver, &[NVec2::new(0.0, 0.0)], &times);
}

#[test]
fn degenerate_horizon_yields_a_single_clean_sample() {
    // One step does not fit in the horizon; the vector degenerates to
    // t = 0 instead of dividing by zero
    let mut p = test_params(10);
    p.dt = 100.0;
    let times = time_vector(&p);

    assert_eq!(times, vec![0.0]);
    assert!(times.iter().all(|t| t.is_finite()));
}

/// Field that is well-behaved on the right half-plane and NaN on the left,
/// to check that one bad seed cannot poison the others
struct HalfPlaneBlowup;

impl VelocityField for HalfPlaneBlowup {
    fn velocity(&self, x: f64, _y: f64) -> NVec2 {
        if x < 0.0 {
            NVec2::new(f64::NAN, f64::NAN)
        } else {
            NVec2::new(1.0, 0.0)
        }
    }
}

#[test]
fn seed_failures_are_isolated() {
    let p = test_params(10);
    let solver = test_solver(&p);
    let seeds = [NVec2::new(1.0, 0.0), NVec2::new(-1.0, 0.0)];
    let times = vec![0.0, 0.5, 1.0];

    let run = trace_pathlines(&HalfPlaneBlowup, &solver, &seeds, &times);

    assert_eq!(run.trajectories.len(), 1);
    assert_eq!(run.failures.len(), 1);
    assert_eq!(run.failures[0].seed_index, 1);
    assert!(matches!(run.failures[0].error, SolverError::NonFinite { .. }));

    // The surviving trajectory advects with the unit field, unaffected
    let traj = &run.trajectories[0];
    assert_eq!(traj.positions.len(), 3);
    assert!((traj.positions[2].x - 2.0).abs() < 1e-9);
}

// ==================================================================================
// Vorticity estimator tests
// ==================================================================================

#[test]
fn uniform_field_has_zero_vorticity() {
    let sample = FieldSample {
        u: Array2::from_elem((8, 8), 3.7),
        v: Array2::from_elem((8, 8), -1.2),
    };

    let w = vorticity(&sample, 0.5);

    assert_eq!(w.dim(), (8, 8));
    for val in w.iter() {
        assert!(val.abs() < 1e-12, "uniform flow must be irrotational");
    }
}

/// Max interior-node error against the closed-form vorticity at resolution n
fn interior_vorticity_error(n: usize) -> f64 {
    let p = test_params(n);
    let field = CylinderFlow::new(&p);
    let grid = Grid::new(&p);
    let sample = grid.sample(&field);
    let w = vorticity(&sample, grid.spacing);

    let mut max_err: f64 = 0.0;
    for i in 1..n - 1 {
        for j in 1..n - 1 {
            let exact = analytic_vorticity(grid.x[[i, j]], grid.y[[i, j]], p.v_char());
            max_err = max_err.max((w[[i, j]] - exact).abs());
        }
    }
    max_err
}

#[test]
fn vorticity_error_shrinks_with_resolution() {
    // Even resolutions keep r > 0 at every node. Central differences are
    // second order; the max-norm error at 80 points lands near 0.48x the
    // 40-point error (the worst node sits by the boundary ring), so demand
    // a clear decrease without asserting the full 4x interior rate
    let err_coarse = interior_vorticity_error(40);
    let err_fine = interior_vorticity_error(80);

    assert!(err_coarse.is_finite() && err_fine.is_finite());
    assert!(
        err_fine < 0.6 * err_coarse,
        "no convergence: err(40) = {}, err(80) = {}",
        err_coarse,
        err_fine
    );
}

// ==================================================================================
// Scenario / configuration tests
// ==================================================================================

#[test]
fn scenario_build_fills_defaults() {
    let scenario = Scenario::build_scenario(base_config()).unwrap();

    assert_eq!(scenario.parameters.n_seeds, 10);
    assert_eq!(scenario.parameters.n_time_samples(), 200);
    assert_eq!(scenario.grid.shape(), (100, 100));
    // The characteristic velocity has a single derivation
    assert_eq!(scenario.field.v_char(), scenario.parameters.v_char());
}

#[test]
fn scenario_rejects_bad_configuration() {
    let mut cfg = base_config();
    cfg.parameters.dt = 0.0;
    assert!(Scenario::build_scenario(cfg).is_err(), "dt = 0 must be fatal");

    let mut cfg = base_config();
    cfg.parameters.t_end = -1.0;
    assert!(Scenario::build_scenario(cfg).is_err(), "negative horizon must be fatal");

    let mut cfg = base_config();
    cfg.parameters.n_grid = 1;
    assert!(Scenario::build_scenario(cfg).is_err(), "1x1 grid must be fatal");

    let mut cfg = base_config();
    cfg.parameters.diameter = 0.0;
    assert!(Scenario::build_scenario(cfg).is_err(), "zero diameter must be fatal");
}

#[test]
fn scenario_end_to_end_outputs_are_consistent() {
    let mut cfg = base_config();
    cfg.parameters.n_grid = 20;
    let scenario = Scenario::build_scenario(cfg).unwrap();

    let sample = scenario.sample_field();
    let w = scenario.vorticity_of(&sample);
    assert_eq!(w.dim(), sample.u.dim());

    let run = scenario.run_pathlines();
    assert!(run.failures.is_empty(), "smooth field should not fail any seed");
    assert_eq!(run.trajectories.len(), 10);
    for traj in &run.trajectories {
        assert_eq!(traj.positions.len(), 200);
        for pos in &traj.positions {
            assert!(pos.x.is_finite() && pos.y.is_finite());
        }
    }
}
