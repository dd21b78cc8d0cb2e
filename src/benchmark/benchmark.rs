use std::time::Instant;

use crate::simulation::engine::Engine;
use crate::simulation::field::CylinderFlow;
use crate::simulation::grid::Grid;
use crate::simulation::params::Parameters;
use crate::simulation::pathlines::{seed_positions, time_vector, trace_pathlines};
use crate::configuration::config::IntegratorConfig;

fn bench_params(n_grid: usize, n_seeds: usize) -> Parameters {
    Parameters {
        re: 40.0,
        mach: 0.3,
        diameter: 1.0,
        n_grid,
        dt: 0.1,
        t_end: 20.0,
        n_seeds,
        atol: 1.0e-8,
        rtol: 1.0e-6,
    }
}

pub fn bench_sampling() {
    // Different grid resolutions to test
    let ns = [50, 100, 200, 400, 800];

    for n in ns {
        let params = bench_params(n, 10);
        let field = CylinderFlow::new(&params);
        let grid = Grid::new(&params);

        // Warm up
        let _ = grid.sample(&field);

        let t0 = Instant::now();
        let sample = grid.sample(&field);
        let dt_sample = t0.elapsed().as_secs_f64();

        let t1 = Instant::now();
        let _w = crate::simulation::vorticity::vorticity(&sample, grid.spacing);
        let dt_vort = t1.elapsed().as_secs_f64();

        println!("N = {n:4}, sample = {:8.6} s, vorticity = {:8.6} s", dt_sample, dt_vort);
    }
}

pub fn bench_pathlines() {
    // Different seed counts to test
    let ms = [10, 40, 160, 640];

    for m in ms {
        let params = bench_params(100, m);
        let field = CylinderFlow::new(&params);
        let engine = Engine {
            integrator: IntegratorConfig::Rk45,
            rk4_step: 0.01,
        };
        let solver = engine.build_solver(&params);
        let seeds = seed_positions(&params);
        let times = time_vector(&params);

        // Warm up
        let _ = trace_pathlines(&field, solver.as_ref(), &seeds[..1], &times);

        let t0 = Instant::now();
        let run = trace_pathlines(&field, solver.as_ref(), &seeds, &times);
        let dt_run = t0.elapsed().as_secs_f64();

        println!(
            "seeds = {m:4}, trace = {:8.6} s, failures = {}",
            dt_run,
            run.failures.len()
        );
    }
}
