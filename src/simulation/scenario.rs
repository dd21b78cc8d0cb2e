//! Build fully-initialized flow scenarios from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces the runtime bundle
//! (`Scenario`) containing:
//! - engine settings (`Engine`)
//! - numerical parameters (`Parameters`)
//! - the velocity field model (`CylinderFlow`)
//! - the sampling grid (`Grid`)
//!
//! All configuration validation happens here, before any computation: an
//! invalid scenario never produces a partially-built bundle.

use anyhow::{bail, Result};
use ndarray::Array2;

use crate::configuration::config::ScenarioConfig;
use crate::simulation::engine::Engine;
use crate::simulation::field::CylinderFlow;
use crate::simulation::grid::{FieldSample, Grid};
use crate::simulation::params::Parameters;
use crate::simulation::pathlines::{seed_positions, time_vector, trace_pathlines, PathlineRun};
use crate::simulation::vorticity::vorticity;

/// A fully-initialized flow scenario
///
/// This is the main "runtime bundle" constructed from a [`ScenarioConfig`]:
/// it contains the engine settings, parameters, the velocity field model,
/// and the sampling grid, and exposes the numeric outputs the external
/// visualization path consumes (field sample, vorticity, pathlines)
pub struct Scenario {
    pub engine: Engine,
    pub parameters: Parameters,
    pub field: CylinderFlow,
    pub grid: Grid,
}

impl Scenario {
    pub fn build_scenario(cfg: ScenarioConfig) -> Result<Self> {
        // Parameters (runtime) from ParametersConfig, defaults filled in
        let p_cfg = cfg.parameters;
        let parameters = Parameters {
            re: p_cfg.re,
            mach: p_cfg.mach,
            diameter: p_cfg.diameter,
            n_grid: p_cfg.n_grid,
            dt: p_cfg.dt,
            t_end: p_cfg.t_end,
            n_seeds: p_cfg.n_seeds.unwrap_or(10),
            atol: p_cfg.atol.unwrap_or(1e-8),
            rtol: p_cfg.rtol.unwrap_or(1e-6),
        };

        // Reject bad configuration before any computation begins
        if parameters.n_grid < 2 {
            bail!("grid resolution must be at least 2, got {}", parameters.n_grid);
        }
        if parameters.diameter <= 0.0 {
            bail!("cylinder diameter must be positive, got {}", parameters.diameter);
        }
        if parameters.mach < 0.0 {
            bail!("Mach number must be non-negative, got {}", parameters.mach);
        }
        if parameters.dt <= 0.0 {
            bail!("time step must be positive, got {}", parameters.dt);
        }
        if parameters.t_end <= 0.0 {
            bail!("time horizon must be positive, got {}", parameters.t_end);
        }
        if parameters.n_seeds == 0 {
            bail!("at least one pathline seed is required");
        }
        if parameters.n_time_samples() < 2 {
            bail!(
                "horizon {} and step {} give fewer than 2 output samples",
                parameters.t_end,
                parameters.dt
            );
        }
        if !(parameters.atol > 0.0 && parameters.rtol > 0.0) {
            bail!("solver tolerances must be positive");
        }

        // Engine (runtime) from EngineConfig
        let e_cfg = cfg.engine;
        let engine = Engine {
            integrator: e_cfg.integrator,
            rk4_step: e_cfg.rk4_step.unwrap_or(0.01),
        };
        if engine.rk4_step <= 0.0 {
            bail!("rk4_step must be positive, got {}", engine.rk4_step);
        }

        // Field model and sampling grid from the validated parameters
        let field = CylinderFlow::new(&parameters);
        let grid = Grid::new(&parameters);

        Ok(Self {
            engine,
            parameters,
            field,
            grid,
        })
    }

    /// Velocity components at every grid node
    /// The streamline/contour path and the vorticity estimator both consume
    /// this, so a single call keeps their inputs numerically identical
    pub fn sample_field(&self) -> FieldSample {
        self.grid.sample(&self.field)
    }

    /// Vorticity of a previously-computed sample on this scenario's grid
    pub fn vorticity_of(&self, sample: &FieldSample) -> Array2<f64> {
        vorticity(sample, self.grid.spacing)
    }

    /// Trace the default seed set through the field
    pub fn run_pathlines(&self) -> PathlineRun {
        let solver = self.engine.build_solver(&self.parameters);
        let seeds = seed_positions(&self.parameters);
        let times = time_vector(&self.parameters);
        trace_pathlines(&self.field, solver.as_ref(), &seeds, &times)
    }
}
