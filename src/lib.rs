pub mod simulation;
pub mod configuration;
pub mod export;
pub mod benchmark;

pub use simulation::field::{CylinderFlow, NVec2, VelocityField};
pub use simulation::grid::{FieldSample, Grid};
pub use simulation::integrator::{CashKarp45, Derivative, FixedRk4, OdeIntegrator, SolverError};
pub use simulation::params::{Parameters, SPEED_OF_SOUND};
pub use simulation::pathlines::{
    seed_positions, time_vector, trace_pathlines, PathlineRun, SeedFailure, Trajectory,
};
pub use simulation::scenario::Scenario;
pub use simulation::vorticity::vorticity;

pub use configuration::config::{EngineConfig, IntegratorConfig, ParametersConfig, ScenarioConfig};

pub use export::export::{write_field_csv, write_pathlines_csv, write_vorticity_csv};

pub use benchmark::benchmark::{bench_pathlines, bench_sampling};
