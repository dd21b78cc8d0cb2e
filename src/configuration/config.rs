//! Configuration types for loading flow scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! flow scenario. A scenario consists of:
//!
//! - [`EngineConfig`]     – solver options (integrator choice, fixed step)
//! - [`ParametersConfig`] – numerical parameters and physical constants
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//! An example scenario YAML matching these types:
//!
//! ```yaml
//! engine:
//!   integrator: "rk45"      # adaptive Cash–Karp, or "rk4" for fixed step
//!   rk4_step: 0.01          # only read for the fixed-step integrator
//!
//! parameters:
//!   re: 40.0                # Reynolds number (informational)
//!   mach: 0.3               # Mach number, scales V_char = mach * 343 m/s
//!   diameter: 1.0           # cylinder diameter D; grid spans +-3D
//!   n_grid: 100             # grid points per axis
//!   dt: 0.1                 # pathline output step
//!   t_end: 20.0             # pathline horizon
//!   n_seeds: 10             # seeds on the cylinder circumference
//!   atol: 1.0e-8            # absolute error tolerance
//!   rtol: 1.0e-6            # relative error tolerance
//! ```
//!
//! The engine then maps this configuration into its internal runtime
//! scenario representation, validating it before any computation begins.

use serde::Deserialize;

/// Which ODE solver the pathline integrator uses
/// `integrator: "rk45"` or `integrator: "rk4"`
#[derive(Deserialize, Debug, Clone)]
pub enum IntegratorConfig {
    #[serde(rename = "rk45")] // Adaptive embedded Cash–Karp 4(5); step size controlled by atol/rtol
    Rk45,

    #[serde(rename = "rk4")] // Classical 4th-order Runge–Kutta with a fixed internal step
    Rk4,
}

/// High-level engine configuration
/// Controls how trajectories are integrated
#[derive(Deserialize, Debug)]
pub struct EngineConfig {
    pub integrator: IntegratorConfig, // solver used for pathline tracing
    pub rk4_step: Option<f64>, // fixed internal step, only for "rk4"
}

/// Global numerical and physical parameters for a scenario
#[derive(Deserialize, Debug, Clone)]
pub struct ParametersConfig {
    pub re: f64,       // Reynolds number (retained, not used by the velocity formula)
    pub mach: f64,     // Mach number
    pub diameter: f64, // cylinder diameter D
    pub n_grid: usize, // grid points per axis
    pub dt: f64,       // pathline output step
    pub t_end: f64,    // pathline time horizon
    pub n_seeds: Option<usize>, // seeds on the circumference, default 10
    pub atol: Option<f64>, // absolute error tolerance, default 1e-8
    pub rtol: Option<f64>, // relative error tolerance, default 1e-6
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug)]
pub struct ScenarioConfig {
    pub engine: EngineConfig, // solver configuration
    pub parameters: ParametersConfig, // numerical and physical parameters
}
