//! High-level runtime engine settings
//!
//! Selects the ODE solver used for pathline tracing when building and
//! running a `Scenario`

use crate::configuration::config::IntegratorConfig;
use crate::simulation::integrator::{CashKarp45, FixedRk4, OdeIntegrator};
use crate::simulation::params::Parameters;

#[derive(Debug, Clone)]
pub struct Engine {
    pub integrator: IntegratorConfig, // rk45 (adaptive) or rk4 (fixed step)
    pub rk4_step: f64, // internal step for the fixed-step choice
}

impl Engine {
    /// Instantiate the configured solver behind the narrow trait, so the
    /// pathline code never knows which algorithm it is running
    pub fn build_solver(&self, params: &Parameters) -> Box<dyn OdeIntegrator> {
        match self.integrator {
            IntegratorConfig::Rk45 => Box::new(CashKarp45 {
                atol: params.atol,
                rtol: params.rtol,
            }),
            IntegratorConfig::Rk4 => Box::new(FixedRk4 { h: self.rk4_step }),
        }
    }
}
