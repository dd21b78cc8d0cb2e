//! Numerical and physical parameters for the flow model
//!
//! `Parameters` holds runtime settings:
//! - Reynolds and Mach numbers, cylinder diameter,
//! - grid resolution,
//! - pathline output step, horizon, and seed count,
//! - error tolerances for the adaptive solver

/// Speed of sound at sea level, m/s
pub const SPEED_OF_SOUND: f64 = 343.0;

#[derive(Debug, Clone)]
pub struct Parameters {
    pub re: f64, // Reynolds number (informational, not used by the velocity formula)
    pub mach: f64, // Mach number
    pub diameter: f64, // cylinder diameter D
    pub n_grid: usize, // grid points per axis
    pub dt: f64, // pathline output step size
    pub t_end: f64, // pathline time horizon
    pub n_seeds: usize, // pathline seeds on the cylinder circumference
    pub atol: f64, // absolute error tolerance
    pub rtol: f64, // relative error tolerance
}

impl Parameters {
    /// Characteristic (far-field) velocity, m/s. The only place this is
    /// derived; every consumer goes through here
    pub fn v_char(&self) -> f64 {
        self.mach * SPEED_OF_SOUND
    }

    /// Cylinder radius D/2, also the pathline seed radius
    pub fn cylinder_radius(&self) -> f64 {
        self.diameter / 2.0
    }

    /// Half-extent of the sampling domain, 3D on each side of the origin
    pub fn domain_half_extent(&self) -> f64 {
        3.0 * self.diameter
    }

    /// Number of pathline output samples, T/dt cast to an integer count
    /// Rounded, not truncated: 20.0 / 0.1 is just under 200 in binary
    pub fn n_time_samples(&self) -> usize {
        (self.t_end / self.dt).round() as usize
    }
}
