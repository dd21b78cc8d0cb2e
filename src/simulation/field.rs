//! The analytic velocity-field model for flow past a cylinder
//!
//! Defines the [`VelocityField`] trait (the seam between the field and its
//! consumers: grid sampling and pathline integration) and [`CylinderFlow`],
//! the synthetic cylinder-wake approximation:
//!
//! - r = sqrt(x^2 + y^2), theta = atan2(y, x)
//! - decay = 1 - exp(-r^2)
//! - u =  decay * cos(theta) * V_char
//! - v = -decay * sin(theta) * V_char
//!
//! The decay factor suppresses speed near the obstacle and recovers the
//! full characteristic speed in the far field. At r = 0 the decay is zero,
//! so the velocity is exactly (0, 0) and atan2's convention never matters.

use nalgebra::Vector2;

use crate::simulation::params::Parameters;

pub type NVec2 = Vector2<f64>;

/// Trait for 2D velocity models evaluated pointwise
/// Implementations must be total over all real (x, y) and side-effect free
pub trait VelocityField {
    fn velocity(&self, x: f64, y: f64) -> NVec2;
}

/// Synthetic flow around a cylindrical obstacle centered at the origin
/// The characteristic speed is derived once from [`Parameters::v_char`]
#[derive(Debug, Clone)]
pub struct CylinderFlow {
    v_char: f64, // Mach * speed of sound, m/s
}

impl CylinderFlow {
    pub fn new(params: &Parameters) -> Self {
        Self {
            v_char: params.v_char(),
        }
    }

    pub fn v_char(&self) -> f64 {
        self.v_char
    }
}

impl VelocityField for CylinderFlow {
    fn velocity(&self, x: f64, y: f64) -> NVec2 {
        // Squared distance from the cylinder axis
        let r2 = x * x + y * y;

        // decay -> 0 at the origin, -> 1 in the far field
        let decay = 1.0 - (-r2).exp();

        let theta = y.atan2(x);

        let u = decay * theta.cos() * self.v_char;
        let v = -decay * theta.sin() * self.v_char;

        NVec2::new(u, v)
    }
}
