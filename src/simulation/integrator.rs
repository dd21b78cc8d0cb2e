//! ODE integrators for tracing particles through a velocity field
//!
//! Provides the narrow solver interface ([`OdeIntegrator`]) used by the
//! pathline code, an adaptive embedded Runge–Kutta 4(5) pair (Cash–Karp)
//! as the default, and a fixed-step classical RK4 alternative. The concrete
//! solver is swappable without touching the field model or the pathline
//! contract.

use thiserror::Error;

use super::field::NVec2;

/// Right-hand side of the ODE dy/dt = f(t, y)
/// The pathline integrator feeds the velocity field through this seam
pub trait Derivative {
    fn derivative(&self, t: f64, y: NVec2) -> NVec2;
}

/// A solver failure for one initial-value problem
/// Recoverable per seed; other seeds are unaffected
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SolverError {
    #[error("step size underflow at t = {t}")]
    StepUnderflow { t: f64 },

    #[error("non-finite state encountered at t = {t}")]
    NonFinite { t: f64 },
}

/// Solve an initial-value problem and report the state at each requested
/// output time. `times` must be non-decreasing (checked in debug builds)
/// and `times[0]` is the initial time; the returned vector has one entry
/// per output time
pub trait OdeIntegrator {
    fn integrate(
        &self,
        deriv: &dyn Derivative,
        y0: NVec2,
        times: &[f64],
    ) -> Result<Vec<NVec2>, SolverError>;
}

// =========================================================================================
// Adaptive Cash–Karp 4(5)
// =========================================================================================

// Cash–Karp tableau: stage nodes, coupling coefficients, and the embedded
// 5th/4th order weights used for the per-step error estimate
const C: [f64; 6] = [0.0, 0.2, 0.3, 0.6, 1.0, 0.875];
const A2: [f64; 1] = [0.2];
const A3: [f64; 2] = [3.0 / 40.0, 9.0 / 40.0];
const A4: [f64; 3] = [0.3, -0.9, 1.2];
const A5: [f64; 4] = [-11.0 / 54.0, 2.5, -70.0 / 27.0, 35.0 / 27.0];
const A6: [f64; 5] = [
    1631.0 / 55296.0,
    175.0 / 512.0,
    575.0 / 13824.0,
    44275.0 / 110592.0,
    253.0 / 4096.0,
];
const B5: [f64; 6] = [
    37.0 / 378.0,
    0.0,
    250.0 / 621.0,
    125.0 / 594.0,
    0.0,
    512.0 / 1771.0,
];
const B4: [f64; 6] = [
    2825.0 / 27648.0,
    0.0,
    18575.0 / 48384.0,
    13525.0 / 55296.0,
    277.0 / 14336.0,
    0.25,
];

/// Adaptive-step Cash–Karp RK4(5)
/// Step acceptance is governed by `atol + rtol * |y|` per component;
/// accepted and rejected steps rescale the step size with clamped growth
/// so the controller cannot oscillate. No randomness anywhere: repeat runs
/// are bit-identical
#[derive(Debug, Clone)]
pub struct CashKarp45 {
    pub atol: f64, // absolute error tolerance
    pub rtol: f64, // relative error tolerance
}

impl CashKarp45 {
    /// One trial step of size `h` from (t, y)
    /// Returns the 5th-order solution and the scaled error norm
    fn step(&self, deriv: &dyn Derivative, t: f64, y: NVec2, h: f64) -> (NVec2, f64) {
        let k1 = deriv.derivative(t, y);
        let k2 = deriv.derivative(t + C[1] * h, y + h * A2[0] * k1);
        let k3 = deriv.derivative(t + C[2] * h, y + h * (A3[0] * k1 + A3[1] * k2));
        let k4 = deriv.derivative(t + C[3] * h, y + h * (A4[0] * k1 + A4[1] * k2 + A4[2] * k3));
        let k5 = deriv.derivative(
            t + C[4] * h,
            y + h * (A5[0] * k1 + A5[1] * k2 + A5[2] * k3 + A5[3] * k4),
        );
        let k6 = deriv.derivative(
            t + C[5] * h,
            y + h * (A6[0] * k1 + A6[1] * k2 + A6[2] * k3 + A6[3] * k4 + A6[4] * k5),
        );

        let ks = [k1, k2, k3, k4, k5, k6];

        // 5th-order solution and the embedded 4th-order one
        let mut y5 = y;
        let mut y4 = y;
        for (i, k) in ks.iter().enumerate() {
            y5 += h * B5[i] * *k;
            y4 += h * B4[i] * *k;
        }

        // Scaled error: max over components of |y5 - y4| / (atol + rtol |y5|)
        let ex = (y5.x - y4.x).abs() / (self.atol + self.rtol * y5.x.abs());
        let ey = (y5.y - y4.y).abs() / (self.atol + self.rtol * y5.y.abs());

        (y5, ex.max(ey))
    }
}

impl OdeIntegrator for CashKarp45 {
    fn integrate(
        &self,
        deriv: &dyn Derivative,
        y0: NVec2,
        times: &[f64],
    ) -> Result<Vec<NVec2>, SolverError> {
        debug_assert!(
            times.windows(2).all(|w| w[0] <= w[1]),
            "output times must be non-decreasing"
        );

        let mut out = Vec::with_capacity(times.len());
        let Some((&t0, rest)) = times.split_first() else {
            return Ok(out);
        };
        out.push(y0);

        let span = times[times.len() - 1] - t0;
        let h_min = 1e-12 * span.max(1.0);

        let mut t = t0;
        let mut y = y0;
        // Initial guess: the mean output spacing; the controller shrinks it
        // within a step or two if that is too optimistic
        let mut h = if rest.is_empty() {
            span
        } else {
            span / rest.len() as f64
        };

        for &t_target in rest {
            while t < t_target {
                // Clamp the trial step so we land exactly on the output time.
                // The clamp is not the controller's decision: `h` keeps the
                // unclamped step memory so a tiny gap to the next output
                // time cannot masquerade as controller collapse
                let h_try = h.min(t_target - t);

                let (y_new, err) = self.step(deriv, t, y, h_try);

                if !(y_new.x.is_finite() && y_new.y.is_finite()) {
                    return Err(SolverError::NonFinite { t });
                }

                if err <= 1.0 {
                    // Accept. err == 0 means the field is locally trivial
                    // (e.g. the stagnation point) and the step grows at the cap
                    t += h_try;
                    y = y_new;
                    let factor = if err == 0.0 {
                        5.0
                    } else {
                        (0.9 * err.powf(-0.2)).clamp(0.2, 5.0)
                    };
                    h = (h * factor).min(span);
                } else {
                    // Reject and shrink from the step actually taken
                    h = h_try * (0.9 * err.powf(-0.25)).clamp(0.1, 0.9);
                }

                // Underflow is only meaningful while this target is still
                // ahead; a step that just landed on it cannot fail here
                if t < t_target && h < h_min {
                    return Err(SolverError::StepUnderflow { t });
                }
            }
            out.push(y);
        }

        Ok(out)
    }
}

// =========================================================================================
// Fixed-step classical RK4
// =========================================================================================

/// Classical 4th-order Runge–Kutta with a fixed internal step
/// Less bookkeeping than the adaptive pair; useful as a cross-check
#[derive(Debug, Clone)]
pub struct FixedRk4 {
    pub h: f64, // internal step size
}

impl FixedRk4 {
    fn step(&self, deriv: &dyn Derivative, t: f64, y: NVec2, h: f64) -> NVec2 {
        let k1 = deriv.derivative(t, y);
        let k2 = deriv.derivative(t + 0.5 * h, y + 0.5 * h * k1);
        let k3 = deriv.derivative(t + 0.5 * h, y + 0.5 * h * k2);
        let k4 = deriv.derivative(t + h, y + h * k3);
        y + (h / 6.0) * (k1 + 2.0 * k2 + 2.0 * k3 + k4)
    }
}

impl OdeIntegrator for FixedRk4 {
    fn integrate(
        &self,
        deriv: &dyn Derivative,
        y0: NVec2,
        times: &[f64],
    ) -> Result<Vec<NVec2>, SolverError> {
        debug_assert!(
            times.windows(2).all(|w| w[0] <= w[1]),
            "output times must be non-decreasing"
        );

        let mut out = Vec::with_capacity(times.len());
        let Some((&t0, rest)) = times.split_first() else {
            return Ok(out);
        };
        out.push(y0);

        let mut t = t0;
        let mut y = y0;

        for &t_target in rest {
            while t < t_target {
                let h = self.h.min(t_target - t);
                y = self.step(deriv, t, y, h);
                if !(y.x.is_finite() && y.y.is_finite()) {
                    return Err(SolverError::NonFinite { t });
                }
                t += h;
            }
            out.push(y);
        }

        Ok(out)
    }
}
