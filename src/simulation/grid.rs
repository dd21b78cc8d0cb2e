//! Regular sampling grid and elementwise field evaluation
//!
//! [`Grid`] is a meshgrid over `[-3D, 3D] x [-3D, 3D]`: `x` varies along
//! columns, `y` along rows, both stored as dense `Array2<f64>` so every
//! downstream array is co-indexed with the grid. [`Grid::sample`] applies a
//! velocity model at every node and yields a [`FieldSample`].

use ndarray::Array2;

use crate::simulation::field::VelocityField;
use crate::simulation::params::Parameters;

/// Meshgrid coordinate arrays plus the (uniform) node spacing
#[derive(Debug, Clone)]
pub struct Grid {
    pub x: Array2<f64>, // x coordinate of each node
    pub y: Array2<f64>, // y coordinate of each node
    pub spacing: f64,   // uniform spacing along both axes
}

impl Grid {
    /// Build the N x N meshgrid spanning `[-3D, 3D]` in both axes
    /// Caller guarantees `params.n_grid >= 2` (enforced at scenario build)
    pub fn new(params: &Parameters) -> Self {
        let n = params.n_grid;
        let half = params.domain_half_extent();
        let spacing = 2.0 * half / (n as f64 - 1.0);

        // Shared 1D axis, -3D..3D inclusive
        let axis: Vec<f64> = (0..n).map(|i| -half + spacing * i as f64).collect();

        let mut x = Array2::zeros((n, n));
        let mut y = Array2::zeros((n, n));
        for i in 0..n {
            for j in 0..n {
                x[[i, j]] = axis[j];
                y[[i, j]] = axis[i];
            }
        }

        Self { x, y, spacing }
    }

    /// Grid shape (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        let d = self.x.dim();
        (d.0, d.1)
    }

    /// Evaluate `field` at every node. Output arrays are freshly allocated
    /// and share nothing with the grid
    pub fn sample(&self, field: &impl VelocityField) -> FieldSample {
        let (rows, cols) = self.shape();
        let mut u = Array2::zeros((rows, cols));
        let mut v = Array2::zeros((rows, cols));

        for i in 0..rows {
            for j in 0..cols {
                let vel = field.velocity(self.x[[i, j]], self.y[[i, j]]);
                u[[i, j]] = vel.x;
                v[[i, j]] = vel.y;
            }
        }

        FieldSample { u, v }
    }
}

/// Velocity components sampled on a [`Grid`], co-indexed with it
#[derive(Debug, Clone)]
pub struct FieldSample {
    pub u: Array2<f64>, // x velocity component at each node
    pub v: Array2<f64>, // y velocity component at each node
}

impl FieldSample {
    /// Pointwise speed sqrt(u^2 + v^2), used by the contour path
    pub fn speed(&self) -> Array2<f64> {
        let (rows, cols) = self.u.dim();
        let mut speed = Array2::zeros((rows, cols));
        for i in 0..rows {
            for j in 0..cols {
                speed[[i, j]] = self.u[[i, j]].hypot(self.v[[i, j]]);
            }
        }
        speed
    }
}
