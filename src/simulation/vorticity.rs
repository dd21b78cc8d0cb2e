//! Finite-difference vorticity estimation on the sampling grid
//!
//! Computes the scalar curl w = dv/dx - du/dy from a [`FieldSample`] on a
//! uniform grid: second-order central differences at interior nodes,
//! first-order one-sided differences on the boundary rows and columns.
//! The boundary entries are therefore one order less accurate than the
//! interior; callers comparing against analytic fields should restrict to
//! interior nodes.

use ndarray::Array2;

use super::grid::FieldSample;

/// Vorticity of `sample` on a grid with uniform node `spacing`
/// Output is co-indexed with the sample. Requires a grid of at least 2x2;
/// smaller grids are rejected at scenario construction
pub fn vorticity(sample: &FieldSample, spacing: f64) -> Array2<f64> {
    let (rows, cols) = sample.u.dim();
    let mut w = Array2::zeros((rows, cols));

    // Row index runs along y, column index along x (meshgrid layout)
    for i in 0..rows {
        for j in 0..cols {
            // dv/dx along the column axis
            let dv_dx = if j == 0 {
                (sample.v[[i, 1]] - sample.v[[i, 0]]) / spacing
            } else if j == cols - 1 {
                (sample.v[[i, cols - 1]] - sample.v[[i, cols - 2]]) / spacing
            } else {
                (sample.v[[i, j + 1]] - sample.v[[i, j - 1]]) / (2.0 * spacing)
            };

            // du/dy along the row axis
            let du_dy = if i == 0 {
                (sample.u[[1, j]] - sample.u[[0, j]]) / spacing
            } else if i == rows - 1 {
                (sample.u[[rows - 1, j]] - sample.u[[rows - 2, j]]) / spacing
            } else {
                (sample.u[[i + 1, j]] - sample.u[[i - 1, j]]) / (2.0 * spacing)
            };

            w[[i, j]] = dv_dx - du_dy;
        }
    }

    w
}
