//! CSV export of the numeric artifacts
//!
//! The core's boundary contract is "hand arrays to an external plotter":
//! this module writes the grid, velocity sample, speed, vorticity, and
//! pathline trajectories as plain CSV files into an output directory. One
//! row per grid node for the field files, one file per trajectory for the
//! pathlines.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use ndarray::Array2;

use crate::simulation::grid::{FieldSample, Grid};
use crate::simulation::pathlines::PathlineRun;

/// Write `x,y,u,v,speed` per grid node to `<dir>/field.csv`
pub fn write_field_csv(dir: &Path, grid: &Grid, sample: &FieldSample) -> Result<()> {
    fs::create_dir_all(dir)?;
    let path = dir.join("field.csv");
    let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
    let mut w = BufWriter::new(file);

    writeln!(w, "x,y,u,v,speed")?;
    let speed = sample.speed();
    let (rows, cols) = grid.shape();
    for i in 0..rows {
        for j in 0..cols {
            writeln!(
                w,
                "{},{},{},{},{}",
                grid.x[[i, j]],
                grid.y[[i, j]],
                sample.u[[i, j]],
                sample.v[[i, j]],
                speed[[i, j]],
            )?;
        }
    }
    Ok(())
}

/// Write `x,y,vorticity` per grid node to `<dir>/vorticity.csv`
pub fn write_vorticity_csv(dir: &Path, grid: &Grid, w_field: &Array2<f64>) -> Result<()> {
    fs::create_dir_all(dir)?;
    let path = dir.join("vorticity.csv");
    let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
    let mut w = BufWriter::new(file);

    writeln!(w, "x,y,vorticity")?;
    let (rows, cols) = grid.shape();
    for i in 0..rows {
        for j in 0..cols {
            writeln!(
                w,
                "{},{},{}",
                grid.x[[i, j]],
                grid.y[[i, j]],
                w_field[[i, j]],
            )?;
        }
    }
    Ok(())
}

/// Write one `pathline_<k>.csv` per completed trajectory (`t,x,y` rows)
/// Failed seeds produce no file; the caller reports them separately
pub fn write_pathlines_csv(dir: &Path, run: &PathlineRun, times: &[f64]) -> Result<()> {
    fs::create_dir_all(dir)?;
    for (k, traj) in run.trajectories.iter().enumerate() {
        let path = dir.join(format!("pathline_{k}.csv"));
        let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
        let mut w = BufWriter::new(file);

        writeln!(w, "t,x,y")?;
        for (t, p) in times.iter().zip(traj.positions.iter()) {
            writeln!(w, "{},{},{}", t, p.x, p.y)?;
        }
    }
    Ok(())
}
