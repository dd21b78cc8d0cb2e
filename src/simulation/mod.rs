pub mod params;
pub mod engine;
pub mod field;
pub mod grid;
pub mod integrator;
pub mod pathlines;
pub mod vorticity;
pub mod scenario;
