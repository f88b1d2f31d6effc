//! Explicit finite-difference solver for 2D heat conduction.
//!
//! Advances a rectangular temperature field with forward Euler time stepping
//! of `dT/dt = alpha * (d2T/dx2 + d2T/dy2) + Q`, and applies per-wall
//! boundary rules after every interior update.
//!
//! # Architecture
//!
//! ```text
//! SimulationConfig ──► initialize_grid() ──► Field ──► StepDriver
//!                                                        │
//!                                      step_into() = interior_pass()
//!                                                    + apply_boundary_conditions()
//!                                                        │
//!                                               FieldObserver::observe()
//! ```
//!
//! Edge cells are never computed by the stencil. They keep their previous
//! value unless an insulated or flux wall rule targets them.

pub mod boundary;
pub mod config;
pub mod driver;
pub mod grid;
pub mod solver;
pub mod stability;

pub use boundary::{BoundaryRule, apply_boundary_conditions, apply_config_boundaries};
pub use config::{ConfigError, SimulationConfig, SimulationConfigBuilder, Wall, WallSet};
pub use driver::{EnergyRecorder, FieldObserver, NullObserver, RunSummary, StepDriver};
pub use grid::{Field, initialize_grid};
pub use solver::{StencilCoefficients, step_into, update_temperature};
pub use stability::{check_bounded, is_stable, stability_number};
