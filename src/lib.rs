pub mod draw;
pub mod io;
pub mod sim;

// Prelude
pub use sim::heat_transfer::{
    ConfigError, Field, SimulationConfig, StepDriver, Wall, WallSet, initialize_grid,
    update_temperature,
};
