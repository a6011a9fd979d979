//! Simulation parameters, survey presets and loading

mod data;
pub mod loader;

pub use data::{
    SimulationParameters, RiskAversionLevel, InheritanceLevel,
    DEFAULT_ANNUAL_INFLATION, DEFAULT_INHERITANCE_LUXURY,
};
pub use loader::{load_parameters, load_parameters_from_reader};
