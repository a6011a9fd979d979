//! Lifecycle simulation of savings and utility per portfolio

mod state;
mod engine;
mod records;

pub use state::{Phase, Regime, SimulationState, StepOutcome, RUIN_UTILITY};
pub use engine::LifecycleSimulator;
pub use records::{MonthlyRecord, Portfolio, PortfolioSummary, SimulationResult};
