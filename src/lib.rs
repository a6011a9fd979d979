//! Lifecycle Optimizer - choose the retirement portfolio with the highest lifetime utility
//!
//! This library provides:
//! - Monthly timelines aligned across candidate portfolios
//! - Wage income projection over the accumulation phase
//! - CRRA utility of retirement consumption and bequests
//! - A lifecycle simulator stepping savings and utility month by month
//! - Utility-maximizing portfolio selection

pub mod error;
pub mod params;
pub mod timeline;
pub mod returns;
pub mod income;
pub mod utility;
pub mod simulation;
pub mod selector;
pub mod scenario;

// Re-export commonly used types
pub use error::{ConfigError, FeedError, LifecycleError, SimulationError};
pub use params::{SimulationParameters, RiskAversionLevel, InheritanceLevel};
pub use timeline::Timeline;
pub use returns::{ReturnFeed, ReturnEntry};
pub use utility::{utility_consumption, utility_inheritance, UtilityModel};
pub use simulation::{LifecycleSimulator, MonthlyRecord, Portfolio, Regime, SimulationResult, RUIN_UTILITY};
pub use selector::{select_optimal, FinalUtilityMap};
pub use scenario::ScenarioRunner;
