//! Error types for parameter validation, return feeds and simulation

use thiserror::Error;

/// Degenerate or inconsistent run configuration, detected before simulating
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("risk aversion of exactly 1 makes CRRA utility undefined")]
    RiskAversionIsOne,

    #[error("risk aversion must be finite, got {0}")]
    NonFiniteRiskAversion(f64),

    #[error("household size must be at least 1, got {0}")]
    InvalidHouseholdSize(u32),

    #[error("inheritance luxury threshold must be positive, got {0}")]
    InvalidLuxuryThreshold(f64),

    #[error("{name} of {age} exceeds the supported maximum of {max}")]
    AgeOutOfRange { name: &'static str, age: u32, max: u32 },

    #[error("ages must satisfy start saving ({start}) <= retirement ({retirement}) < death ({death})")]
    InvalidAgeOrdering { start: u32, retirement: u32, death: u32 },

    #[error("{name} must be finite and non-negative, got {value}")]
    InvalidRate { name: &'static str, value: f64 },

    #[error("horizon end year {end} precedes start year {start}")]
    InvalidHorizon { start: i32, end: i32 },

    #[error("cannot represent date {year}-{month:02}-01")]
    InvalidDate { year: i32, month: u32 },
}

/// Malformed return feed, rejected before any portfolio is simulated
#[derive(Debug, Error, PartialEq)]
pub enum FeedError {
    #[error("return feed contains no entries")]
    Empty,

    #[error("portfolio '{portfolio}' expected month {expected} but found month {found}")]
    MonthGap { portfolio: String, expected: u32, found: u32 },

    #[error("portfolio '{portfolio}' has {found} months but '{reference}' has {expected}")]
    LengthMismatch {
        portfolio: String,
        reference: String,
        expected: usize,
        found: usize,
    },

    #[error("portfolio '{portfolio}' month {month}: return {rate} must be finite and greater than -1")]
    InvalidReturn { portfolio: String, month: u32, rate: f64 },

    #[error("return feed covers {feed} months but the timeline has {timeline}")]
    HorizonMismatch { feed: usize, timeline: usize },
}

/// Failure while stepping a portfolio through its timeline
#[derive(Debug, Error, PartialEq)]
pub enum SimulationError {
    #[error("portfolio '{portfolio}' has {months} months but death occurs at month {death_month}")]
    HorizonTooShort { portfolio: String, months: usize, death_month: u32 },

    #[error("portfolio '{portfolio}' has {months} months but {returns} returns were supplied")]
    ReturnLengthMismatch { portfolio: String, months: usize, returns: usize },
}

/// Umbrella error for library entry points that touch I/O
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Feed(#[from] FeedError),

    #[error(transparent)]
    Simulation(#[from] SimulationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LifecycleError>;
