//! Periodic portfolio returns supplied from outside the simulator

mod feed;
pub mod loader;

pub use feed::{ReturnEntry, ReturnFeed, ValidatedFeed};
pub use loader::{load_return_feed, load_return_feed_from_reader};
