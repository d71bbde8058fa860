pub mod config;
pub mod dataset;
pub mod error;
pub mod logging;
pub mod output;
pub mod ranking;
pub mod scoring;

pub use error::{FieldError, LeaderboardError};
