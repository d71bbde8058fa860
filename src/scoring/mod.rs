pub mod config;
pub mod engine;
pub mod validation;

pub use config::*;
pub use engine::{compute_total, score_record, FactorContribution, ScoreResult};
pub use validation::validate_scoring;
