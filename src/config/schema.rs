use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::scoring::ScoringConfig;

#[derive(Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory holding one CSV file per group
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    #[serde(default)]
    pub scoring: Option<ScoringConfig>,
}
