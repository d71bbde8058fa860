use serde::{Deserialize, Serialize};

use crate::dataset::Activity;

pub const DEFAULT_INTERACTION_WEIGHT: f64 = 1.0;
pub const DEFAULT_QUIZ_WEIGHT: f64 = 2.0;
pub const DEFAULT_ASSIGNMENT_WEIGHT: f64 = 3.0;

/// Scoring configuration.
///
/// Points per unit of each activity. Every weight is optional; unset weights
/// fall back to the standard 1 / 2 / 3 weighting.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   interaction: 1
///   quiz: 2
///   assignment: 3
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    /// Points per interaction (default: 1)
    #[serde(default)]
    pub interaction: Option<f64>,

    /// Points per quiz (default: 2)
    #[serde(default)]
    pub quiz: Option<f64>,

    /// Points per assignment (default: 3)
    #[serde(default)]
    pub assignment: Option<f64>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            interaction: Some(DEFAULT_INTERACTION_WEIGHT),
            quiz: Some(DEFAULT_QUIZ_WEIGHT),
            assignment: Some(DEFAULT_ASSIGNMENT_WEIGHT),
        }
    }
}

impl ScoringConfig {
    /// Resolve into concrete weights, filling gaps with the defaults
    pub fn weights(&self) -> Weights {
        Weights {
            interaction: self.interaction.unwrap_or(DEFAULT_INTERACTION_WEIGHT),
            quiz: self.quiz.unwrap_or(DEFAULT_QUIZ_WEIGHT),
            assignment: self.assignment.unwrap_or(DEFAULT_ASSIGNMENT_WEIGHT),
        }
    }
}

/// Resolved per-activity weights used by the calculator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Weights {
    pub interaction: f64,
    pub quiz: f64,
    pub assignment: f64,
}

impl Default for Weights {
    fn default() -> Self {
        ScoringConfig::default().weights()
    }
}

impl Weights {
    pub fn for_activity(&self, activity: Activity) -> f64 {
        match activity {
            Activity::Interaction => self.interaction,
            Activity::Quiz => self.quiz,
            Activity::Assignment => self.assignment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scoring_config() {
        let config = ScoringConfig::default();
        assert_eq!(config.interaction, Some(1.0));
        assert_eq!(config.quiz, Some(2.0));
        assert_eq!(config.assignment, Some(3.0));
    }

    #[test]
    fn test_scoring_config_serde_roundtrip() {
        let config = ScoringConfig::default();
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: ScoringConfig = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_scoring_config_fills_defaults() {
        let yaml = "quiz: 4\n";
        let config: ScoringConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.quiz, Some(4.0));
        assert!(config.interaction.is_none());

        let weights = config.weights();
        assert_eq!(weights.interaction, 1.0);
        assert_eq!(weights.quiz, 4.0);
        assert_eq!(weights.assignment, 3.0);
    }

    #[test]
    fn test_empty_scoring_config_parse() {
        let config: ScoringConfig = serde_saphyr::from_str("{}").unwrap();
        assert_eq!(config.weights(), Weights::default());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<ScoringConfig, _> = serde_saphyr::from_str("homework: 5\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_weight_lookup_by_activity() {
        let weights = Weights::default();
        assert_eq!(weights.for_activity(Activity::Interaction), 1.0);
        assert_eq!(weights.for_activity(Activity::Quiz), 2.0);
        assert_eq!(weights.for_activity(Activity::Assignment), 3.0);
    }
}
