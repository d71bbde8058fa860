use std::path::PathBuf;
use thiserror::Error;

/// Columns every group dataset must carry, in the order they are reported.
pub const REQUIRED_COLUMNS: [&str; 5] = ["Interaction", "Quiz", "Assignment", "Student", "Gender"];

// Exit codes
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_IO: i32 = 1;
pub const EXIT_NOT_FOUND: i32 = 2;
pub const EXIT_INVALID_DATASET: i32 = 3;
pub const EXIT_CONFIG: i32 = 4;

/// Dataset-level failures. Any of these ends the current render pass.
#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("no dataset for group '{group}' in {}", dir.display())]
    DatasetNotFound { group: String, dir: PathBuf },

    #[error(
        "dataset is missing required columns: {}. Expected 'Interaction', 'Quiz', 'Assignment', 'Student', and 'Gender'",
        missing.join(", ")
    )]
    SchemaInvalid { missing: Vec<String> },

    #[error("group '{group}' has no students; nothing to rank")]
    EmptyDataset { group: String },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV in group '{group}': {source}")]
    Csv {
        group: String,
        #[source]
        source: csv::Error,
    },
}

impl LeaderboardError {
    pub fn exit_code(&self) -> i32 {
        match self {
            LeaderboardError::DatasetNotFound { .. } => EXIT_NOT_FOUND,
            LeaderboardError::SchemaInvalid { .. } | LeaderboardError::EmptyDataset { .. } => {
                EXIT_INVALID_DATASET
            }
            LeaderboardError::Io { .. } | LeaderboardError::Csv { .. } => EXIT_IO,
        }
    }
}

/// Row-level scoring failure. Absorbed by the scorer; the row counts as 0.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    #[error("column '{0}' is empty")]
    Missing(String),

    #[error("column '{column}' has invalid value '{value}'")]
    Invalid { column: String, value: String },
}

impl FieldError {
    pub fn column(&self) -> &str {
        match self {
            FieldError::Missing(column) => column,
            FieldError::Invalid { column, .. } => column,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_message_names_all_required_columns() {
        let err = LeaderboardError::SchemaInvalid {
            missing: vec!["Quiz".to_string(), "Gender".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("Quiz, Gender"));
        for column in REQUIRED_COLUMNS {
            assert!(msg.contains(&format!("'{}'", column)));
        }
    }

    #[test]
    fn test_exit_codes() {
        let not_found = LeaderboardError::DatasetNotFound {
            group: "a".to_string(),
            dir: PathBuf::from("."),
        };
        assert_eq!(not_found.exit_code(), EXIT_NOT_FOUND);

        let empty = LeaderboardError::EmptyDataset { group: "a".to_string() };
        assert_eq!(empty.exit_code(), EXIT_INVALID_DATASET);

        let schema = LeaderboardError::SchemaInvalid { missing: vec![] };
        assert_eq!(schema.exit_code(), EXIT_INVALID_DATASET);
    }

    #[test]
    fn test_field_error_column() {
        assert_eq!(FieldError::Missing("Quiz".to_string()).column(), "Quiz");
        let invalid = FieldError::Invalid {
            column: "Assignment".to_string(),
            value: "abc".to_string(),
        };
        assert_eq!(invalid.column(), "Assignment");
        assert_eq!(invalid.to_string(), "column 'Assignment' has invalid value 'abc'");
    }
}
