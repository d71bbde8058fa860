use crate::error::FieldError;

/// The three scored activity columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    Interaction,
    Quiz,
    Assignment,
}

impl Activity {
    pub const ALL: [Activity; 3] = [Activity::Interaction, Activity::Quiz, Activity::Assignment];

    /// CSV header for this activity
    pub fn column(self) -> &'static str {
        match self {
            Activity::Interaction => "Interaction",
            Activity::Quiz => "Quiz",
            Activity::Assignment => "Assignment",
        }
    }
}

/// One student row as read from a group file.
///
/// Activity cells are kept raw so that a blank or malformed value can be
/// reported for that row alone instead of failing the whole file.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentRecord {
    pub student: String,
    pub gender: String,
    pub interaction: Option<String>,
    pub quiz: Option<String>,
    pub assignment: Option<String>,
}

impl StudentRecord {
    /// Build a record from already-known counts (handy for callers that do not read CSV)
    pub fn new(student: &str, gender: &str, interaction: f64, quiz: f64, assignment: f64) -> Self {
        Self {
            student: student.to_string(),
            gender: gender.to_string(),
            interaction: Some(interaction.to_string()),
            quiz: Some(quiz.to_string()),
            assignment: Some(assignment.to_string()),
        }
    }

    pub fn cell(&self, activity: Activity) -> Option<&str> {
        match activity {
            Activity::Interaction => self.interaction.as_deref(),
            Activity::Quiz => self.quiz.as_deref(),
            Activity::Assignment => self.assignment.as_deref(),
        }
    }

    /// Parse the count for an activity. Counts must be finite and non-negative.
    pub fn count(&self, activity: Activity) -> Result<f64, FieldError> {
        let raw = match self.cell(activity).map(str::trim) {
            Some(value) if !value.is_empty() => value,
            _ => return Err(FieldError::Missing(activity.column().to_string())),
        };

        match raw.parse::<f64>() {
            Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
            _ => Err(FieldError::Invalid {
                column: activity.column().to_string(),
                value: raw.to_string(),
            }),
        }
    }
}

/// All rows of one group, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub group: String,
    pub rows: Vec<StudentRecord>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
