use tracing::warn;

use super::config::Weights;
use crate::dataset::{Activity, StudentRecord};
use crate::error::FieldError;

#[derive(Debug, Clone, PartialEq)]
pub struct FactorContribution {
    pub activity: Activity,
    pub count: f64,  // Raw count from the row
    pub weight: f64, // Points per unit
    pub points: f64, // count * weight
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreResult {
    pub total: f64,
    pub incomplete: bool,
    pub breakdown: Vec<FactorContribution>,
    pub error: Option<FieldError>,
}

/// Weighted total for one row.
///
/// Fails on the first activity cell that is blank or not a non-negative number.
pub fn compute_total(record: &StudentRecord, weights: &Weights) -> Result<f64, FieldError> {
    Ok(breakdown(record, weights)?.iter().map(|f| f.points).sum())
}

/// Score a row, absorbing row-level failures.
///
/// A failed row scores 0 and is marked incomplete; the failure is kept on the
/// result so it can be surfaced as a warning.
pub fn score_record(record: &StudentRecord, weights: &Weights) -> ScoreResult {
    match breakdown(record, weights) {
        Ok(factors) => ScoreResult {
            total: factors.iter().map(|f| f.points).sum(),
            incomplete: false,
            breakdown: factors,
            error: None,
        },
        Err(error) => {
            warn!(student = %record.student, %error, "row scored as 0");
            ScoreResult {
                total: 0.0,
                incomplete: true,
                breakdown: Vec::new(),
                error: Some(error),
            }
        }
    }
}

fn breakdown(record: &StudentRecord, weights: &Weights) -> Result<Vec<FactorContribution>, FieldError> {
    let factors = Activity::ALL
        .iter()
        .map(|&activity| -> Result<FactorContribution, FieldError> {
            let count = record.count(activity)?;
            let weight = weights.for_activity(activity);
            let points = count * weight;
            if !points.is_finite() {
                return Err(overflow(record, activity));
            }
            Ok(FactorContribution {
                activity,
                count,
                weight,
                points,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    // Each product can be finite while their sum is not.
    let total: f64 = factors.iter().map(|f| f.points).sum();
    if !total.is_finite() {
        let largest = factors
            .iter()
            .max_by(|a, b| a.points.total_cmp(&b.points))
            .map(|f| f.activity)
            .unwrap_or(Activity::Assignment);
        return Err(overflow(record, largest));
    }

    Ok(factors)
}

/// Count too large to score once weighted
fn overflow(record: &StudentRecord, activity: Activity) -> FieldError {
    FieldError::Invalid {
        column: activity.column().to_string(),
        value: record.cell(activity).unwrap_or("").trim().to_string(),
    }
}
