use std::fmt::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::formatter::format_points;
use crate::dataset::Activity;
use crate::ranking::{Leaderboard, ScoredStudent};
use crate::scoring::Weights;

#[derive(Debug, Serialize)]
pub struct LeaderboardReport {
    pub group: String,
    pub generated_at: DateTime<Utc>,
    pub weights: Weights,
    pub top: StudentEntry,
    pub average: f64,
    pub students: Vec<StudentEntry>,
    pub categories: Vec<CategoryEntry>,
    pub warnings: Vec<WarningEntry>,
}

#[derive(Debug, Serialize)]
pub struct StudentEntry {
    pub rank: usize,
    pub student: String,
    pub gender: String,
    pub total_points: f64,
    pub above_average: bool,
    pub incomplete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<PointsBreakdown>,
}

/// Weighted points per activity
#[derive(Debug, Serialize)]
pub struct PointsBreakdown {
    pub interaction: f64,
    pub quiz: f64,
    pub assignment: f64,
}

#[derive(Debug, Serialize)]
pub struct CategoryEntry {
    pub gender: String,
    pub total_points: f64,
    pub students: usize,
    pub share_percent: f64,
}

#[derive(Debug, Serialize)]
pub struct WarningEntry {
    pub student: String,
    pub column: String,
    pub message: String,
}

fn breakdown_of(scored: &ScoredStudent) -> Option<PointsBreakdown> {
    if scored.score.incomplete {
        return None;
    }
    let points = |activity: Activity| {
        scored
            .score
            .breakdown
            .iter()
            .find(|f| f.activity == activity)
            .map(|f| f.points)
            .unwrap_or(0.0)
    };
    Some(PointsBreakdown {
        interaction: points(Activity::Interaction),
        quiz: points(Activity::Quiz),
        assignment: points(Activity::Assignment),
    })
}

fn student_entry(board: &Leaderboard, rank: usize, scored: &ScoredStudent) -> StudentEntry {
    StudentEntry {
        rank,
        student: scored.record.student.clone(),
        gender: scored.record.gender.clone(),
        total_points: scored.total(),
        above_average: board.is_above_average(scored),
        incomplete: scored.score.incomplete,
        breakdown: breakdown_of(scored),
    }
}

/// Collect everything a report needs from a leaderboard.
///
/// `limit` trims the student list only; the average and gender sums still
/// cover the whole group.
pub fn build_report(
    board: &Leaderboard,
    weights: Weights,
    limit: Option<usize>,
    generated_at: DateTime<Utc>,
) -> LeaderboardReport {
    let students: Vec<StudentEntry> = board
        .leading(limit)
        .iter()
        .enumerate()
        .map(|(idx, scored)| student_entry(board, idx + 1, scored))
        .collect();

    let categories = board
        .category_sums()
        .iter()
        .map(|c| CategoryEntry {
            gender: c.category.clone(),
            total_points: c.total,
            students: c.students,
            share_percent: board.category_share(c),
        })
        .collect();

    let warnings = board
        .warnings()
        .filter_map(|s| {
            s.score.error.as_ref().map(|e| WarningEntry {
                student: s.record.student.clone(),
                column: e.column().to_string(),
                message: e.to_string(),
            })
        })
        .collect();

    LeaderboardReport {
        group: board.group().to_string(),
        generated_at,
        weights,
        top: student_entry(board, 1, board.top()),
        average: board.average(),
        students,
        categories,
        warnings,
    }
}

/// A pipe would otherwise end the table cell early
fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|")
}

pub fn format_json(report: &LeaderboardReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

pub fn format_markdown(report: &LeaderboardReport) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Leaderboard for {}", report.group);
    let _ = writeln!(output, "Generated {}", report.generated_at.format("%Y-%m-%d %H:%M UTC"));
    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "**Top performer:** {} with {} points",
        report.top.student,
        format_points(report.top.total_points, report.top.incomplete)
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "**Average group score:** {:.2}", report.average);
    let _ = writeln!(output);
    let _ = writeln!(output, "## Ranking");
    let _ = writeln!(output, "| # | Student | Gender | Interaction | Quiz | Assignment | Total |");
    let _ = writeln!(output, "|---|---------|--------|-------------|------|------------|-------|");

    for entry in &report.students {
        let cell = |value: Option<f64>| value.map(|v| format_points(v, false)).unwrap_or_else(|| "-".to_string());
        let marker = if entry.above_average { " ⭐" } else { "" };
        let _ = writeln!(
            output,
            "| {} | {}{} | {} | {} | {} | {} | {} |",
            entry.rank,
            escape_cell(&entry.student),
            marker,
            escape_cell(&entry.gender),
            cell(entry.breakdown.as_ref().map(|b| b.interaction)),
            cell(entry.breakdown.as_ref().map(|b| b.quiz)),
            cell(entry.breakdown.as_ref().map(|b| b.assignment)),
            format_points(entry.total_points, entry.incomplete)
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Gender Points");
    for category in &report.categories {
        let _ = writeln!(
            output,
            "- {}: {} points across {} students ({:.1}%)",
            category.gender,
            format_points(category.total_points, false),
            category.students,
            category.share_percent
        );
    }

    if !report.warnings.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Warnings");
        for warning in &report.warnings {
            let _ = writeln!(output, "- {}: {} (scored as 0)", warning.student, warning.message);
        }
    }

    output
}
