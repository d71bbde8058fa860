use std::io::IsTerminal;
use owo_colors::OwoColorize;
use terminal_size::{Width, terminal_size};

use crate::ranking::{Leaderboard, ScoredStudent};

const BAR_WIDTH: usize = 20;
const MIN_NAME_WIDTH: usize = 10;

/// Rendering switches for the terminal view
#[derive(Debug, Clone, Copy, Default)]
pub struct TextOptions {
    pub use_colors: bool,
    /// Show per-activity points under each student
    pub breakdown: bool,
    /// Only list the first N students (applies to every format)
    pub limit: Option<usize>,
}

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a points value: whole numbers without decimals, otherwise up to two.
/// If incomplete is true, appends asterisk to mark a row that scored as 0.
pub fn format_points(points: f64, incomplete: bool) -> String {
    let formatted = if points.fract() == 0.0 {
        format!("{:.0}", points)
    } else {
        let fixed = format!("{:.2}", points);
        fixed.trim_end_matches('0').trim_end_matches('.').to_string()
    };

    if incomplete {
        format!("{}*", formatted)
    } else {
        formatted
    }
}

/// Text progress bar of `width` cells, scaled against `max`
pub fn progress_bar(value: f64, max: f64, width: usize) -> String {
    let ratio = if max > 0.0 { (value / max).clamp(0.0, 1.0) } else { 0.0 };
    let filled = (ratio * width as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

fn name_width(students: &[ScoredStudent], term_width: Option<usize>) -> usize {
    let longest = students
        .iter()
        .map(|s| s.record.student.chars().count())
        .max()
        .unwrap_or(0);

    // index(3) + space + gender(~8) + points(7) + bar + markers(~16) + separators
    let fixed_width = 3 + 1 + 8 + 7 + BAR_WIDTH + 16 + 8;
    match term_width {
        Some(width) if width > fixed_width + MIN_NAME_WIDTH => longest.min(width - fixed_width),
        Some(_) => longest.min(MIN_NAME_WIDTH),
        None => longest,
    }
}

/// Header block: group title, top performer, and average
pub fn format_summary(board: &Leaderboard, use_colors: bool) -> String {
    let top = board.top();
    let title = format!("Leaderboard for {}", board.group());
    let top_line = format!(
        "Top performer: {} with {} points",
        top.record.student,
        format_points(top.total(), top.score.incomplete)
    );
    let average_line = format!("Average group score: {:.2}", board.average());

    if use_colors {
        format!(
            "{}\n{}\n{}",
            title.bold().cyan(),
            top_line.yellow(),
            average_line
        )
    } else {
        format!("{}\n{}\n{}", title, top_line, average_line)
    }
}

/// One line per ranked student, optionally followed by a points breakdown
pub fn format_ranking(board: &Leaderboard, options: &TextOptions) -> String {
    let students = board.leading(options.limit);
    let width = name_width(students, get_terminal_width());
    let gender_width = students
        .iter()
        .map(|s| s.record.gender.chars().count() + 2)
        .max()
        .unwrap_or(0);

    let mut lines = Vec::new();
    for (idx, scored) in students.iter().enumerate() {
        let index_str = format!("{:>2}.", idx + 1);
        let name = format!("{:<width$}", truncate_name(&scored.record.student, width), width = width);
        let gender = format!("{:<width$}", format!("({})", scored.record.gender), width = gender_width);
        let points = format!("{:>7}", format_points(scored.total(), scored.score.incomplete));
        let bar = progress_bar(scored.total(), board.max_total(), BAR_WIDTH);
        let above = board.is_above_average(scored);

        let mut markers = Vec::new();
        if idx == 0 {
            markers.push("🥇");
        }
        if above {
            markers.push("top scorer");
        }
        let markers = markers.join(" ");

        let line = if options.use_colors {
            let name = if idx == 0 {
                name.yellow().bold().to_string()
            } else {
                name
            };
            let bar = if above {
                bar.green().to_string()
            } else {
                bar.blue().to_string()
            };
            format!(
                "{} {} {} {}  {}  {}",
                index_str.dimmed(),
                name,
                gender,
                points.bold(),
                bar,
                markers
            )
        } else {
            format!("{} {} {} {}  {}  {}", index_str, name, gender, points, bar, markers)
        };
        lines.push(line.trim_end().to_string());

        if options.breakdown {
            lines.extend(format_breakdown(scored));
        }
    }

    lines.join("\n")
}

/// Per-activity lines for one student
pub fn format_breakdown(scored: &ScoredStudent) -> Vec<String> {
    if let Some(error) = &scored.score.error {
        return vec![format!("      scored as 0: {}", error)];
    }

    scored
        .score
        .breakdown
        .iter()
        .map(|factor| {
            format!(
                "      {}: {} points",
                factor.activity.column(),
                format_points(factor.points, false)
            )
        })
        .collect()
}

/// Points per gender with share of the group total, in first-seen order
pub fn format_categories(board: &Leaderboard, use_colors: bool) -> String {
    let label_width = board
        .category_sums()
        .iter()
        .map(|c| c.category.chars().count())
        .max()
        .unwrap_or(0);

    let mut lines = vec![if use_colors {
        "Gender points".bold().to_string()
    } else {
        "Gender points".to_string()
    }];

    for category in board.category_sums() {
        let share = board.category_share(category);
        let bar = progress_bar(share, 100.0, BAR_WIDTH);
        lines.push(format!(
            "  {:<width$}  {:>7}  {:>5.1}%  {}",
            category.category,
            format_points(category.total, false),
            share,
            bar,
            width = label_width
        ));
    }

    lines.join("\n")
}

/// Footer listing rows that could not be scored
pub fn format_warnings(board: &Leaderboard, use_colors: bool) -> Option<String> {
    let warnings: Vec<String> = board
        .warnings()
        .filter_map(|s| {
            s.score
                .error
                .as_ref()
                .map(|e| format!("  - {}: {} (scored as 0)", s.record.student, e))
        })
        .collect();

    if warnings.is_empty() {
        return None;
    }

    let title = if use_colors {
        "Warnings".yellow().bold().to_string()
    } else {
        "Warnings".to_string()
    };
    Some(format!("{}\n{}", title, warnings.join("\n")))
}

/// Full terminal view of a leaderboard
pub fn format_leaderboard(board: &Leaderboard, options: &TextOptions) -> String {
    let mut sections = vec![
        format_summary(board, options.use_colors),
        format_ranking(board, options),
        format_categories(board, options.use_colors),
    ];
    if let Some(warnings) = format_warnings(board, options.use_colors) {
        sections.push(warnings);
    }
    sections.join("\n\n")
}

/// Format the ranking as tab-separated values for scripting
/// Columns: rank, student, gender, interaction, quiz, assignment, total (no headers, no colors)
pub fn format_tsv(board: &Leaderboard, limit: Option<usize>) -> String {
    board
        .leading(limit)
        .iter()
        .enumerate()
        .map(|(idx, scored)| {
            let record = &scored.record;
            format!(
                "{}\t{}\t{}\t{}\t{}\t{}\t{}",
                idx + 1,
                record.student,
                record.gender,
                record.interaction.as_deref().unwrap_or(""),
                record.quiz.as_deref().unwrap_or(""),
                record.assignment.as_deref().unwrap_or(""),
                format_points(scored.total(), false)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Plain list of groups, one per line
pub fn format_groups(groups: &[String]) -> String {
    if groups.is_empty() {
        return "No groups found. Add one CSV file per group to the data directory.".to_string();
    }
    groups.join("\n")
}
