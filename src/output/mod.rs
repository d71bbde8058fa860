pub mod export;
pub mod formatter;
pub mod report;

pub use export::write_report;
pub use formatter::{
    format_breakdown, format_categories, format_groups, format_leaderboard, format_points,
    format_ranking, format_summary, format_tsv, format_warnings, progress_bar, should_use_colors,
    TextOptions,
};
pub use report::{build_report, format_json, format_markdown, LeaderboardReport};

use chrono::Utc;

use crate::ranking::Leaderboard;
use crate::scoring::Weights;

/// Output formats understood by `show` and `export`
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    Text,
    Tsv,
    Json,
    Markdown,
}

/// Render a leaderboard in the requested format
pub fn render(board: &Leaderboard, weights: Weights, format: Format, options: &TextOptions) -> anyhow::Result<String> {
    let rendered = match format {
        Format::Text => format_leaderboard(board, options),
        Format::Tsv => format_tsv(board, options.limit),
        Format::Json => format_json(&build_report(board, weights, options.limit, Utc::now()))?,
        Format::Markdown => format_markdown(&build_report(board, weights, options.limit, Utc::now())),
    };
    Ok(rendered)
}
