use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Instant;

use class_leaderboard::dataset::{list_groups, load_group};
use class_leaderboard::error::{EXIT_CONFIG, EXIT_IO, EXIT_NOT_FOUND, EXIT_SUCCESS};
use class_leaderboard::output::{self, Format, TextOptions};
use class_leaderboard::ranking::{build_leaderboard, Leaderboard};
use class_leaderboard::scoring::Weights;
use class_leaderboard::LeaderboardError;

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the groups found in the data directory
    Groups,
    /// Show a group's leaderboard (default if no subcommand)
    Show {
        /// Group to show; defaults to the first group in name order
        group: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// Show the points breakdown for each student
        #[arg(short, long)]
        breakdown: bool,

        /// Only list the top N students (every format; averages still cover the whole group)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Write a group's leaderboard to a file
    Export {
        /// Group to export
        group: String,

        /// Destination file
        #[arg(short, long)]
        out: PathBuf,

        /// Report format
        #[arg(short, long, value_enum, default_value_t = Format::Markdown)]
        format: Format,
    },
}

#[derive(Parser, Debug)]
#[command(name = "class-leaderboard")]
#[command(about = "Per-group student leaderboard from CSV rosters", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/class-leaderboard/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory with one CSV file per group
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn main() {
    let cli = Cli::parse();
    let start_time = Instant::now();

    if let Err(e) = class_leaderboard::logging::init_tracing(cli.verbose) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let config = match class_leaderboard::config::load_config(cli.config.clone()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate scoring config at startup
    let scoring = config.scoring.clone().unwrap_or_default();
    if let Err(errors) = class_leaderboard::scoring::validate_scoring(&scoring) {
        eprintln!("Scoring config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }
    let weights = scoring.weights();

    let data_dir = class_leaderboard::config::resolve_data_dir(cli.data_dir.clone(), &config);
    tracing::debug!(data_dir = %data_dir.display(), ?weights, "starting");

    let command = cli.command.unwrap_or(Commands::Show {
        group: None,
        format: Format::Text,
        breakdown: false,
        limit: None,
    });

    match command {
        Commands::Groups => {
            let groups = list_groups(&data_dir).unwrap_or_else(|e| fail(e));
            println!("{}", output::format_groups(&groups));
        }
        Commands::Show {
            group,
            format,
            breakdown,
            limit,
        } => {
            let group = match group {
                Some(g) => g,
                None => default_group(&data_dir),
            };
            let board = leaderboard_for(&data_dir, &group, &weights);
            let options = TextOptions {
                use_colors: !cli.no_color && output::should_use_colors(),
                breakdown,
                limit,
            };
            match output::render(&board, weights, format, &options) {
                Ok(rendered) => println!("{}", rendered),
                Err(e) => {
                    eprintln!("Failed to render leaderboard: {:#}", e);
                    std::process::exit(EXIT_IO);
                }
            }
        }
        Commands::Export { group, out, format } => {
            let board = leaderboard_for(&data_dir, &group, &weights);
            let options = TextOptions {
                use_colors: false,
                breakdown: true,
                limit: None,
            };
            let written = output::render(&board, weights, format, &options)
                .and_then(|rendered| output::write_report(&out, &rendered));
            if let Err(e) = written {
                eprintln!("Export failed: {:#}", e);
                std::process::exit(EXIT_IO);
            }
            println!("Leaderboard for {} written to {}.", group, out.display());
        }
    }

    tracing::debug!(elapsed = ?start_time.elapsed(), "done");
    std::process::exit(EXIT_SUCCESS);
}

/// First group in name order, or exit when the directory has none
fn default_group(data_dir: &Path) -> String {
    let groups = list_groups(data_dir).unwrap_or_else(|e| fail(e));
    match groups.into_iter().next() {
        Some(group) => group,
        None => {
            eprintln!(
                "No groups found in {}. Add one CSV file per group.",
                data_dir.display()
            );
            std::process::exit(EXIT_NOT_FOUND);
        }
    }
}

fn leaderboard_for(data_dir: &Path, group: &str, weights: &Weights) -> Leaderboard {
    let dataset = load_group(data_dir, group).unwrap_or_else(|e| fail(e));
    build_leaderboard(&dataset, weights).unwrap_or_else(|e| fail(e))
}

fn fail(err: LeaderboardError) -> ! {
    eprintln!("Error: {}", err);
    std::process::exit(err.exit_code());
}
