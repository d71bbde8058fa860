use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::debug;

use crate::dataset::types::{Dataset, StudentRecord};
use crate::error::{LeaderboardError, REQUIRED_COLUMNS};

const DATASET_EXTENSION: &str = "csv";

/// List the groups available in `dir`: the stem of every `*.csv` file, sorted.
///
/// A directory with no CSV files yields an empty list. A directory that does
/// not exist is an error.
pub fn list_groups(dir: &Path) -> Result<Vec<String>, LeaderboardError> {
    if !dir.is_dir() {
        return Err(LeaderboardError::Io {
            path: dir.to_path_buf(),
            source: io::Error::new(io::ErrorKind::NotFound, "data directory does not exist"),
        });
    }

    let pattern = format!(
        "{}/*.{}",
        glob::Pattern::escape(&dir.display().to_string()),
        DATASET_EXTENSION
    );
    let entries = glob::glob(&pattern).map_err(|e| LeaderboardError::Io {
        path: dir.to_path_buf(),
        source: io::Error::new(io::ErrorKind::InvalidInput, e.to_string()),
    })?;

    let mut groups = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| LeaderboardError::Io {
            path: e.path().to_path_buf(),
            source: e.into(),
        })?;
        if !path.is_file() {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            groups.push(stem.to_string());
        }
    }

    groups.sort();
    debug!(dir = %dir.display(), count = groups.len(), "enumerated groups");
    Ok(groups)
}

/// Path of the file backing `group` inside `dir`
pub fn group_path(dir: &Path, group: &str) -> PathBuf {
    dir.join(format!("{}.{}", group, DATASET_EXTENSION))
}

/// Load and schema-check the dataset for `group`.
pub fn load_group(dir: &Path, group: &str) -> Result<Dataset, LeaderboardError> {
    let not_found = || LeaderboardError::DatasetNotFound {
        group: group.to_string(),
        dir: dir.to_path_buf(),
    };

    // Group names are file stems, never paths.
    if group.is_empty() || group.contains(['/', '\\']) || group == "." || group == ".." {
        return Err(not_found());
    }

    let path = group_path(dir, group);
    match fs::metadata(&path) {
        Ok(meta) if meta.is_file() => {}
        Ok(_) => return Err(not_found()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(not_found()),
        Err(source) => return Err(LeaderboardError::Io { path, source }),
    }

    let file = File::open(&path).map_err(|source| LeaderboardError::Io {
        path: path.clone(),
        source,
    })?;

    let dataset = parse_dataset(group, file)?;
    debug!(group, rows = dataset.len(), path = %path.display(), "loaded dataset");
    Ok(dataset)
}

/// Parse a group dataset from any CSV reader.
///
/// The header is validated before any row is read, so a file missing a
/// required column is rejected without touching its rows.
pub fn parse_dataset<R: Read>(group: &str, reader: R) -> Result<Dataset, LeaderboardError> {
    let csv_err = |source: csv::Error| LeaderboardError::Csv {
        group: group.to_string(),
        source,
    };

    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(reader);

    let headers = reader.headers().map_err(csv_err)?.clone();
    let columns = ColumnIndex::resolve(&headers)?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(csv_err)?;
        rows.push(columns.extract(&record));
    }

    Ok(Dataset {
        group: group.to_string(),
        rows,
    })
}

/// Positions of the required columns within a header row.
#[derive(Debug)]
struct ColumnIndex {
    interaction: usize,
    quiz: usize,
    assignment: usize,
    student: usize,
    gender: usize,
}

impl ColumnIndex {
    fn resolve(headers: &StringRecord) -> Result<Self, LeaderboardError> {
        let positions: Vec<Option<usize>> = REQUIRED_COLUMNS
            .iter()
            .map(|name| headers.iter().position(|h| h == *name))
            .collect();

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .zip(&positions)
            .filter(|(_, pos)| pos.is_none())
            .map(|(name, _)| name.to_string())
            .collect();

        match positions.as_slice() {
            [Some(interaction), Some(quiz), Some(assignment), Some(student), Some(gender)] => {
                Ok(Self {
                    interaction: *interaction,
                    quiz: *quiz,
                    assignment: *assignment,
                    student: *student,
                    gender: *gender,
                })
            }
            _ => Err(LeaderboardError::SchemaInvalid { missing }),
        }
    }

    fn extract(&self, record: &StringRecord) -> StudentRecord {
        let text = |idx: usize| record.get(idx).unwrap_or("").trim().to_string();
        let cell = |idx: usize| {
            record
                .get(idx)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        StudentRecord {
            student: text(self.student),
            gender: text(self.gender),
            interaction: cell(self.interaction),
            quiz: cell(self.quiz),
            assignment: cell(self.assignment),
        }
    }
}
