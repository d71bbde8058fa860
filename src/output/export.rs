use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::Write;
use std::path::Path;

/// Write a rendered report atomically
///
/// The target is either fully replaced or left untouched.
pub fn write_report(path: &Path, contents: &str) -> Result<()> {
    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    file.write_all(contents.as_bytes())
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
    if !contents.ends_with('\n') {
        file.write_all(b"\n").context("Failed to write report")?;
    }

    file.commit().context("Failed to save report")?;

    Ok(())
}
