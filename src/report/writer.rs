use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Write a rendered report into `dir` atomically
///
/// The bytes go to a temporary file that is renamed into place on commit, so
/// a failed export never leaves a partial report behind. Creates `dir` if it
/// doesn't exist.
pub fn write_report(dir: &Path, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
    if !dir.exists() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory at {}", dir.display()))?;
    }

    let path = dir.join(file_name);
    let mut file = AtomicWriteFile::open(&path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(bytes)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
    file.commit()
        .with_context(|| format!("Failed to save report at {}", path.display()))?;

    tracing::debug!(path = %path.display(), bytes = bytes.len(), "report written");
    Ok(path)
}
