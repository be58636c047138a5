//! Shader source discovery
//!
//! Lists a source directory and turns every shader source in it into a
//! [`CompileJob`], sorted by file name the way a shell glob expands.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::naming::ShaderFileName;

/// One source file and the artifact it compiles to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileJob {
    pub file_name: ShaderFileName,
    pub source: PathBuf,
    pub output: PathBuf,
}

impl CompileJob {
    /// Build the job for `file_name` found in `source_dir`
    pub fn new(file_name: ShaderFileName, source_dir: &Path, output_dir: &Path) -> Self {
        let source = source_dir.join(file_name.to_string());
        let output = output_dir.join(file_name.artifact_file_name());
        Self {
            file_name,
            source,
            output,
        }
    }
}

/// Errors while listing the source directory
#[derive(Debug)]
pub enum DiscoverError {
    /// Source directory could not be opened
    ReadDir(PathBuf, std::io::Error),
    /// An entry inside the source directory could not be read
    ReadEntry(PathBuf, std::io::Error),
}

impl fmt::Display for DiscoverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscoverError::ReadDir(path, e) => {
                write!(f, "Failed to read shader directory {}: {}", path.display(), e)
            }
            DiscoverError::ReadEntry(path, e) => {
                write!(f, "Failed to read an entry in {}: {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for DiscoverError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DiscoverError::ReadDir(_, e) | DiscoverError::ReadEntry(_, e) => Some(e),
        }
    }
}

/// Collect compile jobs for every shader source directly inside `source_dir`.
///
/// Jobs come back sorted by source file name, so the batch order does not
/// depend on the filesystem. Subdirectories are ignored. Files whose names
/// do not look like `<name>.<stage>` are skipped with a warning.
pub fn discover(source_dir: &Path, output_dir: &Path) -> Result<Vec<CompileJob>, DiscoverError> {
    let entries = fs::read_dir(source_dir)
        .map_err(|e| DiscoverError::ReadDir(source_dir.to_path_buf(), e))?;

    let mut jobs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| DiscoverError::ReadEntry(source_dir.to_path_buf(), e))?;
        let path = entry.path();

        if path.is_dir() {
            log::debug!("Skipping directory {}", path.display());
            continue;
        }

        let Some(file_name) = entry.file_name().to_str().map(str::to_owned) else {
            log::warn!("Skipping {}: file name is not valid UTF-8", path.display());
            continue;
        };

        let Some(parsed) = ShaderFileName::parse(&file_name) else {
            log::warn!(
                "Skipping {}, expected a file name of the form {{name}}.{{stage}}",
                path.display()
            );
            continue;
        };

        jobs.push(CompileJob::new(parsed, source_dir, output_dir));
    }
    jobs.sort_by(|a, b| a.source.cmp(&b.source));

    log::debug!("Found {} shader(s) in {}", jobs.len(), source_dir.display());
    Ok(jobs)
}
