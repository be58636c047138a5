//! The shader build step
//!
//! Compiles every shader source in a directory, one at a time in file name
//! order, and stops at the first failure. Artifacts written before a
//! failure are left in place.

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::compiler::{CompileError, ShaderCompiler};
use crate::discover::{CompileJob, DiscoverError, discover};

/// Jobs that completed successfully, in the order they ran
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub compiled: Vec<CompileJob>,
}

impl BuildReport {
    /// Paths of every artifact written
    pub fn artifacts(&self) -> Vec<&Path> {
        self.compiled.iter().map(|job| job.output.as_path()).collect()
    }
}

/// Errors that abort a batch
#[derive(Debug)]
pub enum BuildError {
    /// Source directory could not be listed
    Discover(DiscoverError),
    /// Output directory could not be created
    CreateOutputDir(PathBuf, std::io::Error),
    /// Progress line could not be written
    Progress(std::io::Error),
    /// A shader failed to compile; `completed` ran before it
    Compile {
        job: CompileJob,
        error: CompileError,
        completed: Vec<CompileJob>,
    },
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::Discover(e) => write!(f, "{}", e),
            BuildError::CreateOutputDir(path, e) => {
                write!(f, "Failed to create output directory {}: {}", path.display(), e)
            }
            BuildError::Progress(e) => write!(f, "Failed to write progress: {}", e),
            BuildError::Compile { job, error, .. } => {
                write!(f, "Failed to compile {}: {}", job.source.display(), error)
            }
        }
    }
}

impl std::error::Error for BuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BuildError::Discover(e) => Some(e),
            BuildError::CreateOutputDir(_, e) | BuildError::Progress(e) => Some(e),
            BuildError::Compile { error, .. } => Some(error),
        }
    }
}

impl From<DiscoverError> for BuildError {
    fn from(e: DiscoverError) -> Self {
        BuildError::Discover(e)
    }
}

/// Compiles a source directory into an output directory
pub struct BuildStep {
    source_dir: PathBuf,
    output_dir: PathBuf,
    compiler: Box<dyn ShaderCompiler>,
    create_output_dir: bool,
}

impl BuildStep {
    pub fn new(
        source_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        compiler: Box<dyn ShaderCompiler>,
    ) -> Self {
        Self {
            source_dir: source_dir.into(),
            output_dir: output_dir.into(),
            compiler,
            create_output_dir: false,
        }
    }

    /// Create the output directory before compiling instead of expecting it
    pub fn create_output_dir(mut self, create: bool) -> Self {
        self.create_output_dir = create;
        self
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Run the batch, writing one progress line per shader to `progress`
    pub fn run(&self, progress: &mut impl Write) -> Result<BuildReport, BuildError> {
        let jobs = discover(&self.source_dir, &self.output_dir)?;

        if self.create_output_dir {
            fs::create_dir_all(&self.output_dir)
                .map_err(|e| BuildError::CreateOutputDir(self.output_dir.clone(), e))?;
        }

        log::info!(
            "Compiling {} shader(s) from {} with {}",
            jobs.len(),
            self.source_dir.display(),
            self.compiler.name()
        );

        let mut report = BuildReport::default();
        for job in jobs {
            writeln!(
                progress,
                "Compiling {} -> {}",
                job.source.display(),
                job.output.display()
            )
            .map_err(BuildError::Progress)?;
            progress.flush().map_err(BuildError::Progress)?;

            if let Err(error) = self.compiler.compile(&job) {
                return Err(BuildError::Compile {
                    job,
                    error,
                    completed: report.compiled,
                });
            }

            log::debug!("Wrote {}", job.output.display());
            report.compiled.push(job);
        }

        log::info!("Compiled {} shader(s)", report.compiled.len());
        Ok(report)
    }
}
