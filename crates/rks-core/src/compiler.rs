//! Shader compiler backends
//!
//! [`ShaderCompiler`] turns one [`CompileJob`] into an artifact on disk.
//! [`ExternalCompiler`] shells out to a program such as `glslc`; the
//! in-process naga backend lives in [`crate::naga_backend`].

use std::fmt;
use std::path::PathBuf;
use std::process::Command;

use crate::discover::CompileJob;

/// Default external compiler program
pub const DEFAULT_COMPILER: &str = "glslc";

/// Something that can compile a single shader source
pub trait ShaderCompiler {
    /// Short name for log messages
    fn name(&self) -> &str;

    /// Compile `job.source` into `job.output`
    fn compile(&self, job: &CompileJob) -> Result<(), CompileError>;
}

/// Errors from compiling a single shader
#[derive(Debug)]
pub enum CompileError {
    /// External compiler could not be started
    Spawn { program: String, error: std::io::Error },
    /// External compiler exited unsuccessfully (`None` when killed by a signal)
    Failed { program: String, code: Option<i32> },
    /// Source file could not be read
    Read(PathBuf, std::io::Error),
    /// Artifact could not be written
    Write(PathBuf, std::io::Error),
    /// Stage suffix is not one of vert, frag or comp
    UnknownStage(String),
    /// GLSL did not parse
    Parse(String),
    /// Parsed module failed validation
    Validation(String),
    /// SPIR-V generation failed
    Emit(String),
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::Spawn { program, error } => {
                write!(f, "Failed to run shader compiler '{}': {}", program, error)
            }
            CompileError::Failed { program, code: Some(code) } => {
                write!(f, "'{}' exited with status {}", program, code)
            }
            CompileError::Failed { program, code: None } => {
                write!(f, "'{}' was terminated by a signal", program)
            }
            CompileError::Read(path, e) => write!(f, "Failed to read {}: {}", path.display(), e),
            CompileError::Write(path, e) => write!(f, "Failed to write {}: {}", path.display(), e),
            CompileError::UnknownStage(stage) => {
                write!(f, "Unknown shader stage '{}', expected vert, frag or comp", stage)
            }
            CompileError::Parse(msg) => write!(f, "GLSL parse error:\n{}", msg),
            CompileError::Validation(msg) => write!(f, "Shader validation error:\n{}", msg),
            CompileError::Emit(msg) => write!(f, "SPIR-V generation failed: {}", msg),
        }
    }
}

impl std::error::Error for CompileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CompileError::Spawn { error, .. } => Some(error),
            CompileError::Read(_, e) | CompileError::Write(_, e) => Some(e),
            _ => None,
        }
    }
}

/// Runs an external compiler as `program [args...] <source> -o <output>`
///
/// The child inherits stdout and stderr so its diagnostics reach the user
/// unchanged.
#[derive(Debug, Clone)]
pub struct ExternalCompiler {
    program: String,
    extra_args: Vec<String>,
}

impl ExternalCompiler {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            extra_args: Vec::new(),
        }
    }

    /// Arguments placed before the source path (e.g. `--target-env=vulkan1.0`)
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn command(&self, job: &CompileJob) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.extra_args)
            .arg(&job.source)
            .arg("-o")
            .arg(&job.output);
        cmd
    }
}

impl Default for ExternalCompiler {
    fn default() -> Self {
        Self::new(DEFAULT_COMPILER)
    }
}

impl ShaderCompiler for ExternalCompiler {
    fn name(&self) -> &str {
        &self.program
    }

    fn compile(&self, job: &CompileJob) -> Result<(), CompileError> {
        let status = self
            .command(job)
            .status()
            .map_err(|error| CompileError::Spawn {
                program: self.program.clone(),
                error,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(CompileError::Failed {
                program: self.program.clone(),
                code: status.code(),
            })
        }
    }
}
