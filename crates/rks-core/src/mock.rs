//! Recording compiler for tests
//!
//! [`RecordingCompiler`] remembers every job it is handed and writes a small
//! placeholder artifact, so batch behavior can be checked without a real
//! shader compiler installed.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use crate::compiler::{CompileError, ShaderCompiler};
use crate::discover::CompileJob;

/// Bytes written as the placeholder artifact
pub const PLACEHOLDER_ARTIFACT: &[u8] = &[0x03, 0x02, 0x23, 0x07];

/// A compiler that records calls instead of compiling.
///
/// Clones share the same call log, so a test can keep one handle while the
/// build step owns another.
#[derive(Debug, Clone, Default)]
pub struct RecordingCompiler {
    calls: Arc<Mutex<Vec<CompileJob>>>,
    fail_on: HashSet<String>,
}

impl RecordingCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail (exit status 1) when asked to compile this source file name
    pub fn failing_on(mut self, file_name: &str) -> Self {
        self.fail_on.insert(file_name.to_string());
        self
    }

    /// All jobs attempted so far, in order
    pub fn calls(&self) -> Vec<CompileJob> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of jobs attempted so far
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Source file names attempted so far, in order
    pub fn attempted(&self) -> Vec<String> {
        self.calls()
            .iter()
            .map(|job| job.file_name.to_string())
            .collect()
    }
}

impl ShaderCompiler for RecordingCompiler {
    fn name(&self) -> &str {
        "recording"
    }

    fn compile(&self, job: &CompileJob) -> Result<(), CompileError> {
        self.calls.lock().unwrap().push(job.clone());

        if self.fail_on.contains(&job.file_name.to_string()) {
            return Err(CompileError::Failed {
                program: self.name().to_string(),
                code: Some(1),
            });
        }

        std::fs::write(&job.output, PLACEHOLDER_ARTIFACT)
            .map_err(|e| CompileError::Write(job.output.clone(), e))
    }
}
