//! RKS Core - shader build step
//!
//! This crate provides:
//! - The `<name>.<stage>` to `<name>-<stage>.spv` naming rule
//! - Source directory discovery in file name order
//! - Compiler backends (external process, in-process naga)
//! - The batch build step that stops at the first failure

pub mod batch;
pub mod compiler;
pub mod discover;
pub mod mock;
pub mod naga_backend;
pub mod naming;

pub use batch::{BuildError, BuildReport, BuildStep};
pub use compiler::{CompileError, DEFAULT_COMPILER, ExternalCompiler, ShaderCompiler};
pub use discover::{CompileJob, DiscoverError, discover};
pub use mock::RecordingCompiler;
pub use naga_backend::NagaCompiler;
pub use naming::{ARTIFACT_EXTENSION, ShaderFileName, ShaderStage};
