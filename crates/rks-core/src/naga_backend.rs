//! In-process GLSL to SPIR-V compilation via naga
//!
//! Used when no external compiler is installed. Stage comes from the file
//! name, entry point is always `main`.

use std::fs;

use naga::back::spv;
use naga::front::glsl;
use naga::valid::{Capabilities, ValidationFlags, Validator};

use crate::compiler::{CompileError, ShaderCompiler};
use crate::discover::CompileJob;
use crate::naming::ShaderStage;

/// Compiles GLSL with naga's frontend, validator and SPIR-V backend
#[derive(Debug, Default, Clone, Copy)]
pub struct NagaCompiler;

impl NagaCompiler {
    /// Compile GLSL source text into SPIR-V words
    pub fn compile_source(&self, source: &str, stage: ShaderStage) -> Result<Vec<u32>, CompileError> {
        let mut frontend = glsl::Frontend::default();
        let options = glsl::Options::from(naga_stage(stage));
        let module = frontend
            .parse(&options, source)
            .map_err(|e| CompileError::Parse(e.emit_to_string(source)))?;

        let info = Validator::new(ValidationFlags::all(), Capabilities::all())
            .validate(&module)
            .map_err(|e| CompileError::Validation(e.emit_to_string(source)))?;

        spv::write_vec(&module, &info, &spv::Options::default(), None)
            .map_err(|e| CompileError::Emit(e.to_string()))
    }
}

fn naga_stage(stage: ShaderStage) -> naga::ShaderStage {
    match stage {
        ShaderStage::Vertex => naga::ShaderStage::Vertex,
        ShaderStage::Fragment => naga::ShaderStage::Fragment,
        ShaderStage::Compute => naga::ShaderStage::Compute,
    }
}

/// SPIR-V words as a little-endian byte stream
fn words_to_bytes(words: &[u32]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_le_bytes()).collect()
}

impl ShaderCompiler for NagaCompiler {
    fn name(&self) -> &str {
        "naga"
    }

    fn compile(&self, job: &CompileJob) -> Result<(), CompileError> {
        let stage = job
            .file_name
            .shader_stage()
            .ok_or_else(|| CompileError::UnknownStage(job.file_name.stage().to_string()))?;

        let source = fs::read_to_string(&job.source)
            .map_err(|e| CompileError::Read(job.source.clone(), e))?;

        let words = self.compile_source(&source, stage)?;
        log::debug!("naga produced {} SPIR-V words for {}", words.len(), job.file_name);

        fs::write(&job.output, words_to_bytes(&words))
            .map_err(|e| CompileError::Write(job.output.clone(), e))
    }
}
