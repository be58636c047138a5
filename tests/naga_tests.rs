//! In-process compilation of the bundled shader assets
//!
//! Runs the build step with the naga backend over the repository's own
//! `shaders/` directory.

mod common;

use common::{BUNDLED_SHADERS, ShaderTestEnvironment, bundled_shaders_dir};
use rks_core::{BuildStep, NagaCompiler, ShaderFileName};

const SPIRV_MAGIC_LE: [u8; 4] = [0x03, 0x02, 0x23, 0x07];

#[test]
fn test_bundled_shaders_compile_with_naga() {
    let env = ShaderTestEnvironment::new();
    let step = BuildStep::new(bundled_shaders_dir(), &env.output_dir, Box::new(NagaCompiler));

    let mut progress = Vec::new();
    let report = step
        .run(&mut progress)
        .unwrap_or_else(|e| panic!("bundled shaders should compile: {}", e));

    assert_eq!(report.compiled.len(), 6);
    for artifact in report.artifacts() {
        let bytes = std::fs::read(artifact).unwrap();
        assert_eq!(&bytes[..4], &SPIRV_MAGIC_LE, "{} is not SPIR-V", artifact.display());
    }
}

#[test]
fn test_bundled_shader_artifact_names() {
    let env = ShaderTestEnvironment::new();
    let step = BuildStep::new(bundled_shaders_dir(), &env.output_dir, Box::new(NagaCompiler));
    step.run(&mut Vec::new()).unwrap();

    for name in BUNDLED_SHADERS {
        let expected = ShaderFileName::parse(name).unwrap().artifact_file_name();
        assert!(
            env.artifacts().contains(&expected),
            "missing {} for {}",
            expected,
            name
        );
    }
}

#[test]
fn test_invalid_shader_stops_naga_build() {
    let env = ShaderTestEnvironment::new();
    env.write_source("broken.frag", "#version 450\nvoid main() { undefined_fn(); }\n");
    let step = BuildStep::new(&env.source_dir, &env.output_dir, Box::new(NagaCompiler));

    assert!(step.run(&mut Vec::new()).is_err());
    assert!(env.artifacts().is_empty());
}
