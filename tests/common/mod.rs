//! Common test utilities and harness
//!
//! Provides an isolated project layout (`shaders/`, `compiled-shaders/`,
//! config file) in a temp directory plus a fake `<source> -o <output>`
//! compiler script for driving the real binary.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// File names of the shaders shipped in `shaders/`
pub const BUNDLED_SHADERS: [&str; 5] = ["shader.vert", "logo.vert", "logo.frag", "text.vert", "text.frag"];

/// Isolated working directory for one build
pub struct ShaderTestEnvironment {
    /// Temporary project root
    pub temp_dir: TempDir,
    /// `<root>/shaders`
    pub source_dir: PathBuf,
    /// `<root>/compiled-shaders`
    pub output_dir: PathBuf,
}

impl ShaderTestEnvironment {
    /// Create a project root with empty source and output directories
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let source_dir = temp_dir.path().join("shaders");
        let output_dir = temp_dir.path().join("compiled-shaders");
        std::fs::create_dir(&source_dir).expect("Failed to create shaders directory");
        std::fs::create_dir(&output_dir).expect("Failed to create output directory");

        Self {
            temp_dir,
            source_dir,
            output_dir,
        }
    }

    /// Create a project with the given source files
    pub fn with_sources(names: &[&str]) -> Self {
        let env = Self::new();
        for name in names {
            env.write_source(name, &format!("// {}\n#version 450\nvoid main() {{}}\n", name));
        }
        env
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write a shader source file
    pub fn write_source(&self, name: &str, content: &str) {
        std::fs::write(self.source_dir.join(name), content).expect("Failed to write shader source");
    }

    /// Write the config file the binary is pointed at via RKS_CONFIG
    pub fn write_config(&self, content: &str) {
        std::fs::write(self.config_path(), content).expect("Failed to write test config");
    }

    pub fn config_path(&self) -> PathBuf {
        self.root().join("test-config.toml")
    }

    /// Write a fake compiler that copies `<source>` to `<output>`.
    ///
    /// It appends each source name to `calls.log` and exits 1 for any
    /// source named in `fail_on`. The config runs it as `sh <script>` so no
    /// executable bit is needed.
    pub fn install_fake_compiler(&self, fail_on: &[&str]) {
        let script = self.root().join("fake-glslc.sh");
        let log = self.calls_log_path();
        let fail_cases = if fail_on.is_empty() {
            String::new()
        } else {
            format!(
                "case \"$name\" in\n  {}) echo \"fake-glslc: error in $1\" >&2; exit 1;;\nesac\n",
                fail_on.join("|")
            )
        };
        let body = format!(
            "#!/bin/sh\n\
             name=$(basename \"$1\")\n\
             echo \"$name\" >> \"{}\"\n\
             {}\
             [ \"$2\" = \"-o\" ] || exit 2\n\
             cp \"$1\" \"$3\"\n",
            log.display(),
            fail_cases
        );
        std::fs::write(&script, body).expect("Failed to write fake compiler");

        self.write_config(&format!(
            "[compiler]\nbackend = \"external\"\nprogram = \"sh\"\nargs = [\"{}\"]\n",
            script.display()
        ));
    }

    fn calls_log_path(&self) -> PathBuf {
        self.root().join("calls.log")
    }

    /// Source names the fake compiler was invoked with, in order
    pub fn compiler_calls(&self) -> Vec<String> {
        std::fs::read_to_string(self.calls_log_path())
            .unwrap_or_default()
            .lines()
            .map(str::to_owned)
            .collect()
    }

    /// Sorted file names currently in the output directory
    pub fn artifacts(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(&self.output_dir)
            .expect("Failed to read output directory")
            .map(|e| e.expect("bad entry").file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    /// Run `build-shaders` in this project root
    pub fn run_binary(&self) -> BuildRun {
        let output = Command::new(env!("CARGO_BIN_EXE_build-shaders"))
            .current_dir(self.root())
            .env("RKS_CONFIG", self.config_path())
            .env_remove("RKS_SHADER_COMPILER")
            .env_remove("RKS_WATCH")
            .env("RUST_LOG", "off")
            .output()
            .expect("Failed to run build-shaders");
        BuildRun { output }
    }
}

impl Default for ShaderTestEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

/// Captured result of one binary run
pub struct BuildRun {
    pub output: Output,
}

impl BuildRun {
    pub fn code(&self) -> Option<i32> {
        self.output.status.code()
    }

    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    /// Progress lines printed before each compile
    pub fn progress_lines(&self) -> Vec<String> {
        self.stdout()
            .lines()
            .filter(|l| l.starts_with("Compiling "))
            .map(str::to_owned)
            .collect()
    }
}

/// Path of the repository's own shader assets
pub fn bundled_shaders_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("shaders")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_creation() {
        let env = ShaderTestEnvironment::new();
        assert!(env.source_dir.is_dir());
        assert!(env.output_dir.is_dir());
        assert!(env.artifacts().is_empty());
    }

    #[test]
    fn test_environment_with_sources() {
        let env = ShaderTestEnvironment::with_sources(&["logo.vert"]);
        let content = std::fs::read_to_string(env.source_dir.join("logo.vert")).unwrap();
        assert!(content.contains("#version 450"));
    }
}
