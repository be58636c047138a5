//! Shader file naming
//!
//! A shader source is named `<name>.<stage>`. The name is everything before
//! the first `.` and the stage is everything after it, so `a.b.vert` has
//! name `a` and stage `b.vert`. The compiled artifact is
//! `<name>-<stage>.spv`.

use std::fmt;

/// Extension of compiled artifacts
pub const ARTIFACT_EXTENSION: &str = "spv";

/// Pipeline stage a shader runs in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
    Compute,
}

impl ShaderStage {
    /// Map a stage suffix (`vert`, `frag`, `comp`) to a stage
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "vert" => Some(Self::Vertex),
            "frag" => Some(Self::Fragment),
            "comp" => Some(Self::Compute),
            _ => None,
        }
    }

    /// The suffix used in file names for this stage
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Vertex => "vert",
            Self::Fragment => "frag",
            Self::Compute => "comp",
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Logical name and stage parsed from a shader source file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderFileName {
    name: String,
    stage: String,
}

impl ShaderFileName {
    /// Split a file name on its first dot.
    ///
    /// Returns `None` for names that are not shader sources: no dot at all,
    /// an empty name (`.hidden`) or an empty stage (`foo.`).
    pub fn parse(file_name: &str) -> Option<Self> {
        let (name, stage) = file_name.split_once('.')?;
        if name.is_empty() || stage.is_empty() {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            stage: stage.to_string(),
        })
    }

    /// Logical shader name (`logo` for `logo.vert`)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Everything after the first dot (`vert` for `logo.vert`)
    pub fn stage(&self) -> &str {
        &self.stage
    }

    /// Pipeline stage, taken from the last segment of the stage suffix
    pub fn shader_stage(&self) -> Option<ShaderStage> {
        let last = self.stage.rsplit('.').next().unwrap_or(&self.stage);
        ShaderStage::from_suffix(last)
    }

    /// File name of the compiled artifact (`logo-vert.spv`)
    pub fn artifact_file_name(&self) -> String {
        format!("{}-{}.{}", self.name, self.stage, ARTIFACT_EXTENSION)
    }
}

impl fmt::Display for ShaderFileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.name, self.stage)
    }
}
