//! RKS Configuration Management
//!
//! Loads build settings from `rakoune-shaders.toml` with sensible defaults.
//! Every field is optional; a missing file means the defaults: compile
//! `shaders/` into `compiled-shaders/` with `glslc`.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory
pub const LOCAL_CONFIG_FILE_NAME: &str = "rakoune-shaders.toml";
/// Per-user config directory name under the platform config dir
const USER_CONFIG_DIR_NAME: &str = "rakoune";
/// Per-user config file name
const USER_CONFIG_FILE_NAME: &str = "shaders.toml";

/// Explicit config file path; failing to load it is an error
pub const ENV_CONFIG: &str = "RKS_CONFIG";
/// Overrides `compiler.program`
pub const ENV_COMPILER: &str = "RKS_SHADER_COMPILER";
/// Enables watch mode unless empty or one of `0`, `false`, `no`, `off`
pub const ENV_WATCH: &str = "RKS_WATCH";

/// Source and output locations
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory holding `<name>.<stage>` sources
    pub source_dir: PathBuf,
    /// Directory receiving `<name>-<stage>.spv` artifacts
    pub output_dir: PathBuf,
    /// Create the output directory if it is missing
    pub create_output_dir: bool,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("shaders"),
            output_dir: PathBuf::from("compiled-shaders"),
            create_output_dir: false,
        }
    }
}

/// Which compiler turns GLSL into SPIR-V
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompilerBackend {
    /// External program invoked as `<program> <source> -o <output>`
    #[default]
    External,
    /// Built-in naga GLSL frontend and SPIR-V backend
    Naga,
}

/// Compiler configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct CompilerConfig {
    pub backend: CompilerBackend,
    /// Program to run for the external backend (looked up on PATH)
    pub program: String,
    /// Extra arguments placed before the source path
    pub args: Vec<String>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            backend: CompilerBackend::default(),
            program: "glslc".to_string(),
            args: vec![],
        }
    }
}

/// Watch mode configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct WatchConfig {
    /// Rebuild whenever the source directory changes
    pub enabled: bool,
    /// Debounce window in milliseconds
    pub debounce_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            debounce_ms: 100,
        }
    }
}

/// Complete configuration
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub compiler: CompilerConfig,
    pub watch: WatchConfig,
}

/// Where to look for a config file
#[derive(Debug, Clone)]
pub struct ConfigLookup {
    /// Explicit path from `RKS_CONFIG`
    pub explicit: Option<PathBuf>,
    /// `./rakoune-shaders.toml`
    pub local: PathBuf,
    /// `<config dir>/rakoune/shaders.toml`
    pub user: Option<PathBuf>,
}

impl ConfigLookup {
    /// Lookup paths for the current process
    pub fn from_env() -> Self {
        Self {
            explicit: std::env::var_os(ENV_CONFIG).map(PathBuf::from),
            local: PathBuf::from(LOCAL_CONFIG_FILE_NAME),
            user: Config::user_config_path(),
        }
    }
}

/// Environment variable overrides applied on top of the file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvOverrides {
    pub compiler: Option<String>,
    pub watch: bool,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self {
            compiler: std::env::var(ENV_COMPILER).ok().filter(|s| !s.is_empty()),
            watch: std::env::var(ENV_WATCH).is_ok_and(|v| parse_flag(&v)),
        }
    }

    pub fn apply(&self, config: &mut Config) {
        if let Some(program) = &self.compiler {
            log::info!("Using shader compiler '{}' from {}", program, ENV_COMPILER);
            config.compiler.program = program.clone();
        }
        if self.watch {
            config.watch.enabled = true;
        }
    }
}

/// Interpret an on/off environment value
fn parse_flag(value: &str) -> bool {
    let value = value.trim();
    !(value.is_empty()
        || value == "0"
        || value.eq_ignore_ascii_case("false")
        || value.eq_ignore_ascii_case("no")
        || value.eq_ignore_ascii_case("off"))
}

impl Config {
    /// Get the per-user config directory (~/.config/rakoune)
    pub fn user_config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join(USER_CONFIG_DIR_NAME))
    }

    /// Get the per-user config file path (~/.config/rakoune/shaders.toml)
    pub fn user_config_path() -> Option<PathBuf> {
        Self::user_config_dir().map(|p| p.join(USER_CONFIG_FILE_NAME))
    }

    /// Load config for the current process, including env overrides
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::resolve(&ConfigLookup::from_env())?;
        EnvOverrides::from_env().apply(&mut config);
        Ok(config)
    }

    /// Load config following `lookup`.
    ///
    /// An explicit path must load. Otherwise the first existing candidate is
    /// used, and a broken candidate falls back to defaults with a warning.
    pub fn resolve(lookup: &ConfigLookup) -> Result<Self, ConfigError> {
        if let Some(path) = &lookup.explicit {
            let config = Self::load_from(path)?;
            log::info!("Loaded config from {:?}", path);
            return Ok(config);
        }

        let candidates = std::iter::once(lookup.local.clone()).chain(lookup.user.clone());
        for path in candidates {
            if !path.exists() {
                continue;
            }
            return Ok(match Self::load_from(&path) {
                Ok(config) => {
                    log::info!("Loaded config from {:?}", path);
                    config
                }
                Err(e) => {
                    log::warn!("{}, using defaults", e);
                    Self::default()
                }
            });
        }

        log::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(path.to_path_buf(), e))?;
        Self::parse(&content).map_err(|e| ConfigError::ParseError(path.to_path_buf(), e))
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

/// Configuration errors
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read config file
    ReadError(PathBuf, std::io::Error),
    /// Failed to parse config file
    ParseError(PathBuf, toml::de::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => write!(f, "Failed to read {:?}: {}", path, e),
            ConfigError::ParseError(path, e) => write!(f, "Failed to parse {:?}: {}", path, e),
        }
    }
}

impl std::error::Error for ConfigError {}
