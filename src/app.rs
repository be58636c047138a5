//! Wiring between configuration and the build step

use std::io::Write;
use std::time::Duration;

use anyhow::Context;
use rks_config::{CompilerBackend, Config};
use rks_core::{
    BuildError, BuildReport, BuildStep, CompileError, ExternalCompiler, NagaCompiler, ShaderCompiler,
};

use crate::watcher::{SourceEvent, SourceWatcher};

/// Pick the compiler backend named in the config
pub fn make_compiler(config: &Config) -> Box<dyn ShaderCompiler> {
    match config.compiler.backend {
        CompilerBackend::External => Box::new(
            ExternalCompiler::new(config.compiler.program.clone())
                .with_args(config.compiler.args.clone()),
        ),
        CompilerBackend::Naga => Box::new(NagaCompiler),
    }
}

/// Build step for the configured directories and backend
pub fn make_build_step(config: &Config) -> BuildStep {
    BuildStep::new(
        &config.paths.source_dir,
        &config.paths.output_dir,
        make_compiler(config),
    )
    .create_output_dir(config.paths.create_output_dir)
}

/// Compile everything once
pub fn run_once(config: &Config, progress: &mut impl Write) -> anyhow::Result<BuildReport> {
    let step = make_build_step(config);
    step.run(progress)
        .with_context(|| format!("Shader build failed for {}", step.source_dir().display()))
}

/// Build, then rebuild on every change until the watcher stops.
///
/// A failed batch is logged and watching continues.
pub fn run_watch(config: &Config, progress: &mut impl Write) -> anyhow::Result<()> {
    let step = make_build_step(config);
    let debounce = Duration::from_millis(config.watch.debounce_ms);
    let mut watcher = SourceWatcher::new(step.source_dir(), debounce)
        .with_context(|| format!("Failed to watch {}", step.source_dir().display()))?;

    rebuild_on_change(&step, progress, || watcher.wait());

    log::warn!("Shader watcher stopped");
    Ok(())
}

/// Run `step` once, then again for every event until `next_event` returns `None`
pub fn rebuild_on_change(
    step: &BuildStep,
    progress: &mut impl Write,
    mut next_event: impl FnMut() -> Option<SourceEvent>,
) {
    if let Err(e) = step.run(&mut *progress) {
        log::log!(build_failure_level(&e), "{}", e);
    }

    while let Some(SourceEvent::Changed(path)) = next_event() {
        log::info!("{} changed, rebuilding shaders", path.display());
        match step.run(&mut *progress) {
            Ok(report) => log::info!("Rebuilt {} shader(s)", report.compiled.len()),
            Err(e) => log::log!(build_failure_level(&e), "{}", e),
        }
    }
}

/// Log level for a top-level failure
pub fn failure_level(err: &anyhow::Error) -> log::Level {
    err.downcast_ref::<BuildError>()
        .map_or(log::Level::Error, build_failure_level)
}

/// A non-zero exit from the external compiler is a warning; its diagnostic
/// is already on stderr.
fn build_failure_level(error: &BuildError) -> log::Level {
    match error {
        BuildError::Compile {
            error: CompileError::Failed { .. },
            ..
        } => log::Level::Warn,
        _ => log::Level::Error,
    }
}
