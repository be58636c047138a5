//! build-shaders: compile `shaders/` into `compiled-shaders/`
//!
//! Every `<name>.<stage>` source is compiled to `<name>-<stage>.spv`, one at a
//! time, stopping at the first failure. Takes no arguments; see
//! `rakoune-shaders.toml` and the `RKS_*` environment variables for settings.

mod app;
mod watcher;

use std::io;
use std::process::ExitCode;

use rks_config::Config;

fn main() -> ExitCode {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn,build_shaders=info,rks_core=info"),
    )
    .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::log!(app::failure_level(&e), "{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<()> {
    let config = Config::load()?;
    let mut stdout = io::stdout().lock();

    if config.watch.enabled {
        app::run_watch(&config, &mut stdout)
    } else {
        app::run_once(&config, &mut stdout).map(|_| ())
    }
}
