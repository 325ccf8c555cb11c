//! # dictapi-pad
//!
//! Drive a dictation recorder with a game controller.
//!
//! Reads the only connected joystick and writes one transport command per line
//! to stdout (`play`, `pause`, `record`, `set_marker`, `delete`, `speed 0.5`,
//! `quit`, ...). Diagnostics go to stderr or a log file, never to stdout.
//!
//! # Control Flow
//!
//! 1. **Initialization**
//!    - Load configuration (first argument, else `config/default.toml`, else defaults)
//!    - Set up logging with tracing subscriber
//!    - Open the joystick (configured path or auto-detect)
//!
//! 2. **Main Loop**
//!    - Translate each joystick event and dispatch it through the session
//!    - Write the resulting commands to stdout before reading the next event
//!
//! 3. **Shutdown**
//!    - Hold three quit buttons at once (Back, Start, Guide by default)
//!    - Or press Ctrl+C
//!
//! # Examples
//!
//! ```bash
//! dictapi-pad config/default.toml | dictapi
//! ```

use anyhow::{bail, Result};
use std::path::Path;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;

use dictapi_pad::config::Config;
use dictapi_pad::controller::joystick::Joystick;
use dictapi_pad::output::sink_for;
use dictapi_pad::session::dispatcher::Dispatcher;
use dictapi_pad::session::runner::run;

/// Configuration file used when no path is given
const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

fn load_config() -> Result<Config> {
    if let Some(path) = std::env::args().nth(1) {
        return Ok(Config::load(&path)?);
    }

    if Path::new(DEFAULT_CONFIG_PATH).exists() {
        Ok(Config::load(DEFAULT_CONFIG_PATH)?)
    } else {
        Ok(Config::default())
    }
}

/// Initializes logging; the guard must live until exit when logging to a file.
fn init_logging(config: &Config) -> Result<Option<WorkerGuard>> {
    let level: tracing::Level = config.logging.level.parse()?;
    let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

    let Some(log_file) = config.log_file() else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    };

    let Some(file_name) = log_file.file_name() else {
        bail!("logging file {} is not a file path", log_file.display());
    };
    let directory = log_file.parent().unwrap_or_else(|| Path::new("."));

    let appender = tracing_appender::rolling::never(directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Ok(Some(guard))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let config = load_config()?;
    let _log_guard = init_logging(&config)?;

    info!("dictapi-pad v{} starting...", env!("CARGO_PKG_VERSION"));

    let mut joystick = Joystick::open(config.device_path().as_deref())?;
    let mut dispatcher = Dispatcher::new(config.control_mapping(), config.session.quit_threshold);
    let mut sink = sink_for(config.output.format, std::io::stdout());

    info!(
        "Hold {} quit buttons at once or press Ctrl+C to exit",
        config.session.quit_threshold
    );

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    let summary = run(&mut joystick, &mut dispatcher, sink.as_mut(), shutdown).await?;
    info!("Stopped: {:?}", summary.reason);

    Ok(())
}
