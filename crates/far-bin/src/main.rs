//! `far` entrypoint.
use anyhow::{Context, Result};
use clap::Parser;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

mod harness;

use harness::App;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "far", version, about = "Find and replace across files")]
struct Args {
    /// Optional configuration file path (overrides discovery of `far.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    /// Log destination; truncated on startup.
    #[arg(long = "log-file", default_value = "far.log")]
    pub log_file: PathBuf,
}

fn configure_logging(log_path: &Path) -> Result<Option<WorkerGuard>> {
    let log_dir = match log_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let file_name = log_path
        .file_name()
        .with_context(|| format!("log path {} has no file name", log_path.display()))?;
    if log_path.exists() {
        let _ = std::fs::remove_file(log_path);
    }

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    match tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(nb_writer)
        .try_init()
    {
        Ok(_) => Ok(Some(guard)),
        // Global subscriber already installed; drop guard so writer shuts down.
        Err(_err) => Ok(None),
    }
}

/// Logs the panic site and message before the default hook prints it, so a
/// crash mid-session still leaves a trace in the log file.
fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let location = info
                .location()
                .map(|l| format!("{}:{}", l.file(), l.line()))
                .unwrap_or_else(|| "<unknown>".to_string());
            let message = info.payload_as_str().unwrap_or("<non-string payload>");
            let thread = std::thread::current();
            tracing::error!(
                target: "far.panic",
                thread = thread.name().unwrap_or("<unnamed>"),
                %location,
                message,
                "far_panicked"
            );
            default_panic(info);
        }));
    });
}

fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = configure_logging(&args.log_file)?;
    install_panic_hook();
    info!(target: "runtime", "startup");

    let config = core_config::load_from(args.config.clone())?;
    info!(
        target: "runtime.startup",
        config_path = ?config.path,
        config_override = args.config.is_some(),
        default_file_mask = config.default_file_mask(),
        "bootstrap_complete"
    );

    let mut app = App::new(&config, io::stdin().lock(), io::stdout().lock());
    app.run()?;
    info!(target: "runtime", "shutdown");
    Ok(())
}
