//! Vigil - image content-risk classification service.
//!
//! Runs the HTTP API server around the classification core. The
//! detection model itself is an external command configured at startup.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use directories::ProjectDirs;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use vigil_core::{CommandDetector, ImageClassifier};
use vigil_server::{Server, ServerConfig, DEFAULT_HOST, DEFAULT_PORT};

/// Vigil - image content-risk classification service
#[derive(Parser, Debug)]
#[command(name = "vigil", version, about)]
struct Args {
    /// Host to bind the API server to
    #[arg(long, default_value = DEFAULT_HOST)]
    host: String,

    /// Port to bind the API server to
    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Detector command line; "{image}" is replaced with the staged
    /// image path (e.g. "nudenet-cli --json {image}")
    #[arg(long)]
    detector_cmd: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Also write logs to rotating files in the data directory
    #[arg(long)]
    log_to_file: bool,
}

/// Get the logs directory path.
fn logs_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "vigil", "Vigil").map(|dirs| dirs.data_dir().join("logs"))
}

/// Initialize logging, optionally with file rotation.
fn init_logging(args: &Args) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("vigil={},warn", args.log_level)));

    if args.log_to_file {
        if let Some(log_dir) = logs_dir() {
            if std::fs::create_dir_all(&log_dir).is_ok() {
                let file_appender = RollingFileAppender::builder()
                    .rotation(Rotation::DAILY)
                    .max_log_files(5)
                    .filename_prefix("vigil")
                    .filename_suffix("log")
                    .build(&log_dir)
                    .ok();

                if let Some(appender) = file_appender {
                    let (non_blocking, guard) = tracing_appender::non_blocking(appender);

                    tracing_subscriber::registry()
                        .with(env_filter)
                        .with(fmt::layer().with_writer(std::io::stdout))
                        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
                        .init();

                    tracing::info!("Logging to {:?}", log_dir);
                    return Some(guard);
                }
            }
        }
    }

    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    None
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let _log_guard = init_logging(&args);

    let detector = CommandDetector::parse(&args.detector_cmd)
        .context("--detector-cmd must name a program to run")?;
    tracing::info!(program = detector.program(), "Using external detector");

    let classifier = ImageClassifier::new(Arc::new(detector));

    let config = ServerConfig::default()
        .with_host(args.host)
        .with_port(args.port);
    let server = Server::new(config, classifier).context("failed to set up API server")?;

    tracing::info!("Vigil listening on {}", server.addr());
    server.run().await.context("API server exited with error")?;

    Ok(())
}
