//! Tracing setup.
//!
//! Shell output owns stdout, so logs go to stderr or, when
//! `PLANNER_LOG_FILE` is set, are appended to that file.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "warn,planner=info,planner_infra=info";

#[derive(Debug, Clone, Default)]
pub struct TelemetryConfig {
    /// One JSON object per line instead of the compact format.
    pub json_logs: bool,
    pub log_file: Option<PathBuf>,
}

impl TelemetryConfig {
    pub fn from_env() -> Self {
        Self {
            json_logs: std::env::var("LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
            log_file: std::env::var_os("PLANNER_LOG_FILE").map(PathBuf::from),
        }
    }
}

pub fn init_telemetry(config: &TelemetryConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let (writer, file_error) = match &config.log_file {
        Some(path) => match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => (BoxMakeWriter::new(Mutex::new(file)), None),
            Err(e) => (BoxMakeWriter::new(std::io::stderr), Some(e)),
        },
        None => (BoxMakeWriter::new(std::io::stderr), None),
    };

    let layer = tracing_subscriber::fmt::layer().with_writer(writer);
    if config.json_logs {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(layer.compact().with_ansi(config.log_file.is_none()))
            .init();
    }

    if let Some(e) = file_error {
        tracing::warn!(error = %e, "Cannot open log file, logging to stderr");
    }
    tracing::debug!(json_logs = config.json_logs, "Telemetry initialized");
}
