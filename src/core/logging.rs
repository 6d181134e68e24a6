//! Logging
//!
//! JSON logs go to `<log_dir>/hunter.log` through a daily rolling,
//! non-blocking appender. `log` records are bridged into `tracing`, and
//! previous days' files are gzipped in the background.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub const LOG_FILE_NAME: &str = "hunter.log";

const DEFAULT_FILTER: &str = "info";

/// Initialize logging with a file layer and a pretty stdout layer.
///
/// The returned guard must be kept alive until shutdown so buffered lines
/// are flushed.
pub fn init(log_dir: &Path) -> WorkerGuard {
    init_with(log_dir, true)
}

/// Same as [`init`] without the stdout layer. Used while the TUI owns the
/// terminal.
pub fn init_tui(log_dir: &Path) -> WorkerGuard {
    init_with(log_dir, false)
}

fn init_with(log_dir: &Path, stdout: bool) -> WorkerGuard {
    if let Err(e) = fs::create_dir_all(log_dir) {
        eprintln!("Failed to create logs directory {}: {}", log_dir.display(), e);
    }

    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .json()
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_target(true)
        .with_filter(env_filter.clone());

    let stdout_layer = stdout.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(io::stdout)
            .pretty()
            .with_filter(env_filter)
    });

    // Option<Layer> is itself a layer; `None` is a no-op.
    if let Err(e) = tracing_subscriber::registry()
        .with(file_layer)
        .with(stdout_layer)
        .try_init()
    {
        eprintln!("Failed to initialize tracing subscriber: {}", e);
    }

    // try_init installs the bridge already when tracing-subscriber's
    // `tracing-log` feature is on.
    if let Err(e) = tracing_log::LogTracer::init() {
        tracing::debug!(error = %e, "LogTracer already installed");
    }

    let dir = log_dir.to_path_buf();
    std::thread::spawn(move || compress_old_logs(&dir));

    tracing::info!(path = %log_dir.join(LOG_FILE_NAME).display(), "Logging initialized");
    guard
}

/// Rolled files look like `hunter.log.YYYY-MM-DD`.
fn is_compressible(name: &str, today_suffix: &str) -> bool {
    name.starts_with(&format!("{LOG_FILE_NAME}."))
        && !name.ends_with(today_suffix)
        && !name.ends_with(".gz")
}

/// Gzip every rolled log file except today's. Returns the files written.
pub fn compress_old_logs(log_dir: &Path) -> Vec<PathBuf> {
    let today_suffix = chrono::Local::now().format("%Y-%m-%d").to_string();
    let mut compressed = Vec::new();

    let Ok(entries) = fs::read_dir(log_dir) else {
        return compressed;
    };
    for path in entries.flatten().map(|e| e.path()) {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !is_compressible(name, &today_suffix) {
            continue;
        }
        match compress_file(&path) {
            Ok(Some(gz)) => {
                tracing::info!(path = %gz.display(), "Compressed old log");
                compressed.push(gz);
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "Failed to compress old log"),
        }
    }
    compressed
}

/// Write `<path>.gz` and remove the original. `None` if the archive already exists.
fn compress_file(path: &Path) -> io::Result<Option<PathBuf>> {
    let mut gz_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "No filename"))?
        .to_os_string();
    gz_name.push(".gz");
    let gz_path = path.with_file_name(gz_name);

    if gz_path.exists() {
        return Ok(None);
    }

    let mut reader = io::BufReader::new(fs::File::open(path)?);
    let mut encoder = GzEncoder::new(fs::File::create(&gz_path)?, Compression::default());
    io::copy(&mut reader, &mut encoder)?;
    encoder.finish()?;
    fs::remove_file(path)?;

    Ok(Some(gz_path))
}
