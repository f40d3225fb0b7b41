//! Log file plus optional stderr logging.
//!
//! The log file is truncated at startup and always gets INFO and above. With
//! `--verbose` the same events also go to stderr (`RUST_LOG` can widen that).
//! A log file that is still empty at exit is removed.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{Layer, fmt};

/// Owns the log file path; removes the file on drop if nothing was written.
#[derive(Debug)]
pub struct LogFile {
    path: PathBuf,
}

impl LogFile {
    /// Create (or truncate) the log file at `path`.
    pub fn create(path: &Path) -> anyhow::Result<(Self, File)> {
        let file = File::create(path)
            .with_context(|| format!("could not create log file [{}]", path.display()))?;
        Ok((
            Self {
                path: path.to_path_buf(),
            },
            file,
        ))
    }
}

impl Drop for LogFile {
    fn drop(&mut self) {
        if std::fs::metadata(&self.path).is_ok_and(|m| m.len() == 0) {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

/// Install the global subscriber. Keep the returned guard alive until exit.
pub fn init(path: &Path, verbose: bool) -> anyhow::Result<LogFile> {
    let (guard, file) = LogFile::create(path)?;

    let file_layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .with_filter(LevelFilter::INFO);

    let stderr_layer = verbose.then(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_filter(filter)
    });

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .context("could not install logger")?;

    Ok(guard)
}
