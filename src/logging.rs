//! Logging setup for the `order-cleaner` binary, using `tracing` and `tracing-subscriber`.
//!
//! Every event goes to two sinks: stdout and `<log-dir>/app.log`. The file is appended to across
//! runs and never carries ANSI escapes.
//!
//! # Log Levels
//!
//! - `error`: unreadable input, unwritable output, strict-mode failure
//! - `warn`: validation failed
//! - `info`: stage progress and counts
//! - `debug`: per-step row counts, ignored input columns
//!
//! The library itself never installs a subscriber; it only emits events.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::Level;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, MakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// File name of the log file inside the log directory.
pub const LOG_FILE_NAME: &str = "app.log";

/// Configuration for logging behavior.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log level filter. `RUST_LOG` takes precedence when set.
    pub level: Level,
    /// Directory holding [`LOG_FILE_NAME`]; created if missing.
    pub log_dir: PathBuf,
    /// Whether to use ANSI colors on stdout.
    pub with_ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            log_dir: PathBuf::from("logs"),
            with_ansi: false,
        }
    }
}

impl LogConfig {
    /// Create a config writing to `log_dir` at `level`.
    #[must_use]
    pub fn new(level: Level, log_dir: impl Into<PathBuf>) -> Self {
        Self {
            level,
            log_dir: log_dir.into(),
            ..Default::default()
        }
    }

    /// Enable or disable ANSI colors on stdout.
    #[must_use]
    pub fn with_ansi(mut self, enable: bool) -> Self {
        self.with_ansi = enable;
        self
    }

    /// Full path of the log file.
    pub fn log_path(&self) -> PathBuf {
        self.log_dir.join(LOG_FILE_NAME)
    }
}

/// Initialize the global tracing subscriber. Call once at startup.
///
/// Returns the path of the log file.
///
/// # Errors
///
/// Returns an error if the log directory or file cannot be created, or if a global subscriber
/// is already installed.
pub fn init_logging(config: &LogConfig) -> io::Result<PathBuf> {
    let log_path = config.log_path();
    let file = open_log_file(&config.log_dir, &log_path)?;

    let stdout_layer = fmt::layer()
        .with_writer(io::stdout)
        .with_ansi(config.with_ansi)
        .with_target(true);
    let file_layer = fmt::layer()
        .with_writer(SharedFileWriter::new(file))
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(build_env_filter(config.level))
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(io::Error::other)?;

    Ok(log_path)
}

fn open_log_file(dir: &Path, path: &Path) -> io::Result<fs::File> {
    fs::create_dir_all(dir)?;
    OpenOptions::new().create(true).append(true).open(path)
}

#[derive(Clone)]
struct SharedFileWriter {
    file: Arc<Mutex<fs::File>>,
}

impl SharedFileWriter {
    fn new(file: fs::File) -> Self {
        Self {
            file: Arc::new(Mutex::new(file)),
        }
    }
}

struct SharedFileGuard {
    file: Arc<Mutex<fs::File>>,
}

impl Write for SharedFileGuard {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = self
            .file
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))?;
        guard.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut guard = self
            .file
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))?;
        guard.flush()
    }
}

impl<'a> MakeWriter<'a> for SharedFileWriter {
    type Writer = SharedFileGuard;

    fn make_writer(&'a self) -> Self::Writer {
        SharedFileGuard {
            file: Arc::clone(&self.file),
        }
    }
}

/// Build an `EnvFilter` from the given level, respecting the `RUST_LOG` env var.
fn build_env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| filter_for_level(level))
}

fn filter_for_level(level: Level) -> EnvFilter {
    let level = level.as_str().to_lowercase();
    EnvFilter::new(format!("{level},order_cleaner={level}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("order_cleaner_{name}_{nanos}"))
    }

    #[test]
    fn log_path_is_inside_log_dir() {
        let cfg = LogConfig::new(Level::DEBUG, "var/logs");
        assert_eq!(cfg.log_path(), PathBuf::from("var/logs").join("app.log"));
        assert!(!cfg.with_ansi);
    }

    #[test]
    fn log_file_is_created_and_appended() {
        let dir = temp_dir("logging");
        let path = dir.join(LOG_FILE_NAME);

        let mut first = open_log_file(&dir, &path).unwrap();
        first.write_all(b"one\n").unwrap();
        drop(first);
        let mut second = open_log_file(&dir, &path).unwrap();
        second.write_all(b"two\n").unwrap();
        drop(second);

        assert_eq!(fs::read_to_string(&path).unwrap(), "one\ntwo\n");
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn shared_writer_appends_through_guards() {
        let dir = temp_dir("shared_writer");
        let path = dir.join(LOG_FILE_NAME);
        let writer = SharedFileWriter::new(open_log_file(&dir, &path).unwrap());

        writer.make_writer().write_all(b"a").unwrap();
        writer.make_writer().write_all(b"b").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "ab");
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn level_filter_mentions_crate() {
        let filter = filter_for_level(Level::WARN).to_string();
        assert!(filter.contains("order_cleaner=warn"));
    }
}
