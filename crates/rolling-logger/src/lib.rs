//! Rolling Logger
//!
//! Installs a `tracing` subscriber that writes to stderr and, optionally, to a
//! daily log file. Only the newest `MAX_LOG_FILES` files are kept; older ones
//! are removed when a new day's file is opened.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{Local, NaiveDate};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Number of daily files kept in the log directory
pub const MAX_LOG_FILES: usize = 7;

const DEFAULT_FILTER: &str = "info";

/// Daily log file that rotates itself on the first write of a new day
pub struct RollingFile {
    dir: PathBuf,
    prefix: String,
    max_files: usize,
    current: Option<(NaiveDate, File)>,
}

impl RollingFile {
    pub fn new(dir: impl Into<PathBuf>, prefix: &str, max_files: usize) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        let mut file = Self {
            dir,
            prefix: prefix.to_string(),
            max_files: max_files.max(1),
            current: None,
        };
        file.roll_to(Local::now().date_naive())?;
        Ok(file)
    }

    /// Path of the file for `date`
    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.dir.join(format!("{}.{}.log", self.prefix, date.format("%Y-%m-%d")))
    }

    fn roll_to(&mut self, date: NaiveDate) -> io::Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.path_for(date))?;
        self.current = Some((date, file));
        self.prune()
    }

    /// Remove the oldest files beyond `max_files`
    fn prune(&self) -> io::Result<()> {
        let mut logs = list_logs(&self.dir, &self.prefix)?;
        if logs.len() <= self.max_files {
            return Ok(());
        }
        // File names embed ISO dates, so lexical order is chronological.
        logs.sort();
        let excess = logs.len() - self.max_files;
        for old in logs.into_iter().take(excess) {
            fs::remove_file(old)?;
        }
        Ok(())
    }
}

impl Write for RollingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let today = Local::now().date_naive();
        if self.current.as_ref().map(|(date, _)| *date) != Some(today) {
            self.roll_to(today)?;
        }
        match self.current.as_mut() {
            Some((_, file)) => file.write(buf),
            None => Err(io::Error::new(io::ErrorKind::Other, "log file not open")),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.current.as_mut() {
            Some((_, file)) => file.flush(),
            None => Ok(()),
        }
    }
}

fn list_logs(dir: &Path, prefix: &str) -> io::Result<Vec<PathBuf>> {
    let mut logs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name.starts_with(&format!("{prefix}.")) && name.ends_with(".log") {
            logs.push(path);
        }
    }
    Ok(logs)
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Initialize logging to stderr and to daily files under `log_dir`
pub fn init_logger(log_dir: impl Into<PathBuf>, app_name: &str) -> Result<(), String> {
    let rolling = RollingFile::new(log_dir, app_name, MAX_LOG_FILES)
        .map_err(|e| format!("Failed to open log file: {}", e))?;

    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_writer(io::stderr))
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(rolling)))
        .try_init()
        .map_err(|e| format!("Failed to install logger: {}", e))
}

/// Initialize logging to stderr only
pub fn init_console_logger() -> Result<(), String> {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_writer(io::stderr))
        .try_init()
        .map_err(|e| format!("Failed to install logger: {}", e))
}
