use std::{
    env,
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
    sync::Mutex,
};

use chrono::{DateTime, Local};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    pub(crate) fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "debug" | "trace" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

pub(crate) fn resolve_desktop_log_path(root_dir: Option<PathBuf>, file_name: &str) -> PathBuf {
    match root_dir {
        Some(root) => root.join("logs").join(file_name),
        None => env::temp_dir()
            .join("ledger-desk")
            .join("logs")
            .join(file_name),
    }
}

pub(crate) fn format_log_line(
    timestamp: DateTime<Local>,
    level: LogLevel,
    scope: &str,
    message: &str,
) -> String {
    format!(
        "[{}] [{}] [{}] {}\n",
        timestamp.format("%Y-%m-%d %H:%M:%S%.3f"),
        level.as_str(),
        scope,
        message
    )
}

fn rotate_if_needed(path: &Path, max_bytes: u64) -> Result<(), String> {
    let Ok(metadata) = fs::metadata(path) else {
        return Ok(());
    };
    if metadata.len() < max_bytes {
        return Ok(());
    }

    let mut rotated = path.as_os_str().to_owned();
    rotated.push(".1");
    fs::rename(path, PathBuf::from(&rotated)).map_err(|error| {
        format!("Failed to rotate desktop log {}: {}", path.display(), error)
    })
}

pub(crate) fn append_log_line(path: &Path, line: &str, max_bytes: u64) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|error| {
            format!(
                "Failed to create desktop log directory {}: {}",
                parent.display(),
                error
            )
        })?;
    }
    rotate_if_needed(path, max_bytes)?;

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|error| format!("Failed to open desktop log {}: {}", path.display(), error))?;
    file.write_all(line.as_bytes())
        .map_err(|error| format!("Failed to write desktop log {}: {}", path.display(), error))
}

#[derive(Debug)]
pub(crate) struct DesktopLogger {
    path: PathBuf,
    threshold: LogLevel,
    max_bytes: u64,
    write_lock: Mutex<()>,
}

impl DesktopLogger {
    pub(crate) fn new(path: PathBuf, threshold: LogLevel, max_bytes: u64) -> Self {
        Self {
            path,
            threshold,
            max_bytes,
            write_lock: Mutex::new(()),
        }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn enabled(&self, level: LogLevel) -> bool {
        level >= self.threshold
    }

    pub(crate) fn write(&self, level: LogLevel, scope: &str, message: &str) {
        if !self.enabled(level) {
            return;
        }

        let line = format_log_line(Local::now(), level, scope, message);
        if cfg!(debug_assertions) {
            eprint!("{line}");
        }

        let _guard = self.write_lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Err(error) = append_log_line(&self.path, &line, self.max_bytes) {
            eprintln!("{error}");
        }
    }
}
