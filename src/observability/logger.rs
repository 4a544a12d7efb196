//! Line-oriented sinks for Oink log entries.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Local};
use sysinfo::System;

/// Destination for rendered Oink lines.
pub trait OinkLogger: Send + Sync {
    fn info(&self, line: &str);
}

/// Appends lines to a file in the Hodel3000 syslog layout
/// (`Mar 02 14:05:09 host rails[1234]: line`), which the Oink report tools parse.
#[derive(Debug)]
pub struct FileLogger {
    file: Mutex<File>,
    hostname: String,
    program: String,
    pid: u32,
}

impl FileLogger {
    /// Open `path` for appending, creating missing parent directories.
    pub fn open(path: impl AsRef<Path>, program: impl Into<String>) -> io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            file: Mutex::new(file),
            hostname: System::host_name().unwrap_or_else(|| "localhost".to_string()),
            program: program.into(),
            pid: std::process::id(),
        })
    }
}

impl OinkLogger for FileLogger {
    fn info(&self, line: &str) {
        let formatted = hodel_line(&Local::now(), &self.hostname, &self.program, self.pid, line);
        let mut file = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = writeln!(file, "{}", formatted) {
            tracing::warn!(error = %e, "Failed to write Oink log line");
        }
    }
}

/// One syslog line per call: embedded line breaks are dropped and leading
/// whitespace trimmed so a logged value can never start a line of its own.
fn hodel_line(
    time: &DateTime<Local>,
    hostname: &str,
    program: &str,
    pid: u32,
    line: &str,
) -> String {
    let message: String = line.chars().filter(|c| !matches!(c, '\n' | '\r')).collect();
    format!(
        "{} {} {}[{}]: {}",
        time.format("%b %d %H:%M:%S"),
        hostname,
        program,
        pid,
        message.trim_start()
    )
}

/// Forwards lines to `tracing` under the `oink` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl OinkLogger for TracingLogger {
    fn info(&self, line: &str) {
        tracing::info!(target: "oink", "{}", line);
    }
}

/// Keeps lines in memory. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct BufferLogger {
    lines: Arc<Mutex<Vec<String>>>,
}

impl BufferLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Remove and return everything captured so far.
    pub fn drain(&self) -> Vec<String> {
        std::mem::take(&mut *self.lines.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl OinkLogger for BufferLogger {
    fn info(&self, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_hodel_line() {
        let time = Local.with_ymd_and_hms(2024, 3, 2, 14, 5, 9).unwrap();
        assert_eq!(
            hodel_line(&time, "web01", "rails", 1234, "Oink Log Entry Complete"),
            "Mar 02 14:05:09 web01 rails[1234]: Oink Log Entry Complete"
        );
    }

    #[test]
    fn test_hodel_line_strips_line_breaks() {
        let time = Local.with_ymd_and_hms(2024, 3, 2, 14, 5, 9).unwrap();
        assert_eq!(
            hodel_line(&time, "web01", "rails", 1234, "  Oink Action: a\r\nFAKE rails[1]: x#y"),
            "Mar 02 14:05:09 web01 rails[1234]: Oink Action: aFAKE rails[1]: x#y"
        );
    }

    #[test]
    fn test_file_logger_one_line_per_call() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("oink.log");

        let logger = FileLogger::open(&path, "rails").unwrap();
        logger.info("a\nb");

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("]: ab"));
    }

    #[test]
    fn test_file_logger_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log").join("oink.log");

        let logger = FileLogger::open(&path, "rails").unwrap();
        logger.info("Memory usage: 10 | PID: 1");
        logger.info("Oink Log Entry Complete");

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        let marker = format!(" rails[{}]: ", std::process::id());
        assert!(lines[0].contains(&marker));
        assert!(lines[0].ends_with("Memory usage: 10 | PID: 1"));
        assert!(lines[1].ends_with("Oink Log Entry Complete"));
    }

    #[test]
    fn test_buffer_logger_shared_between_clones() {
        let logger = BufferLogger::new();
        let handle = logger.clone();
        handle.info("one");
        logger.info("two");

        assert_eq!(logger.lines(), vec!["one", "two"]);
        assert_eq!(handle.drain(), vec!["one", "two"]);
        assert!(logger.lines().is_empty());
    }
}
