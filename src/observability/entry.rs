//! Typed Oink log lines.
//!
//! Log scrapers match these lines verbatim; the `Display` impl is the only
//! place their text is produced.

use std::fmt;

/// One line of an Oink log entry, in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEntry {
    Path(String),
    Action { controller: String, action: String },
    Params(String),
    Memory { usage: u64, pid: u32 },
    Instantiation(Vec<String>),
    Complete,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogEntry::Path(path) => write!(f, "Oink Path: {}", path),
            LogEntry::Action { controller, action } => {
                write!(f, "Oink Action: {}#{}", controller, action)
            }
            LogEntry::Params(params) => write!(f, "Oink Params: {}", params),
            LogEntry::Memory { usage, pid } => write!(f, "Memory usage: {} | PID: {}", usage, pid),
            LogEntry::Instantiation(breakdown) => {
                write!(f, "Instantiation Breakdown: {}", breakdown.join(" | "))
            }
            LogEntry::Complete => f.write_str("Oink Log Entry Complete"),
        }
    }
}
