//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::instrumentation::memory::DEFAULT_PAGE_SIZE;
use crate::instrumentation::{CounterScope, Instrument, MemorySource};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct OinkConfig {
    /// What the layer reports.
    pub middleware: MiddlewareConfig,

    /// Where Oink lines are written.
    pub log: LogConfig,

    /// Demo server listener.
    pub listener: ListenerConfig,

    /// Crate diagnostics.
    pub observability: ObservabilityConfig,
}

/// Layer behaviour. Immutable once the layer is built.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MiddlewareConfig {
    /// Log the request path instead of `controller#action`.
    pub path: bool,

    /// Enabled instruments.
    pub instruments: BTreeSet<Instrument>,

    /// Lifetime of the instantiation counter.
    pub counter_scope: CounterScope,

    /// Memory sampler selection.
    pub memory_source: MemorySource,

    /// Page size in bytes for the statm sampler.
    pub page_size: u64,
}

impl Default for MiddlewareConfig {
    fn default() -> Self {
        Self {
            path: false,
            instruments: [Instrument::Memory, Instrument::ActiveRecord].into(),
            counter_scope: CounterScope::Process,
            memory_source: MemorySource::Auto,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Oink log sink selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogSink {
    #[default]
    File,
    Tracing,
}

/// Oink log configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LogConfig {
    pub sink: LogSink,

    /// Log file for the `file` sink.
    pub file: PathBuf,

    /// Program name written in each file line.
    pub program: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            sink: LogSink::File,
            file: PathBuf::from("log/oink.log"),
            program: "rails".to_string(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3000".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
