//! Process memory sampling.
//!
//! All samplers report resident memory in kilobytes.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sysinfo::{ProcessesToUpdate, System};

use crate::error::InstrumentError;

const STATM_PATH: &str = "/proc/self/statm";
const STATUS_PATH: &str = "/proc/self/status";

pub const DEFAULT_PAGE_SIZE: u64 = 4096;

/// Source of the current process memory figure.
pub trait MemorySampler: Send + Sync {
    fn memory(&self) -> Result<u64, InstrumentError>;
}

/// Which sampler to build from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MemorySource {
    /// `statm` when the proc filesystem is readable, `sysinfo` otherwise.
    #[default]
    Auto,
    Statm,
    Status,
    Sysinfo,
}

impl MemorySource {
    pub fn sampler(self, page_size: u64) -> Box<dyn MemorySampler> {
        match self {
            MemorySource::Auto => detect_sampler(page_size),
            MemorySource::Statm => Box::new(StatmSampler::new(page_size)),
            MemorySource::Status => Box::new(ProcStatusSampler::new()),
            MemorySource::Sysinfo => Box::new(SysinfoSampler),
        }
    }
}

/// Pick the cheapest sampler available on this host.
pub fn detect_sampler(page_size: u64) -> Box<dyn MemorySampler> {
    if Path::new(STATM_PATH).is_file() {
        Box::new(StatmSampler::new(page_size))
    } else {
        tracing::debug!("{} not readable, sampling memory through sysinfo", STATM_PATH);
        Box::new(SysinfoSampler)
    }
}

/// Resident pages from `/proc/self/statm`.
#[derive(Debug, Clone)]
pub struct StatmSampler {
    path: PathBuf,
    page_size: u64,
}

impl StatmSampler {
    pub fn new(page_size: u64) -> Self {
        Self::with_path(STATM_PATH, page_size)
    }

    pub fn with_path(path: impl Into<PathBuf>, page_size: u64) -> Self {
        Self {
            path: path.into(),
            page_size,
        }
    }
}

impl MemorySampler for StatmSampler {
    fn memory(&self) -> Result<u64, InstrumentError> {
        let content = read(&self.path)?;
        parse_statm(&content, self.page_size).ok_or_else(|| InstrumentError::Malformed {
            path: self.path.clone(),
            reason: "missing resident page count".to_string(),
        })
    }
}

/// `VmRSS` from `/proc/self/status`.
#[derive(Debug, Clone)]
pub struct ProcStatusSampler {
    path: PathBuf,
}

impl ProcStatusSampler {
    pub fn new() -> Self {
        Self::with_path(STATUS_PATH)
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for ProcStatusSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySampler for ProcStatusSampler {
    fn memory(&self) -> Result<u64, InstrumentError> {
        let content = read(&self.path)?;
        parse_status(&content).ok_or_else(|| InstrumentError::Malformed {
            path: self.path.clone(),
            reason: "no VmRSS line".to_string(),
        })
    }
}

/// Cross-platform sampler backed by `sysinfo`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SysinfoSampler;

impl MemorySampler for SysinfoSampler {
    fn memory(&self) -> Result<u64, InstrumentError> {
        let pid = sysinfo::get_current_pid()
            .map_err(|e| InstrumentError::Unavailable(e.to_string()))?;
        let mut system = System::new();
        system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
        system
            .process(pid)
            .map(|process| process.memory() / 1024)
            .ok_or(InstrumentError::ProcessNotFound(pid.as_u32()))
    }
}

fn read(path: &Path) -> Result<String, InstrumentError> {
    fs::read_to_string(path).map_err(|source| InstrumentError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Second field of statm is the resident set size in pages.
fn parse_statm(content: &str, page_size: u64) -> Option<u64> {
    let pages: u64 = content.split_whitespace().nth(1)?.parse().ok()?;
    Some(pages.saturating_mul(page_size) / 1024)
}

fn parse_status(content: &str) -> Option<u64> {
    content.lines().find_map(|line| {
        line.strip_prefix("VmRSS:")?
            .split_whitespace()
            .next()?
            .parse()
            .ok()
    })
}
