//! Instrumentation facilities read after each request.
//!
//! # Data Flow
//! ```text
//! memory.rs         → resident memory of the process (KB)
//! instantiation.rs  → per-type object counts, fed by the data layer
//! breakdown.rs      → counts rendered as "Total: N | Type: n | ..."
//! ```

pub mod breakdown;
pub mod instantiation;
pub mod memory;

use serde::{Deserialize, Serialize};

pub use breakdown::breakdown;
pub use instantiation::{
    CounterScope, InstantiationCounter, InstantiationCounts, InstantiationScope,
    InstantiationTracker,
};
pub use memory::{
    detect_sampler, MemorySampler, MemorySource, ProcStatusSampler, StatmSampler, SysinfoSampler,
};

/// An instrument the layer can report on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Instrument {
    Memory,
    ActiveRecord,
}
