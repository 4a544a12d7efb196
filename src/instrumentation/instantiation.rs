//! Object instantiation counting.
//!
//! The data layer reports each materialized record through
//! [`InstantiationCounter::record`]; the layer reads the counts once the
//! response is ready and then resets them.
//!
//! With [`CounterScope::Process`] a single counter is shared by every request
//! in flight. Concurrent requests then see each other's instantiations, and a
//! sibling request may reset the counts before they are logged.
//! [`CounterScope::Request`] gives each request its own tracker instead.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

/// Per-type instantiation counts plus the running total.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstantiationCounts {
    pub per_type: HashMap<String, u64>,
    pub total: u64,
}

/// Source of instantiation counts.
pub trait InstantiationCounter: Send + Sync {
    /// Hook called once per materialized object.
    fn record(&self, type_name: &str);

    fn instantiated(&self) -> HashMap<String, u64>;

    fn total(&self) -> u64;

    fn reset(&self);

    fn counts(&self) -> InstantiationCounts {
        InstantiationCounts {
            per_type: self.instantiated(),
            total: self.total(),
        }
    }
}

/// Lifetime of the counter the layer reads for a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CounterScope {
    /// One counter shared by the whole process.
    #[default]
    Process,
    /// A fresh counter for every request.
    Request,
}

/// Counter attached to a request's context.
#[derive(Clone)]
pub struct InstantiationScope(pub Arc<dyn InstantiationCounter>);

impl std::fmt::Debug for InstantiationScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstantiationScope")
            .field("total", &self.0.total())
            .finish()
    }
}

/// Concurrent instantiation tracker.
#[derive(Debug, Default)]
pub struct InstantiationTracker {
    per_type: DashMap<String, u64>,
    total: AtomicU64,
}

static GLOBAL: OnceLock<Arc<InstantiationTracker>> = OnceLock::new();

impl InstantiationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide tracker.
    pub fn global() -> Arc<InstantiationTracker> {
        GLOBAL.get_or_init(Arc::default).clone()
    }

    /// Record one instantiation of `T`, keyed by its unqualified type name.
    pub fn record_type<T: ?Sized>(&self) {
        self.record(short_type_name::<T>());
    }
}

impl InstantiationCounter for InstantiationTracker {
    fn record(&self, type_name: &str) {
        *self.per_type.entry(type_name.to_owned()).or_insert(0) += 1;
        self.total.fetch_add(1, Ordering::Relaxed);
    }

    fn instantiated(&self) -> HashMap<String, u64> {
        self.per_type
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect()
    }

    fn total(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }

    fn reset(&self) {
        self.per_type.clear();
        self.total.store(0, Ordering::Relaxed);
    }
}

fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    // Generic parameters may contain `::`, so only look before the first `<`.
    let head = full.split('<').next().unwrap_or(full);
    head.rsplit("::").next().unwrap_or(head)
}
