//! Shared fakes for the integration tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use oink::error::InstrumentError;
use oink::{BufferLogger, InstantiationCounter, InstantiationTracker, MemorySampler};

/// Sampler that always reports the same figure.
pub struct FixedSampler(pub u64);

impl MemorySampler for FixedSampler {
    fn memory(&self) -> Result<u64, InstrumentError> {
        Ok(self.0)
    }
}

/// Sampler that always fails.
#[allow(dead_code)]
pub struct FailingSampler;

impl MemorySampler for FailingSampler {
    fn memory(&self) -> Result<u64, InstrumentError> {
        Err(InstrumentError::Unavailable("sampler offline".into()))
    }
}

/// Tracker that also counts how often it was reset.
#[derive(Default)]
pub struct CountingCounter {
    inner: InstantiationTracker,
    resets: AtomicUsize,
}

#[allow(dead_code)]
impl CountingCounter {
    pub fn resets(&self) -> usize {
        self.resets.load(Ordering::SeqCst)
    }
}

impl InstantiationCounter for CountingCounter {
    fn record(&self, type_name: &str) {
        self.inner.record(type_name);
    }

    fn instantiated(&self) -> HashMap<String, u64> {
        self.inner.instantiated()
    }

    fn total(&self) -> u64 {
        self.inner.total()
    }

    fn reset(&self) {
        self.resets.fetch_add(1, Ordering::SeqCst);
        self.inner.reset();
    }
}

/// Logger, sampler and counter wired into one layer builder.
pub struct Harness {
    pub logger: BufferLogger,
    pub counter: Arc<CountingCounter>,
}

#[allow(dead_code)]
impl Harness {
    pub fn new() -> Self {
        Self {
            logger: BufferLogger::new(),
            counter: Arc::new(CountingCounter::default()),
        }
    }

    pub fn builder(&self, memory: u64) -> oink::http::OinkLayerBuilder {
        oink::OinkLayer::builder()
            .logger(Arc::new(self.logger.clone()))
            .memory_sampler(Arc::new(FixedSampler(memory)))
            .counter(self.counter.clone())
    }
}
