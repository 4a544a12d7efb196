//! Oink instrumentation layer.
//!
//! Wraps a service, lets it produce its response, then writes one Oink log
//! entry for the request:
//!
//! ```text
//! Oink Action: users#show          (or "Oink Path: ..." with `path = true`)
//! Oink Params: {"page":"2"}
//! Memory usage: 104212 | PID: 4242
//! Instantiation Breakdown: Total: 13 | Post: 10 | User: 3
//! Oink Log Entry Complete
//! ```
//!
//! Routing lines are skipped when no framework recorded its routing shape in
//! the [`RequestContext`]. A downstream error propagates untouched and nothing
//! is logged for that request. If the memory sampler fails, the remaining
//! lines for that request are dropped and the failure is reported through
//! `tracing`; the response is still returned as-is.

use std::collections::BTreeSet;
use std::io;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::http::{Request, Response};
use futures_util::future::BoxFuture;
use tower::{Layer, Service};

use crate::config::{LogSink, OinkConfig};
use crate::error::InstrumentError;
use crate::instrumentation::memory::DEFAULT_PAGE_SIZE;
use crate::instrumentation::{
    breakdown, detect_sampler, CounterScope, Instrument, InstantiationCounter, InstantiationScope,
    InstantiationTracker, MemorySampler,
};
use crate::observability::{FileLogger, LogEntry, OinkLogger, TracingLogger};
use crate::routing::{RequestContext, Resolver};

const DEFAULT_LOG_FILE: &str = "log/oink.log";
const DEFAULT_PROGRAM: &str = "rails";

/// Shared, read-only state of one layer instance.
struct Instruments {
    path: bool,
    enabled: BTreeSet<Instrument>,
    scope: CounterScope,
    logger: Arc<dyn OinkLogger>,
    sampler: Arc<dyn MemorySampler>,
    counter: Arc<dyn InstantiationCounter>,
    resolver: Resolver,
}

impl Instruments {
    fn enabled(&self, instrument: Instrument) -> bool {
        self.enabled.contains(&instrument)
    }

    /// Context handed to downstream for one request.
    fn context_for<B>(&self, req: &Request<B>) -> RequestContext {
        let ctx = RequestContext::new(req.uri().path());
        if self.enabled(Instrument::ActiveRecord) {
            let counter: Arc<dyn InstantiationCounter> = match self.scope {
                CounterScope::Process => self.counter.clone(),
                CounterScope::Request => Arc::new(InstantiationTracker::new()),
            };
            ctx.insert(InstantiationScope(counter));
        }
        ctx
    }

    fn emit(&self, entry: LogEntry) {
        self.logger.info(&entry.to_string());
    }

    fn log_request(&self, ctx: &RequestContext) {
        if let Err(error) = self.try_log_request(ctx) {
            tracing::error!(
                path = ctx.path_info().unwrap_or_default(),
                error = %error,
                "Oink log entry aborted"
            );
        }
    }

    fn try_log_request(&self, ctx: &RequestContext) -> Result<(), InstrumentError> {
        self.log_routing(ctx);
        self.log_memory()?;
        self.log_instantiation(ctx);
        self.emit(LogEntry::Complete);
        Ok(())
    }

    fn log_routing(&self, ctx: &RequestContext) {
        let Some(record) = self.resolver.resolve(ctx) else {
            return;
        };

        match (&record.path_info, record.controller_action()) {
            (Some(path), _) if self.path => self.emit(LogEntry::Path(path.clone())),
            (_, Some((controller, action))) => self.emit(LogEntry::Action {
                controller: controller.to_string(),
                action: action.to_string(),
            }),
            _ => {}
        }
        self.emit(LogEntry::Params(record.params));
    }

    fn log_memory(&self) -> Result<(), InstrumentError> {
        if self.enabled(Instrument::Memory) {
            let usage = self.sampler.memory()?;
            self.emit(LogEntry::Memory {
                usage,
                pid: std::process::id(),
            });
        }
        Ok(())
    }

    fn log_instantiation(&self, ctx: &RequestContext) {
        if !self.enabled(Instrument::ActiveRecord) {
            return;
        }
        let counter = ctx
            .get::<InstantiationScope>()
            .map(|InstantiationScope(counter)| counter)
            .unwrap_or_else(|| self.counter.clone());

        let counts = counter.counts();
        self.emit(LogEntry::Instantiation(breakdown(&counts)));
        counter.reset();
    }
}

/// Layer that applies [`OinkService`].
#[derive(Clone)]
pub struct OinkLayer {
    instruments: Arc<Instruments>,
}

impl OinkLayer {
    pub fn builder() -> OinkLayerBuilder {
        OinkLayerBuilder::default()
    }

    /// Build the layer described by a loaded configuration.
    pub fn from_config(config: &OinkConfig) -> io::Result<Self> {
        let logger: Arc<dyn OinkLogger> = match config.log.sink {
            LogSink::File => Arc::new(FileLogger::open(
                &config.log.file,
                config.log.program.clone(),
            )?),
            LogSink::Tracing => Arc::new(TracingLogger),
        };
        let sampler = config.middleware.memory_source.sampler(config.middleware.page_size);

        OinkLayer::builder()
            .path(config.middleware.path)
            .instruments(config.middleware.instruments.iter().copied())
            .counter_scope(config.middleware.counter_scope)
            .logger(logger)
            .memory_sampler(Arc::from(sampler))
            .build()
    }
}

impl<S> Layer<S> for OinkLayer {
    type Service = OinkService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        OinkService {
            inner,
            instruments: self.instruments.clone(),
        }
    }
}

/// Builder for [`OinkLayer`].
///
/// Defaults: action logging, both instruments, a process-wide counter, the
/// host's memory sampler and a file logger at `log/oink.log`.
pub struct OinkLayerBuilder {
    path: bool,
    enabled: BTreeSet<Instrument>,
    scope: CounterScope,
    logger: Option<Arc<dyn OinkLogger>>,
    sampler: Option<Arc<dyn MemorySampler>>,
    counter: Option<Arc<dyn InstantiationCounter>>,
}

impl Default for OinkLayerBuilder {
    fn default() -> Self {
        Self {
            path: false,
            enabled: [Instrument::Memory, Instrument::ActiveRecord].into(),
            scope: CounterScope::Process,
            logger: None,
            sampler: None,
            counter: None,
        }
    }
}

impl OinkLayerBuilder {
    /// Log `Oink Path:` instead of `Oink Action:` when a path is known.
    pub fn path(mut self, path: bool) -> Self {
        self.path = path;
        self
    }

    pub fn instruments(mut self, instruments: impl IntoIterator<Item = Instrument>) -> Self {
        self.enabled = instruments.into_iter().collect();
        self
    }

    pub fn counter_scope(mut self, scope: CounterScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn logger(mut self, logger: Arc<dyn OinkLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn memory_sampler(mut self, sampler: Arc<dyn MemorySampler>) -> Self {
        self.sampler = Some(sampler);
        self
    }

    /// Process-wide counter; defaults to [`InstantiationTracker::global`].
    pub fn counter(mut self, counter: Arc<dyn InstantiationCounter>) -> Self {
        self.counter = Some(counter);
        self
    }

    /// Fails only when the default file logger cannot be opened.
    pub fn build(self) -> io::Result<OinkLayer> {
        let logger: Arc<dyn OinkLogger> = match self.logger {
            Some(logger) => logger,
            None => Arc::new(FileLogger::open(DEFAULT_LOG_FILE, DEFAULT_PROGRAM)?),
        };
        let sampler = self
            .sampler
            .unwrap_or_else(|| Arc::from(detect_sampler(DEFAULT_PAGE_SIZE)));
        let counter = self
            .counter
            .unwrap_or_else(|| InstantiationTracker::global() as Arc<dyn InstantiationCounter>);

        if self.scope == CounterScope::Process && self.enabled.contains(&Instrument::ActiveRecord) {
            tracing::debug!(
                "Instantiation counts are process-wide; concurrent requests share and reset them"
            );
        }

        Ok(OinkLayer {
            instruments: Arc::new(Instruments {
                path: self.path,
                enabled: self.enabled,
                scope: self.scope,
                logger,
                sampler,
                counter,
                resolver: Resolver::new(),
            }),
        })
    }
}

/// Service produced by [`OinkLayer`].
#[derive(Clone)]
pub struct OinkService<S> {
    inner: S,
    instruments: Arc<Instruments>,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for OinkService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    ReqBody: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        let ctx = self.instruments.context_for(&req);
        req.extensions_mut().insert(ctx.clone());

        // Drive the instance that was polled ready; leave a fresh clone behind.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let instruments = self.instruments.clone();

        Box::pin(async move {
            let response = inner.call(req).await?;
            instruments.log_request(&ctx);
            Ok(response)
        })
    }
}
