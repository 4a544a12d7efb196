//! Oink: per-request memory and instantiation logging for tower services.
//!
//! After the wrapped service answers, [`OinkLayer`] writes one log entry with
//! the route that served the request, the process memory and the objects the
//! data layer materialized while handling it.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use axum::{routing::get, Router};
//! use oink::{OinkLayer, RequestContext, DispatchParameters, TracingLogger};
//!
//! async fn show(ctx: RequestContext) -> &'static str {
//!     ctx.insert(DispatchParameters::new("users", "show"));
//!     ctx.record_instantiation("User");
//!     "ok"
//! }
//!
//! let layer = OinkLayer::builder()
//!     .logger(Arc::new(TracingLogger))
//!     .build()
//!     .unwrap();
//! let app: Router = Router::new().route("/users/{id}", get(show)).layer(layer);
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod instrumentation;
pub mod observability;
pub mod routing;

pub use config::OinkConfig;
pub use error::InstrumentError;
pub use http::{HttpServer, OinkLayer, OinkService};
pub use instrumentation::{
    CounterScope, Instrument, InstantiationCounter, InstantiationCounts, InstantiationTracker,
    MemorySampler,
};
pub use observability::{BufferLogger, FileLogger, LogEntry, OinkLogger, TracingLogger};
pub use routing::{
    ApiEndpoint, ApiRoute, DispatchParameters, EndpointEnv, LegacyPathParameters, Params,
    RequestContext, Resolver, RoutingRecord, RoutingSource,
};
