//! HTTP integration.
//!
//! # Data Flow
//! ```text
//! Request
//!     → middleware/oink.rs (attach RequestContext, call downstream)
//!     → handlers.rs (record routing shape and instantiations)
//!     → middleware/oink.rs (write Oink log entry)
//!     → Response, unchanged
//! ```

pub mod handlers;
pub mod middleware;
pub mod server;

pub use middleware::{OinkLayer, OinkLayerBuilder, OinkService};
pub use server::HttpServer;
