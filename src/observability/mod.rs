//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Oink layer (after each request):
//!     → entry.rs  (typed LogEntry, rendered via Display)
//!     → logger.rs (file / tracing / in-memory sinks)
//!
//! Crate diagnostics:
//!     → logging.rs (tracing subscriber setup)
//! ```

pub mod entry;
pub mod logger;
pub mod logging;

pub use entry::LogEntry;
pub use logger::{BufferLogger, FileLogger, OinkLogger, TracingLogger};
