//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → OinkConfig (validated, immutable)
//!     → OinkLayer::from_config
//! ```
//!
//! # Design Decisions
//! - Config is immutable once the layer is built
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    ListenerConfig, LogConfig, LogSink, MiddlewareConfig, ObservabilityConfig, OinkConfig,
};
pub use validation::ValidationError;
