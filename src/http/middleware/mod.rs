//! HTTP middleware.

pub mod oink;

pub use oink::{OinkLayer, OinkLayerBuilder, OinkService};
