//! Routing record lookup.
//!
//! # Design Decisions
//! - Immutable after construction (shared across requests without locks)
//! - Modern shapes (API endpoint, then dispatch) are tried before legacy
//! - First match wins; the order is not configurable

use super::{
    ApiEndpointRouting, DispatchRouting, LegacyRouting, RequestContext, RoutingRecord,
    RoutingSource,
};

/// Fixed-order chain of routing sources.
#[derive(Debug)]
pub struct Resolver {
    modern: Vec<Box<dyn RoutingSource>>,
    legacy: Vec<Box<dyn RoutingSource>>,
}

impl Resolver {
    pub fn new() -> Self {
        Self {
            modern: vec![Box::new(ApiEndpointRouting), Box::new(DispatchRouting)],
            legacy: vec![Box::new(LegacyRouting)],
        }
    }

    /// Returns the first applicable record, or `None` for requests no
    /// framework claimed (static assets, bare handlers).
    pub fn resolve(&self, ctx: &RequestContext) -> Option<RoutingRecord> {
        first_match(&self.modern, ctx).or_else(|| first_match(&self.legacy, ctx))
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

fn first_match(sources: &[Box<dyn RoutingSource>], ctx: &RequestContext) -> Option<RoutingRecord> {
    sources.iter().find_map(|source| source.routing_record(ctx))
}
