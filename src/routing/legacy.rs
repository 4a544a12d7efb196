//! Legacy controller dispatch.

use super::{LegacyPathParameters, RequestContext, RoutingRecord, RoutingSource};

/// Reads path parameters recorded by the legacy dispatcher.
///
/// Request parameters are never extracted for this shape; `params` is
/// always empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyRouting;

impl RoutingSource for LegacyRouting {
    fn routing_record(&self, ctx: &RequestContext) -> Option<RoutingRecord> {
        let LegacyPathParameters(request) = ctx.get::<LegacyPathParameters>()?;
        Some(RoutingRecord {
            request,
            path_info: ctx.path_info().map(str::to_owned),
            params: String::new(),
        })
    }
}
