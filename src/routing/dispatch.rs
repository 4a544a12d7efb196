//! Modern controller dispatch.

use super::{stringify, DispatchParameters, Params, RequestContext, RoutingRecord, RoutingSource};

/// Reads the dispatch parameters recorded by the modern dispatcher.
#[derive(Debug, Clone, Copy, Default)]
pub struct DispatchRouting;

impl RoutingSource for DispatchRouting {
    fn routing_record(&self, ctx: &RequestContext) -> Option<RoutingRecord> {
        let dispatch = ctx.get::<DispatchParameters>()?;
        let params = request_params(&dispatch.request_parameters, &dispatch.query_parameters);
        Some(RoutingRecord {
            request: dispatch.path_parameters,
            path_info: ctx.path_info().map(str::to_owned),
            params,
        })
    }
}

/// Body parameters first, then query parameters, skipping empty maps.
fn request_params(body: &Params, query: &Params) -> String {
    [body, query]
        .into_iter()
        .filter(|params| !params.is_empty())
        .map(stringify)
        .collect::<Vec<_>>()
        .join(" ")
}
