//! Lightweight API framework endpoints.
//!
//! An endpoint only knows its declared routes, so controller and action are
//! derived from the first route: `/v1/users/list(.:format)` becomes
//! controller `v1/users`, action `list`.

use std::collections::BTreeMap;

use super::{stringify, ApiEndpoint, RequestContext, RoutingRecord, RoutingSource};

const FORMAT_SUFFIX: &str = "(.:format)";

/// Reads the API endpoint descriptor recorded by the API framework.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiEndpointRouting;

impl RoutingSource for ApiEndpointRouting {
    fn routing_record(&self, ctx: &RequestContext) -> Option<RoutingRecord> {
        let endpoint = ctx.get::<ApiEndpoint>()?;
        let route = current_route(&endpoint)?;

        let path_info = match &endpoint.env {
            Some(env) => env.path_info.clone(),
            None => route.to_owned(),
        };
        let params = endpoint
            .env
            .as_ref()
            .map(|env| stringify(&env.query))
            .unwrap_or_default();

        Some(RoutingRecord {
            request: controller_action(route),
            path_info: Some(path_info),
            params,
        })
    }
}

/// First declared route without its leading `/` and trailing format suffix.
fn current_route(endpoint: &ApiEndpoint) -> Option<&str> {
    let path = endpoint.routes.first()?.path.as_str();
    let path = path.strip_prefix('/').unwrap_or(path);
    Some(path.strip_suffix(FORMAT_SUFFIX).unwrap_or(path))
}

/// Split on the last `/`; both halves are empty when there is none.
fn controller_action(route: &str) -> BTreeMap<String, String> {
    let (controller, action) = route.rsplit_once('/').unwrap_or(("", ""));
    let mut request = BTreeMap::new();
    request.insert("controller".to_string(), controller.to_string());
    request.insert("action".to_string(), action.to_string());
    request
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::{ApiRoute, EndpointEnv, Params};

    fn resolve(endpoint: ApiEndpoint) -> Option<RoutingRecord> {
        let ctx = RequestContext::new("/ignored");
        ctx.insert(endpoint);
        ApiEndpointRouting.routing_record(&ctx)
    }

    #[test]
    fn test_route_without_env() {
        let record =
            resolve(ApiEndpoint::new([ApiRoute::new("/v1/users/list(.:format)")])).unwrap();
        assert_eq!(record.controller_action(), Some(("v1/users", "list")));
        assert_eq!(record.path_info.as_deref(), Some("v1/users/list"));
        assert_eq!(record.params, "");
    }

    #[test]
    fn test_route_with_env() {
        let mut query = Params::new();
        query.insert("limit".into(), "5".into());
        let endpoint = ApiEndpoint::new([ApiRoute::new("/status")]).with_env(EndpointEnv {
            path_info: "/status.json".into(),
            query,
        });

        let record = resolve(endpoint).unwrap();
        assert_eq!(record.controller_action(), None);
        assert_eq!(record.controller(), Some(""));
        assert_eq!(record.action(), Some(""));
        assert_eq!(record.path_info.as_deref(), Some("/status.json"));
        assert_eq!(record.params, r#"{"limit":"5"}"#);
    }

    #[test]
    fn test_env_with_empty_query_still_stringified() {
        let endpoint = ApiEndpoint::new([ApiRoute::new("/a/b")]).with_env(EndpointEnv {
            path_info: "/a/b".into(),
            query: Params::new(),
        });
        assert_eq!(resolve(endpoint).unwrap().params, "{}");
    }

    #[test]
    fn test_only_first_route_is_used() {
        let record = resolve(ApiEndpoint::new([
            ApiRoute::new("/things/show"),
            ApiRoute::new("/other/route"),
        ]))
        .unwrap();
        assert_eq!(record.controller_action(), Some(("things", "show")));
    }

    #[test]
    fn test_format_suffix_only_stripped_at_end() {
        let endpoint = ApiEndpoint::new([ApiRoute::new("/a(.:format)/b")]);
        assert_eq!(current_route(&endpoint), Some("a(.:format)/b"));
    }

    #[test]
    fn test_no_routes_is_not_applicable() {
        assert!(resolve(ApiEndpoint::default()).is_none());
    }
}
