//! Demo handlers, one per framework shape the layer understands.

use std::collections::HashMap;

use axum::extract::{Path, Query};
use axum::Json;
use serde_json::{json, Value};

use crate::routing::{
    ApiEndpoint, ApiRoute, DispatchParameters, EndpointEnv, LegacyPathParameters, Params,
    RequestContext,
};

fn to_params(query: HashMap<String, String>) -> Params {
    query
        .into_iter()
        .map(|(key, value)| (key, Value::String(value)))
        .collect()
}

/// Not claimed by any framework; produces no routing lines.
pub async fn index() -> &'static str {
    "oink"
}

/// Modern controller dispatch: `users#show`.
pub async fn show_user(
    ctx: RequestContext,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    ctx.insert(
        DispatchParameters::new("users", "show")
            .with_path_param("id", &id)
            .with_query(to_params(query)),
    );
    ctx.record_instantiation("User");

    Json(json!({ "id": id }))
}

/// Legacy controller dispatch.
pub async fn legacy_action(
    ctx: RequestContext,
    Path((controller, action)): Path<(String, String)>,
) -> String {
    ctx.insert(LegacyPathParameters::new(&controller, &action));
    format!("{}#{}", controller, action)
}

/// API endpoint declared as `/api/v1/status(.:format)`.
pub async fn api_status(
    ctx: RequestContext,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    let env = EndpointEnv {
        path_info: ctx.path_info().unwrap_or("/").to_string(),
        query: to_params(query),
    };
    ctx.insert(ApiEndpoint::new([ApiRoute::new("/api/v1/status(.:format)")]).with_env(env));
    ctx.record_instantiation("Widget");
    ctx.record_instantiation("Widget");

    Json(json!({ "status": "ok" }))
}
