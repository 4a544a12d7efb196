//! Per-request context shared between the instrumentation layer and the
//! handlers it wraps.
//!
//! The layer creates a [`RequestContext`] before calling downstream and keeps
//! a handle to it. Whatever framework ends up serving the request records its
//! routing shape into the context; the layer reads it back once the response
//! is ready.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::Extensions;

use crate::instrumentation::instantiation::InstantiationScope;

/// JSON object used for body and query parameters.
pub type Params = serde_json::Map<String, serde_json::Value>;

/// Shared, typed request metadata.
///
/// Cloning is cheap and every clone sees the same fields.
#[derive(Clone, Debug, Default)]
pub struct RequestContext {
    path_info: Option<String>,
    fields: Arc<Mutex<Extensions>>,
}

impl RequestContext {
    /// Create a context for a request with the given path.
    pub fn new(path_info: impl Into<String>) -> Self {
        Self {
            path_info: Some(path_info.into()),
            fields: Arc::default(),
        }
    }

    /// The request path as seen by the layer.
    pub fn path_info(&self) -> Option<&str> {
        self.path_info.as_deref()
    }

    /// Store a typed field, returning the previous value of that type.
    pub fn insert<T: Clone + Send + Sync + 'static>(&self, value: T) -> Option<T> {
        self.fields
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(value)
    }

    /// Clone out a typed field, if present.
    pub fn get<T: Clone + Send + Sync + 'static>(&self) -> Option<T> {
        self.fields
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get::<T>()
            .cloned()
    }

    /// Count one instantiation of `type_name` against the active counter.
    ///
    /// No-op unless the layer attached an instantiation scope to this request.
    pub fn record_instantiation(&self, type_name: &str) {
        if let Some(InstantiationScope(counter)) = self.get::<InstantiationScope>() {
            counter.record(type_name);
        }
    }
}

impl<S: Send + Sync> FromRequestParts<S> for RequestContext {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Outside the layer a detached context is handed out; writes to it are dropped.
        Ok(parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .unwrap_or_default())
    }
}

/// Path parameters recorded by legacy controller dispatch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LegacyPathParameters(pub BTreeMap<String, String>);

impl LegacyPathParameters {
    pub fn new(controller: impl Into<String>, action: impl Into<String>) -> Self {
        let mut params = BTreeMap::new();
        params.insert("controller".to_string(), controller.into());
        params.insert("action".to_string(), action.into());
        Self(params)
    }
}

/// Parameters recorded by modern controller dispatch.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DispatchParameters {
    /// Routing parameters, including `controller` and `action`.
    pub path_parameters: BTreeMap<String, String>,
    /// Request body parameters.
    pub request_parameters: Params,
    /// Query string parameters.
    pub query_parameters: Params,
}

impl DispatchParameters {
    pub fn new(controller: impl Into<String>, action: impl Into<String>) -> Self {
        let mut path_parameters = BTreeMap::new();
        path_parameters.insert("controller".to_string(), controller.into());
        path_parameters.insert("action".to_string(), action.into());
        Self {
            path_parameters,
            ..Self::default()
        }
    }

    pub fn with_path_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_parameters.insert(key.into(), value.into());
        self
    }

    pub fn with_body(mut self, params: Params) -> Self {
        self.request_parameters = params;
        self
    }

    pub fn with_query(mut self, params: Params) -> Self {
        self.query_parameters = params;
        self
    }
}

/// A route declared on an API endpoint, e.g. `/v1/users/list(.:format)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiRoute {
    pub path: String,
}

impl ApiRoute {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

/// Per-request environment an API endpoint may carry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EndpointEnv {
    pub path_info: String,
    pub query: Params,
}

/// Endpoint descriptor recorded by the lightweight API framework.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ApiEndpoint {
    pub routes: Vec<ApiRoute>,
    pub env: Option<EndpointEnv>,
}

impl ApiEndpoint {
    pub fn new(routes: impl IntoIterator<Item = ApiRoute>) -> Self {
        Self {
            routes: routes.into_iter().collect(),
            env: None,
        }
    }

    pub fn with_env(mut self, env: EndpointEnv) -> Self {
        self.env = Some(env);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_fields() {
        let ctx = RequestContext::new("/users/1");
        let handle = ctx.clone();
        handle.insert(LegacyPathParameters::new("users", "show"));

        assert_eq!(ctx.path_info(), Some("/users/1"));
        assert_eq!(
            ctx.get::<LegacyPathParameters>(),
            Some(LegacyPathParameters::new("users", "show"))
        );
        assert!(ctx.get::<ApiEndpoint>().is_none());
    }

    #[test]
    fn test_default_context_has_no_path() {
        let ctx = RequestContext::default();
        assert_eq!(ctx.path_info(), None);
        // Without a scope this must not panic.
        ctx.record_instantiation("User");
    }
}
