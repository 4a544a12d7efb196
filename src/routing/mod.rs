//! Routing information resolution.
//!
//! # Data Flow
//! ```text
//! RequestContext (fields recorded by whichever framework served the request)
//!     → endpoint.rs  (lightweight API endpoint descriptor)
//!     → dispatch.rs  (modern controller dispatch parameters)
//!     → legacy.rs    (legacy controller path parameters)
//!     → resolver.rs  (fixed-order chain, first match wins)
//!     → Return: RoutingRecord or None
//! ```
//!
//! # Design Decisions
//! - Each framework shape is one `RoutingSource`; no runtime type sniffing
//! - Missing or malformed fields mean "not applicable", never an error
//! - No regex: route strings are split with plain string operations

pub mod context;
pub mod dispatch;
pub mod endpoint;
pub mod legacy;
pub mod resolver;

use std::collections::BTreeMap;

pub use context::{
    ApiEndpoint, ApiRoute, DispatchParameters, EndpointEnv, LegacyPathParameters, Params,
    RequestContext,
};
pub use dispatch::DispatchRouting;
pub use endpoint::ApiEndpointRouting;
pub use legacy::LegacyRouting;
pub use resolver::Resolver;

/// Normalized description of which handler served a request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoutingRecord {
    /// Controller-style routing keys (`controller`, `action`, ...).
    pub request: BTreeMap<String, String>,
    pub path_info: Option<String>,
    /// Stringified request parameters, possibly empty.
    pub params: String,
}

impl RoutingRecord {
    pub fn controller(&self) -> Option<&str> {
        self.request.get("controller").map(String::as_str)
    }

    pub fn action(&self) -> Option<&str> {
        self.request.get("action").map(String::as_str)
    }

    /// The controller/action pair, unless both halves are missing or empty.
    pub fn controller_action(&self) -> Option<(&str, &str)> {
        let controller = self.controller().unwrap_or_default();
        let action = self.action().unwrap_or_default();
        if controller.is_empty() && action.is_empty() {
            None
        } else {
            Some((controller, action))
        }
    }
}

/// A request-context shape that can be turned into a routing record.
pub trait RoutingSource: Send + Sync + std::fmt::Debug {
    /// Returns `None` when the context does not carry this shape.
    fn routing_record(&self, ctx: &RequestContext) -> Option<RoutingRecord>;
}

/// Compact JSON rendering of a parameter map.
pub(crate) fn stringify(params: &Params) -> String {
    serde_json::to_string(params).unwrap_or_default()
}
