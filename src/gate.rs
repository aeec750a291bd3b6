//! The request gate.
//!
//! Holds the pattern registry built at startup and decides, per request,
//! whether the request addresses a deprecated endpoint. Declined requests are
//! answered with a 404 before they reach a handler.

use crate::config::DeprecatedApiConfig;
use crate::error::{ConfigError, DeprecatedApiError};
use crate::metrics::GateMetrics;
use crate::normalize::normalize_route_path;
use crate::registry::PatternRegistry;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Outcome of evaluating one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Pass the request on unchanged.
    Continue,
    /// The request hit a deprecated endpoint.
    Decline(DeprecatedApiError),
}

impl GateDecision {
    pub fn is_declined(&self) -> bool {
        matches!(self, GateDecision::Decline(_))
    }
}

/// A route as registered with the router: template path plus method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredRoute {
    pub method: String,
    pub path: String,
}

impl RegisteredRoute {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
        }
    }
}

/// Declines requests to deprecated endpoints.
pub struct DeprecationGate {
    registry: PatternRegistry,
    metrics: Arc<GateMetrics>,
}

impl DeprecationGate {
    /// Create a gate over an already parsed registry.
    pub fn new(registry: PatternRegistry) -> Self {
        Self::with_metrics(registry, Arc::new(GateMetrics::default()))
    }

    pub fn with_metrics(registry: PatternRegistry, metrics: Arc<GateMetrics>) -> Self {
        metrics.set_patterns(registry.len());

        info!(
            patterns = registry.len(),
            "Deprecated API gate initialized"
        );

        Self { registry, metrics }
    }

    /// Build a gate from configuration. Returns `None` when deprecated
    /// endpoints are not disabled.
    pub fn from_config(config: &DeprecatedApiConfig) -> Result<Option<Self>, ConfigError> {
        Ok(config.registry()?.map(Self::new))
    }

    pub fn registry(&self) -> &PatternRegistry {
        &self.registry
    }

    /// Get the metrics collector.
    pub fn metrics(&self) -> &GateMetrics {
        &self.metrics
    }

    /// Decide whether a request may proceed.
    ///
    /// `uri` is the raw request URI. Its query string and fragment are ignored
    /// for matching but kept in the error message.
    pub fn evaluate(&self, method: &str, uri: &str) -> GateDecision {
        let method_upper = method.to_ascii_uppercase();
        let path = request_path(uri);

        let verdict = self.registry.lookup(path, &method_upper);
        let (Some(pattern), Some(methods)) = (verdict.matched_pattern(), verdict.matched_methods())
        else {
            return GateDecision::Continue;
        };

        self.metrics.record_declined(pattern, &method_upper);

        let err = DeprecatedApiError {
            method: method.to_string(),
            uri: uri.to_string(),
            methods: methods.clone(),
            pattern: pattern.to_string(),
        };
        warn!(method = %method, uri = %uri, pattern = %pattern, "{}", err);

        GateDecision::Decline(err)
    }

    /// List the registered routes this gate disables, one `"<path> [M1,M2]"`
    /// line per route path, sorted by path.
    pub fn disabled_routes<'a, I>(&self, routes: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a RegisteredRoute>,
    {
        let mut disabled: BTreeMap<&str, Vec<&str>> = BTreeMap::new();

        for route in routes {
            let simple_path = normalize_route_path(&route.path);
            let method = route.method.to_ascii_uppercase();
            if !self.registry.lookup(&simple_path, &method).is_match() {
                continue;
            }

            debug!(route = %route.path, method = %route.method, "Route disabled");
            let methods = disabled.entry(route.path.as_str()).or_default();
            if !methods.contains(&route.method.as_str()) {
                methods.push(route.method.as_str());
            }
        }

        disabled
            .into_iter()
            .map(|(path, methods)| format!("{} [{}]", path, methods.join(",")))
            .collect()
    }

    /// Log the routes this gate disables, once, at warn level.
    pub fn report_disabled_routes<'a, I>(&self, routes: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a RegisteredRoute>,
    {
        let lines = self.disabled_routes(routes);
        warn!(
            "Disabling the following deprecated paths: \n{}",
            lines.join("\n")
        );
        lines
    }
}

/// Path part of a raw request URI.
fn request_path(uri: &str) -> &str {
    let end = uri.find(['?', '#']).unwrap_or(uri.len());
    &uri[..end]
}

/// Axum middleware that answers declined requests with a JSON 404.
///
/// ```ignore
/// let app = Router::new()
///     .route("/api/v1/users", get(list_users))
///     .layer(axum::middleware::from_fn_with_state(gate, deprecation_middleware));
/// ```
pub async fn deprecation_middleware(
    State(gate): State<Arc<DeprecationGate>>,
    req: Request,
    next: Next,
) -> Response {
    let uri = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    match gate.evaluate(req.method().as_str(), &uri) {
        GateDecision::Continue => next.run(req).await,
        GateDecision::Decline(err) => err.into_response(),
    }
}
