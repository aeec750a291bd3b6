//! Router wrapper that remembers its routes.
//!
//! Axum cannot enumerate the routes of a built [`Router`], so routes are
//! recorded as they are added. [`GatedRouter::build`] uses that list for the
//! startup report and installs the gate in front of every route.

use crate::gate::{deprecation_middleware, DeprecationGate, RegisteredRoute};
use axum::handler::Handler;
use axum::http::Method;
use axum::routing::{self, MethodRouter};
use axum::Router;
use std::sync::Arc;

/// An axum [`Router`] plus the list of routes registered on it.
///
/// Only routes added through this type (directly, or via [`GatedRouter::nest`]
/// and [`GatedRouter::merge`]) appear in the startup report. Fallbacks,
/// stateful routers and routes added to the inner axum router some other way
/// are still gated by the middleware but are not listed.
#[derive(Default)]
pub struct GatedRouter {
    router: Router,
    routes: Vec<RegisteredRoute>,
}

impl GatedRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `method` on `path`.
    pub fn route(mut self, method: Method, path: &str, method_router: MethodRouter) -> Self {
        self.routes.push(RegisteredRoute::new(method.as_str(), path));
        self.router = self.router.route(path, method_router);
        self
    }

    pub fn get<H, T>(self, path: &str, handler: H) -> Self
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        self.route(Method::GET, path, routing::get(handler))
    }

    pub fn post<H, T>(self, path: &str, handler: H) -> Self
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        self.route(Method::POST, path, routing::post(handler))
    }

    pub fn put<H, T>(self, path: &str, handler: H) -> Self
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        self.route(Method::PUT, path, routing::put(handler))
    }

    pub fn patch<H, T>(self, path: &str, handler: H) -> Self
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        self.route(Method::PATCH, path, routing::patch(handler))
    }

    pub fn delete<H, T>(self, path: &str, handler: H) -> Self
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        self.route(Method::DELETE, path, routing::delete(handler))
    }

    /// Mount `other` under `prefix`, recording its routes with the prefix
    /// applied. `prefix` must not be `/`; use [`GatedRouter::merge`] there.
    pub fn nest(mut self, prefix: &str, other: GatedRouter) -> Self {
        let base = prefix.trim_end_matches('/');
        self.routes.extend(other.routes.into_iter().map(|route| {
            let path = if route.path == "/" {
                base.to_string()
            } else {
                format!("{}{}", base, route.path)
            };
            RegisteredRoute::new(route.method, path)
        }));
        self.router = self.router.nest(base, other.router);
        self
    }

    /// Combine the routes of `other` into this router.
    pub fn merge(mut self, other: GatedRouter) -> Self {
        self.routes.extend(other.routes);
        self.router = self.router.merge(other.router);
        self
    }

    /// Routes registered so far, in registration order.
    pub fn routes(&self) -> &[RegisteredRoute] {
        &self.routes
    }

    /// Finish the router. With a gate, the disabled routes are reported once
    /// and every request passes through the gate first. Without one the
    /// router is returned untouched.
    pub fn build(self, gate: Option<Arc<DeprecationGate>>) -> Router {
        match gate {
            Some(gate) => {
                gate.report_disabled_routes(&self.routes);
                self.router.layer(axum::middleware::from_fn_with_state(
                    gate,
                    deprecation_middleware,
                ))
            }
            None => self.router,
        }
    }
}
