//! Deprecated API Gate
//!
//! Declines requests to deprecated REST endpoints before they reach a
//! handler. Endpoints are declared with Ant-style paths and an optional
//! method list; a request that matches gets a 404 with a JSON error body.
//!
//! # Features
//!
//! - **Declarations**: `<ant-path> [METHOD ...]`, methods optional
//! - **Ant Patterns**: `?`, `*`, `**` and `{name}` template variables
//! - **Axum Middleware**: drop-in layer for any axum router
//! - **Startup Report**: lists the registered routes that are disabled
//! - **Usage Tracking**: Prometheus counters for declined requests
//!
//! # Example Configuration
//!
//! ```yaml
//! deprecated:
//!   api:
//!     disabled: true
//!     patterns:
//!       - "/deprecated-api/v1/** [POST GET DELETE]"
//!       - "/deprecated-api/v2/**"
//! ```

pub mod antpath;
pub mod config;
pub mod declaration;
pub mod error;
pub mod gate;
pub mod metrics;
pub mod normalize;
pub mod registry;
pub mod response;
pub mod router;

pub use config::{DeprecatedApiConfig, GateConfig};
pub use error::{ConfigError, DeprecatedApiError};
pub use gate::{deprecation_middleware, DeprecationGate, GateDecision, RegisteredRoute};
pub use registry::{MatchVerdict, MethodSet, PatternRegistry};
pub use router::GatedRouter;
