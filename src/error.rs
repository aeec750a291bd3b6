//! Error types for the deprecated API gate.
//!
//! Configuration problems are fatal and surface at startup. A request that
//! hits a deprecated endpoint is not a failure of the gate; it is reported as
//! a [`DeprecatedApiError`] that the middleware renders as a 404 response.

use crate::registry::MethodSet;
use thiserror::Error;

/// Errors raised while loading or validating the gate configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid path: '{entry}' valid pattern: '{grammar}'")]
    InvalidDeclaration { entry: String, grammar: String },

    #[error("property 'deprecated.api.patterns' must be provided and non-empty when property 'deprecated.api.disabled'=true")]
    MissingPatterns,

    #[error("invalid value '{value}' for {name}: expected true or false")]
    InvalidFlag { name: String, value: String },

    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Error code reported for every declined request.
pub const DEPRECATED_API_ERROR_CODE: &str = "NC-COMMON-2101";

/// Short title for [`DEPRECATED_API_ERROR_CODE`].
pub const DEPRECATED_API_ERROR_TITLE: &str =
    "Request is declined with 404 Not Found, because deprecated REST API is disabled";

/// A request addressed a deprecated endpoint while enforcement is on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Request [{method}] '{uri}' is declined with 404 Not Found, because the following deprecated REST API is disabled: {methods} {pattern}")]
pub struct DeprecatedApiError {
    /// Request method as received.
    pub method: String,
    /// Raw request URI, query string included.
    pub uri: String,
    /// Method list of the rule that matched.
    pub methods: MethodSet,
    /// Path pattern of the rule that matched.
    pub pattern: String,
}

impl DeprecatedApiError {
    /// Status code sent back to the client.
    pub fn status(&self) -> u16 {
        404
    }

    pub fn code(&self) -> &'static str {
        DEPRECATED_API_ERROR_CODE
    }

    pub fn reason(&self) -> &'static str {
        DEPRECATED_API_ERROR_TITLE
    }
}
