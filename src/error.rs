use crate::error_code::FailureClass;
use thiserror::Error;

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Field path or configuration key that caused the error (e.g., "config.api_key", "request.ad_slots[1].id")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected type, actual value)
    pub details: Option<String>,
    /// Source of the error (e.g., "config_validator", "request_validator")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Why a remote call did not produce a usable payload.
#[derive(Debug, Error)]
pub enum RequestFailure {
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid response body: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("cancelled by caller")]
    Cancelled,
}

impl RequestFailure {
    /// Stable classification of this failure.
    pub fn class(&self) -> FailureClass {
        match self {
            RequestFailure::Transport(e) if e.is_timeout() => FailureClass::Timeout,
            RequestFailure::Transport(_) => FailureClass::Network,
            RequestFailure::Timeout { .. } => FailureClass::Timeout,
            RequestFailure::Status { status, .. } => FailureClass::from_http_status(*status),
            RequestFailure::Decode(_) => FailureClass::Decode,
            RequestFailure::Cancelled => FailureClass::Cancelled,
        }
    }
}

/// Unified error type for the SDK.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Validation error: {message}{}", format_context(.context))]
    Validation {
        message: String,
        context: ErrorContext,
    },

    #[error("Request failed: {operation} [{request_id}]: {failure}")]
    RequestFailed {
        operation: &'static str,
        request_id: String,
        #[source]
        failure: RequestFailure,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    /// Create a new configuration error with structured context
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    /// Create a new validation error with structured context
    pub fn validation_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Validation {
            message: msg.into(),
            context,
        }
    }

    pub(crate) fn request_failed(
        operation: &'static str,
        request_id: impl Into<String>,
        failure: RequestFailure,
    ) -> Self {
        Error::RequestFailed {
            operation,
            request_id: request_id.into(),
            failure,
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. } | Error::Validation { context, .. } => {
                Some(context)
            }
            _ => None,
        }
    }

    /// The transport-level cause when this is a `RequestFailed` error.
    pub fn request_failure(&self) -> Option<&RequestFailure> {
        match self {
            Error::RequestFailed { failure, .. } => Some(failure),
            _ => None,
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration { .. })
    }

    pub fn is_request_failed(&self) -> bool {
        matches!(self, Error::RequestFailed { .. })
    }

    /// Failure class of a `RequestFailed` error; `None` for local errors.
    pub fn failure_class(&self) -> Option<FailureClass> {
        self.request_failure().map(RequestFailure::class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_is_rendered_in_display() {
        let err = Error::configuration_with_context(
            "api_key must not be empty",
            ErrorContext::new()
                .with_field_path("config.api_key")
                .with_source("config_validator"),
        );
        let text = err.to_string();
        assert!(text.starts_with("Configuration error: api_key must not be empty"));
        assert!(text.contains("field: config.api_key"));
        assert!(text.contains("source: config_validator"));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_request_failed_exposes_failure_class() {
        let err = Error::request_failed(
            "request_ads",
            "req-1",
            RequestFailure::Status {
                status: 503,
                body: "busy".into(),
            },
        );
        assert!(err.is_request_failed());
        assert_eq!(err.failure_class(), Some(FailureClass::Overloaded));
        assert!(err.to_string().contains("request_ads [req-1]: HTTP 503: busy"));
    }

    #[test]
    fn test_local_errors_have_no_failure_class() {
        let err = Error::validation_with_context("ad_slots must not be empty", ErrorContext::new());
        assert_eq!(err.failure_class(), None);
        assert!(err.context().is_some());
    }
}
