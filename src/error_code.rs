//! Failure classes for remote calls.
//!
//! Every `RequestFailed` error maps onto one [`FailureClass`], so callers can
//! decide how to degrade (e.g. render no ads, retry on their own schedule)
//! without matching on transport details.
//!
//! | Prefix | Category | Description                           |
//! |--------|----------|---------------------------------------|
//! | C1xxx  | client   | Request rejected by the service       |
//! | C2xxx  | rate     | Rate limiting                         |
//! | C3xxx  | server   | Service-side or timing failures       |
//! | C4xxx  | local    | Network, decoding, caller cancellation |
//! | C9xxx  | unknown  | Catch-all                             |
//!
//! ## Example
//!
//! ```rust
//! use patternos_sdk::error_code::FailureClass;
//!
//! let class = FailureClass::from_http_status(429);
//! assert_eq!(class.code(), "C2001");
//! assert!(class.retryable());
//! assert_eq!(class.category(), "rate");
//! ```

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureClass {
    /// C1001: Malformed request or rejected parameters
    InvalidRequest,
    /// C1002: Invalid or missing API key
    Authentication,
    /// C1003: Key is valid but not allowed for this aggregator
    PermissionDenied,
    /// C1004: Unknown endpoint, user, or resource
    NotFound,
    /// C2001: Too many requests
    RateLimited,
    /// C3001: Internal error on the service side
    ServerError,
    /// C3002: Service temporarily overloaded
    Overloaded,
    /// C3003: No response within the configured timeout
    Timeout,
    /// C4001: Connection could not be established or was reset
    Network,
    /// C4002: Response body did not match the expected shape
    Decode,
    /// C4003: Request aborted through a cancellation token
    Cancelled,
    /// C9999: Could not be classified
    Unknown,
}

impl FailureClass {
    /// Returns the code string (e.g., `"C1001"`).
    #[inline]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "C1001",
            Self::Authentication => "C1002",
            Self::PermissionDenied => "C1003",
            Self::NotFound => "C1004",
            Self::RateLimited => "C2001",
            Self::ServerError => "C3001",
            Self::Overloaded => "C3002",
            Self::Timeout => "C3003",
            Self::Network => "C4001",
            Self::Decode => "C4002",
            Self::Cancelled => "C4003",
            Self::Unknown => "C9999",
        }
    }

    /// Returns the snake_case name (e.g., `"invalid_request"`).
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::Authentication => "authentication",
            Self::PermissionDenied => "permission_denied",
            Self::NotFound => "not_found",
            Self::RateLimited => "rate_limited",
            Self::ServerError => "server_error",
            Self::Overloaded => "overloaded",
            Self::Timeout => "timeout",
            Self::Network => "network",
            Self::Decode => "decode",
            Self::Cancelled => "cancelled",
            Self::Unknown => "unknown",
        }
    }

    /// Whether a caller-side retry may succeed. The client itself never retries.
    #[inline]
    pub fn retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited | Self::ServerError | Self::Overloaded | Self::Timeout | Self::Network
        )
    }

    /// Returns the category: `"client"`, `"rate"`, `"server"`, `"local"`, or `"unknown"`.
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidRequest
            | Self::Authentication
            | Self::PermissionDenied
            | Self::NotFound => "client",
            Self::RateLimited => "rate",
            Self::ServerError | Self::Overloaded | Self::Timeout => "server",
            Self::Network | Self::Decode | Self::Cancelled => "local",
            Self::Unknown => "unknown",
        }
    }

    /// Maps an HTTP status code to the most likely class.
    pub fn from_http_status(status: u16) -> Self {
        match status {
            400 | 422 => Self::InvalidRequest,
            401 => Self::Authentication,
            403 => Self::PermissionDenied,
            404 => Self::NotFound,
            408 | 504 => Self::Timeout,
            429 => Self::RateLimited,
            503 => Self::Overloaded,
            500..=599 => Self::ServerError,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for FailureClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(FailureClass::from_http_status(400), FailureClass::InvalidRequest);
        assert_eq!(FailureClass::from_http_status(401), FailureClass::Authentication);
        assert_eq!(FailureClass::from_http_status(403), FailureClass::PermissionDenied);
        assert_eq!(FailureClass::from_http_status(404), FailureClass::NotFound);
        assert_eq!(FailureClass::from_http_status(429), FailureClass::RateLimited);
        assert_eq!(FailureClass::from_http_status(500), FailureClass::ServerError);
        assert_eq!(FailureClass::from_http_status(502), FailureClass::ServerError);
        assert_eq!(FailureClass::from_http_status(503), FailureClass::Overloaded);
        assert_eq!(FailureClass::from_http_status(504), FailureClass::Timeout);
        assert_eq!(FailureClass::from_http_status(302), FailureClass::Unknown);
    }

    #[test]
    fn test_client_errors_are_not_retryable() {
        for class in [
            FailureClass::InvalidRequest,
            FailureClass::Authentication,
            FailureClass::PermissionDenied,
            FailureClass::NotFound,
            FailureClass::Decode,
            FailureClass::Cancelled,
        ] {
            assert!(!class.retryable(), "{} should not be retryable", class.name());
        }
        assert!(FailureClass::Timeout.retryable());
        assert_eq!(FailureClass::Timeout.to_string(), "C3003");
    }
}
