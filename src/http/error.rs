//! Error types for node RPC operations.
//!
//! [`RpcError`] separates the four ways a call can fail so callers can match
//! on the kind instead of inspecting messages:
//!
//! - [`RequestConstruction`](RpcError::RequestConstruction): the request could
//!   not be built (empty path, unparseable URL)
//! - [`Transport`](RpcError::Transport): the node could not be reached or the
//!   call was cancelled or timed out
//! - [`Status`](RpcError::Status): the node answered with a non-2xx status
//! - [`Decode`](RpcError::Decode): the node answered with something that does
//!   not match the endpoint's schema
//!
//! # Example
//!
//! ```rust,no_run
//! use tmview::http::RpcError;
//!
//! fn describe(err: &RpcError) -> &'static str {
//!     match err {
//!         RpcError::Transport { .. } => "node unreachable",
//!         RpcError::Status { .. } => "node returned an error status",
//!         RpcError::Decode { .. } => "node returned something we cannot interpret",
//!         RpcError::RequestConstruction { .. } => "invalid request",
//!     }
//! }
//! ```

use std::num::ParseIntError;

use reqwest::StatusCode;
use thiserror::Error;

/// Errors returned by [`NodeRpcClient`](super::NodeRpcClient) operations.
#[derive(Debug, Error)]
pub enum RpcError {
    /// The request could not be constructed.
    ///
    /// Never expected for the fixed endpoints, but also raised when the
    /// configured base URL does not form a valid URL with the path.
    #[error("Invalid request for {path:?}: {reason}")]
    RequestConstruction { path: String, reason: String },

    /// The request never produced a response.
    ///
    /// Covers DNS failures, refused connections, timeouts, failures while
    /// reading the body, and cancellation by the caller. Usually transient.
    #[error("Request {path} failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: TransportError,
    },

    /// The node answered with a status outside `200..300`.
    #[error("rpc error ({status}): {snippet}")]
    Status {
        path: String,
        status: StatusCode,
        /// Trimmed response body, or a placeholder when the body was empty.
        snippet: String,
    },

    /// The response body does not match the endpoint's expected schema.
    #[error("Failed to decode {endpoint}: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: DecodeError,
    },
}

impl RpcError {
    /// Whether a caller-side retry has a reasonable chance of succeeding.
    ///
    /// Transport failures are transient, as are `429` and `5xx` statuses.
    /// Decode failures indicate a protocol mismatch and are never transient.
    pub fn is_transient(&self) -> bool {
        match self {
            RpcError::Transport { .. } => true,
            RpcError::Status { status, .. } => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            },
            RpcError::RequestConstruction { .. } | RpcError::Decode { .. } => false,
        }
    }

    /// The request path (or endpoint) the error relates to.
    pub fn path(&self) -> &str {
        match self {
            RpcError::RequestConstruction { path, .. }
            | RpcError::Transport { path, .. }
            | RpcError::Status { path, .. } => path,
            RpcError::Decode { endpoint, .. } => endpoint,
        }
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("request cancelled")]
    Cancelled,
}

impl TransportError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, TransportError::Http(err) if err.is_timeout())
    }
}

#[derive(Debug, Error)]
pub enum DecodeError {
    /// The body is not JSON, or a field has the wrong JSON type.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// A string-encoded integer field holds something other than digits.
    #[error("invalid integer {value:?} in field {field}: {source}")]
    InvalidInteger {
        field: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },
}
