use std::borrow::Cow;
use std::time::{Duration, Instant};

use log::{debug, warn};
use tokio_util::sync::CancellationToken;
use url::Url;

use super::endpoint::EndpointRegistry;
use super::error::{RpcError, TransportError};

/// Upper bound on a single request, connection included.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

const USER_AGENT: &str = concat!("tmview/", env!("CARGO_PKG_VERSION"));
const EMPTY_BODY_PLACEHOLDER: &str = "no response body";

/// Issues single GET requests against the registry's current base URL.
///
/// No retries and no caching: each call is one attempt whose outcome is
/// reported as-is.
pub(crate) struct HttpClient {
    endpoint: EndpointRegistry,
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new(endpoint: EndpointRegistry) -> Result<Self, anyhow::Error> {
        Self::with_timeout(endpoint, Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
    }

    pub fn with_timeout(endpoint: EndpointRegistry, timeout: Duration) -> Result<Self, anyhow::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { endpoint, client })
    }

    pub fn endpoint(&self) -> &EndpointRegistry {
        &self.endpoint
    }

    /// Fetches `path` and returns the full response body of a 2xx response.
    ///
    /// The body is read completely before returning on every path, so the
    /// connection goes back to the pool whatever the caller does next.
    pub async fn get(&self, path: &str, cancel: &CancellationToken) -> Result<Vec<u8>, RpcError> {
        let path = resolve_path(path)?;
        let base_url = self.endpoint.get();
        let target = format!("{base_url}{path}");
        let url = Url::parse(&target).map_err(|err| RpcError::RequestConstruction {
            path: path.to_string(),
            reason: format!("invalid URL {target:?}: {err}"),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(RpcError::RequestConstruction {
                path: path.into_owned(),
                reason: format!("unsupported scheme {:?} in {target:?}", url.scheme()),
            });
        }

        let start = Instant::now();
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(TransportError::Cancelled),
            res = self.execute(url) => res,
        };
        let elapsed = start.elapsed();

        let (status, body) = match result {
            Ok(response) => response,
            Err(source) => {
                warn!(
                    path = &*path,
                    elapsed_ms = elapsed.as_millis() as u64,
                    timeout = source.is_timeout();
                    "RPC request failed: {}", source
                );
                return Err(RpcError::Transport {
                    path: path.into_owned(),
                    source,
                });
            },
        };

        debug!(
            path = &*path,
            status = status.as_u16(),
            bytes = body.len(),
            elapsed_ms = elapsed.as_millis() as u64;
            "RPC request completed"
        );

        if !status.is_success() {
            let snippet = String::from_utf8_lossy(&body).trim().to_string();
            let snippet = if snippet.is_empty() {
                EMPTY_BODY_PLACEHOLDER.to_string()
            } else {
                snippet
            };
            warn!(path = &*path, status = status.as_u16(); "RPC returned an error status");
            return Err(RpcError::Status {
                path: path.into_owned(),
                status,
                snippet,
            });
        }

        Ok(body)
    }

    async fn execute(&self, url: Url) -> Result<(reqwest::StatusCode, Vec<u8>), TransportError> {
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        let body = resp.bytes().await?;
        Ok((status, body.to_vec()))
    }
}

/// Ensures a request path is non-empty and starts with `/`.
pub(crate) fn resolve_path(path: &str) -> Result<Cow<'_, str>, RpcError> {
    if path.is_empty() {
        return Err(RpcError::RequestConstruction {
            path: String::new(),
            reason: "empty path".to_string(),
        });
    }
    if path.starts_with('/') {
        Ok(Cow::Borrowed(path))
    } else {
        Ok(Cow::Owned(format!("/{path}")))
    }
}
