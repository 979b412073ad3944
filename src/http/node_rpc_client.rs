//! High-level client for a node's HTTP RPC endpoint.
//!
//! [`NodeRpcClient`] exposes one method per supported query. Each call reads
//! the current base URL once, issues a single GET bounded by the request
//! timeout and the caller's [`CancellationToken`], and decodes the envelope
//! into a typed record.
//!
//! # Example
//!
//! ```rust,no_run
//! use tmview::http::{EndpointRegistry, NodeRpcClient};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> Result<(), anyhow::Error> {
//! let client = NodeRpcClient::new(EndpointRegistry::new("http://localhost:26657"))?;
//! let cancel = CancellationToken::new();
//!
//! let status = client.get_node_status(&cancel).await?;
//! println!("{} at height {}", status.moniker, status.latest_block_height);
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use log::info;
use tokio_util::sync::CancellationToken;

use super::endpoint::EndpointRegistry;
use super::error::RpcError;
use super::http_client::HttpClient;
use super::types::{NodeStatus, Peer, UnconfirmedTxs};
use super::wire::{self, NET_INFO_PATH, STATUS_PATH, UNCONFIRMED_TXS_PATH};
use crate::config::ViewerConfig;

/// Limit sent to `/unconfirmed_txs` when the caller asks for a non-positive one.
pub const DEFAULT_UNCONFIRMED_TXS_LIMIT: i64 = 50;

/// Client for the node's status, peer and mempool endpoints.
///
/// # Thread Safety
///
/// `NodeRpcClient` is `Send + Sync`; wrap it in an `Arc` and call it from as
/// many tasks as needed. The only shared mutable state is the base URL in the
/// [`EndpointRegistry`], which every request reads exactly once.
pub struct NodeRpcClient {
    http_client: HttpClient,
}

impl NodeRpcClient {
    /// Creates a client with the default 10 second request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be initialized
    /// (e.g. TLS backend failure).
    pub fn new(endpoint: EndpointRegistry) -> Result<Self, anyhow::Error> {
        let http_client = HttpClient::new(endpoint)?;
        Ok(Self { http_client })
    }

    pub fn with_timeout(endpoint: EndpointRegistry, timeout: Duration) -> Result<Self, anyhow::Error> {
        let http_client = HttpClient::with_timeout(endpoint, timeout)?;
        Ok(Self { http_client })
    }

    pub fn from_config(config: &ViewerConfig) -> Result<Self, anyhow::Error> {
        config.validate()?;
        Self::with_timeout(EndpointRegistry::new(&config.rpc_url), config.request_timeout())
    }

    /// The current base URL.
    pub fn base_url(&self) -> String {
        self.http_client.endpoint().get()
    }

    /// Handle to the shared base URL cell.
    pub fn endpoint(&self) -> &EndpointRegistry {
        self.http_client.endpoint()
    }

    /// Points subsequent requests at a new base URL.
    ///
    /// Requests already in flight keep the URL they started with. Blank input
    /// resets to [`DEFAULT_RPC_URL`](super::DEFAULT_RPC_URL).
    pub fn set_base_url(&self, base_url: &str) {
        self.http_client.endpoint().set(base_url);
        let current = self.base_url();
        info!(base_url = current.as_str(); "RPC base URL updated");
    }

    /// Queries `/status` and returns the node's identity and sync progress.
    ///
    /// # Errors
    ///
    /// - [`RpcError::Transport`] if the node is unreachable, the request times
    ///   out or `cancel` fires
    /// - [`RpcError::Status`] for a non-2xx response
    /// - [`RpcError::Decode`] if the body is not JSON, has the wrong shape, or
    ///   a block height is not a decimal string
    pub async fn get_node_status(&self, cancel: &CancellationToken) -> Result<NodeStatus, RpcError> {
        let body = self.http_client.get(STATUS_PATH, cancel).await?;
        wire::decode_node_status(&body)
    }

    /// Queries `/net_info` and returns the connected peers in the node's order.
    ///
    /// An empty peer list is a successful, empty result.
    pub async fn get_peers(&self, cancel: &CancellationToken) -> Result<Vec<Peer>, RpcError> {
        let body = self.http_client.get(NET_INFO_PATH, cancel).await?;
        wire::decode_peers(&body)
    }

    /// Queries `/unconfirmed_txs` for up to `limit` pending transactions.
    ///
    /// A `limit` of zero or less is replaced by [`DEFAULT_UNCONFIRMED_TXS_LIMIT`].
    pub async fn get_unconfirmed_txs(
        &self,
        limit: i64,
        cancel: &CancellationToken,
    ) -> Result<UnconfirmedTxs, RpcError> {
        let path = unconfirmed_txs_path(limit);
        let body = self.http_client.get(&path, cancel).await?;
        wire::decode_unconfirmed_txs(&body)
    }

    /// Returns the `/status` body re-indented for reading.
    ///
    /// Never fails to decode: a body that is not JSON is returned unchanged.
    /// Transport and status errors are still reported.
    pub async fn get_node_info_raw(&self, cancel: &CancellationToken) -> Result<String, RpcError> {
        let body = self.http_client.get(STATUS_PATH, cancel).await?;
        Ok(wire::pretty_print(&body))
    }
}

fn unconfirmed_txs_path(limit: i64) -> String {
    let limit = if limit <= 0 {
        DEFAULT_UNCONFIRMED_TXS_LIMIT
    } else {
        limit
    };
    format!("{UNCONFIRMED_TXS_PATH}?limit={limit}")
}
