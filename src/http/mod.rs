//! HTTP client module for node RPC communication.
//!
//! This module queries a node's HTTP RPC endpoint (`/status`, `/net_info`,
//! `/unconfirmed_txs`) and normalizes its loosely typed JSON into stable
//! records: [`NodeStatus`], [`Peer`] and [`UnconfirmedTxs`].
//!
//! # Architecture
//!
//! - [`EndpointRegistry`] - shared, normalized base URL read by every request
//! - [`NodeRpcClient`] - one method per query, plus a base URL override
//! - [`RpcError`] - construction, transport, status and decode failures
//! - Private wire schemas that apply the zero and empty-list defaults
//!
//! Each call is a single attempt: there is no retry, caching, or streaming.
//! Callers that want retries can consult [`RpcError::is_transient`].

mod endpoint;
mod error;
mod http_client;
mod node_rpc_client;
mod types;
mod wire;

pub use endpoint::{DEFAULT_RPC_URL, EndpointRegistry, normalize_base_url};
pub use error::{DecodeError, RpcError, TransportError};
pub use http_client::DEFAULT_REQUEST_TIMEOUT_SECS;
pub use node_rpc_client::{DEFAULT_UNCONFIRMED_TXS_LIMIT, NodeRpcClient};
pub use types::{NodeStatus, Peer, UnconfirmedTxs};
