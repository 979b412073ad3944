//! Presentation-ready records returned by [`NodeRpcClient`](super::NodeRpcClient).
//!
//! These are built fresh from each response and never mutated afterwards.
//! Field names serialize in camelCase so a front end can consume them as-is.

use serde::{Deserialize, Serialize};

/// Summary of the node's `/status` endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeStatus {
    pub moniker: String,
    pub network: String,
    pub version: String,
    pub latest_block_height: i64,
    pub earliest_block_height: i64,
    pub catching_up: bool,
}

/// A peer reported by `/net_info`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Peer {
    pub id: String,
    pub moniker: String,
    pub remote_ip: String,
}

/// Mempool summary from `/unconfirmed_txs`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnconfirmedTxs {
    pub total: i64,
    /// Transaction encodings as reported by the node (base64).
    pub txs: Vec<String>,
}
