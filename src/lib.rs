pub mod cli;
pub mod config;
pub mod http;
pub mod log;

pub use crate::config::{ViewerConfig, load_configuration};
pub use crate::http::{EndpointRegistry, NodeRpcClient, NodeStatus, Peer, RpcError, UnconfirmedTxs};
