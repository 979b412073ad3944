use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tmview")]
#[command(about = "Inspect a node through its HTTP RPC endpoint", long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true, help = "Path to a TOML configuration file")]
    pub config: Option<PathBuf>,
    #[arg(long, global = true, help = "Path to a log4rs configuration file")]
    pub log_config: Option<PathBuf>,
    #[command(flatten)]
    pub node: NodeArgs,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone, Default)]
pub struct NodeArgs {
    #[arg(
        short = 'u',
        long,
        global = true,
        help = "The base URL of the node RPC endpoint (overrides configuration)"
    )]
    pub rpc_url: Option<String>,
    #[arg(long, global = true, help = "Request timeout in seconds")]
    pub timeout_secs: Option<u64>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show node identity and sync progress
    Status,
    /// List connected peers
    Peers,
    /// Summarize unconfirmed transactions in the mempool
    Mempool {
        #[arg(short, long, help = "Maximum number of transactions to fetch (defaults to configuration)")]
        limit: Option<i64>,
    },
    /// Print the raw /status payload
    Raw,
    /// Write the default configuration file
    InitConfig {
        #[arg(short, long, help = "Path to the output file", default_value = "tmview.toml")]
        output: PathBuf,
    },
}
