use anyhow::Context;
use clap::Parser;
use log::{debug, warn};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use tmview::NodeRpcClient;
use tmview::cli::{Cli, Commands};
use tmview::config::{get_default_config, load_configuration, write_config_to};
use tmview::log::init_logging;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();
    init_logging(cli.log_config.as_deref())?;

    if let Commands::InitConfig { output } = &cli.command {
        write_config_to(output, get_default_config())?;
        println!("Wrote default configuration to {}", output.display());
        return Ok(());
    }

    let mut config = load_configuration(cli.config.as_deref())?;
    config.apply_node(&cli.node);
    debug!(rpc_url = config.rpc_url.as_str(); "Configuration loaded");

    let client = NodeRpcClient::from_config(&config)?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling request");
            on_interrupt.cancel();
        }
    });

    match cli.command {
        Commands::Status => print_json(&client.get_node_status(&cancel).await?),
        Commands::Peers => print_json(&client.get_peers(&cancel).await?),
        Commands::Mempool { limit } => {
            let limit = limit.unwrap_or(config.mempool_limit);
            print_json(&client.get_unconfirmed_txs(limit, &cancel).await?)
        },
        Commands::Raw => {
            println!("{}", client.get_node_info_raw(&cancel).await?);
            Ok(())
        },
        Commands::InitConfig { .. } => Ok(()),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), anyhow::Error> {
    let rendered = serde_json::to_string_pretty(value).context("Failed to render result")?;
    println!("{rendered}");
    Ok(())
}
