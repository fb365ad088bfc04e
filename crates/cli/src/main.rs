// vaultsock CLI entry point.

use clap::Parser;

use vaultsock_cli::{config, repl};

#[derive(Parser)]
#[command(name = "vaultsock", about = "Interactive console for a wallet-service WebSocket API")]
struct Cli {
    /// WebSocket URL offered as the default for `connect` (e.g. ws://localhost:8080/).
    #[arg(long)]
    url: Option<String>,

    /// Do not follow the newest log entry.
    #[arg(long)]
    no_autoscroll: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = config::GlobalConfig::load();

    let default_url = cli.url.or(config.server_url);
    let autoscroll = !cli.no_autoscroll && config.autoscroll;

    repl::run(default_url, autoscroll).await
}
