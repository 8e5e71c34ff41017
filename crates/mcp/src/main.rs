use std::path::PathBuf;

use clap::Parser;
use courier_mcp::{run_server, ServerConfig};

/// Serve the courier store to MCP clients over stdio.
#[derive(Parser, Debug)]
#[command(name = "courier-mcp", version)]
struct Args {
    /// Data directory shared with the `courier` CLI and dashboard
    #[arg(long = "data-dir", value_name = "PATH")]
    data_dir: Option<PathBuf>,

    /// Driver used when a tool call omits driverId
    #[arg(long = "driver", value_name = "ID")]
    driver_id: Option<String>,

    /// Fixture document for --seed (defaults to fixtures.json in the data dir, then built-in data)
    #[arg(long, value_name = "PATH")]
    fixtures: Option<PathBuf>,

    /// Seed the store from fixtures before serving when the driver has no deliveries
    #[arg(long)]
    seed: bool,

    /// Tracing filter (e.g. "info", "courier_mcp=debug")
    #[arg(long = "log", value_name = "DIRECTIVE")]
    log_filter: Option<String>,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            data_dir: args.data_dir,
            log_filter: args.log_filter,
            driver_id: args.driver_id,
            fixtures: args.fixtures,
            seed: args.seed,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    run_server(Args::parse().into()).await
}
