//! `gridclash-server`: runs a single Gridclash room on one WebSocket port.

use clap::Parser;
use clap::builder::RangedU64ValueParser;
use gridclash::prelude::*;
use tracing_subscriber::EnvFilter;

/// Command line arguments.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Address to bind to
    #[arg(short = 'H', long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// Edge length of the square board
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_BOARD_SIZE,
        value_parser = board_size_parser(),
    )]
    board_size: usize,
}

fn board_size_parser() -> RangedU64ValueParser<usize> {
    RangedU64ValueParser::new().range(MIN_BOARD_SIZE as u64..=MAX_BOARD_SIZE as u64)
}

#[tokio::main]
async fn main() -> Result<(), GridclashError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let room_config = RoomConfig::with_board_size(args.board_size);

    let server = GridclashServer::builder()
        .bind(&format!("{}:{}", args.host, args.port))
        .room_config(room_config)
        .build()
        .await?;

    tracing::info!(addr = ?server.local_addr().ok(), "listening");

    server
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
        })
        .await
}
