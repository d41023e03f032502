use anyhow::Result;
use clap::Parser;
use log::{error, info, LevelFilter};
use monitor::store::core::{RedisStore, StoreContext};
use monitor::telemetry::NvmlStatsProvider;
use monitor::{AskPublisher, ProviderConfig};
use shared::models::ask::Capabilities;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
struct Args {
    /// Redis store url
    #[arg(short = 's', long, default_value = "redis://localhost:6379")]
    redis_store_url: String,

    /// Provider identifier
    #[arg(short = 'p', long, default_value = "provider1")]
    provider_id: String,

    /// Model served by this provider
    #[arg(short = 'm', long, default_value = "gpt4")]
    model: String,

    /// GPU type installed on this provider
    #[arg(short = 'g', long, default_value = "a100")]
    gpu_type: String,

    /// Base ask price per token, before utilization adjustment
    #[arg(short = 'b', long, default_value = "0.001")]
    base_price: String,

    /// Advertised latency bound in milliseconds
    #[arg(long, default_value = "1000")]
    max_latency: u32,

    /// Pending credits required before a payout request is emitted
    #[arg(long, default_value = "100.00")]
    payout_threshold: String,

    /// Publish interval in seconds
    #[arg(short = 'i', long, default_value = "30")]
    poll_interval: u64,

    /// Advertised token capacity per GB of free device memory
    #[arg(long, default_value = "1000000000")]
    tokens_per_gb: u64,

    /// Disable the streaming capability flag
    #[arg(long)]
    no_streaming: bool,

    /// Advertise batch support
    #[arg(long)]
    batch: bool,

    /// Log level
    #[arg(short = 'l', long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = match args.log_level.as_str() {
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();

    let config = ProviderConfig::new(
        &args.provider_id,
        &args.model,
        &args.gpu_type,
        &args.base_price,
        args.max_latency,
        &args.payout_threshold,
        args.poll_interval,
        args.tokens_per_gb,
        Capabilities {
            streaming: !args.no_streaming,
            batch: args.batch,
        },
    )
    .unwrap_or_else(|err| {
        error!("Invalid configuration: {err:#}");
        std::process::exit(1);
    });

    let store = Arc::new(RedisStore::new(&args.redis_store_url));
    let store_context = Arc::new(StoreContext::new(store.clone()));
    let publisher = AskPublisher::new(config, store_context, Arc::new(NvmlStatsProvider::new()));

    info!(
        "Publishing asks for {} every {}s",
        args.provider_id, args.poll_interval
    );

    let cancellation_token = CancellationToken::new();
    let loop_token = cancellation_token.clone();
    tokio::select! {
        _ = publisher.run(loop_token) => {}
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
            cancellation_token.cancel();
        }
    }

    Ok(())
}
