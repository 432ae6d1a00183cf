use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use telemetry_simulator::config::{read_config, ServiceConfig};
use telemetry_simulator::error::{ServiceError, ServiceResult};
use telemetry_simulator::server::Server;

/// Synthetic machine telemetry over server-sent events
#[derive(Parser)]
#[command(name = "telemetry-simulator")]
#[command(version)]
struct Cli {
    /// Configuration file path (TOML)
    #[arg(short, long, env = "TELEMETRY_CONFIG")]
    config: Option<String>,

    /// Listen address, overrides the config file
    #[arg(short, long, env = "TELEMETRY_LISTEN_ADDR")]
    listen: Option<String>,

    /// Readings per stream before it closes
    #[arg(long, env = "TELEMETRY_MAX_TICKS")]
    max_ticks: Option<u64>,

    /// Milliseconds between readings
    #[arg(long, env = "TELEMETRY_INTERVAL_MS")]
    interval_ms: Option<u64>,

    /// Log level
    #[arg(long, env = "TELEMETRY_LOG_LEVEL")]
    log_level: Option<String>,

    /// Enable JSON logging
    #[arg(long, env = "TELEMETRY_LOG_JSON")]
    json: bool,
}

fn init_tracing(config: &ServiceConfig) -> ServiceResult<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.logging.level.clone().into());

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = if config.logging.json {
        registry.with(tracing_subscriber::fmt::layer().json()).try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };
    result.map_err(|e| ServiceError::Logging(e.to_string()))
}

fn apply_overrides(config: &mut ServiceConfig, cli: &Cli) -> ServiceResult<()> {
    if let Some(listen) = &cli.listen {
        config.server.listen_addr = listen.parse().map_err(|e| {
            telemetry_simulator::error::ConfigError::Invalid(format!(
                "invalid listen address {listen}: {e}"
            ))
        })?;
    }
    if let Some(max_ticks) = cli.max_ticks {
        config.stream.max_ticks = max_ticks;
    }
    if let Some(interval_ms) = cli.interval_ms {
        config.stream.interval_ms = interval_ms;
    }
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    if cli.json {
        config.logging.json = true;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ServiceResult<()> {
    let cli = Cli::parse();

    let (mut config, missing) = match &cli.config {
        Some(path) => match read_config(path)? {
            Some(config) => (config, None),
            None => (ServiceConfig::default(), Some(path)),
        },
        None => (ServiceConfig::default(), None),
    };
    apply_overrides(&mut config, &cli)?;
    init_tracing(&config)?;

    if let Some(path) = missing {
        tracing::warn!(path = %path, "config file not found, using defaults");
    }

    tracing::info!(
        max_ticks = config.stream.max_ticks,
        interval_ms = config.stream.interval_ms,
        max_noise = config.stream.max_noise,
        "starting telemetry simulator v{}",
        env!("CARGO_PKG_VERSION")
    );

    Server::new(config)?.run().await
}
