//! hello-cloud-function entry point.
//!
//! Loads configuration (file, platform environment, flags), initializes
//! tracing, registers the functions, resolves the target function and serves
//! it over HTTP until a shutdown signal arrives.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hello_cloud_function::config::{AppConfig, DEFAULT_LOG_FILTER, ENV_HELP};
use hello_cloud_function::functions;
use hello_cloud_function::http::start_server;
use hello_cloud_function::routes::create_router;
use hello_cloud_function::{AppError, FunctionRegistry};

/// Serve an HTTP cloud function
#[derive(Parser, Debug)]
#[command(name = "hello-cloud-function", version, about, after_help = ENV_HELP)]
struct Args {
    /// Path to an optional TOML configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Port to listen on (overrides PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Registered function to serve (overrides FUNCTION_TARGET)
    #[arg(short, long)]
    target: Option<String>,

    /// Log level filter (e.g., "hello_cloud_function=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,
}

fn init_tracing(log_filter: &str, json: bool) -> Result<(), AppError> {
    let registry =
        tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::new(log_filter));

    let result = if json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };

    result.map_err(|e| AppError::Logging(e.to_string()))
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let args = Args::parse();

    // Configuration priority: flags > environment > file > defaults
    let mut config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    config.apply_env()?;
    if let Some(port) = args.port {
        config.http.port = port;
    }
    if let Some(target) = args.target {
        config.function.target = Some(target);
    }
    config.validate()?;

    // Log filter priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
    init_tracing(&log_filter, config.logging.is_json())?;

    tracing::info!(
        file = args.config.as_deref().unwrap_or("<none>"),
        host = %config.http.host,
        port = config.http.port,
        "Loaded configuration"
    );

    let mut registry = FunctionRegistry::new();
    functions::register(&mut registry)?;
    tracing::info!(
        functions = ?registry.names().collect::<Vec<_>>(),
        "Registered functions"
    );

    let (name, function) = registry.resolve(config.function.target.as_deref())?;
    tracing::info!(function = %name, "Serving function");

    let app = create_router(&name, function, &config.function);
    start_server(app, &config.http).await?;

    Ok(())
}
