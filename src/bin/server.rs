// Storage server entry point

use clap::Parser;
use navtiles::db::services::{ensure_schema, BlobStore, MemoryBlobStore, SeaOrmBlobStore};
use navtiles::server::config::ServerConfig;
use navtiles::web::create_axum_router;
use sea_orm::{ConnectOptions, Database};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long)]
    config: Option<String>,
}

fn init_logging(log_dir: &str) {
    // Log to a file: JSON format, daily rotation
    let file_appender = rolling::daily(log_dir, "server.log");
    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false) // No ANSI colors in file
        .json(); // Log as JSON

    // Log to stdout: human-readable format
    let stdout_layer = fmt::layer().with_writer(std::io::stdout);

    // Default to `info,sea_orm=warn` level if RUST_LOG is not set.
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sea_orm=warn,sqlx::query=warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();
}

async fn open_store(config: &ServerConfig) -> Result<Arc<dyn BlobStore>, Box<dyn std::error::Error + Send + Sync>> {
    let Some(database_url) = config.database_url.as_deref() else {
        warn!("DATABASE_URL is not set; tiles are kept in memory and lost on restart.");
        return Ok(Arc::new(MemoryBlobStore::new()));
    };

    let mut opt = ConnectOptions::new(database_url.to_owned());
    opt.max_connections(config.max_connections)
        .sqlx_logging(false);

    let db = Database::connect(opt).await?;
    ensure_schema(&db).await?;
    info!("Connected to database and ensured schema.");

    Ok(Arc::new(SeaOrmBlobStore::new(db)))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    // --- Server Config Setup ---
    let server_config = match ServerConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load server configuration: {e}");
            return Err(e.into());
        }
    };

    init_logging(&server_config.log_dir);
    info!("Starting server, version: {}", env!("CARGO_PKG_VERSION"));

    // --- Datastore Setup ---
    let store = match open_store(&server_config).await {
        Ok(store) => store,
        Err(e) => {
            error!(error = %e, "Failed to open datastore");
            return Err(e);
        }
    };

    // --- HTTP Server Setup ---
    let addr: SocketAddr = server_config.listen_addr.parse()?;
    let app = create_axum_router(store);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for shutdown signal");
            }
            info!("Shutdown signal received");
        })
        .await?;

    Ok(())
}
