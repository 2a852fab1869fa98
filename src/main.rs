use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use secrecy::SecretString;

use larder_core::LedgerScope;
use larder_engine::{CsvExportSink, Engine, EngineConfig};
use larder_server::{LineDelivery, ReplyDelivery, ServerConfig};
use larder_store::{Database, EntryRepo};

#[derive(Parser, Debug)]
#[command(name = "larder", about = "Conversational inventory ledger", version)]
struct Args {
    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 8080)]
    port: u16,

    /// SQLite database path
    #[arg(long, env = "LARDER_DB", default_value = "larder.db")]
    db: PathBuf,

    /// Ledger isolation: per_context or global
    #[arg(long, env = "LARDER_SCOPE", default_value = "per_context")]
    scope: LedgerScope,

    /// Directory export artifacts are written to and served from
    #[arg(long, env = "LARDER_EXPORT_DIR", default_value = "exports")]
    export_dir: PathBuf,

    /// Public base URL used in export download links
    #[arg(long, env = "PUBLIC_BASE_URL", default_value = "http://localhost:8080")]
    public_base_url: String,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    tracing::info!("starting larder");

    let db = Database::open(&args.db).expect("failed to open ledger database");
    let sink = Arc::new(CsvExportSink::new(
        args.export_dir.clone(),
        args.public_base_url.clone(),
    ));
    let engine = Arc::new(Engine::new(
        EntryRepo::new(db),
        EngineConfig { scope: args.scope },
        sink,
    ));

    let token = std::env::var("CHANNEL_ACCESS_TOKEN").unwrap_or_default();
    if token.is_empty() {
        tracing::warn!("CHANNEL_ACCESS_TOKEN is not set; the platform will reject replies");
    }
    let delivery: Arc<dyn ReplyDelivery> = Arc::new(LineDelivery::new(SecretString::from(token)));

    let config = ServerConfig {
        port: args.port,
        export_dir: args.export_dir,
    };
    let handle = larder_server::start(config, engine, delivery)
        .await
        .expect("failed to start server");
    tracing::info!(port = handle.port, scope = %args.scope, "larder ready");

    tokio::signal::ctrl_c()
        .await
        .expect("failed to listen for ctrl+c");
    tracing::info!("shutting down");
}
