use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use telegram_relay::config::{load_config, RelayConfig};
use telegram_relay::lifecycle::signals;
use telegram_relay::store::settings::{self, ForwarderSettings};
use telegram_relay::workers::battery::BatteryMonitor;
use telegram_relay::workers::chat_command::ChatCommandListener;
use telegram_relay::workers::{self, Supervisor};
use telegram_relay::{AppState, Book, ConfigServer};

#[derive(Parser)]
#[command(name = "telegram-relay")]
#[command(about = "Message-forwarder daemon with a self-hosted web configuration UI", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the web server bind address.
    #[arg(long)]
    bind: Option<String>,

    /// Override the storage directory.
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "telegram_relay=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => RelayConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.server.bind_address = bind;
    }
    if let Some(data_dir) = cli.data_dir {
        config.storage.data_dir = data_dir;
    }

    tracing::info!(
        bind_address = %config.server.bind_address,
        data_dir = %config.storage.data_dir.display(),
        book = %config.storage.book,
        "configuration loaded"
    );

    let book = Arc::new(Book::open(&config.storage.data_dir, &config.storage.book)?);

    let supervisor = Arc::new(Supervisor::new(Duration::from_millis(
        config.workers.settle_ms,
    )));
    supervisor.register(Arc::new(BatteryMonitor::new(
        Arc::clone(&book),
        config.workers.clone(),
        config.telegram.api_base.clone(),
    )));
    supervisor.register(Arc::new(ChatCommandListener::new(
        Arc::clone(&book),
        config.workers.clone(),
        config.telegram.api_base.clone(),
    )));

    // Resume the persisted desired state from the previous run, if any.
    if settings::initialized(&book) {
        let saved = ForwarderSettings::load(&book);
        Arc::clone(&supervisor).apply_desired_state(workers::desired_state(&saved));
    }

    let state = AppState {
        book: Arc::clone(&book),
        supervisor,
        max_body_bytes: config.server.max_body_bytes,
    };
    let server = ConfigServer::new(
        state,
        Duration::from_secs(config.server.request_timeout_secs),
    );
    signals::spawn_stop_listener(server.shutdown_signal());

    // A port already in use surfaces here; no silent retry.
    let listener = TcpListener::bind(&config.server.bind_address).await?;
    server.serve(listener).await?;

    if let Err(e) = book.flush_blocking() {
        tracing::warn!(error = %e, "final store flush failed");
    }
    tracing::info!("shutdown complete");
    Ok(())
}
