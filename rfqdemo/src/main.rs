use jwt_simple::prelude::HS256Key;
use rfq_axum::start_server;
use rfq_sqlite::Db;
use rfqdemo::{AppConfig, Cli, impls::DemoApp};
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // By convention, we leverage `tracing` to instrument and log various
    // operations throughout this project.
    // Accordingly, we likely want to subscribe to these events so we can
    // write them to stdio and possibly some durable location.
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse CLI args and extract the JWT key
    let cli = Cli::import()?;
    let key = HS256Key::from_bytes(cli.secret.as_bytes());

    // Create config with proper layering of CLI args
    let AppConfig { server, database } = AppConfig::load(&cli)?;

    // Open database with config
    let db = Db::open(&database).await?;
    let app = DemoApp { db, key };

    start_server(server, app).await?;

    Ok(())
}
