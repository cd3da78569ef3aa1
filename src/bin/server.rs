use clap::Parser;
use rentdesk::config::{self, CliArgs};
use rentdesk::notify;
use rentdesk::{create_app, db, logging, run_migrations, AppState};
use std::{net::SocketAddr, sync::Arc};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables before clap reads them
    dotenv::dotenv().ok();

    let config = config::get_config(CliArgs::parse());
    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = logging::init_logging(config.log_dir.as_deref());
    info!(
        "Final configuration: database_url={}, port={}, currency={}, invoice_due_days={}",
        config.database_url, config.port, config.currency, config.invoice_due_days
    );

    // Initialize the database pool and bring the schema up to date
    let pool = db::init_pool(&config.database_url)?;
    {
        let mut conn = pool.get()?;
        run_migrations(&mut conn)?;
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let mailer = notify::mailer_from_config(&config)?;
    let state = AppState::new(Arc::new(pool), mailer, config);
    let app = create_app(state);

    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
