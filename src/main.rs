use std::sync::Arc;

use campaign_dash::config::ServerConfig;
use campaign_dash::logging::init_logging;
use campaign_dash::onboarding::OrganizationCreator;
use campaign_dash::server::{self, AppState};
use campaign_dash::store::{Database, LibSqlBackend, StoreCreator};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env()?;
    let _logging = init_logging(config.log_dir.as_deref())?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        port = config.port,
        db = %config.db_path.display(),
        submit_timeout_secs = config.submit_timeout.as_secs(),
        "Starting campaign-dash"
    );

    // ── Database ─────────────────────────────────────────────────────────
    let db: Arc<dyn Database> = Arc::new(LibSqlBackend::new_local(&config.db_path).await?);
    let creator: Arc<dyn OrganizationCreator> = Arc::new(StoreCreator::new(Arc::clone(&db)));

    let state = AppState {
        db,
        creator,
        submit_timeout: config.submit_timeout,
    };
    server::serve(state, &config).await?;
    Ok(())
}
