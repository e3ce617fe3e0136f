//! ZapOfertas offer dispatcher
//!
//! Main application entry point

use std::sync::Arc;
use tracing::info;

use zapofertas::{
    config::Settings,
    database::{DatabaseService, connection},
    scheduler::Scheduler,
    services::ServiceFactory,
    utils::logging,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging; the guard must stay alive for the file appender
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting ZapOfertas dispatcher...");

    // Initialize database connection
    info!("Connecting to database...");
    let db_pool = connection::create_pool(&settings.database).await?;

    // Run database migrations
    connection::run_migrations(&db_pool).await?;

    // Initialize services
    let database_service = DatabaseService::new(db_pool);
    database_service.ensure_default_template().await?;
    database_service.automation
        .get_or_init(settings.scheduler.default_interval_minutes)
        .await?;

    let services = ServiceFactory::new(&settings, database_service.clone())?;

    // Start the scheduler timer loop
    let scheduler = Arc::new(Scheduler::new(settings, database_service, services));
    let scheduler_handle = tokio::spawn(Arc::clone(&scheduler).run());

    info!("ZapOfertas dispatcher is ready");

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received, stopping scheduler...");
    scheduler_handle.abort();

    info!("ZapOfertas dispatcher has been shut down.");
    Ok(())
}
