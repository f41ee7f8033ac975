//! Binary entry point: config, storage, services, sweeper, HTTP server.

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use application::{
    MessageService, MessageServiceDependencies, PresenceService, PresenceServiceDependencies,
    PresenceSweeper, SystemClock,
};
use infrastructure::{create_pg_pool, PgMessageRepository, PgParticipantRepository};
use web_api::{router, AppConfig, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = AppConfig::load()?;
    tracing::info!(config = %config.sanitize(), "configuration loaded");

    let pool = create_pg_pool(&config.database.url, config.database.max_connections).await?;
    sqlx::migrate!("../../migrations").run(&pool).await?;

    let participants: Arc<dyn application::ParticipantRepository> =
        Arc::new(PgParticipantRepository::new(pool.clone()));
    let messages: Arc<dyn application::MessageRepository> =
        Arc::new(PgMessageRepository::new(pool));
    let clock: Arc<dyn application::Clock> = Arc::new(SystemClock);

    let presence_service = Arc::new(PresenceService::new(PresenceServiceDependencies {
        participants: participants.clone(),
        messages: messages.clone(),
        clock: clock.clone(),
    }));
    let message_service = Arc::new(MessageService::new(MessageServiceDependencies {
        participants: participants.clone(),
        messages: messages.clone(),
        clock: clock.clone(),
    }));

    let sweeper = Arc::new(PresenceSweeper::new(
        participants,
        messages,
        clock,
        Duration::from_millis(config.presence.stale_after_ms),
    ));
    sweeper.spawn(Duration::from_millis(config.presence.sweep_period_ms));

    let state = AppState::new(presence_service, message_service);
    let app = router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "chat server listening");
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
