use std::sync::Arc;

use actix_web::HttpServer;
use common::{
    config::Config,
    context::ServiceState,
    entities::contact_message::ContactMessage,
    notify,
    repository::{postgres_repository::PostgresRepository, RepositoryObject},
};
use contact::{create_app, watchdog::Watchdog};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    env_logger::init();

    let config = Config::from_env()?;

    let database = Arc::new(PostgresRepository::connect(&config.database).await?);
    let messages: RepositoryObject<ContactMessage> = database.clone();

    let notifier = notify::from_config(&config.notify).await?;
    log::info!("Notification strategy: {}", notifier.name());

    let mut state = ServiceState::new(notifier);
    state.insert::<ContactMessage>(messages.clone());
    let state = Arc::new(state);

    Watchdog::new(messages, &config.watchdog).spawn();

    let allowed_origins = Arc::new(config.allowed_origins.clone());
    log::info!("CORS allowed origins: {}", allowed_origins.join(", "));
    log::info!("Server running on port {}", config.port);

    HttpServer::new(move || create_app(state.clone(), allowed_origins.clone()))
        .bind(("0.0.0.0", config.port))?
        .run()
        .await?;

    log::info!("Server stopped, closing database pool");
    database.close().await;

    Ok(())
}
