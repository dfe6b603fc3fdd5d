use actix_web::{App, HttpServer, web};
use std::sync::Arc;
use tracing::{info, warn};
use user_board::data::memory::InMemoryUserRepository;
use user_board::data::mongo::MongoUserRepository;
use user_board::domain::repository::UserRepository;
use user_board::infrastructure::config::{AppConfig, StorageBackend};
use user_board::infrastructure::logging::{init_logging, install_panic_hook};
use user_board::presentation::assets::AssetManifest;
use user_board::presentation::handlers::AppState;
use user_board::presentation::middleware::{RequestIdMiddleware, TimingMiddleware};
use user_board::presentation::routes::configure;
use user_board::presentation::theme::Theme;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let config = AppConfig::from_env()?;

    init_logging(config.log_format);
    install_panic_hook();
    info!("Logging initialized");

    let repository: Arc<dyn UserRepository> = match config.storage {
        StorageBackend::Mongo => Arc::new(
            MongoUserRepository::connect(&config.mongodb_uri, config.mongodb_database.as_deref())
                .await?,
        ),
        StorageBackend::Memory => {
            warn!("Using in-memory storage, users are lost on restart");
            Arc::new(InMemoryUserRepository::new())
        }
    };

    let assets = AssetManifest::load(&config.asset_stats, &config.asset_entry);
    let public_dir = if config.public_dir.is_dir() {
        Some(config.public_dir.clone())
    } else {
        warn!(dir = %config.public_dir.display(), "Public directory missing, static files disabled");
        None
    };

    let state = web::Data::new(AppState::new(repository, assets, Theme::default()));

    let server = HttpServer::new(move || {
        tracing::trace!("Creating new application instance");
        App::new()
            .app_data(state.clone())
            .wrap(TimingMiddleware)
            .wrap(RequestIdMiddleware)
            .configure(|cfg| configure(cfg, public_dir.as_deref()))
    });

    let bind_addr = config.bind_addr();
    let server = server.bind(&bind_addr)?;
    info!(
        address = %bind_addr,
        routes = %"GET /api/health, GET /api/users, POST /api/users, GET *",
        "Server started http://{}",
        bind_addr
    );
    server.run().await?;
    Ok(())
}
