//! Server setup and initialization
//!
//! Wires the storage pools, repositories, and services together, and runs
//! the keep-alive HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use auction_common::{AppConfig, AppError};
use auction_db::{
    SqliteAdminMessageRepository, SqliteAdminRepository, SqliteAuctionRepository,
    SqliteBidRepository, SqliteDraftRepository, SqliteLeaderboardRepository,
    SqliteProfileRepository, SqliteRejectionRepository, SqliteSettingsRepository,
    SqliteSubmissionRepository, SqliteVerifiedUserRepository, StoreConfig, Stores,
};
use auction_gateway::Dispatcher;
use auction_service::services::ModerationService;
use auction_service::{
    AdminRegistry, ChatPort, CleanupScheduler, ServiceContext, ServiceContextBuilder,
};

use crate::middleware::apply_middleware;
use crate::routes::create_router;
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let router = create_router();
    let router = apply_middleware(router);
    router.with_state(state)
}

/// Open storage and build the service context around the given chat port
pub async fn create_service_context(
    config: &AppConfig,
    chat: Arc<dyn ChatPort>,
) -> Result<Arc<ServiceContext>, AppError> {
    info!(data_dir = %config.storage.data_dir.display(), "Opening SQLite stores...");
    let mut store_config = StoreConfig::new(&config.storage.data_dir);
    store_config.max_connections = config.storage.max_connections;
    let stores = Stores::open(&store_config)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    // Create repositories
    let auction_repo = Arc::new(SqliteAuctionRepository::new(stores.auctions.clone()));
    let bid_repo = Arc::new(SqliteBidRepository::new(stores.auctions.clone()));
    let submission_repo = Arc::new(SqliteSubmissionRepository::new(stores.submissions.clone()));
    let draft_repo = Arc::new(SqliteDraftRepository::new(stores.submissions.clone()));
    let verified_repo = Arc::new(SqliteVerifiedUserRepository::new(stores.users.clone()));
    let profile_repo = Arc::new(SqliteProfileRepository::new(stores.users.clone()));
    let leaderboard_repo = Arc::new(SqliteLeaderboardRepository::new(stores.users.clone()));
    let rejection_repo = Arc::new(SqliteRejectionRepository::new(stores.moderation.clone()));
    let admin_message_repo =
        Arc::new(SqliteAdminMessageRepository::new(stores.moderation.clone()));
    let admin_repo = Arc::new(SqliteAdminRepository::new(stores.settings.clone()));
    let settings_repo = Arc::new(SqliteSettingsRepository::new(stores.settings.clone()));

    let admins = Arc::new(AdminRegistry::new(
        admin_repo,
        config.bot.bootstrap_admins.clone(),
    ));

    let context = ServiceContextBuilder::new()
        .auction_repo(auction_repo)
        .bid_repo(bid_repo)
        .submission_repo(submission_repo)
        .draft_repo(draft_repo)
        .verified_repo(verified_repo)
        .profile_repo(profile_repo)
        .leaderboard_repo(leaderboard_repo)
        .rejection_repo(rejection_repo)
        .admin_message_repo(admin_message_repo)
        .settings_repo(settings_repo)
        .chat(chat)
        .admins(admins)
        .auction_channel(config.bot.auction_channel)
        .audit_channel(config.bot.audit_channel)
        .bot_username(config.bot.username.clone())
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(Arc::new(context))
}

/// The moderation service with the configured rejection time-to-live
pub fn create_moderation(config: &AppConfig, ctx: Arc<ServiceContext>) -> ModerationService {
    let ttl = chrono::Duration::seconds(config.cleanup.rejection_ttl_secs as i64);
    ModerationService::new(ctx, ttl)
}

/// The dispatcher an update transport feeds
pub fn create_dispatcher(ctx: Arc<ServiceContext>, moderation: ModerationService) -> Dispatcher {
    Dispatcher::new(ctx, moderation)
}

/// Run the HTTP server
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    Ok(())
}

/// Run the complete application with configuration
pub async fn run(config: AppConfig, chat: Arc<dyn ChatPort>) -> Result<(), AppError> {
    let ctx = create_service_context(&config, chat).await?;

    let moderation = create_moderation(&config, ctx.clone());
    let interval = std::time::Duration::from_secs(config.cleanup.interval_secs);
    CleanupScheduler::new(moderation, interval).spawn();

    let addr: SocketAddr = config
        .health
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid server address: {e}")))?;
    let state = AppState::new(ctx, config);
    let app = create_app(state);

    run_server(app, addr).await
}
