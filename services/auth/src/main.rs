use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

use auth::{
    AppState, cookie::CookieSettings, repositories::UserRepository, routes,
    service::AuthService,
};
use common::{
    cache::{RedisConfig, RedisPool},
    database::{self, DatabaseConfig},
};

#[tokio::main]
async fn main() -> Result<()> {
    common::telemetry::init_tracing();

    info!("Starting authentication service");

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = database::init_pool(&db_config).await?;

    // The pool is lazy; an unreachable database only degrades /health
    if database::health_check(&pool).await {
        info!("Database connection successful");
    } else {
        warn!("Database not reachable yet, continuing startup");
    }

    // Initialize Redis connection
    let redis_config = RedisConfig::from_env()?;
    let redis_pool = RedisPool::new(&redis_config).await?;

    let auth = AuthService::from_env(
        Arc::new(UserRepository::new(pool)),
        Arc::new(redis_pool),
    )?;
    let cookies = CookieSettings::from_env(auth.session_ttl_seconds())?;

    info!("Authentication service initialized successfully");

    let app = routes::create_router(AppState { auth, cookies });

    let port: u16 = common::env_or("AUTH_PORT", 3000)?;
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("Authentication service listening on 0.0.0.0:{}", port);

    axum::serve(listener, app).await?;

    Ok(())
}
