use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

use api::{AppState, projects::ProjectService, repositories::ProjectRepository, routes};
use auth::{
    jwt::{JwtConfig, JwtService},
    session::{SessionConfig, SessionStore},
};
use common::{
    cache::{RedisConfig, RedisPool},
    database::{DatabaseConfig, health_check, init_pool},
};

#[tokio::main]
async fn main() -> Result<()> {
    common::telemetry::init_tracing();

    info!("Starting API service");

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    // The pool is lazy; an unreachable database only degrades /health
    if health_check(&pool).await {
        info!("Database connection successful");
    } else {
        warn!("Database not reachable yet, continuing startup");
    }

    // Sessions are issued by the auth service; this side only resolves them
    let redis_pool = RedisPool::new(&RedisConfig::from_env()?).await?;
    let session_config = SessionConfig::from_env()?;
    let jwt_service = JwtService::new(JwtConfig::from_env()?)?;

    let app_state = AppState {
        projects: ProjectService::new(
            Arc::new(ProjectRepository::new(pool)),
            session_config.store_timeout,
        ),
        sessions: SessionStore::new(
            Arc::new(redis_pool),
            jwt_service,
            session_config.store_timeout,
        ),
    };

    info!("API service initialized successfully");

    let app = routes::create_router(app_state);

    let port: u16 = common::env_or("API_PORT", 3001)?;
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("API service listening on 0.0.0.0:{}", port);

    axum::serve(listener, app).await?;

    Ok(())
}
