mod api;
mod middleware;
mod quota;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use devduel_compare::{ComparePipeline, GeminiClient};
use devduel_github::GithubClient;

use crate::api::{build_app, AppState};
use crate::quota::PgQuotaStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(devduel_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = devduel_db::PoolConfig {
        max_connections: config.db_max_connections,
        min_connections: config.db_min_connections,
        acquire_timeout_secs: config.db_acquire_timeout_secs,
    };
    let pool = devduel_db::connect_pool(&config.database_url, pool_config).await?;
    devduel_db::run_migrations(&pool).await?;

    let github = GithubClient::with_base_url(
        config.github_request_timeout_secs,
        &config.github_user_agent,
        config.github_token.clone(),
        config.github_max_retries,
        config.github_backoff_base_ms,
        &config.github_base_url,
    )?;
    let gemini = GeminiClient::with_base_url(
        &config.gemini_api_key,
        &config.gemini_model,
        config.model_request_timeout_secs,
        &config.gemini_base_url,
    )?;

    let state = AppState {
        pool: pool.clone(),
        pipeline: Arc::new(ComparePipeline::new(github, gemini)),
        quota: PgQuotaStore::new(pool, config.daily_compare_limit),
    };
    let app = build_app(state);

    tracing::info!(addr = %config.bind_addr, env = %config.env, "starting devduel-server");
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
