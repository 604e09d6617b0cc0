use anyhow::Context;

use gamehub_api::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();

    let config = ApiConfig::from_env().context("invalid configuration")?;
    gamehub_observability::init_with(config.log_format);

    if config.insecure_dev_secret {
        tracing::warn!("JWT_SECRET not set; using insecure dev default");
    }

    let app = gamehub_api::app::build_app(&config);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(
        addr = %listener.local_addr()?,
        error_policy = ?config.error_policy,
        "listening"
    );

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
