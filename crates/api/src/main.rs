use anyhow::Context;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    lossdesk_observability::init();

    let config = lossdesk_api::config::ApiConfig::from_env()?;
    let bind = config.bind_addr.clone();

    let app = lossdesk_api::app::build_app(config);

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
