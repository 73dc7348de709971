use std::sync::Arc;

use filmcast::{
    AppState,
    config::Config,
    db,
    fixtures::OfflineProvider,
    provider::{MetadataProvider, MyApiFilmsClient},
    routes,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,filmcast=debug,sqlx=warn".to_string()),
        )
        .init();

    let config = Config::from_env()?;

    let db = db::connect_and_migrate(&config.database_url).await?;

    let provider: Arc<dyn MetadataProvider> = if config.provider_api_key.trim().is_empty() {
        tracing::warn!("Using built-in film fixtures - no PROVIDER_API_KEY provided");
        Arc::new(OfflineProvider::new().with_cast_limit(config.cast_limit))
    } else {
        let http = reqwest::Client::builder()
            .user_agent("filmcast/0.1")
            .timeout(config.provider_timeout)
            .build()?;
        Arc::new(
            MyApiFilmsClient::new(
                http,
                config.provider_api_key.clone(),
                config.provider_base_url.clone(),
                config.provider_rps,
            )
            .with_language(config.provider_language.clone())
            .with_timeout(config.provider_timeout)
            .with_cast_limit(config.cast_limit)
            .with_max_concurrent(config.max_concurrent),
        )
    };

    let state = Arc::new(AppState::new(db, provider));
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
