use jobs_qa::api::{create_router, AppState};
use jobs_qa::infrastructure::{qa_service, AppConfig, RemoteBootstrap};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=debug,jobs_qa=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Arc::new(AppConfig::load()?);
    let bootstrap = Arc::new(RemoteBootstrap::from_env(config.clone())?);
    let qa = Arc::new(qa_service(&config)?);
    info!(
        model = %config.config.llm.model,
        collection = %config.config.vector_store.collection,
        top_k = config.config.rag.top_k,
        "services configured"
    );

    let addr = SocketAddr::new(
        config.config.server.host.parse()?,
        config.config.server.port,
    );
    let app = create_router(AppState::new(config, bootstrap, qa));

    info!("API server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
