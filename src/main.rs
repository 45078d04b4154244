//! Process entry point: loads configuration, wires the store/bus/embedding
//! gateway/LLM provider via explicit dependency injection (no global
//! singletons), spawns the background tasks, and serves the HTTP API.

use archon_coord::config::Config;
use archon_coord::embeddings::{DeterministicEmbeddingProvider, EmbeddingGateway, OpenAiEmbeddingProvider};
use archon_coord::http::{router, AppState};
use archon_coord::ingest::EventListener;
use archon_coord::llm;
use archon_coord::services::AutoArchiveLoop;
use archon_coord::store::MemoryStore;
use std::sync::Arc;
use swarm_bus::Bus;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    swarm_bus::init_logging();

    let cfg = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(error = %e, "invalid configuration, refusing to start");
            std::process::exit(1);
        }
    };

    if cfg.redis_url.is_some() {
        info!("REDIS_URL is set; this build runs the in-process event bus regardless");
    }

    let store = MemoryStore::new();
    let bus = Bus::new();

    let embeddings: Arc<EmbeddingGateway> = Arc::new(match &cfg.openai_api_key {
        Some(key) => EmbeddingGateway::new(Arc::new(OpenAiEmbeddingProvider::new(key.clone()))),
        None => EmbeddingGateway::new(Arc::new(DeterministicEmbeddingProvider)),
    });
    let llm = llm::from_config(&cfg);

    let state = AppState::new(store.clone(), bus.clone(), embeddings, llm, &cfg);

    let shutdown = CancellationToken::new();

    let listener_token = shutdown.clone();
    let listener = EventListener::new(bus.clone(), state.whiteboard.clone());
    let listener_task = tokio::spawn(async move { listener.run(listener_token).await });

    let archive_token = shutdown.clone();
    let archiver = AutoArchiveLoop::new(store, cfg.auto_archive_interval_secs);
    let archive_task = tokio::spawn(async move { archiver.run(archive_token).await });

    let app = router(state);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], cfg.port));
    info!(%addr, transport = ?cfg.transport, "archon-coordd listening");

    let tcp_listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(tcp_listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
        .await?;

    shutdown.cancel();
    let _ = tokio::join!(listener_task, archive_task);
    Ok(())
}

async fn shutdown_signal(token: CancellationToken) {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    token.cancel();
}
