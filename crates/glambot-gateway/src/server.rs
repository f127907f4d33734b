//! Server assembly: shared state, router, and startup.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use glambot_core::config::{GlamBotConfig, RetrievalMode};
use glambot_knowledge::{
    EmbeddingClient, KnowledgeResolver, QdrantStore, SalonFacts, StaticResolver, VectorResolver,
};
use glambot_llm::ChatClient;
use glambot_session::{SessionStore, SystemClock};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared state for the gateway server.
pub struct AppState {
    pub config: Arc<GlamBotConfig>,
    pub sessions: Arc<SessionStore>,
    pub resolver: Arc<dyn KnowledgeResolver>,
    pub chat: Arc<ChatClient>,
}

impl AppState {
    pub fn from_config(config: GlamBotConfig) -> Self {
        let config = Arc::new(config);
        let sessions = Arc::new(SessionStore::new(
            config.session.clone(),
            Arc::new(SystemClock),
        ));

        let resolver: Arc<dyn KnowledgeResolver> = match config.retrieval.mode {
            RetrievalMode::Vector => {
                info!("📚 retrieval mode: vector ({})", config.vector.url);
                Arc::new(VectorResolver::new(
                    EmbeddingClient::new(&config.embedding, &config.llm),
                    QdrantStore::new(&config.vector),
                    config.vector.top_k,
                    config.vector.max_context_chunks,
                    config.vector.distance_threshold,
                ))
            }
            RetrievalMode::Static => {
                info!("📚 retrieval mode: static salon facts");
                Arc::new(StaticResolver::new(SalonFacts::new(config.salon.clone())))
            }
        };

        let chat = Arc::new(ChatClient::new(&config.llm));
        Self {
            config,
            sessions,
            resolver,
            chat,
        }
    }
}

/// Build the router with CORS and request tracing.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
        .allow_headers(Any)
        .allow_origin(Any);

    Router::new()
        .route("/api/chat", post(super::routes::chat))
        .route("/health", get(super::routes::health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server and the session sweeper.
pub async fn start(config: GlamBotConfig) -> anyhow::Result<()> {
    let state = Arc::new(AppState::from_config(config));
    state.sessions.clone().spawn_sweeper();

    let app = build_router(state.clone());
    let addr = format!("{}:{}", state.config.gateway.host, state.config.gateway.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("🌐 GlamBot gateway listening on http://{addr}");
    axum::serve(listener, app).await?;
    Ok(())
}
