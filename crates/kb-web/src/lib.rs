//! KB Web Server
//!
//! Axum-based REST API over the knowledge base.

pub mod routes;
pub mod state;

use axum::{
    routing::get,
    Router,
};
use kb_embedding::KnowledgeBase;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route(
            "/knowledge",
            get(routes::knowledge::list_knowledge).post(routes::knowledge::add_knowledge),
        )
        .route("/knowledge/search", get(routes::knowledge::search_knowledge));

    Router::new()
        .route("/health", get(routes::health::health))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Run the web server.
pub async fn run_server(kb: KnowledgeBase, host: &str, port: u16) -> anyhow::Result<()> {
    let state = AppState::new(kb);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", host, port)).await?;
    tracing::info!("Web server listening on http://{}:{}", host, port);

    axum::serve(listener, app).await?;
    Ok(())
}
