//! Taskboard Web Server
//!
//! Axum server that hosts the board: the rendered page, list fragments,
//! a JSON API and a WebSocket feed of store notifications.

pub mod routes;
pub mod runtime;
pub mod state;
pub mod websocket;

use axum::{
    routing::{get, patch, post},
    Router,
};
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
            "/projects",
            get(routes::projects::list_projects).post(routes::projects::create_project),
        )
        .route("/projects/{id}", patch(routes::projects::update_project))
        .with_state(state.clone());

    Router::new()
        .route("/", get(routes::board_html::index))
        .route("/lists/{status}", get(routes::board_html::list_fragment))
        .route("/projects", post(routes::board_html::submit_form))
        .route("/drop", post(routes::board_html::drop_card))
        .nest("/api", api_routes)
        .route("/ws", get(websocket::ws_handler))
        .route("/health", get(routes::health::health))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Run the web server until it fails or the process stops.
pub async fn run_server(host: &str, port: u16) -> anyhow::Result<()> {
    let state = AppState::new().await?;
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    tracing::info!("Web server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
