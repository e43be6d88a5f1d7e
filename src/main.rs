use axum::{
  extract::{State, WebSocketUpgrade},
  extract::ws::WebSocket,
  http::Method,
  response::IntoResponse,
  routing::get,
  Json, Router,
};
use dashmap::DashMap;
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

mod app;
mod config;
mod game;
mod protocol;
mod transport;

use config::ServerConfig;

#[derive(Debug)]
struct AppState {
  sessions: DashMap<Uuid, f64>,
  config: ServerConfig,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
  ok: bool,
  sessions: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  let config = ServerConfig::load()?;
  tracing::info!(
    width = config.game.field_width,
    height = config.game.field_height,
    max_snakes = config.game.max_snakes,
    tick_ms = config.tick_ms,
    "config loaded"
  );
  let port = config.port;

  let state = Arc::new(AppState {
    sessions: DashMap::new(),
    config,
  });

  let cors = CorsLayer::new()
    .allow_origin(Any)
    .allow_methods([Method::GET])
    .allow_headers(Any);

  let app: Router = Router::new()
    .route("/api/health", get(health))
    .route("/api/play", get(ws_handler))
    .layer(cors)
    .with_state(state);

  let address = format!("0.0.0.0:{port}");
  tracing::info!("listening on {address}");

  let listener = tokio::net::TcpListener::bind(&address).await?;
  axum::serve(listener, app).await?;

  Ok(())
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(HealthResponse {
    ok: true,
    sessions: state.sessions.len(),
  })
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
  let session_id = Uuid::new_v4();
  state.sessions.insert(session_id, app::time::now_millis());
  tracing::info!(%session_id, live = state.sessions.len(), "player connected");

  transport::ws_session::handle_socket(
    socket,
    session_id,
    state.config.game.clone(),
    state.config.tick_ms,
  )
  .await;

  if let Some((_, connected_at)) = state.sessions.remove(&session_id) {
    let seconds = (app::time::now_millis() - connected_at) / 1000.0;
    tracing::info!(%session_id, seconds, "player disconnected");
  }
}
