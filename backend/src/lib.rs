pub mod config;
pub mod error;
mod game;

pub use game::core::{GamePhase, GameSession, GameSnapshot, RoleAssignment, RoundResults, Word};
pub use game::lobby::{ExpiryPolicy, Lobby, Player, spawn_sweeper};
pub use game::{LobbyStore, WordRepository, WordSupply, messages};

use axum::{
    Router,
    routing::{get, post},
};
use game::{http_handler, ws};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

async fn health() -> &'static str {
    "ok"
}

#[derive(Clone)]
pub struct AppState {
    pub lobbies: Arc<LobbyStore>,
}

impl AppState {
    pub fn new(words: Arc<dyn WordSupply>, expiry: ExpiryPolicy) -> Self {
        Self {
            lobbies: Arc::new(LobbyStore::new(words, expiry)),
        }
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/api/lobbies",
            get(http_handler::list_lobbies).post(http_handler::create_lobby),
        )
        .route("/api/lobby/:code", get(http_handler::get_lobby))
        .route("/api/lobby/:code/join", post(http_handler::join_lobby))
        .route("/api/lobby/:code/start", post(http_handler::start_game))
        .route("/api/lobby/:code/game", get(http_handler::game_state))
        .route("/api/lobby/:code/start-round", post(http_handler::start_round))
        .route(
            "/api/lobby/:code/start-playing",
            post(http_handler::start_playing),
        )
        .route(
            "/api/lobby/:code/finish-round",
            post(http_handler::finish_round),
        )
        .route("/api/lobby/:code/leave", post(http_handler::leave_lobby))
        .route("/api/lobby/:code/events", get(ws::lobby_events))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
