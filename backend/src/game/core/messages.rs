use super::session::{RoleAssignment, RoundResults};
use super::snapshot::GameSnapshot;
use crate::game::lobby::Lobby;
use serde::{Deserialize, Serialize};

// Requests

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateLobbyRequest {
    #[serde(default)]
    pub host_name: Option<String>,
}

/// Body for every action a named player performs on a lobby
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRequest {
    #[serde(default)]
    pub player_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStateQuery {
    pub player_name: Option<String>,
}

// Responses

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLobbyResponse {
    pub success: bool,
    pub lobby_code: String,
    pub lobby: Lobby,
}

#[derive(Debug, Serialize)]
pub struct LobbyResponse {
    pub success: bool,
    pub lobby: Lobby,
}

#[derive(Debug, Serialize)]
pub struct LobbyListResponse {
    pub success: bool,
    pub lobbies: Vec<String>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct GameStateResponse {
    pub success: bool,
    #[serde(flatten)]
    pub game: GameSnapshot,
}

#[derive(Debug, Serialize)]
pub struct RoleAssignmentResponse {
    pub success: bool,
    #[serde(flatten)]
    pub roles: RoleAssignment,
}

#[derive(Debug, Serialize)]
pub struct RoundResultsResponse {
    pub success: bool,
    #[serde(flatten)]
    pub results: RoundResults,
}

#[derive(Debug, Serialize)]
pub struct Ack {
    pub success: bool,
}

impl Ack {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// Pushed to lobby subscribers after every change
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LobbyEvent {
    LobbyUpdated { lobby: Lobby },
    LobbyClosed,
}
