use crate::AppState;
use crate::error::LobbyError;
use crate::game::core::messages::{
    Ack, CreateLobbyRequest, CreateLobbyResponse, GameStateQuery, GameStateResponse,
    LobbyListResponse, LobbyResponse, PlayerRequest, RoleAssignmentResponse, RoundResultsResponse,
};
use axum::{
    Json, async_trait,
    body::Bytes,
    extract::{FromRequest, Path, Query, Request, State},
};
use serde::de::DeserializeOwned;

/// JSON request body whose failures come back as [`LobbyError`] JSON.
/// An empty body reads as the default request, so a missing name is
/// reported as a missing name.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default,
{
    type Rejection = LobbyError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|err| LobbyError::BadRequest(err.body_text()))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(T::default()));
        }
        serde_json::from_slice(&bytes)
            .map(Self)
            .map_err(|err| LobbyError::BadRequest(err.to_string()))
    }
}

fn name_of(req: &PlayerRequest) -> &str {
    req.player_name.as_deref().unwrap_or_default()
}

pub async fn create_lobby(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateLobbyRequest>,
) -> Result<Json<CreateLobbyResponse>, LobbyError> {
    let host = req.host_name.as_deref().unwrap_or_default();
    let lobby = state.lobbies.create_lobby(host)?;
    Ok(Json(CreateLobbyResponse {
        success: true,
        lobby_code: lobby.code.clone(),
        lobby,
    }))
}

pub async fn list_lobbies(State(state): State<AppState>) -> Json<LobbyListResponse> {
    let lobbies = state.lobbies.list_codes();
    Json(LobbyListResponse {
        success: true,
        count: lobbies.len(),
        lobbies,
    })
}

pub async fn join_lobby(
    State(state): State<AppState>,
    Path(code): Path<String>,
    JsonBody(req): JsonBody<PlayerRequest>,
) -> Result<Json<LobbyResponse>, LobbyError> {
    let lobby = state.lobbies.join_lobby(&code, name_of(&req))?;
    Ok(Json(LobbyResponse {
        success: true,
        lobby,
    }))
}

pub async fn get_lobby(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<LobbyResponse>, LobbyError> {
    let lobby = state.lobbies.get_lobby(&code)?;
    Ok(Json(LobbyResponse {
        success: true,
        lobby,
    }))
}

pub async fn start_game(
    State(state): State<AppState>,
    Path(code): Path<String>,
    JsonBody(req): JsonBody<PlayerRequest>,
) -> Result<Json<LobbyResponse>, LobbyError> {
    let lobby = state.lobbies.start_game(&code, name_of(&req))?;
    Ok(Json(LobbyResponse {
        success: true,
        lobby,
    }))
}

/// Poll target. Pass `?playerName=` for a view scoped to that player.
pub async fn game_state(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Query(query): Query<GameStateQuery>,
) -> Result<Json<GameStateResponse>, LobbyError> {
    let game = state
        .lobbies
        .game_state(&code, query.player_name.as_deref())?;
    Ok(Json(GameStateResponse {
        success: true,
        game,
    }))
}

pub async fn start_round(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<RoleAssignmentResponse>, LobbyError> {
    let roles = state.lobbies.start_round(&code)?;
    Ok(Json(RoleAssignmentResponse {
        success: true,
        roles,
    }))
}

pub async fn start_playing(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<Ack>, LobbyError> {
    state.lobbies.start_playing(&code)?;
    Ok(Json(Ack::ok()))
}

pub async fn finish_round(
    State(state): State<AppState>,
    Path(code): Path<String>,
    JsonBody(req): JsonBody<PlayerRequest>,
) -> Result<Json<RoundResultsResponse>, LobbyError> {
    let results = state.lobbies.finish_round(&code, name_of(&req))?;
    Ok(Json(RoundResultsResponse {
        success: true,
        results,
    }))
}

pub async fn leave_lobby(
    State(state): State<AppState>,
    Path(code): Path<String>,
    JsonBody(req): JsonBody<PlayerRequest>,
) -> Result<Json<Ack>, LobbyError> {
    state.lobbies.leave_lobby(&code, name_of(&req))?;
    Ok(Json(Ack::ok()))
}
