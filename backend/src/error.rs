use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Coarse error category surfaced to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Forbidden,
    InvalidState,
    Validation,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LobbyError {
    #[error("Lobby not found")]
    NotFound,
    #[error("Only the host can {0}")]
    Forbidden(&'static str),
    #[error("Game has already started")]
    AlreadyStarted,
    #[error("Game has not started yet")]
    NotStarted,
    #[error("Cannot {action} while the game is in the {state} state")]
    InvalidState {
        action: &'static str,
        state: &'static str,
    },
    #[error("This name is already taken in this lobby")]
    NameTaken,
    #[error("You need at least {required} players to start the game")]
    InsufficientPlayers { required: usize },
    #[error("Player name is required")]
    MissingName,
    #[error("Lobby code must be 8 letters or digits")]
    MalformedCode,
    #[error("Invalid request: {0}")]
    BadRequest(String),
}

impl LobbyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound => ErrorKind::NotFound,
            Self::Forbidden(_) => ErrorKind::Forbidden,
            Self::AlreadyStarted | Self::NotStarted | Self::InvalidState { .. } => {
                ErrorKind::InvalidState
            }
            Self::NameTaken
            | Self::InsufficientPlayers { .. }
            | Self::MissingName
            | Self::MalformedCode
            | Self::BadRequest(_) => ErrorKind::Validation,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::InvalidState | ErrorKind::Validation => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for LobbyError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "success": false,
            "error": self.to_string(),
        }));
        (self.status(), body).into_response()
    }
}
