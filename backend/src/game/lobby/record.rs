use super::player::Player;
use crate::error::LobbyError;
use crate::game::core::{GameSession, GameSnapshot, RoleAssignment, RoundResults, WordSupply};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;

/// Games are fixed to a single round
pub const TOTAL_ROUNDS: u32 = 1;
pub const MIN_PLAYERS: usize = 2;

/// A lobby and, once started, its game
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lobby {
    pub code: String,
    pub host: String,
    pub rounds: u32,
    pub players: Vec<Player>,
    pub started: bool,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub game: Option<GameSession>,
}

/// Trim a client-supplied player name, rejecting missing or blank ones
pub fn player_name(raw: &str) -> Result<&str, LobbyError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(LobbyError::MissingName);
    }
    Ok(name)
}

impl Lobby {
    pub fn new(code: impl Into<String>, host: &str, created_at: DateTime<Utc>) -> Self {
        Self {
            code: code.into(),
            host: host.to_string(),
            rounds: TOTAL_ROUNDS,
            players: vec![Player::host(host)],
            started: false,
            created_at,
            game: None,
        }
    }

    pub fn is_host(&self, name: &str) -> bool {
        self.host == name
    }

    pub fn player_names(&self) -> Vec<&str> {
        self.players.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn add_player(&mut self, name: &str) -> Result<(), LobbyError> {
        if self.started {
            return Err(LobbyError::AlreadyStarted);
        }
        if self.players.iter().any(|p| p.has_name_like(name)) {
            return Err(LobbyError::NameTaken);
        }
        self.players.push(Player::guest(name));
        Ok(())
    }

    /// Remove the player with exactly this name.
    /// Returns true when the lobby must be closed: the host left or nobody is left.
    pub fn remove_player(&mut self, name: &str) -> bool {
        self.players.retain(|p| p.name != name);
        self.is_host(name) || self.players.is_empty()
    }

    pub fn start(&mut self, caller: &str) -> Result<(), LobbyError> {
        if !self.is_host(caller) {
            return Err(LobbyError::Forbidden("start the game"));
        }
        if self.players.len() < MIN_PLAYERS {
            return Err(LobbyError::InsufficientPlayers {
                required: MIN_PLAYERS,
            });
        }
        if self.started {
            return Err(LobbyError::AlreadyStarted);
        }

        self.started = true;
        self.game = Some(GameSession::new());
        Ok(())
    }

    fn session_mut(&mut self) -> Result<&mut GameSession, LobbyError> {
        self.game.as_mut().ok_or(LobbyError::NotStarted)
    }

    pub fn start_round<R: Rng + ?Sized>(
        &mut self,
        words: &dyn WordSupply,
        rng: &mut R,
    ) -> Result<RoleAssignment, LobbyError> {
        let game = self.game.as_mut().ok_or(LobbyError::NotStarted)?;
        let names: Vec<&str> = self.players.iter().map(|p| p.name.as_str()).collect();
        game.assign_roles(&names, words, rng)
    }

    pub fn start_playing(&mut self) -> Result<(), LobbyError> {
        let Some(game) = self.game.as_mut() else {
            return Err(LobbyError::InvalidState {
                action: "start playing",
                state: "not-started",
            });
        };
        game.begin_playing()
    }

    pub fn finish_round(
        &mut self,
        caller: &str,
        now: DateTime<Utc>,
    ) -> Result<RoundResults, LobbyError> {
        if !self.is_host(caller) {
            return Err(LobbyError::Forbidden("finish the round"));
        }
        let total_rounds = self.rounds;
        Ok(self.session_mut()?.finish(total_rounds, now))
    }

    pub fn game_snapshot(&self) -> Result<GameSnapshot, LobbyError> {
        let game = self.game.as_ref().ok_or(LobbyError::NotStarted)?;
        Ok(game.snapshot(self.rounds))
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.game.as_ref().and_then(|g| g.finished_at)
    }
}
