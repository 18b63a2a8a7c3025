use super::snapshot::GameSnapshot;
use super::word_repository::WordSupply;
use crate::error::LobbyError;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;

/// Phases of a started game, in the only order they may be visited
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GamePhase {
    Countdown,
    RoleAssignment,
    Playing,
    Results,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Countdown => "countdown",
            Self::RoleAssignment => "role-assignment",
            Self::Playing => "playing",
            Self::Results => "results",
        }
    }
}

/// Roles and secret handed out by start-round
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleAssignment {
    pub imposter: String,
    pub word: String,
    pub hint: String,
    pub first_player: String,
}

/// Reveal sent when the host finishes the round
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundResults {
    pub imposter: Option<String>,
    pub word: Option<String>,
    pub hint: Option<String>,
    pub current_round: u32,
    pub total_rounds: u32,
    pub game_finished: bool,
}

/// State of the single round a lobby plays (pure logic, no I/O).
/// Serialized flat into the lobby payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSession {
    pub game_state: GamePhase,
    pub current_round: u32,
    pub imposter: Option<String>,
    pub word: Option<String>,
    pub hint: Option<String>,
    pub first_player: Option<String>,
    pub round_finished: bool,
    pub game_finished: bool,
    #[serde(skip)]
    pub finished_at: Option<DateTime<Utc>>,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    pub fn new() -> Self {
        Self {
            game_state: GamePhase::Countdown,
            current_round: 1,
            imposter: None,
            word: None,
            hint: None,
            first_player: None,
            round_finished: false,
            game_finished: false,
            finished_at: None,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.game_state
    }

    fn advance(&mut self, next: GamePhase) {
        if next >= self.game_state {
            self.game_state = next;
        }
    }

    fn assignment(&self) -> Option<RoleAssignment> {
        Some(RoleAssignment {
            imposter: self.imposter.clone()?,
            word: self.word.clone()?,
            hint: self.hint.clone()?,
            first_player: self.first_player.clone()?,
        })
    }

    /// Pick the imposter and first player and draw the secret word.
    ///
    /// Both picks are independent uniform draws over `players`, so the
    /// imposter may also go first. A repeat call during role assignment
    /// returns the roles already handed out.
    pub fn assign_roles<R: Rng + ?Sized>(
        &mut self,
        players: &[&str],
        words: &dyn WordSupply,
        rng: &mut R,
    ) -> Result<RoleAssignment, LobbyError> {
        match self.game_state {
            GamePhase::Countdown => {}
            GamePhase::RoleAssignment => {
                if let Some(existing) = self.assignment() {
                    return Ok(existing);
                }
            }
            state => {
                return Err(LobbyError::InvalidState {
                    action: "start the round",
                    state: state.as_str(),
                });
            }
        }

        if players.is_empty() {
            return Err(LobbyError::InsufficientPlayers { required: 1 });
        }

        let imposter = players[rng.random_range(0..players.len())].to_string();
        let first_player = players[rng.random_range(0..players.len())].to_string();
        let drawn = words.draw_word();

        self.imposter = Some(imposter.clone());
        self.first_player = Some(first_player.clone());
        self.word = Some(drawn.word.clone());
        self.hint = Some(drawn.hint.clone());
        self.round_finished = false;
        self.advance(GamePhase::RoleAssignment);

        Ok(RoleAssignment {
            imposter,
            word: drawn.word,
            hint: drawn.hint,
            first_player,
        })
    }

    /// Move from role assignment into the hinting phase
    pub fn begin_playing(&mut self) -> Result<(), LobbyError> {
        if self.game_state != GamePhase::RoleAssignment {
            return Err(LobbyError::InvalidState {
                action: "start playing",
                state: self.game_state.as_str(),
            });
        }
        self.advance(GamePhase::Playing);
        Ok(())
    }

    /// End the round and the game. There is only ever one round.
    pub fn finish(&mut self, total_rounds: u32, now: DateTime<Utc>) -> RoundResults {
        self.advance(GamePhase::Results);
        self.round_finished = true;
        self.game_finished = true;
        self.finished_at.get_or_insert(now);

        RoundResults {
            imposter: self.imposter.clone(),
            word: self.word.clone(),
            hint: self.hint.clone(),
            current_round: self.current_round,
            total_rounds,
            game_finished: true,
        }
    }

    pub fn snapshot(&self, total_rounds: u32) -> GameSnapshot {
        GameSnapshot {
            game_state: self.game_state,
            current_round: self.current_round,
            total_rounds,
            imposter: self.imposter.clone(),
            word: self.word.clone(),
            hint: self.hint.clone(),
            first_player: self.first_player.clone(),
            round_finished: self.round_finished,
            is_imposter: None,
        }
    }
}
