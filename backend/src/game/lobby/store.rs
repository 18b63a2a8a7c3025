use super::code::{generate_unique_lobby_code, normalize_code};
use super::record::{Lobby, player_name};
use super::sweeper::ExpiryPolicy;
use crate::error::LobbyError;
use crate::game::core::messages::LobbyEvent;
use crate::game::core::{GameSnapshot, RoleAssignment, RoundResults, WordSupply};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info};

const EVENT_CAPACITY: usize = 16;

/// A live lobby together with its subscriber channel
struct LobbyEntry {
    lobby: Lobby,
    events: broadcast::Sender<LobbyEvent>,
}

impl LobbyEntry {
    fn new(lobby: Lobby) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self { lobby, events }
    }

    fn publish(&self) {
        if self.events.receiver_count() == 0 {
            return;
        }
        let _ = self.events.send(LobbyEvent::LobbyUpdated {
            lobby: self.lobby.clone(),
        });
    }

    fn close(&self) {
        let _ = self.events.send(LobbyEvent::LobbyClosed);
    }
}

/// All live lobbies keyed by code.
///
/// Every mutation of a lobby runs while holding its map shard's write guard,
/// so two requests never interleave changes to the same lobby.
pub struct LobbyStore {
    lobbies: DashMap<String, LobbyEntry>,
    words: Arc<dyn WordSupply>,
    expiry: ExpiryPolicy,
}

impl LobbyStore {
    pub fn new(words: Arc<dyn WordSupply>, expiry: ExpiryPolicy) -> Self {
        Self {
            lobbies: DashMap::new(),
            words,
            expiry,
        }
    }

    pub fn len(&self) -> usize {
        self.lobbies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lobbies.is_empty()
    }

    /// Codes of every live lobby, sorted
    pub fn list_codes(&self) -> Vec<String> {
        let mut codes: Vec<String> = self.lobbies.iter().map(|e| e.key().clone()).collect();
        codes.sort();
        codes
    }

    pub fn create_lobby(&self, host_name: &str) -> Result<Lobby, LobbyError> {
        let host = player_name(host_name)?;

        loop {
            let code = generate_unique_lobby_code(|code| self.lobbies.contains_key(code));
            // Another request may have claimed the code since the check
            let Entry::Vacant(slot) = self.lobbies.entry(code.clone()) else {
                continue;
            };

            let lobby = Lobby::new(code.clone(), host, Utc::now());
            slot.insert(LobbyEntry::new(lobby.clone()));
            info!(code, host, "Lobby created");
            return Ok(lobby);
        }
    }

    pub fn get_lobby(&self, code: &str) -> Result<Lobby, LobbyError> {
        let code = normalize_code(code)?;
        let entry = self.lobbies.get(&code).ok_or(LobbyError::NotFound)?;
        Ok(entry.lobby.clone())
    }

    /// Apply `change` to one lobby under its write guard and notify
    /// subscribers if it succeeded.
    fn update<T>(
        &self,
        code: &str,
        change: impl FnOnce(&mut Lobby) -> Result<T, LobbyError>,
    ) -> Result<T, LobbyError> {
        let code = normalize_code(code)?;
        let mut entry = self.lobbies.get_mut(&code).ok_or(LobbyError::NotFound)?;
        let result = change(&mut entry.lobby)?;
        entry.publish();
        Ok(result)
    }

    pub fn join_lobby(&self, code: &str, player: &str) -> Result<Lobby, LobbyError> {
        let player = player_name(player)?;
        let lobby = self
            .update(code, |lobby| {
                lobby.add_player(player)?;
                Ok(lobby.clone())
            })
            .inspect_err(|err| debug!(code, player, %err, "Join rejected"))?;

        info!(code = lobby.code, player, players = lobby.players.len(), "Player joined");
        Ok(lobby)
    }

    /// Remove a player. Deletes the lobby when the host leaves or it empties.
    pub fn leave_lobby(&self, code: &str, player: &str) -> Result<(), LobbyError> {
        let code = normalize_code(code)?;
        let player = player.trim();
        let mut found = false;
        let mut left = false;

        let removed = self.lobbies.remove_if_mut(&code, |_, entry| {
            found = true;
            let before = entry.lobby.players.len();
            let close = entry.lobby.remove_player(player);
            left = entry.lobby.players.len() != before;
            if left && !close {
                entry.publish();
            }
            close
        });

        if let Some((code, entry)) = removed {
            entry.close();
            info!(code, player, "Lobby deleted");
            return Ok(());
        }

        if !found {
            return Err(LobbyError::NotFound);
        }
        if left {
            info!(code, player, "Player left");
        } else {
            debug!(code, player, "Leave ignored, player not in lobby");
        }
        Ok(())
    }

    pub fn start_game(&self, code: &str, caller: &str) -> Result<Lobby, LobbyError> {
        let caller = caller.trim();
        let lobby = self
            .update(code, |lobby| {
                lobby.start(caller)?;
                Ok(lobby.clone())
            })
            .inspect_err(|err| debug!(code, caller, %err, "Start rejected"))?;

        info!(code = lobby.code, caller, "Game started");
        Ok(lobby)
    }

    /// Current round payload. With a viewer, the payload is scoped to what
    /// that player is allowed to see.
    pub fn game_state(&self, code: &str, viewer: Option<&str>) -> Result<GameSnapshot, LobbyError> {
        let code = normalize_code(code)?;
        let entry = self.lobbies.get(&code).ok_or(LobbyError::NotFound)?;
        let snapshot = entry.lobby.game_snapshot()?;

        Ok(match viewer.map(str::trim).filter(|v| !v.is_empty()) {
            Some(viewer) => snapshot.scoped_for(viewer),
            None => snapshot,
        })
    }

    pub fn start_round(&self, code: &str) -> Result<RoleAssignment, LobbyError> {
        let roles = self.update(code, |lobby| {
            lobby.start_round(self.words.as_ref(), &mut rand::rng())
        })?;

        info!(
            code,
            imposter = roles.imposter,
            first_player = roles.first_player,
            "Roles assigned"
        );
        Ok(roles)
    }

    pub fn start_playing(&self, code: &str) -> Result<(), LobbyError> {
        self.update(code, Lobby::start_playing)
            .inspect_err(|err| debug!(code, %err, "Start playing rejected"))?;
        debug!(code, "Round in play");
        Ok(())
    }

    pub fn finish_round(&self, code: &str, caller: &str) -> Result<RoundResults, LobbyError> {
        let caller = caller.trim();
        let results = self.update(code, |lobby| lobby.finish_round(caller, Utc::now()))?;
        info!(code, imposter = ?results.imposter, "Round finished");
        Ok(results)
    }

    /// Current lobby plus a receiver for every later change
    pub fn subscribe(
        &self,
        code: &str,
    ) -> Result<(Lobby, broadcast::Receiver<LobbyEvent>), LobbyError> {
        let code = normalize_code(code)?;
        let entry = self.lobbies.get(&code).ok_or(LobbyError::NotFound)?;
        Ok((entry.lobby.clone(), entry.events.subscribe()))
    }

    /// Delete every lobby the expiry policy rejects. Returns how many were removed.
    pub fn sweep(&self, now: DateTime<Utc>) -> usize {
        let mut removed = 0;
        self.lobbies.retain(|code, entry| {
            if !self.expiry.is_expired(&entry.lobby, now) {
                return true;
            }
            entry.close();
            info!(code, started = entry.lobby.started, "Cleaned up expired lobby");
            removed += 1;
            false
        });
        removed
    }
}
