use super::record::Lobby;
use super::store::LobbyStore;
use chrono::{DateTime, TimeDelta, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(30 * 60);
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(2 * 60 * 60);
pub const DEFAULT_FINISHED_GRACE: Duration = Duration::from_secs(60 * 60);
pub const DEFAULT_STARTED_MAX_AGE: Duration = Duration::from_secs(12 * 60 * 60);

/// When the sweep may delete a lobby
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryPolicy {
    /// Age after which a lobby that never started is deleted
    pub max_age: Duration,
    /// How long a finished game stays readable
    pub finished_grace: Duration,
    /// Hard cap for started games that were never finished
    pub started_max_age: Duration,
}

impl Default for ExpiryPolicy {
    fn default() -> Self {
        Self {
            max_age: DEFAULT_MAX_AGE,
            finished_grace: DEFAULT_FINISHED_GRACE,
            started_max_age: DEFAULT_STARTED_MAX_AGE,
        }
    }
}

fn delta(duration: Duration) -> TimeDelta {
    TimeDelta::from_std(duration).unwrap_or(TimeDelta::MAX)
}

impl ExpiryPolicy {
    pub fn is_expired(&self, lobby: &Lobby, now: DateTime<Utc>) -> bool {
        let age = now - lobby.created_at;

        if !lobby.started {
            return age > delta(self.max_age);
        }

        if let Some(finished_at) = lobby.finished_at() {
            if now - finished_at > delta(self.finished_grace) {
                return true;
            }
        }

        age > delta(self.started_max_age)
    }
}

/// Spawns the background task that periodically deletes expired lobbies
pub fn spawn_sweeper(store: Arc<LobbyStore>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // First tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let removed = store.sweep(Utc::now());
            if removed > 0 {
                info!(removed, remaining = store.len(), "Swept expired lobbies");
            } else {
                debug!(remaining = store.len(), "Sweep found nothing to remove");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lobby_aged(minutes: i64, now: DateTime<Utc>) -> Lobby {
        let mut lobby = Lobby::new("ABCD1234", "Alice", now - TimeDelta::minutes(minutes));
        lobby.add_player("Bob").unwrap();
        lobby
    }

    #[test]
    fn unstarted_lobby_expires_after_max_age() {
        let policy = ExpiryPolicy::default();
        let now = Utc::now();

        assert!(!policy.is_expired(&lobby_aged(119, now), now));
        assert!(policy.is_expired(&lobby_aged(121, now), now));
    }

    #[test]
    fn started_lobby_survives_max_age() {
        let policy = ExpiryPolicy::default();
        let now = Utc::now();
        let mut lobby = lobby_aged(180, now);
        lobby.start("Alice").unwrap();

        assert!(!policy.is_expired(&lobby, now));
    }

    #[test]
    fn finished_lobby_expires_after_grace() {
        let policy = ExpiryPolicy::default();
        let now = Utc::now();
        let mut lobby = lobby_aged(90, now);
        lobby.start("Alice").unwrap();
        lobby
            .finish_round("Alice", now - TimeDelta::minutes(30))
            .unwrap();
        assert!(!policy.is_expired(&lobby, now));

        let mut lobby = lobby_aged(90, now);
        lobby.start("Alice").unwrap();
        lobby
            .finish_round("Alice", now - TimeDelta::minutes(61))
            .unwrap();
        assert!(policy.is_expired(&lobby, now));
    }

    #[test]
    fn abandoned_game_hits_hard_cap() {
        let policy = ExpiryPolicy::default();
        let now = Utc::now();
        let mut lobby = lobby_aged(13 * 60, now);
        lobby.start("Alice").unwrap();

        assert!(policy.is_expired(&lobby, now));
    }

    #[tokio::test(start_paused = true)]
    async fn sweeper_runs_on_interval() {
        use crate::game::core::WordRepository;

        let policy = ExpiryPolicy {
            max_age: Duration::ZERO,
            ..ExpiryPolicy::default()
        };
        let store = Arc::new(LobbyStore::new(Arc::new(WordRepository::builtin()), policy));
        store.create_lobby("Alice").unwrap();

        let handle = spawn_sweeper(store.clone(), Duration::from_secs(60));
        tokio::time::sleep(Duration::from_secs(61)).await;
        tokio::task::yield_now().await;

        assert_eq!(store.len(), 0);
        handle.abort();
    }
}
