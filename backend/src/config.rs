use crate::game::WordRepository;
use crate::game::lobby::{DEFAULT_SWEEP_INTERVAL, ExpiryPolicy};
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

const DEFAULT_PORT: u16 = 8000;

pub struct Config {
    pub port: u16,
    pub words_file: Option<PathBuf>,
    pub sweep_interval: Duration,
    pub expiry: ExpiryPolicy,
}

fn seconds<F>(lookup: &F, key: &str, default: Duration) -> Duration
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key/value source. Missing or unparseable values fall
    /// back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ExpiryPolicy::default();

        Self {
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            words_file: lookup("WORDS_FILE")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            sweep_interval: seconds(&lookup, "SWEEP_INTERVAL_SECS", DEFAULT_SWEEP_INTERVAL),
            expiry: ExpiryPolicy {
                max_age: seconds(&lookup, "LOBBY_MAX_AGE_SECS", defaults.max_age),
                finished_grace: seconds(
                    &lookup,
                    "FINISHED_LOBBY_GRACE_SECS",
                    defaults.finished_grace,
                ),
                started_max_age: seconds(
                    &lookup,
                    "STARTED_LOBBY_MAX_AGE_SECS",
                    defaults.started_max_age,
                ),
            },
        }
    }

    pub fn addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }

    /// Word list from `WORDS_FILE`, or the built-in list if unset or unreadable
    pub fn word_repository(&self) -> WordRepository {
        let Some(path) = &self.words_file else {
            return WordRepository::builtin();
        };

        match WordRepository::from_file(path) {
            Ok(words) => {
                info!(path = %path.display(), words = words.len(), "Loaded word list");
                words
            }
            Err(err) => {
                warn!(path = %path.display(), %err, "Word list unreadable, using built-in words");
                WordRepository::builtin()
            }
        }
    }
}
