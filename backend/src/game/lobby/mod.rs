mod code;
mod player;
mod record;
mod store;
mod sweeper;

pub use player::Player;
pub use record::Lobby;
pub use store::LobbyStore;
pub use sweeper::{DEFAULT_SWEEP_INTERVAL, ExpiryPolicy, spawn_sweeper};
