pub mod core;
pub mod http_handler;
pub mod lobby;
pub mod ws;

pub use core::messages;
pub use core::{WordRepository, WordSupply};
pub use lobby::LobbyStore;
