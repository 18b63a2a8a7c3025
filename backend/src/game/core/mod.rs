pub mod messages;
pub mod session;
mod snapshot;
mod word;
mod word_repository;

pub use session::{GamePhase, GameSession, RoleAssignment, RoundResults};
pub use snapshot::GameSnapshot;
pub use word::Word;
pub use word_repository::{WordRepository, WordSupply, parse_word_list};
