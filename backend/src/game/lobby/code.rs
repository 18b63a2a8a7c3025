use crate::error::LobbyError;
use rand::Rng;

const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
pub const CODE_LENGTH: usize = 8;

pub fn generate_lobby_code() -> String {
    let mut rng = rand::rng();
    (0..CODE_LENGTH)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}

pub fn generate_unique_lobby_code<F>(exists: F) -> String
where
    F: Fn(&str) -> bool,
{
    loop {
        let code = generate_lobby_code();
        if !exists(&code) {
            return code;
        }
    }
}

/// Canonical form of a client-supplied code: trimmed and upper-cased
pub fn normalize_code(raw: &str) -> Result<String, LobbyError> {
    let code = raw.trim().to_ascii_uppercase();
    if is_valid_code(&code) {
        Ok(code)
    } else {
        Err(LobbyError::MalformedCode)
    }
}

pub fn is_valid_code(code: &str) -> bool {
    code.len() == CODE_LENGTH && code.bytes().all(|b| CHARSET.contains(&b))
}
