use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub name: String,
    pub is_host: bool,
}

impl Player {
    pub fn host(name: &str) -> Self {
        Self {
            name: name.to_string(),
            is_host: true,
        }
    }

    pub fn guest(name: &str) -> Self {
        Self {
            name: name.to_string(),
            is_host: false,
        }
    }

    /// Names are unique within a lobby ignoring case
    pub fn has_name_like(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}
