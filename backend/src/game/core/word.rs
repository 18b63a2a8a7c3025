use serde::Serialize;

/// A secret word and the hint handed to the imposter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Word {
    pub word: String,
    pub hint: String,
}

impl Word {
    pub fn new(word: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            hint: hint.into(),
        }
    }
}
