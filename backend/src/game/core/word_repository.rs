use super::word::Word;
use rand::Rng;
use std::path::Path;

/// Word list compiled into the binary, one `word - hint` pair per line
const BUILTIN_WORDS: &str = include_str!("../../../words.txt");

const FALLBACK_WORDS: [(&str, &str); 3] = [
    ("ocean", "water"),
    ("cheese", "food"),
    ("table", "legs"),
];

/// Source of secret word/hint pairs for a round.
pub trait WordSupply: Send + Sync + 'static {
    /// Draw one pair uniformly. Never returns an empty word or hint.
    fn draw_word(&self) -> Word;
}

#[derive(Clone)]
pub struct WordRepository {
    words: Vec<Word>,
}

impl WordRepository {
    /// Build from explicit pairs, dropping blank entries. Falls back to a
    /// small default set if nothing usable is left.
    pub fn new(words: Vec<Word>) -> Self {
        let mut words: Vec<Word> = words
            .into_iter()
            .filter(|w| !w.word.trim().is_empty() && !w.hint.trim().is_empty())
            .collect();

        if words.is_empty() {
            words = FALLBACK_WORDS
                .iter()
                .map(|(word, hint)| Word::new(*word, *hint))
                .collect();
        }

        Self { words }
    }

    pub fn builtin() -> Self {
        Self::new(parse_word_list(BUILTIN_WORDS))
    }

    /// Load a word list from disk. An unreadable file is an error; a file with
    /// no valid lines yields the fallback set.
    pub fn from_file(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(Self::new(parse_word_list(&contents)))
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn draw_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Word {
        let index = rng.random_range(0..self.words.len());
        self.words[index].clone()
    }
}

impl WordSupply for WordRepository {
    fn draw_word(&self) -> Word {
        self.draw_with(&mut rand::rng())
    }
}

/// Parse `word - hint` lines. Lines that don't split into exactly two
/// non-empty halves are skipped.
pub fn parse_word_list(contents: &str) -> Vec<Word> {
    contents
        .lines()
        .filter_map(|line| {
            let mut parts = line.split(" - ");
            let word = parts.next()?.trim();
            let hint = parts.next()?.trim();
            if parts.next().is_some() || word.is_empty() || hint.is_empty() {
                return None;
            }
            Some(Word::new(word, hint))
        })
        .collect()
}
