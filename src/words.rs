//! Word and hint content
//!
//! The word bank is embedded at build time. A match draws one secret word
//! uniformly from the union of all words in the selected categories.

use crate::types::*;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const EMBEDDED_WORDS: &str = include_str!("../data/words.json");
const EMBEDDED_QUESTIONS: &str = include_str!("../data/hint_questions.json");

/// Errors that can occur while picking content for a match
#[derive(Debug, thiserror::Error)]
pub enum WordError {
    #[error("No word category selected")]
    NoCategories,

    #[error("The word bank has no words for the selected categories")]
    EmptyWordBank,

    #[error("Failed to parse word data: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct WordBank {
    words: HashMap<WordCategory, Vec<String>>,
}

impl WordBank {
    /// The word bank shipped with the binary
    pub fn embedded() -> Result<Self, WordError> {
        Self::from_json(EMBEDDED_WORDS)
    }

    /// Parse a `{ "<category>": ["word", ...] }` document
    pub fn from_json(json: &str) -> Result<Self, WordError> {
        let words: HashMap<WordCategory, Vec<String>> = serde_json::from_str(json)?;
        Ok(Self { words })
    }

    pub fn from_map(words: HashMap<WordCategory, Vec<String>>) -> Self {
        Self { words }
    }

    pub fn words(&self, category: WordCategory) -> &[String] {
        self.words.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Category a word belongs to, if any
    pub fn category_of(&self, word: &str) -> Option<WordCategory> {
        WordCategory::ALL
            .into_iter()
            .find(|c| self.words(*c).iter().any(|w| w == word))
    }

    /// Pick one word uniformly from every word of the selected categories.
    ///
    /// Repeated categories are only counted once.
    pub fn select_random_word<R: Rng + ?Sized>(
        &self,
        categories: &[WordCategory],
        rng: &mut R,
    ) -> Result<SecretWord, WordError> {
        if categories.is_empty() {
            return Err(WordError::NoCategories);
        }

        let mut selected: Vec<WordCategory> = Vec::new();
        for category in categories {
            if !selected.contains(category) {
                selected.push(*category);
            }
        }

        let pool: Vec<(&String, WordCategory)> = selected
            .iter()
            .flat_map(|c| self.words(*c).iter().map(move |w| (w, *c)))
            .collect();

        if pool.is_empty() {
            return Err(WordError::EmptyWordBank);
        }

        let (word, category) = pool[rng.random_range(0..pool.len())];
        Ok(SecretWord {
            word: word.clone(),
            category,
        })
    }
}

/// What a spy is allowed to see, per the match settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpyHints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub letter_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_letter: Option<String>,
}

impl SpyHints {
    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.letter_count.is_none() && self.first_letter.is_none()
    }
}

pub fn generate_spy_hints(secret: &SecretWord, settings: &GameSettings) -> SpyHints {
    let mut hints = SpyHints::default();

    if settings.show_category_to_spy {
        hints.category = Some(secret.category.display_name().to_string());
    }

    if settings.show_letter_count_to_spy {
        hints.letter_count = Some(secret.word.chars().count());
    }

    if settings.show_first_letter_to_spy {
        hints.first_letter = secret
            .word
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect());
    }

    hints
}

#[derive(Debug, Deserialize)]
struct QuestionFile {
    questions: Vec<String>,
}

/// Conversation prompts shown during gameplay, cycled in order
#[derive(Debug, Clone)]
pub struct HintDeck {
    questions: Vec<String>,
    index: usize,
}

impl HintDeck {
    pub fn embedded() -> Result<Self, WordError> {
        let file: QuestionFile = serde_json::from_str(EMBEDDED_QUESTIONS)?;
        Ok(Self::new(file.questions))
    }

    pub fn new(questions: Vec<String>) -> Self {
        Self {
            questions,
            index: 0,
        }
    }

    pub fn current(&self) -> Option<&str> {
        self.questions.get(self.index).map(String::as_str)
    }

    /// Move to the next question, wrapping around at the end
    pub fn advance(&mut self) -> Option<&str> {
        if self.questions.is_empty() {
            return None;
        }
        self.index = (self.index + 1) % self.questions.len();
        self.current()
    }

    pub fn rewind(&mut self) {
        self.index = 0;
    }
}
