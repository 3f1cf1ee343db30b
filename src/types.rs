use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque ID types
pub type PlayerId = String;
pub type VoterKey = String;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GameStage {
    Setup,
    RoleReveal,
    Gameplay,
    VotingResult,
    TimerExpired,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Spies,
    Civilians,
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Winner::Spies => write!(f, "spies"),
            Winner::Civilians => write!(f, "civilians"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum WordCategory {
    Animals,
    Cities,
    Professions,
    Objects,
    Food,
    Drinks,
    Smoking,
    Entertainment,
    Relationships,
    Games,
    Hobbies,
    Holidays,
    Sports,
}

impl WordCategory {
    pub const ALL: [WordCategory; 13] = [
        WordCategory::Animals,
        WordCategory::Cities,
        WordCategory::Professions,
        WordCategory::Objects,
        WordCategory::Food,
        WordCategory::Drinks,
        WordCategory::Smoking,
        WordCategory::Entertainment,
        WordCategory::Relationships,
        WordCategory::Games,
        WordCategory::Hobbies,
        WordCategory::Holidays,
        WordCategory::Sports,
    ];

    /// Stable identifier, matches the serde representation
    pub fn key(&self) -> &'static str {
        match self {
            WordCategory::Animals => "animals",
            WordCategory::Cities => "cities",
            WordCategory::Professions => "professions",
            WordCategory::Objects => "objects",
            WordCategory::Food => "food",
            WordCategory::Drinks => "drinks",
            WordCategory::Smoking => "smoking",
            WordCategory::Entertainment => "entertainment",
            WordCategory::Relationships => "relationships",
            WordCategory::Games => "games",
            WordCategory::Hobbies => "hobbies",
            WordCategory::Holidays => "holidays",
            WordCategory::Sports => "sports",
        }
    }

    /// Human-readable name shown on role cards and in the setup screen
    pub fn display_name(&self) -> &'static str {
        match self {
            WordCategory::Animals => "Animals",
            WordCategory::Cities => "Cities",
            WordCategory::Professions => "Professions",
            WordCategory::Objects => "Objects",
            WordCategory::Food => "Food",
            WordCategory::Drinks => "Drinks",
            WordCategory::Smoking => "Smoking",
            WordCategory::Entertainment => "Entertainment",
            WordCategory::Relationships => "Relationships",
            WordCategory::Games => "Games",
            WordCategory::Hobbies => "Hobbies",
            WordCategory::Holidays => "Holidays",
            WordCategory::Sports => "Sports",
        }
    }
}

impl FromStr for WordCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        WordCategory::ALL
            .iter()
            .copied()
            .find(|c| c.key() == needle)
            .ok_or_else(|| format!("Unknown category: {}", s.trim()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub is_active: bool,
    pub is_spy: bool,
}

/// Per-match settings, fixed once the match starts
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameSettings {
    pub spy_count: usize,
    pub categories: Vec<WordCategory>,
    /// Countdown length in seconds
    pub timer_duration: u32,
    pub show_category_to_spy: bool,
    pub show_letter_count_to_spy: bool,
    pub show_first_letter_to_spy: bool,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            spy_count: 1,
            categories: vec![
                WordCategory::Animals,
                WordCategory::Cities,
                WordCategory::Professions,
                WordCategory::Objects,
                WordCategory::Food,
            ],
            timer_duration: 300,
            show_category_to_spy: true,
            show_letter_count_to_spy: false,
            show_first_letter_to_spy: false,
        }
    }
}

/// Votes cast in the current round: synthetic voter key -> target player id.
///
/// Insertion ordered. Inserting an existing key replaces its target in place.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct VotingState {
    entries: Vec<(VoterKey, PlayerId)>,
}

impl VotingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, voter: VoterKey, target: PlayerId) {
        match self.entries.iter_mut().find(|(k, _)| *k == voter) {
            Some(entry) => entry.1 = target,
            None => self.entries.push((voter, target)),
        }
    }

    pub fn get(&self, voter: &str) -> Option<&PlayerId> {
        self.entries
            .iter()
            .find(|(k, _)| k == voter)
            .map(|(_, target)| target)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&VoterKey, &PlayerId)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    /// Voted-for player ids, one per entry
    pub fn targets(&self) -> impl Iterator<Item = &PlayerId> {
        self.entries.iter().map(|(_, v)| v)
    }
}

impl<K: Into<VoterKey>, V: Into<PlayerId>> FromIterator<(K, V)> for VotingState {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut state = VotingState::new();
        for (k, v) in iter {
            state.insert(k.into(), v.into());
        }
        state
    }
}

/// The secret word for a match and the category it was drawn from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SecretWord {
    pub word: String,
    pub category: WordCategory,
}
