//! Setup screen state and the checks run before a match may start.
//!
//! The game controller trusts its input, so every rule about names and
//! spy counts is enforced here by the caller.

use crate::types::*;

pub const MIN_PLAYERS: usize = 3;
pub const MAX_PLAYERS: usize = 10;
pub const MIN_SPIES: usize = 1;
pub const MIN_TIMER_SECS: u32 = 60;
pub const MAX_TIMER_SECS: u32 = 1800;
pub const TIMER_STEP_SECS: u32 = 60;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    #[error("At least 3 players are needed, got {found}")]
    NotEnoughPlayers { found: usize },

    #[error("At most 10 players can join, got {found}")]
    TooManyPlayers { found: usize },

    #[error("At least 1 spy is needed, got {found}")]
    NotEnoughSpies { found: usize },

    #[error("There must be fewer spies ({spies}) than players ({players})")]
    TooManySpies { spies: usize, players: usize },
}

/// Trimmed, non-blank names in input order
pub fn valid_names<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    names
        .iter()
        .map(|n| n.as_ref().trim())
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .collect()
}

/// Validate setup input, returning the names to build the roster from
pub fn validate_setup<S: AsRef<str>>(
    names: &[S],
    spy_count: usize,
) -> Result<Vec<String>, SetupError> {
    let valid = valid_names(names);

    if valid.len() < MIN_PLAYERS {
        return Err(SetupError::NotEnoughPlayers { found: valid.len() });
    }

    if valid.len() > MAX_PLAYERS {
        return Err(SetupError::TooManyPlayers { found: valid.len() });
    }

    if spy_count < MIN_SPIES {
        return Err(SetupError::NotEnoughSpies { found: spy_count });
    }

    if spy_count >= valid.len() {
        return Err(SetupError::TooManySpies {
            spies: spy_count,
            players: valid.len(),
        });
    }

    Ok(valid)
}

/// Names and settings being edited before a match.
///
/// Edits clamp instead of failing, the way the setup screen's buttons do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupDraft {
    pub names: Vec<String>,
    pub settings: GameSettings,
}

impl Default for SetupDraft {
    fn default() -> Self {
        Self {
            names: vec![String::new(); MIN_PLAYERS],
            settings: GameSettings::default(),
        }
    }
}

impl SetupDraft {
    pub fn new(names: Vec<String>, settings: GameSettings) -> Self {
        Self { names, settings }
    }

    /// Number of filled-in names
    pub fn player_count(&self) -> usize {
        valid_names(&self.names).len()
    }

    /// Highest spy count the spy stepper allows
    pub fn max_spies(&self) -> usize {
        self.player_count().saturating_sub(2).max(MIN_SPIES)
    }

    /// Replace the whole name list, padded to the minimum slot count
    pub fn set_names(&mut self, names: Vec<String>) {
        let mut names: Vec<String> = names.into_iter().take(MAX_PLAYERS).collect();
        while names.len() < MIN_PLAYERS {
            names.push(String::new());
        }
        self.names = names;
        self.clamp_spies_to_slots();
    }

    /// Fill the first blank slot, or add a new one. Returns false when full.
    pub fn add_player(&mut self, name: &str) -> bool {
        if let Some(slot) = self.names.iter_mut().find(|n| n.trim().is_empty()) {
            *slot = name.trim().to_string();
            return true;
        }
        if self.names.len() >= MAX_PLAYERS {
            return false;
        }
        self.names.push(name.trim().to_string());
        true
    }

    /// Remove a slot (0-based). Never drops below the minimum slot count.
    pub fn remove_player(&mut self, index: usize) -> bool {
        if self.names.len() <= MIN_PLAYERS || index >= self.names.len() {
            return false;
        }
        self.names.remove(index);
        self.clamp_spies_to_slots();
        true
    }

    fn clamp_spies_to_slots(&mut self) {
        if self.settings.spy_count >= self.names.len() {
            self.settings.spy_count = self.names.len().saturating_sub(1).max(MIN_SPIES);
        }
    }

    pub fn set_spy_count(&mut self, spy_count: usize) {
        self.settings.spy_count = spy_count.clamp(MIN_SPIES, self.max_spies());
    }

    /// Set the countdown in whole minutes, clamped to the allowed range
    pub fn set_timer_minutes(&mut self, minutes: u32) {
        self.settings.timer_duration = minutes
            .saturating_mul(TIMER_STEP_SECS)
            .clamp(MIN_TIMER_SECS, MAX_TIMER_SECS);
    }

    pub fn set_category(&mut self, category: WordCategory, enabled: bool) {
        let present = self.settings.categories.contains(&category);
        if enabled && !present {
            self.settings.categories.push(category);
        } else if !enabled {
            self.settings.categories.retain(|c| *c != category);
        }
    }

    pub fn validate(&self) -> Result<Vec<String>, SetupError> {
        validate_setup(&self.names, self.settings.spy_count)
    }
}
