//! Match lifecycle and the rules it is built on.
//!
//! `GameState` is the synchronous state machine for a single match:
//! setup -> role reveal -> gameplay -> voting result -> (gameplay | setup),
//! with `TimerExpired` reachable from gameplay and the voting result.
//! The rule functions (role assignment, vote tallying, win check) live in
//! the submodules and are pure.

pub mod roles;
pub mod roster;
pub mod vote;
pub mod win;

pub use roles::assign_roles;
pub use roster::{active_players, build_roster};
pub use vote::{count_votes, get_eliminated_player, has_tie_vote, TallyOutcome, VotingTally};
pub use win::check_win_condition;

use crate::types::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Match state owned by the game controller.
///
/// `eliminated_player` is only set while `stage` is `VotingResult`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameState {
    pub stage: GameStage,
    pub players: Vec<Player>,
    pub settings: Option<GameSettings>,
    pub eliminated_player: Option<Player>,
    pub time_left: u32,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        Self {
            stage: GameStage::Setup,
            players: Vec::new(),
            settings: None,
            eliminated_player: None,
            time_left: 0,
        }
    }

    /// Check if a stage transition is valid
    pub fn is_valid_stage_transition(from: &GameStage, to: &GameStage) -> bool {
        use GameStage::*;

        match (from, to) {
            (Setup, RoleReveal) => true,
            (RoleReveal, Gameplay) => true,
            (Gameplay, VotingResult) => true,
            (VotingResult, Gameplay) => true,

            // Time running out ends the match from either running stage
            (Gameplay, TimerExpired) => true,
            (VotingResult, TimerExpired) => true,

            // Ending the match is always allowed
            (_, Setup) => true,

            _ => false,
        }
    }

    /// Stages reachable from `stage`
    pub fn valid_transitions(stage: &GameStage) -> Vec<GameStage> {
        use GameStage::*;

        [Setup, RoleReveal, Gameplay, VotingResult, TimerExpired]
            .into_iter()
            .filter(|to| Self::is_valid_stage_transition(stage, to))
            .collect()
    }

    fn transition(&mut self, to: GameStage) -> Result<(), String> {
        if !Self::is_valid_stage_transition(&self.stage, &to) {
            return Err(format!(
                "Invalid stage transition from {:?} to {:?}",
                self.stage, to
            ));
        }
        tracing::debug!("Stage {:?} -> {:?}", self.stage, to);
        self.stage = to;
        Ok(())
    }

    /// Start a match with a validated roster and settings.
    ///
    /// Roles are drawn with `rng`; the countdown is reset to the configured
    /// duration.
    pub fn start_match<R: Rng + ?Sized>(
        &mut self,
        players: Vec<Player>,
        settings: GameSettings,
        rng: &mut R,
    ) -> Result<(), String> {
        self.transition(GameStage::RoleReveal)?;

        self.players = assign_roles(&players, settings.spy_count, rng);
        self.time_left = settings.timer_duration;
        self.eliminated_player = None;
        tracing::info!(
            "Match started with {} players, {} spies, {}s on the clock",
            self.players.len(),
            settings.spy_count,
            settings.timer_duration
        );
        self.settings = Some(settings);
        Ok(())
    }

    pub fn complete_role_reveal(&mut self) -> Result<(), String> {
        if self.stage != GameStage::RoleReveal {
            return Err(format!("Cannot complete role reveal during {:?}", self.stage));
        }
        self.transition(GameStage::Gameplay)
    }

    /// Apply a completed round of votes.
    ///
    /// When a single player leads, they are marked inactive and recorded as
    /// eliminated and the match moves to `VotingResult`. Otherwise nothing
    /// changes and `Ok(None)` is returned.
    pub fn complete_voting(&mut self, votes: &VotingState) -> Result<Option<Player>, String> {
        if self.stage != GameStage::Gameplay {
            return Err(format!("Cannot complete voting during {:?}", self.stage));
        }

        let Some(target) = get_eliminated_player(&self.players, votes) else {
            tracing::info!("Voting produced no elimination");
            return Ok(None);
        };

        let mut eliminated = None;
        for player in self.players.iter_mut() {
            if player.id == target.id {
                player.is_active = false;
                eliminated = Some(player.clone());
            }
        }

        self.transition(GameStage::VotingResult)?;
        self.eliminated_player = eliminated.clone();
        tracing::info!(
            "Player {} eliminated (spy: {})",
            target.name,
            target.is_spy
        );
        Ok(eliminated)
    }

    /// Return to gameplay after a voting result that did not decide the match
    pub fn continue_match(&mut self) -> Result<(), String> {
        if self.stage != GameStage::VotingResult {
            return Err(format!("Cannot continue match during {:?}", self.stage));
        }
        if let Some(winner) = self.winner() {
            return Err(format!("Match already won by {}", winner));
        }
        self.transition(GameStage::Gameplay)?;
        self.eliminated_player = None;
        Ok(())
    }

    /// Wipe the match and return to setup
    pub fn end_match(&mut self) {
        tracing::info!("Match ended from {:?}", self.stage);
        *self = Self::new();
    }

    /// The countdown ran out: spies win regardless of the roster
    pub fn timer_expired(&mut self) -> Result<(), String> {
        self.transition(GameStage::TimerExpired)?;
        tracing::info!("Timer expired, spies win");
        Ok(())
    }

    pub fn update_time(&mut self, seconds: u32) {
        self.time_left = seconds;
    }

    pub fn active_players(&self) -> Vec<Player> {
        active_players(&self.players)
    }

    /// Win check over the current roster, computed on demand
    pub fn winner(&self) -> Option<Winner> {
        if self.players.is_empty() {
            return None;
        }
        check_win_condition(&self.players)
    }

    /// Every spy of the match, eliminated or not
    pub fn spies(&self) -> Vec<Player> {
        self.players.iter().filter(|p| p.is_spy).cloned().collect()
    }

    /// Whether the countdown should be ticking
    pub fn clock_running(&self) -> bool {
        match self.stage {
            GameStage::Gameplay => true,
            GameStage::VotingResult => self.winner().is_none(),
            _ => false,
        }
    }
}
