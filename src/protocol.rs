use crate::types::*;
use crate::words::SpyHints;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Input events from the front end
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum Command {
    StartMatch {
        names: Vec<String>,
        settings: GameSettings,
    },
    /// Advance the pass-the-device role reveal by one step
    RevealNext,
    NextQuestion,
    Vote {
        target: PlayerId,
    },
    /// Acknowledge the voting result: continue if undecided, else end
    Continue,
    EndMatch,
    Status,
}

/// What a player sees when it is their turn to look at the device
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum RoleCard {
    Civilian { word: String, category: String },
    Spy { hints: SpyHints },
}

/// Outputs for the display
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum Event {
    Stage {
        stage: GameStage,
        time_left: u32,
        valid_transitions: Vec<GameStage>,
    },
    /// Hand the device to the next player before showing their card
    PassDevice {
        player_name: String,
        index: usize,
        total: usize,
    },
    RoleCard {
        player_name: String,
        card: RoleCard,
        is_last: bool,
    },
    Question {
        text: String,
    },
    VoteCounts {
        counts: HashMap<PlayerId, u32>,
        cast: usize,
        needed: usize,
    },
    /// Top vote count was shared; the round starts over
    TieVote,
    VotingResult {
        eliminated: Player,
        was_last_spy: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        winner: Option<Winner>,
        remaining: Vec<Player>,
        time_left: u32,
    },
    TimeLeft {
        seconds: u32,
    },
    TimerExpired {
        spies: Vec<Player>,
    },
    MatchEnded,
    Status {
        stage: GameStage,
        time_left: u32,
        players: Vec<Player>,
    },
    Error {
        code: String,
        msg: String,
    },
}

impl Event {
    pub fn error(code: &str, msg: impl Into<String>) -> Self {
        Event::Error {
            code: code.to_string(),
            msg: msg.into(),
        }
    }
}
