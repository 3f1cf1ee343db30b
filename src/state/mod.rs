mod game;
mod reveal;
mod timer;
mod vote;

pub use game::StartError;
pub use reveal::{role_card, RevealCursor, RevealStep};
pub use timer::CountdownTick;

use crate::game::{GameState, VotingTally};
use crate::protocol::Event;
use crate::types::*;
use crate::words::{HintDeck, WordBank, WordError};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex, RwLock};

/// The one match running on this device, shared between the input loop
/// and the countdown task.
///
/// Locks are always taken in field order (game, tally, reveal, secret,
/// questions, rng) so that multi-lock operations cannot deadlock.
#[derive(Clone)]
pub struct AppState {
    pub game: Arc<RwLock<GameState>>,
    pub tally: Arc<RwLock<VotingTally>>,
    pub reveal: Arc<RwLock<RevealCursor>>,
    pub secret: Arc<RwLock<Option<SecretWord>>>,
    pub questions: Arc<RwLock<HintDeck>>,
    pub word_bank: Arc<WordBank>,
    rng: Arc<Mutex<StdRng>>,
    /// Events produced outside a command (countdown ticks, expiry, stage changes)
    pub broadcast: broadcast::Sender<Event>,
}

impl AppState {
    pub fn new(word_bank: WordBank, questions: HintDeck, rng: StdRng) -> Self {
        let (tx, _rx) = broadcast::channel(100);
        Self {
            game: Arc::new(RwLock::new(GameState::new())),
            tally: Arc::new(RwLock::new(VotingTally::new())),
            reveal: Arc::new(RwLock::new(RevealCursor::default())),
            secret: Arc::new(RwLock::new(None)),
            questions: Arc::new(RwLock::new(questions)),
            word_bank: Arc::new(word_bank),
            rng: Arc::new(Mutex::new(rng)),
            broadcast: tx,
        }
    }

    /// Shipped content with a deterministic RNG
    pub fn with_seed(seed: u64) -> Result<Self, WordError> {
        Ok(Self::new(
            WordBank::embedded()?,
            HintDeck::embedded()?,
            StdRng::seed_from_u64(seed),
        ))
    }

    /// Shipped content with an OS-seeded RNG
    pub fn from_entropy() -> Result<Self, WordError> {
        Ok(Self::new(
            WordBank::embedded()?,
            HintDeck::embedded()?,
            StdRng::from_os_rng(),
        ))
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.broadcast.subscribe()
    }

    pub fn broadcast(&self, event: Event) {
        // No subscribers is fine
        let _ = self.broadcast.send(event);
    }

    /// Snapshot of the controller state
    pub async fn get_game(&self) -> GameState {
        self.game.read().await.clone()
    }

    pub async fn active_players(&self) -> Vec<Player> {
        self.game.read().await.active_players()
    }

    pub async fn stage_event(&self) -> Event {
        let game = self.game.read().await;
        Event::Stage {
            stage: game.stage,
            time_left: game.time_left,
            valid_transitions: GameState::valid_transitions(&game.stage),
        }
    }

    pub async fn broadcast_stage(&self) {
        let event = self.stage_event().await;
        self.broadcast(event);
    }

    pub async fn status(&self) -> Event {
        let game = self.game.read().await;
        Event::Status {
            stage: game.stage,
            time_left: game.time_left,
            players: game.players.clone(),
        }
    }
}
