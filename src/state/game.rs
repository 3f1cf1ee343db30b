use super::{AppState, RevealCursor};
use crate::game::{build_roster, GameState, VotingTally};
use crate::protocol::Event;
use crate::types::*;
use crate::words::WordError;

#[derive(Debug, thiserror::Error)]
pub enum StartError {
    #[error(transparent)]
    Word(#[from] WordError),

    #[error("{0}")]
    Transition(String),
}

impl AppState {
    /// Start a match from validated names.
    ///
    /// Draws the secret word first so that a content error leaves the
    /// device in setup. Any state left over from a previous match is
    /// replaced.
    pub async fn start_match(
        &self,
        names: &[String],
        settings: GameSettings,
    ) -> Result<(), StartError> {
        let mut game = self.game.write().await;
        let mut tally = self.tally.write().await;
        let mut reveal = self.reveal.write().await;
        let mut secret = self.secret.write().await;
        let mut questions = self.questions.write().await;
        let mut rng = self.rng.lock().await;

        let word = self
            .word_bank
            .select_random_word(&settings.categories, &mut *rng)?;

        game.start_match(build_roster(names), settings, &mut *rng)
            .map_err(StartError::Transition)?;

        tracing::info!("Secret word drawn from {:?}", word.category);
        *tally = VotingTally::new();
        *reveal = RevealCursor::default();
        *secret = Some(word);
        questions.rewind();
        Ok(())
    }

    /// Everyone has seen their role; the clock starts
    pub async fn complete_role_reveal(&self) -> Result<(), String> {
        self.game.write().await.complete_role_reveal()
    }

    /// Back to gameplay after an undecided voting result, with a fresh tally
    pub async fn continue_match(&self) -> Result<(), String> {
        let mut game = self.game.write().await;
        let mut tally = self.tally.write().await;

        game.continue_match()?;
        *tally = VotingTally::new();
        Ok(())
    }

    /// Abandon or finish the match and return to setup
    pub async fn end_match(&self) {
        let mut game = self.game.write().await;
        let mut tally = self.tally.write().await;
        let mut reveal = self.reveal.write().await;
        let mut secret = self.secret.write().await;

        game.end_match();
        tally.reset();
        *reveal = RevealCursor::default();
        *secret = None;
    }

    pub async fn winner(&self) -> Option<Winner> {
        self.game.read().await.winner()
    }

    /// Voting result screen for the current elimination, if any
    pub async fn voting_result(&self) -> Option<Event> {
        voting_result_event(&*self.game.read().await)
    }
}

pub(super) fn voting_result_event(game: &GameState) -> Option<Event> {
    if game.stage != GameStage::VotingResult {
        return None;
    }
    let eliminated = game.eliminated_player.clone()?;
    let winner = game.winner();

    Some(Event::VotingResult {
        was_last_spy: eliminated.is_spy && winner == Some(Winner::Civilians),
        eliminated,
        winner,
        remaining: game.active_players(),
        time_left: game.time_left,
    })
}
