use super::AppState;
use crate::protocol::{Event, RoleCard};
use crate::types::*;
use crate::words::generate_spy_hints;

/// Position in the pass-the-device role reveal
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevealCursor {
    pub index: usize,
    /// Whether the current player's card is on screen
    pub revealed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RevealStep {
    /// Hand the device over; the card is still hidden
    PassTo {
        player_name: String,
        index: usize,
        total: usize,
    },
    Card {
        player_name: String,
        card: RoleCard,
        is_last: bool,
    },
    /// Everyone has seen their card and gameplay has begun
    Finished,
}

impl From<RevealStep> for Option<Event> {
    fn from(step: RevealStep) -> Self {
        match step {
            RevealStep::PassTo {
                player_name,
                index,
                total,
            } => Some(Event::PassDevice {
                player_name,
                index,
                total,
            }),
            RevealStep::Card {
                player_name,
                card,
                is_last,
            } => Some(Event::RoleCard {
                player_name,
                card,
                is_last,
            }),
            RevealStep::Finished => None,
        }
    }
}

/// The card a player sees: civilians get the word, spies get the hints
/// the settings allow
pub fn role_card(player: &Player, secret: &SecretWord, settings: &GameSettings) -> RoleCard {
    if player.is_spy {
        RoleCard::Spy {
            hints: generate_spy_hints(secret, settings),
        }
    } else {
        RoleCard::Civilian {
            word: secret.word.clone(),
            category: secret.category.display_name().to_string(),
        }
    }
}

impl AppState {
    /// The step currently on screen, without advancing
    pub async fn current_reveal(&self) -> Result<RevealStep, String> {
        let game = self.game.read().await;
        let reveal = self.reveal.read().await;
        let secret = self.secret.read().await;

        if game.stage != GameStage::RoleReveal {
            return Err(format!("No role reveal during {:?}", game.stage));
        }

        let player = game
            .players
            .get(reveal.index)
            .ok_or("Role reveal cursor out of range")?;
        let total = game.players.len();

        if !reveal.revealed {
            return Ok(RevealStep::PassTo {
                player_name: player.name.clone(),
                index: reveal.index,
                total,
            });
        }

        let secret = secret.as_ref().ok_or("No secret word drawn")?;
        let settings = game.settings.as_ref().ok_or("No settings for match")?;
        Ok(RevealStep::Card {
            player_name: player.name.clone(),
            card: role_card(player, secret, settings),
            is_last: reveal.index + 1 == total,
        })
    }

    /// Advance the reveal: show the card, then pass to the next player.
    /// After the last card the match moves to gameplay.
    pub async fn reveal_next(&self) -> Result<RevealStep, String> {
        {
            let mut game = self.game.write().await;
            let mut reveal = self.reveal.write().await;

            if game.stage != GameStage::RoleReveal {
                return Err(format!("No role reveal during {:?}", game.stage));
            }

            if !reveal.revealed {
                reveal.revealed = true;
            } else if reveal.index + 1 >= game.players.len() {
                game.complete_role_reveal()?;
                *reveal = RevealCursor::default();
                tracing::info!("All roles revealed, gameplay begins");
                return Ok(RevealStep::Finished);
            } else {
                reveal.index += 1;
                reveal.revealed = false;
            }
        }

        self.current_reveal().await
    }

    /// Current conversation prompt
    pub async fn current_question(&self) -> Option<String> {
        self.questions.read().await.current().map(str::to_string)
    }

    /// Move to the next conversation prompt (gameplay only)
    pub async fn next_question(&self) -> Result<String, String> {
        let game = self.game.read().await;
        if game.stage != GameStage::Gameplay {
            return Err(format!("No questions during {:?}", game.stage));
        }
        let mut questions = self.questions.write().await;
        questions
            .advance()
            .map(str::to_string)
            .ok_or_else(|| "No hint questions available".to_string())
    }
}
