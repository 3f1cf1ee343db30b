//! Command dispatch
//!
//! Entry point for everything the front end asks the match to do. Setup
//! input is validated here before it reaches the game controller; stage
//! changes are broadcast so every view can follow along.

use crate::protocol::{Command, Event};
use crate::setup::validate_setup;
use crate::state::{AppState, RevealStep, StartError};
use crate::types::*;
use std::sync::Arc;

/// Handle a command and return the event to show in response, if any
pub async fn handle_command(cmd: Command, state: &Arc<AppState>) -> Option<Event> {
    match cmd {
        Command::StartMatch { names, settings } => {
            handle_start_match(state, names, settings).await
        }
        Command::RevealNext => handle_reveal_next(state).await,
        Command::NextQuestion => match state.next_question().await {
            Ok(text) => Some(Event::Question { text }),
            Err(e) => Some(Event::error("INVALID_STAGE", e)),
        },
        Command::Vote { target } => handle_vote(state, target).await,
        Command::Continue => handle_continue(state).await,
        Command::EndMatch => {
            state.end_match().await;
            state.broadcast_stage().await;
            Some(Event::MatchEnded)
        }
        Command::Status => Some(state.status().await),
    }
}

async fn handle_start_match(
    state: &Arc<AppState>,
    names: Vec<String>,
    settings: GameSettings,
) -> Option<Event> {
    let names = match validate_setup(&names, settings.spy_count) {
        Ok(names) => names,
        Err(e) => return Some(Event::error("SETUP_INVALID", e.to_string())),
    };

    match state.start_match(&names, settings).await {
        Ok(()) => {
            state.broadcast_stage().await;
            match state.current_reveal().await {
                Ok(step) => step.into(),
                Err(e) => Some(Event::error("START_FAILED", e)),
            }
        }
        Err(StartError::Word(e)) => Some(Event::error("NO_WORDS", e.to_string())),
        Err(StartError::Transition(e)) => Some(Event::error("START_FAILED", e)),
    }
}

async fn handle_reveal_next(state: &Arc<AppState>) -> Option<Event> {
    match state.reveal_next().await {
        Ok(RevealStep::Finished) => {
            state.broadcast_stage().await;
            state
                .current_question()
                .await
                .map(|text| Event::Question { text })
        }
        Ok(step) => step.into(),
        Err(e) => Some(Event::error("INVALID_STAGE", e)),
    }
}

async fn handle_vote(state: &Arc<AppState>, target: PlayerId) -> Option<Event> {
    match state.cast_vote(&target).await {
        Ok(event) => {
            if matches!(event, Event::VotingResult { .. }) {
                state.broadcast_stage().await;
            }
            Some(event)
        }
        Err(e) => {
            tracing::warn!("Vote for {} rejected: {}", target, e);
            Some(Event::error("VOTE_REJECTED", e))
        }
    }
}

/// Acknowledge the result screen: an undecided match goes on, a decided or
/// expired one ends
async fn handle_continue(state: &Arc<AppState>) -> Option<Event> {
    let game = state.get_game().await;

    let decided = match game.stage {
        GameStage::VotingResult => game.winner().is_some(),
        GameStage::TimerExpired => true,
        other => {
            return Some(Event::error(
                "INVALID_STAGE",
                format!("Nothing to continue during {:?}", other),
            ))
        }
    };

    if decided {
        state.end_match().await;
        state.broadcast_stage().await;
        return Some(Event::MatchEnded);
    }

    match state.continue_match().await {
        Ok(()) => {
            state.broadcast_stage().await;
            Some(state.stage_event().await)
        }
        Err(e) => Some(Event::error("INVALID_STAGE", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> Arc<AppState> {
        Arc::new(AppState::with_seed(51).unwrap())
    }

    fn start(names: &[&str], spy_count: usize) -> Command {
        Command::StartMatch {
            names: names.iter().map(|s| s.to_string()).collect(),
            settings: GameSettings {
                spy_count,
                ..GameSettings::default()
            },
        }
    }

    fn error_code(event: Option<Event>) -> String {
        match event {
            Some(Event::Error { code, .. }) => code,
            other => panic!("Expected error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_start_rejects_small_roster() {
        let state = state();
        let result = handle_command(start(&["Ann", "", "Cy"], 1), &state).await;

        assert_eq!(error_code(result), "SETUP_INVALID");
        assert_eq!(state.get_game().await.stage, GameStage::Setup);
    }

    #[tokio::test]
    async fn test_start_rejects_all_spies() {
        let state = state();
        let result = handle_command(start(&["Ann", "Ben", "Cy"], 3), &state).await;
        assert_eq!(error_code(result), "SETUP_INVALID");
    }

    #[tokio::test]
    async fn test_start_rejects_zero_spies() {
        let state = state();
        let result = handle_command(start(&["Ann", "Ben", "Cy"], 0), &state).await;

        assert_eq!(error_code(result), "SETUP_INVALID");
        let game = state.get_game().await;
        assert_eq!(game.stage, GameStage::Setup);
        assert!(game.players.is_empty());
    }

    #[tokio::test]
    async fn test_start_without_categories() {
        let state = state();
        let cmd = Command::StartMatch {
            names: vec!["Ann".into(), "Ben".into(), "Cy".into()],
            settings: GameSettings {
                categories: Vec::new(),
                ..GameSettings::default()
            },
        };

        assert_eq!(error_code(handle_command(cmd, &state).await), "NO_WORDS");
    }

    #[tokio::test]
    async fn test_start_broadcasts_and_prompts_first_player() {
        let state = state();
        let mut rx = state.subscribe();

        let result = handle_command(start(&[" Ann ", "Ben", "Cy", ""], 1), &state).await;

        assert_eq!(
            result,
            Some(Event::PassDevice {
                player_name: "Ann".to_string(),
                index: 0,
                total: 3
            })
        );
        assert!(matches!(
            rx.try_recv().unwrap(),
            Event::Stage {
                stage: GameStage::RoleReveal,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_commands_out_of_stage() {
        let state = state();

        assert_eq!(
            error_code(handle_command(Command::RevealNext, &state).await),
            "INVALID_STAGE"
        );
        assert_eq!(
            error_code(handle_command(Command::NextQuestion, &state).await),
            "INVALID_STAGE"
        );
        assert_eq!(
            error_code(handle_command(Command::Continue, &state).await),
            "INVALID_STAGE"
        );
        assert_eq!(
            error_code(
                handle_command(
                    Command::Vote {
                        target: "x".to_string()
                    },
                    &state
                )
                .await
            ),
            "VOTE_REJECTED"
        );
    }

    #[tokio::test]
    async fn test_end_match_from_anywhere() {
        let state = state();
        handle_command(start(&["Ann", "Ben", "Cy"], 1), &state).await;

        assert_eq!(
            handle_command(Command::EndMatch, &state).await,
            Some(Event::MatchEnded)
        );
        assert_eq!(state.get_game().await.stage, GameStage::Setup);
    }

    #[tokio::test]
    async fn test_status_reports_roster() {
        let state = state();
        handle_command(start(&["Ann", "Ben", "Cy"], 1), &state).await;

        match handle_command(Command::Status, &state).await {
            Some(Event::Status { stage, players, .. }) => {
                assert_eq!(stage, GameStage::RoleReveal);
                assert_eq!(players.len(), 3);
            }
            other => panic!("Expected Status, got {:?}", other),
        }
    }
}
