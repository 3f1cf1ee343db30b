use super::game::voting_result_event;
use crate::protocol::Event;
use crate::state::AppState;
use crate::game::TallyOutcome;
use crate::types::*;

impl AppState {
    /// Record one vote for an active player.
    ///
    /// The round is evaluated right away: while votes are missing the live
    /// counts come back; a shared top count clears the tally; otherwise the
    /// leader is eliminated and the voting result is returned.
    pub async fn cast_vote(&self, target: &PlayerId) -> Result<Event, String> {
        let mut game = self.game.write().await;
        let mut tally = self.tally.write().await;

        if game.stage != GameStage::Gameplay {
            return Err(format!("Voting is closed during {:?}", game.stage));
        }

        let target_player = game
            .players
            .iter()
            .find(|p| p.id == *target)
            .ok_or_else(|| format!("Unknown player {}", target))?;
        if !target_player.is_active {
            return Err(format!("{} is already out", target_player.name));
        }

        match tally.cast_vote(target.clone(), &game.players) {
            TallyOutcome::Pending => Ok(Event::VoteCounts {
                counts: tally.tally(),
                cast: tally.vote_count(),
                needed: game.active_players().len(),
            }),
            TallyOutcome::Tie => Ok(Event::TieVote),
            TallyOutcome::Complete(snapshot) => {
                let eliminated = game.complete_voting(&snapshot)?;
                tally.reset();

                match eliminated {
                    Some(_) => voting_result_event(&game)
                        .ok_or_else(|| "Voting result missing after elimination".to_string()),
                    None => Ok(Event::TieVote),
                }
            }
        }
    }

    /// Live counts for the round in progress
    pub async fn vote_counts(&self) -> Event {
        let game = self.game.read().await;
        let tally = self.tally.read().await;

        Event::VoteCounts {
            counts: tally.tally(),
            cast: tally.vote_count(),
            needed: game.active_players().len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameState;

    /// Puts a fixed roster straight into gameplay: ids "1".."n", spies as given
    async fn in_gameplay(n: usize, spies: &[&str]) -> AppState {
        let state = AppState::with_seed(9).unwrap();
        let players = (1..=n)
            .map(|i| Player {
                id: i.to_string(),
                name: format!("Player {}", i),
                is_active: true,
                is_spy: spies.contains(&i.to_string().as_str()),
            })
            .collect();
        *state.game.write().await = GameState {
            stage: GameStage::Gameplay,
            players,
            settings: Some(GameSettings {
                spy_count: spies.len(),
                ..GameSettings::default()
            }),
            eliminated_player: None,
            time_left: 300,
        };
        state
    }

    async fn vote_all(state: &AppState, targets: &[&str]) -> Event {
        let mut last = None;
        for target in targets {
            last = Some(state.cast_vote(&target.to_string()).await.unwrap());
        }
        last.unwrap()
    }

    #[tokio::test]
    async fn test_majority_eliminates() {
        let state = in_gameplay(3, &["3"]).await;

        match vote_all(&state, &["1", "1", "2"]).await {
            Event::VotingResult {
                eliminated,
                winner,
                remaining,
                ..
            } => {
                assert_eq!(eliminated.id, "1");
                assert_eq!(winner, None);
                assert_eq!(remaining.len(), 2);
            }
            other => panic!("Expected VotingResult, got {:?}", other),
        }
        assert_eq!(state.get_game().await.stage, GameStage::VotingResult);
        assert_eq!(state.tally.read().await.vote_count(), 0);
    }

    #[tokio::test]
    async fn test_three_way_split_resets_round() {
        let state = in_gameplay(3, &["3"]).await;

        assert_eq!(vote_all(&state, &["1", "2", "3"]).await, Event::TieVote);

        let game = state.get_game().await;
        assert_eq!(game.stage, GameStage::Gameplay);
        assert_eq!(game.active_players().len(), 3);
        assert_eq!(state.tally.read().await.vote_count(), 0);
    }

    #[tokio::test]
    async fn test_pending_votes_report_counts() {
        let state = in_gameplay(4, &["4"]).await;

        match state.cast_vote(&"2".to_string()).await.unwrap() {
            Event::VoteCounts {
                counts,
                cast,
                needed,
            } => {
                assert_eq!(counts.get("2"), Some(&1));
                assert_eq!(cast, 1);
                assert_eq!(needed, 4);
            }
            other => panic!("Expected VoteCounts, got {:?}", other),
        }
        assert_eq!(state.vote_counts().await, state.vote_counts().await);
    }

    #[tokio::test]
    async fn test_spies_win_one_on_one() {
        let state = in_gameplay(3, &["1", "2"]).await;

        match vote_all(&state, &["1", "1", "3"]).await {
            Event::VotingResult {
                eliminated,
                was_last_spy,
                winner,
                ..
            } => {
                assert!(eliminated.is_spy);
                assert!(!was_last_spy);
                assert_eq!(winner, Some(Winner::Spies));
            }
            other => panic!("Expected VotingResult, got {:?}", other),
        }
        assert!(!state.get_game().await.clock_running());
    }

    #[tokio::test]
    async fn test_last_spy_caught() {
        let state = in_gameplay(4, &["2"]).await;

        match vote_all(&state, &["2", "2", "2", "1"]).await {
            Event::VotingResult {
                was_last_spy,
                winner,
                ..
            } => {
                assert!(was_last_spy);
                assert_eq!(winner, Some(Winner::Civilians));
            }
            other => panic!("Expected VotingResult, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_vote_rejected_for_inactive_or_unknown() {
        let state = in_gameplay(4, &["4"]).await;
        state.game.write().await.players[0].is_active = false;

        assert!(state.cast_vote(&"1".to_string()).await.is_err());
        assert!(state.cast_vote(&"nobody".to_string()).await.is_err());
        assert_eq!(state.tally.read().await.vote_count(), 0);
    }

    #[tokio::test]
    async fn test_vote_rejected_outside_gameplay() {
        let state = AppState::with_seed(1).unwrap();
        let result = state.cast_vote(&"1".to_string()).await;
        assert!(result.unwrap_err().contains("closed"));
    }

    #[tokio::test]
    async fn test_next_round_after_continue_counts_fewer_voters() {
        let state = in_gameplay(5, &["5"]).await;
        vote_all(&state, &["1", "1", "2", "1", "3"]).await;
        state.continue_match().await.unwrap();

        // Four active players now
        for target in ["2", "2", "3"] {
            assert!(matches!(
                state.cast_vote(&target.to_string()).await.unwrap(),
                Event::VoteCounts { needed: 4, .. }
            ));
        }
        assert!(matches!(
            state.cast_vote(&"2".to_string()).await.unwrap(),
            Event::VotingResult { .. }
        ));
    }
}
