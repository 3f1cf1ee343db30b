use crate::types::*;
use std::collections::HashMap;

/// Count how many votes each player received
pub fn count_votes(votes: &VotingState) -> HashMap<PlayerId, u32> {
    let mut counts: HashMap<PlayerId, u32> = HashMap::new();

    for target in votes.targets() {
        *counts.entry(target.clone()).or_insert(0) += 1;
    }

    counts
}

/// Active players sharing the highest non-zero vote count, in roster order
fn leaders<'a>(players: &'a [Player], counts: &HashMap<PlayerId, u32>) -> Vec<&'a Player> {
    let mut max_votes = 0;
    let mut leaders = Vec::new();

    for player in players.iter().filter(|p| p.is_active) {
        let votes = counts.get(&player.id).copied().unwrap_or(0);
        if votes > max_votes {
            max_votes = votes;
            leaders.clear();
            leaders.push(player);
        } else if votes == max_votes && max_votes > 0 {
            leaders.push(player);
        }
    }

    leaders
}

/// The single active player holding the strict maximum of votes.
///
/// Returns `None` on a tie at the top, and when no active player received
/// any vote (votes for inactive or unknown ids are ignored).
pub fn get_eliminated_player(players: &[Player], votes: &VotingState) -> Option<Player> {
    let counts = count_votes(votes);
    match leaders(players, &counts).as_slice() {
        [single] => Some((*single).clone()),
        _ => None,
    }
}

/// Whether two or more active players share the highest non-zero count
pub fn has_tie_vote(players: &[Player], votes: &VotingState) -> bool {
    let counts = count_votes(votes);
    leaders(players, &counts).len() > 1
}

/// Result of evaluating the tally after a vote
#[derive(Debug, Clone, PartialEq)]
pub enum TallyOutcome {
    /// Still waiting for votes
    Pending,
    /// Everyone voted and the top was shared; the tally has been cleared
    Tie,
    /// Everyone voted and nobody shares the top; snapshot of all votes.
    ///
    /// May carry no unique leader when every vote names an inactive or
    /// unknown id, so resolve it with `get_eliminated_player`.
    Complete(VotingState),
}

/// Vote collection for one elimination round.
///
/// The device does not know who is holding it, so each vote gets a fresh
/// synthetic voter key. The round is evaluated as soon as the number of
/// cast votes reaches the number of active players.
#[derive(Debug, Clone, Default)]
pub struct VotingTally {
    votes: VotingState,
    vote_count: usize,
}

impl VotingTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one vote against `target` and evaluate the round
    pub fn cast_vote(&mut self, target: PlayerId, players: &[Player]) -> TallyOutcome {
        let voter = format!("voter_{}", self.vote_count);
        self.votes.insert(voter, target);
        self.vote_count += 1;
        self.evaluate(players)
    }

    fn evaluate(&mut self, players: &[Player]) -> TallyOutcome {
        if !self.all_voted(players) || self.votes.is_empty() {
            return TallyOutcome::Pending;
        }

        if has_tie_vote(players, &self.votes) {
            tracing::info!("Tie after {} votes, resetting tally", self.vote_count);
            self.reset();
            return TallyOutcome::Tie;
        }

        TallyOutcome::Complete(self.votes.clone())
    }

    /// Live vote counts per target
    pub fn tally(&self) -> HashMap<PlayerId, u32> {
        count_votes(&self.votes)
    }

    pub fn has_tie(&self, players: &[Player]) -> bool {
        has_tie_vote(players, &self.votes)
    }

    pub fn all_voted(&self, players: &[Player]) -> bool {
        let active = players.iter().filter(|p| p.is_active).count();
        active > 0 && self.vote_count >= active
    }

    pub fn reset(&mut self) {
        self.votes.clear();
        self.vote_count = 0;
    }

    pub fn votes(&self) -> &VotingState {
        &self.votes
    }

    pub fn vote_count(&self) -> usize {
        self.vote_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn players(n: usize) -> Vec<Player> {
        (1..=n)
            .map(|i| Player {
                id: i.to_string(),
                name: format!("Player {}", i),
                is_active: true,
                is_spy: false,
            })
            .collect()
    }

    fn votes(pairs: &[(&str, &str)]) -> VotingState {
        pairs.iter().map(|(k, v)| (*k, *v)).collect()
    }

    #[test]
    fn test_count_votes() {
        let counts = count_votes(&votes(&[("v1", "1"), ("v2", "1"), ("v3", "2")]));

        assert_eq!(counts.get("1"), Some(&2));
        assert_eq!(counts.get("2"), Some(&1));
        assert_eq!(counts.get("3"), None);
        assert_eq!(counts.values().sum::<u32>(), 3);
    }

    #[test]
    fn test_count_votes_empty() {
        assert!(count_votes(&VotingState::new()).is_empty());
    }

    #[test]
    fn test_majority_is_eliminated() {
        let roster = players(3);
        let v = votes(&[("v1", "1"), ("v2", "1"), ("v3", "2")]);

        let eliminated = get_eliminated_player(&roster, &v).unwrap();
        assert_eq!(eliminated.id, "1");
        assert!(!has_tie_vote(&roster, &v));
    }

    #[test]
    fn test_three_way_split_is_a_tie() {
        let roster = players(3);
        let v = votes(&[("v1", "1"), ("v2", "2"), ("v3", "3")]);

        assert_eq!(get_eliminated_player(&roster, &v), None);
        assert!(has_tie_vote(&roster, &v));
    }

    #[test]
    fn test_two_way_tie_above_lower_candidates() {
        let roster = players(5);
        let v = votes(&[
            ("v1", "1"),
            ("v2", "1"),
            ("v3", "2"),
            ("v4", "2"),
            ("v5", "3"),
        ]);

        assert_eq!(get_eliminated_player(&roster, &v), None);
        assert!(has_tie_vote(&roster, &v));
    }

    #[test]
    fn test_votes_for_inactive_players_are_ignored() {
        let mut roster = players(3);
        roster[0].is_active = false;
        let v = votes(&[("v1", "1"), ("v2", "1"), ("v3", "2")]);

        let eliminated = get_eliminated_player(&roster, &v).unwrap();
        assert_eq!(eliminated.id, "2");
    }

    #[test]
    fn test_no_votes_for_active_players() {
        let mut roster = players(3);
        roster[0].is_active = false;
        let v = votes(&[("v1", "1"), ("v2", "ghost")]);

        assert_eq!(get_eliminated_player(&roster, &v), None);
        assert!(!has_tie_vote(&roster, &v));
    }

    #[test]
    fn test_tie_iff_no_elimination_when_someone_got_votes() {
        let roster = players(4);
        let cases = [
            votes(&[("a", "1")]),
            votes(&[("a", "1"), ("b", "2")]),
            votes(&[("a", "1"), ("b", "1"), ("c", "2")]),
            votes(&[("a", "4"), ("b", "3"), ("c", "4"), ("d", "3")]),
        ];

        for v in cases.iter() {
            assert_eq!(
                has_tie_vote(&roster, v),
                get_eliminated_player(&roster, v).is_none()
            );
        }
    }

    #[test]
    fn test_tally_collects_until_everyone_voted() {
        let roster = players(3);
        let mut tally = VotingTally::new();

        assert_eq!(tally.cast_vote("1".to_string(), &roster), TallyOutcome::Pending);
        assert_eq!(tally.cast_vote("2".to_string(), &roster), TallyOutcome::Pending);
        assert_eq!(tally.vote_count(), 2);
        assert_eq!(tally.tally().get("1"), Some(&1));
        assert!(!tally.all_voted(&roster));

        match tally.cast_vote("1".to_string(), &roster) {
            TallyOutcome::Complete(snapshot) => {
                assert_eq!(snapshot.len(), 3);
                assert_eq!(get_eliminated_player(&roster, &snapshot).unwrap().id, "1");
            }
            other => panic!("Expected Complete, got {:?}", other),
        }

        // Holds the snapshot until the next round replaces it
        assert_eq!(tally.vote_count(), 3);
        assert_eq!(tally.votes().len(), 3);
    }

    #[test]
    fn test_tally_resets_on_tie() {
        let roster = players(3);
        let mut tally = VotingTally::new();

        tally.cast_vote("1".to_string(), &roster);
        tally.cast_vote("2".to_string(), &roster);
        assert_eq!(tally.cast_vote("3".to_string(), &roster), TallyOutcome::Tie);

        assert_eq!(tally.vote_count(), 0);
        assert!(tally.votes().is_empty());
        assert!(tally.tally().is_empty());
    }

    #[test]
    fn test_tally_voter_keys_are_distinct() {
        let roster = players(3);
        let mut tally = VotingTally::new();

        tally.cast_vote("1".to_string(), &roster);
        tally.cast_vote("1".to_string(), &roster);

        let keys: Vec<_> = tally.votes().iter().map(|(k, _)| k.clone()).collect();
        assert_eq!(keys, vec!["voter_0", "voter_1"]);
    }

    #[test]
    fn test_tally_counts_only_active_players_for_completion() {
        let mut roster = players(3);
        roster[2].is_active = false;
        let mut tally = VotingTally::new();

        tally.cast_vote("1".to_string(), &roster);
        assert!(matches!(
            tally.cast_vote("1".to_string(), &roster),
            TallyOutcome::Complete(_)
        ));
    }

    #[test]
    fn test_complete_round_without_active_targets_has_no_leader() {
        let mut roster = players(3);
        roster[0].is_active = false;
        let mut tally = VotingTally::new();

        tally.cast_vote("1".to_string(), &roster);
        match tally.cast_vote("ghost".to_string(), &roster) {
            TallyOutcome::Complete(snapshot) => {
                assert_eq!(get_eliminated_player(&roster, &snapshot), None);
            }
            other => panic!("Expected Complete, got {:?}", other),
        }
    }

    #[test]
    fn test_two_player_split_is_a_tie() {
        let mut roster = players(3);
        roster[0].is_active = false;
        let mut tally = VotingTally::new();

        tally.cast_vote("2".to_string(), &roster);
        assert_eq!(tally.cast_vote("3".to_string(), &roster), TallyOutcome::Tie);
    }
}
