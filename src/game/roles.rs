use crate::types::*;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

/// Assign roles for a new match.
///
/// Shuffles the roster positions with `rng` and marks the first `spy_count`
/// as spies. Every other field is carried over untouched and the roster
/// keeps its original order. A `spy_count` larger than the roster makes
/// everyone a spy.
pub fn assign_roles<R: Rng + ?Sized>(
    players: &[Player],
    spy_count: usize,
    rng: &mut R,
) -> Vec<Player> {
    let mut order: Vec<usize> = (0..players.len()).collect();
    order.shuffle(rng);
    let spies: HashSet<usize> = order.into_iter().take(spy_count).collect();

    players
        .iter()
        .enumerate()
        .map(|(idx, player)| Player {
            is_spy: spies.contains(&idx),
            ..player.clone()
        })
        .collect()
}
