use crate::types::*;

/// Build a fresh roster from already validated names.
///
/// Every player starts active and as a civilian; roles are assigned
/// when the match starts.
pub fn build_roster<S: AsRef<str>>(names: &[S]) -> Vec<Player> {
    names
        .iter()
        .map(|name| Player {
            id: ulid::Ulid::new().to_string(),
            name: name.as_ref().trim().to_string(),
            is_active: true,
            is_spy: false,
        })
        .collect()
}

/// Players not yet eliminated, in roster order
pub fn active_players(players: &[Player]) -> Vec<Player> {
    players.iter().filter(|p| p.is_active).cloned().collect()
}
