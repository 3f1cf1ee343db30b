use crate::types::*;

/// Check whether the match has been decided.
///
/// Only active players count. Civilians win once no spy is left. Spies win
/// only when exactly one spy faces exactly one civilian; every other
/// distribution (including several spies with no civilians left) keeps
/// the match going.
pub fn check_win_condition(players: &[Player]) -> Option<Winner> {
    let active_spies = players.iter().filter(|p| p.is_active && p.is_spy).count();
    let active_civilians = players.iter().filter(|p| p.is_active && !p.is_spy).count();

    if active_spies == 0 {
        return Some(Winner::Civilians);
    }

    if active_spies == 1 && active_civilians == 1 {
        return Some(Winner::Spies);
    }

    None
}
